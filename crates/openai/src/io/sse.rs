use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A minimal reader for server-sent events over a chunk stream.
///
/// Only `data` fields terminated by a blank line are recognized, which
/// is all the chat completions endpoint emits.
pub struct Sse {
    buf: String,
    chunks: Chunks,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: String::new(),
            chunks,
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            // Pull more bytes before attempting a parse, since an event may
            // be split across chunk boundaries arbitrarily.
            let mut has_more_data = false;
            if let Some(bytes) =
                self.chunks.next_chunk().await.map_err(Error::ChunksError)?
            {
                let Ok(s) = str::from_utf8(&bytes) else {
                    return Err(Error::InvalidPayload);
                };
                self.buf.push_str(s);
                has_more_data = true;
            }

            if let Some(event) = self.try_parse_event()? {
                return Ok(Some(event));
            }

            // Stream ended with no complete event left in the buffer.
            if !has_more_data {
                return Ok(None);
            }
        }
    }

    fn try_parse_event(&mut self) -> Result<Option<String>, Error> {
        if self.buf.is_empty() {
            return Ok(None);
        }

        // field       = 1*name-char [ colon [ space ] *any-char ] end-of-line
        // end-of-line = ( cr lf / cr / lf )
        //
        // Only line feeds are handled here.
        let Some(eol_idx) = self.buf.find("\n\n") else {
            return Ok(None);
        };

        let field = &self.buf[0..eol_idx];
        let Some((header, data)) = field.split_once(": ") else {
            return Err(Error::InvalidPayload);
        };
        if header != "data" {
            // Comments and named events are not supported.
            return Err(Error::InvalidPayload);
        }
        let data = data.to_owned();

        self.buf.drain(0..eol_idx + 2);

        Ok(Some(data))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[tokio::test]
    async fn test_whole_events() {
        let chunks = Chunks::from_chunks([
            Bytes::from_static(b"data: {\"id\":\"a\"}\n\n"),
            Bytes::from_static(b"data: [DONE]\n\n"),
        ]);
        let mut sse = Sse::new(chunks);
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "{\"id\":\"a\"}");
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "[DONE]");
        assert_eq!(sse.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_event_split_across_chunks() {
        let chunks = Chunks::from_chunks([
            Bytes::from_static(b"data:"),
            Bytes::from_static(b" hello\n"),
            Bytes::from_static(b"\n"),
        ]);
        let mut sse = Sse::new(chunks);
        assert_eq!(sse.next_event().await.unwrap().unwrap(), "hello");
        assert_eq!(sse.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_data() {
        let chunks =
            Chunks::from_chunks([Bytes::from_static(b"xxxxxx\n\n")]);
        let mut sse = Sse::new(chunks);
        assert_eq!(sse.next_event().await.unwrap_err(), Error::InvalidPayload);

        // An incomplete field is not an error until more data arrives.
        let chunks = Chunks::from_chunks([Bytes::from_static(b"xxxxxx\n")]);
        let mut sse = Sse::new(chunks);
        assert_eq!(sse.next_event().await.unwrap(), None);

        let chunks = Chunks::from_chunks([
            Bytes::from_static(b"data: hello\n"),
            Bytes::from_static(b"data: bye\n"),
        ]);
        let mut sse = Sse::new(chunks);
        assert_eq!(sse.next_event().await.unwrap(), None);
    }
}
