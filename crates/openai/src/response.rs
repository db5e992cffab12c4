use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use pin_project_lite::pin_project;
use serde_json::Value;
use syllabi_agent_model::{
    ErrorKind, FinishReason, OpaqueMessage, ReasonerResponse, ResponseEvent,
    TokenUsage, ToolCallRequest,
};

use crate::Error;
use crate::io::Sse;
use crate::proto::{ChatCompletionChunk, Message, ToolCall};

struct PartialState {
    sse: Sse,
    id: Option<String>,
    content: String,
    reasoning_content: Option<String>,
    tool_calls: Vec<ToolCall>,
    // Indices of tool calls that are assembled but not yet surfaced to the
    // caller. `poll_next_event` drains these one at a time.
    pending_tool_call_idx: VecDeque<usize>,
    // Usage arrives in a trailing chunk with no choices; it is held here
    // until the loop next yields.
    pending_usage: Option<TokenUsage>,
    // Cleared after the completed event is returned.
    pending_finish_reason: Option<FinishReason>,
}

impl PartialState {
    #[inline]
    fn finish(self) -> Option<(String, Message)> {
        Some((
            self.id?,
            Message::Assistant {
                content: Some(self.content),
                tool_calls: if self.tool_calls.is_empty() {
                    None
                } else {
                    Some(self.tool_calls)
                },
                reasoning_content: self.reasoning_content,
            },
        ))
    }
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ResponseEvent>, PartialState), Error>;

pin_project! {
    pub struct OpenAIResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
        full_msg: Option<(String, Message)>,
    }
}

impl OpenAIResponse {
    #[inline]
    pub fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState {
            sse,
            id: None,
            content: Default::default(),
            reasoning_content: Default::default(),
            tool_calls: Default::default(),
            pending_tool_call_idx: Default::default(),
            pending_usage: Default::default(),
            pending_finish_reason: Default::default(),
        };
        let next_event_fut = async move { next_event(partial_state).await };
        Self {
            next_event_fut: Some(Box::pin(next_event_fut)),
            full_msg: None,
        }
    }
}

impl ReasonerResponse for OpenAIResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let (event, partial_state) =
            match ready!(next_event_fut.as_mut().poll(cx)) {
                Ok((Some(event), partial_state)) => (event, partial_state),
                Ok((None, partial_state)) => {
                    *this.next_event_fut = None;
                    *this.full_msg = partial_state.finish();
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // More data may still arrive, queue up a future for the next event.
        let next_event_fut = async move { next_event(partial_state).await };
        *this.next_event_fut = Some(Box::pin(next_event_fut));

        Poll::Ready(Ok(Some(event)))
    }

    fn make_opaque_message(&self) -> Option<OpaqueMessage> {
        self.full_msg
            .as_ref()
            .map(|(id, msg)| OpaqueMessage::new(id, msg.clone()))
    }
}

async fn next_event(
    mut partial_state: PartialState,
) -> Result<(Option<ResponseEvent>, PartialState), Error> {
    let sse = &mut partial_state.sse;
    let mut message_delta = None;

    loop {
        let sse_event = match sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                return Err(Error::new(format!("{err:?}"), ErrorKind::Other));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            break;
        }

        let mut chunk = serde_json::from_str::<ChatCompletionChunk>(&sse_event)
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
        if partial_state.id.get_or_insert_with(|| chunk.id.clone()) != &chunk.id
        {
            return Err(Error::new("chunk id mismatch", ErrorKind::Other));
        };

        if let Some(usage) = chunk.usage {
            partial_state.pending_usage = Some(TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            });
        }

        let Some(choice) = chunk.choices.pop() else {
            // The usage chunk carries no choices, keep reading.
            continue;
        };

        if let Some(finish_reason) = choice.finish_reason {
            let finish_reason = if finish_reason == "tool_calls" {
                FinishReason::ToolCalls
            } else {
                FinishReason::Stop
            };
            partial_state.pending_finish_reason = Some(finish_reason);
            break;
        }

        if let Some(content) = choice.delta.content {
            partial_state.content.push_str(&content);
            message_delta = Some(content);
        }
        if let Some(reasoning_content) = &choice.delta.reasoning_content {
            partial_state
                .reasoning_content
                .get_or_insert_default()
                .push_str(reasoning_content);
        }
        if let Some(tool_calls) = choice.delta.tool_calls {
            for tool_call in tool_calls {
                let Some(partial_tool_call) = partial_state
                    .tool_calls
                    .iter_mut()
                    .find(|t| t.index == tool_call.index)
                else {
                    partial_state
                        .pending_tool_call_idx
                        .push_back(partial_state.tool_calls.len());
                    partial_state.tool_calls.push(tool_call);
                    continue;
                };
                // Patch the partial tool call with the newly arrived parts.
                if let Some(id) = tool_call.id {
                    partial_tool_call.id.get_or_insert_default().push_str(&id);
                }
                if let Some(ty) = tool_call.r#type {
                    partial_tool_call
                        .r#type
                        .get_or_insert_default()
                        .push_str(&ty);
                }
                if let Some(function) = tool_call.function {
                    match partial_tool_call.function {
                        Some(ref mut partial_func) => {
                            if let Some(name) = function.name {
                                partial_func
                                    .name
                                    .get_or_insert_default()
                                    .push_str(&name);
                            }
                            if let Some(arguments) = function.arguments {
                                partial_func
                                    .arguments
                                    .get_or_insert_default()
                                    .push_str(&arguments);
                            }
                        }
                        None => partial_tool_call.function = Some(function),
                    }
                }
            }
        }

        if message_delta.is_some() {
            break;
        }
    }

    // The order matters here. Message deltas go first, then assembled tool
    // calls, then usage, and the finish reason comes last among the events
    // pending at the same point.

    if let Some(message_delta) = message_delta {
        return Ok((
            Some(ResponseEvent::MessageDelta(message_delta)),
            partial_state,
        ));
    }

    if let Some(idx) = partial_state.pending_tool_call_idx.pop_front() {
        let tool_call = &partial_state.tool_calls[idx];
        let id = tool_call.id.clone().unwrap_or_default();
        let name = tool_call
            .function
            .as_ref()
            .and_then(|f| f.name.clone())
            .unwrap_or_default();
        // The service may stream an empty arguments string for tools that
        // take no parameters. Treat that as an empty object.
        let arguments = tool_call
            .function
            .as_ref()
            .and_then(|f| f.arguments.as_deref())
            .filter(|args| !args.trim().is_empty())
            .and_then(|args| serde_json::from_str::<Value>(args).ok())
            .unwrap_or_else(|| Value::Object(Default::default()));
        return Ok((
            Some(ResponseEvent::ToolCall(ToolCallRequest {
                id,
                name,
                arguments,
            })),
            partial_state,
        ));
    }

    if let Some(usage) = partial_state.pending_usage.take() {
        return Ok((Some(ResponseEvent::Usage(usage)), partial_state));
    }

    if let Some(finish_reason) = partial_state.pending_finish_reason.take() {
        return Ok((
            Some(ResponseEvent::Completed(finish_reason)),
            partial_state,
        ));
    }

    Ok((None, partial_state))
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;

    use super::*;
    use crate::io::Chunks;

    async fn collect_events(sse: Sse) -> (Vec<ResponseEvent>, OpenAIResponse) {
        let mut resp = Box::pin(OpenAIResponse::from_sse(sse));
        let mut events = vec![];
        while let Some(event) =
            poll_fn(|cx| resp.as_mut().poll_next_event(cx))
                .await
                .unwrap()
        {
            events.push(event);
        }
        (events, *Pin::into_inner(resp))
    }

    #[tokio::test]
    async fn test_tool_call_stream() {
        let chunks = Chunks::from_chunks([Bytes::from_static(
            include_bytes!("../fixtures/tool_call_stream.txt"),
        )]);
        let (events, resp) = collect_events(Sse::new(chunks)).await;

        let tool_calls: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ResponseEvent::ToolCall(req) => Some(req),
                _ => None,
            })
            .collect();
        assert_eq!(tool_calls.len(), 2);
        assert_eq!(tool_calls[0].id, "call_abc");
        assert_eq!(tool_calls[0].name, "search_syllabi");
        assert_eq!(
            tool_calls[0].arguments,
            serde_json::json!({ "query": "grading policy" })
        );
        assert_eq!(tool_calls[1].name, "get_index_stats");
        assert_eq!(
            tool_calls[1].arguments,
            Value::Object(Default::default())
        );

        assert!(events.iter().any(|e| matches!(
            e,
            ResponseEvent::Usage(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 34,
            })
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            ResponseEvent::Completed(FinishReason::ToolCalls)
        )));

        let full_msg = resp.make_opaque_message().unwrap();
        let full_msg: &Message = full_msg.to_raw().unwrap();
        assert!(matches!(
            full_msg,
            Message::Assistant {
                tool_calls: Some(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_plain_answer_stream() {
        let chunks = Chunks::from_chunks([
            Bytes::from_static(
                b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"Hello\"},\"finish_reason\":null}]}\n\n",
            ),
            Bytes::from_static(
                b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\" there\"},\"finish_reason\":null}]}\n\n",
            ),
            Bytes::from_static(
                b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
            ),
            Bytes::from_static(b"data: [DONE]\n\n"),
        ]);
        let (events, resp) = collect_events(Sse::new(chunks)).await;

        let text: String = events
            .iter()
            .filter_map(|e| match e {
                ResponseEvent::MessageDelta(delta) => Some(delta.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "Hello there");
        assert!(events.iter().any(|e| matches!(
            e,
            ResponseEvent::Completed(FinishReason::Stop)
        )));

        let full_msg = resp.make_opaque_message().unwrap();
        let full_msg: &Message = full_msg.to_raw().unwrap();
        assert!(matches!(
            full_msg,
            Message::Assistant {
                content: Some(content),
                ..
            } if content == "Hello there"
        ));
    }

    #[tokio::test]
    async fn test_chunk_id_mismatch() {
        let chunks = Chunks::from_chunks([
            Bytes::from_static(
                b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"finish_reason\":null}]}\n\n",
            ),
            Bytes::from_static(
                b"data: {\"id\":\"c2\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
            ),
        ]);
        let mut resp = pin!(OpenAIResponse::from_sse(Sse::new(chunks)));
        let first = poll_fn(|cx| resp.as_mut().poll_next_event(cx))
            .await
            .unwrap();
        assert!(matches!(first, Some(ResponseEvent::MessageDelta(_))));
        let second = poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await;
        assert!(second.is_err());
    }
}
