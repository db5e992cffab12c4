use std::future::poll_fn;
use std::pin::{Pin, pin};
use std::sync::Arc;

use syllabi_agent_model::{
    FinishReason, OpaqueMessage, Reasoner, ReasonerError, ReasonerRequest,
    ReasonerResponse, ResponseEvent, TokenUsage, ToolCallRequest,
};
use tracing::Instrument;

type SendRequestResult = Result<ClientResponse, Box<dyn ReasonerError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
#[rustfmt::skip]
type HandlerFn = Arc<
    dyn Fn(ReasonerRequest, Box<dyn Fn(String) + Send + 'static>)
        -> BoxedSendRequestFuture + Send + Sync
>;

/// A wrapper around a reasoner that maintains an execution environment
/// for it and provides a type-erased interface for the other modules.
#[derive(Clone)]
pub struct ReasonerClient {
    handler_fn: HandlerFn,
}

impl ReasonerClient {
    /// Wraps the given reasoner.
    #[inline]
    pub fn new<R: Reasoner + 'static>(reasoner: R) -> Self {
        // We have to erase the type `R`, since `ReasonerClient` doesn't
        // have a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req, on_delta| {
            let fut = reasoner.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    let resp_or_err = fut.await;
                    handle_response::<R>(resp_or_err, on_delta).await
                }
                .instrument(trace_span!("reasoner client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and collects the whole response, invoking
    /// `on_delta` for each message fragment as it arrives.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The response stops streaming further
    /// events when this operation is cancelled.
    #[inline]
    pub async fn send_request(
        &self,
        req: ReasonerRequest,
        on_delta: impl Fn(String) + Send + 'static,
    ) -> Result<ClientResponse, Box<dyn ReasonerError>> {
        (self.handler_fn)(req, Box::new(on_delta)).await
    }
}

/// A completely received response from the reasoner client.
#[derive(Clone, Debug)]
pub struct ClientResponse {
    /// The concatenated message text.
    pub text: String,
    /// The reasoner-native record of this response, if available.
    pub opaque_msg: Option<OpaqueMessage>,
    /// Tool calls requested by the reasoner, in request order.
    pub tool_calls: Vec<ToolCallRequest>,
    /// Usage counters, when the service reported them.
    pub usage: Option<TokenUsage>,
    /// The reason the reasoner finished generating.
    pub finish_reason: Option<FinishReason>,
}

async fn handle_response<R: Reasoner + 'static>(
    resp_or_err: Result<R::Response, R::Error>,
    on_delta: Box<dyn Fn(String) + Send + 'static>,
) -> SendRequestResult {
    let resp = match resp_or_err {
        Ok(resp) => resp,
        Err(err) => {
            error!("got an error: {err:?}");
            return Err(Box::new(err));
        }
    };

    let mut text = String::new();
    let opaque_msg;
    let mut tool_calls = Vec::new();
    let mut usage = None;
    let mut finish_reason = None;

    trace!("start receiving events");

    let mut pinned_resp = pin!(resp);
    loop {
        let event_or_err =
            poll_fn(|cx| pinned_resp.as_mut().poll_next_event(cx)).await;
        let event = match event_or_err {
            Ok(event) => event,
            Err(err) => {
                error!("got an error: {err:?}");
                return Err(Box::new(err));
            }
        };

        let Some(event) = event else {
            // The request has been handled gracefully without errors,
            // now try getting the opaque message for this response.
            opaque_msg = pinned_resp.make_opaque_message();
            break;
        };
        trace!("got an event: {event:?}");

        match event {
            ResponseEvent::MessageDelta(msg) => {
                text.push_str(&msg);
                on_delta(msg);
            }
            ResponseEvent::ToolCall(req) => {
                tool_calls.push(req);
            }
            ResponseEvent::Usage(counters) => {
                usage = Some(counters);
            }
            ResponseEvent::Completed(reason) => {
                finish_reason = Some(reason);
            }
        }
    }

    trace!("finished a request");

    Ok(ClientResponse {
        text,
        opaque_msg,
        tool_calls,
        usage,
        finish_reason,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use syllabi_agent_model::ChatMessage;
    use syllabi_agent_test_reasoner::{
        PresetEvent, PresetResponse, TestReasoner,
    };

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let mut reasoner = TestReasoner::default();
        reasoner.add_response(PresetResponse::with_events([
            PresetEvent::MessageDelta("How ".to_owned()),
            PresetEvent::MessageDelta("are ".to_owned()),
            PresetEvent::MessageDelta("you?".to_owned()),
            PresetEvent::Usage(TokenUsage {
                prompt_tokens: 12,
                completion_tokens: 3,
            }),
        ]));

        let client = ReasonerClient::new(reasoner);

        let on_delta_called = Arc::new(AtomicBool::new(false));
        let resp = client
            .send_request(
                ReasonerRequest {
                    messages: vec![ChatMessage::User("Hi".to_owned())],
                    tools: vec![],
                },
                {
                    let on_delta_called = Arc::clone(&on_delta_called);
                    move |_| {
                        on_delta_called.store(true, Ordering::Relaxed);
                    }
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.text, "How are you?");
        assert!(resp.opaque_msg.is_some());
        assert_eq!(resp.finish_reason, Some(FinishReason::Stop));
        assert_eq!(
            resp.usage,
            Some(TokenUsage {
                prompt_tokens: 12,
                completion_tokens: 3,
            })
        );
        assert!(on_delta_called.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_error_handling() {
        let reasoner = TestReasoner::default();
        let client = ReasonerClient::new(reasoner);
        let resp_or_err = client
            .send_request(
                ReasonerRequest {
                    messages: vec![ChatMessage::User("Hi".to_owned())],
                    tools: vec![],
                },
                |_| {},
            )
            .await;
        assert!(resp_or_err.is_err());
    }
}
