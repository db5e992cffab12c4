//! A local fake reasoner for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use syllabi_agent_model::{
    ErrorKind, FinishReason, OpaqueMessage, Reasoner, ReasonerError,
    ReasonerRequest, ReasonerResponse, ResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ReasonerError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestReasonerResponse {
    events: VecDeque<PresetEvent>,
    ordinal: usize,
    delay: Duration,
    completed: bool,
    has_tool_call: bool,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ReasonerResponse for TestReasonerResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ResponseEvent>, Self::Error>> {
        // SAFETY: This type does not require to be pinned.
        let this = unsafe { self.get_unchecked_mut() };

        if let Some(sleep) = &mut this.sleep {
            let sleep = sleep.as_mut();
            ready!(sleep.poll(cx));
            this.sleep = None;

            if let Some(event) = this.events.pop_front() {
                let event = match event {
                    PresetEvent::MessageDelta(msg) => {
                        ResponseEvent::MessageDelta(msg)
                    }
                    PresetEvent::ToolCall(req) => {
                        this.has_tool_call = true;
                        ResponseEvent::ToolCall(req)
                    }
                    PresetEvent::Usage(usage) => ResponseEvent::Usage(usage),
                };
                return Poll::Ready(Ok(Some(event)));
            }

            if !this.completed {
                this.completed = true;
                return Poll::Ready(Ok(Some(ResponseEvent::Completed(
                    if this.has_tool_call {
                        FinishReason::ToolCalls
                    } else {
                        FinishReason::Stop
                    },
                ))));
            }

            // In case this method is called after completion.
            return Poll::Ready(Ok(None));
        }
        this.sleep = Some(Box::pin(sleep(this.delay)));
        Pin::new(this).poll_next_event(cx)
    }

    fn make_opaque_message(&self) -> Option<OpaqueMessage> {
        let id = format!("msg:{}", self.ordinal);
        Some(OpaqueMessage::new(id.clone(), id))
    }
}

/// A local fake reasoner for testing purpose.
///
/// Before sending requests, you need to setup the response script, which
/// is how the reasoner should respond to each request. Scripted responses
/// are consumed in order, one per request. If the script runs out, an
/// error is returned.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestReasoner {
    script: Arc<Mutex<VecDeque<PresetResponse>>>,
    requests: Arc<Mutex<Vec<ReasonerRequest>>>,
    delay: Option<Duration>,
}

impl TestReasoner {
    /// Appends a scripted response for the next unanswered request.
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(preset);
    }

    /// Sets the delay between events.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns how many requests this reasoner has received.
    #[inline]
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock poisoned").len()
    }

    /// Returns copies of all received requests, in arrival order.
    #[inline]
    pub fn requests(&self) -> Vec<ReasonerRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .clone()
    }
}

impl Reasoner for TestReasoner {
    type Error = crate::Error;
    type Response = TestReasonerResponse;

    fn send_request(
        &self,
        req: &ReasonerRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let ordinal = {
            let mut requests =
                self.requests.lock().expect("requests lock poisoned");
            requests.push(req.clone());
            requests.len() - 1
        };
        let step = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        let result = match step {
            None => Err(Error {
                message: "no more scripted responses",
                kind: ErrorKind::RateLimitExceeded,
            }),
            Some(preset) if preset.fail => Err(Error {
                message: "scripted failure",
                kind: ErrorKind::Other,
            }),
            Some(preset) => Ok(TestReasonerResponse {
                events: preset.events.into(),
                ordinal,
                delay,
                completed: false,
                has_tool_call: false,
                sleep: None,
            }),
        };
        ready(result)
    }
}
