use std::pin::Pin;
use std::task::{self, Poll};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::OpaqueMessage;
use crate::reasoner::ReasonerError;

/// A response from the reasoning service.
pub trait ReasonerResponse: Sized + Send + 'static {
    /// The error type that may be returned by the reasoner.
    type Error: ReasonerError;

    /// Attempts to pull out the next event from the response.
    ///
    /// # Return value
    ///
    /// There are several possible return values, each indicating a
    /// distinct response state:
    ///
    /// - `Poll::Pending` means that this response is still waiting for
    ///   the next event. Implementations will ensure that the current
    ///   task will be notified when the next event may be ready.
    /// - `Poll::Ready(Ok(Some(event)))` means the response has an event
    ///   to deliver, and may produce further events on subsequent
    ///   `poll_next_event` calls.
    /// - `Poll::Ready(Ok(None))` means the response has completed.
    /// - `Poll::Ready(Err(error))` means an error occurred while
    ///   processing the response.
    ///
    /// Calling this method after completion should always return `None`.
    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ResponseEvent>, Self::Error>>;

    /// Makes an [`OpaqueMessage`] that represents the message in this
    /// response.
    ///
    /// You should call this method after polling all events from this
    /// response, and the implementations should always return the same
    /// message for one response.
    ///
    /// Calling this method when the response is still producing events
    /// should be avoided, since the message may be incomplete.
    fn make_opaque_message(&self) -> Option<OpaqueMessage> {
        None
    }
}

/// The reason why a reasoner response has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishReason {
    /// The reasoner needs to call a tool.
    ToolCalls,
    /// The reasoner has finished generating text.
    Stop,
}

/// Describes a tool call request from the reasoner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The decoded argument object to pass to the tool. Blank argument
    /// payloads decode to an empty object.
    pub arguments: Value,
}

/// Token usage counters reported by the reasoning service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the request.
    pub prompt_tokens: u64,
    /// Tokens produced by the response.
    pub completion_tokens: u64,
}

/// The event from a reasoner response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResponseEvent {
    /// The response has been completed.
    Completed(FinishReason),
    /// Received a message delta.
    MessageDelta(String),
    /// Received a tool call request.
    ToolCall(ToolCallRequest),
    /// Received usage counters for the whole response.
    Usage(TokenUsage),
}
