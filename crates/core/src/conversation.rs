//! Conversation-related types.

use syllabi_agent_model::{ChatMessage, ReasonerRequest, ToolSpec};

/// The message sequence for one turn.
///
/// The order is append-only and deterministic: the system prompt comes
/// first, then loaded history oldest to newest, then the current user
/// message, then any tool round-trip messages in the order the tools
/// were requested.
#[derive(Clone, Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Creates a conversation seeded with the system instructions.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(prompt: S) -> Self {
        Self {
            messages: vec![ChatMessage::System(prompt.into())],
        }
    }

    /// Appends a message.
    #[inline]
    pub fn push(&mut self, msg: ChatMessage) {
        self.messages.push(msg);
    }

    /// Appends messages in order.
    #[inline]
    pub fn extend<I: IntoIterator<Item = ChatMessage>>(&mut self, msgs: I) {
        self.messages.extend(msgs);
    }

    /// Returns the messages in conversation order.
    #[inline]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Makes a request over the current message sequence with the given
    /// tool catalog.
    #[inline]
    pub fn make_request(&self, tools: Vec<ToolSpec>) -> ReasonerRequest {
        ReasonerRequest {
            messages: self.messages.clone(),
            tools,
        }
    }
}
