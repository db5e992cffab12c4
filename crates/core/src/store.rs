//! The external conversation store capability and the history loader.

use std::error::Error as StdError;
use std::fmt::{self, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use syllabi_agent_model::ChatMessage;

/// A message as stored by the external message store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// The content kind; only `text` entries carry usable history.
    pub kind: String,
    /// The stored author field.
    pub author: String,
    /// The text content.
    pub content: String,
}

/// Describes a conversation store error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    message: String,
}

impl Error {
    /// Creates a new error with the given message.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

/// The external store holding prior conversation turns.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Fetches stored messages for the identifier, oldest first.
    async fn list_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<StoredMessage>, Error>;
}

/// Loads prior turns for the conversation and normalizes them into a
/// role/content sequence.
///
/// Non-text entries are silently dropped, and authors other than `user`
/// and `system` are coerced to `assistant`. History is best-effort
/// context, not a correctness requirement: any fetch failure is logged
/// and yields an empty sequence.
pub async fn load_history(
    store: &dyn ConversationStore,
    conversation_id: &str,
) -> Vec<ChatMessage> {
    let stored = match store.list_messages(conversation_id).await {
        Ok(stored) => stored,
        Err(err) => {
            warn!("failed to load history for {conversation_id}: {err}");
            return vec![];
        }
    };

    stored
        .into_iter()
        .filter(|msg| msg.kind == "text")
        .map(|msg| match msg.author.as_str() {
            "user" => ChatMessage::User(msg.content),
            "system" => ChatMessage::System(msg.content),
            _ => ChatMessage::Assistant(msg.content),
        })
        .collect()
}
