//! Client for the task message store.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use syllabi_agent_core::store::{ConversationStore, Error, StoredMessage};

use crate::PlatformConfig;

#[derive(Debug, Deserialize)]
struct TaskMessagesResponse {
    messages: Vec<TaskMessage>,
}

#[derive(Debug, Deserialize)]
struct TaskMessage {
    content: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    r#type: String,
    author: String,
    content: String,
}

fn collect_messages(resp: TaskMessagesResponse) -> Vec<StoredMessage> {
    resp.messages
        .into_iter()
        .map(|msg| StoredMessage {
            kind: msg.content.r#type,
            author: msg.content.author,
            content: msg.content.content,
        })
        .collect()
}

/// A [`ConversationStore`] backed by the platform's task message API.
#[derive(Clone, Debug)]
pub struct MessageStoreClient {
    client: Client,
    config: Arc<PlatformConfig>,
}

impl MessageStoreClient {
    /// Creates a new client for the given backend.
    #[inline]
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl ConversationStore for MessageStoreClient {
    async fn list_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<StoredMessage>, Error> {
        debug!("listing messages for {conversation_id}");
        let req = self.client.get(format!(
            "{}/tasks/{}/messages",
            self.config.base_url, conversation_id
        ));
        let resp: TaskMessagesResponse = self
            .config
            .with_auth(req)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|err| Error::new(format!("{err}")))?
            .json()
            .await
            .map_err(|err| Error::new(format!("{err}")))?;
        Ok(collect_messages(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_messages() {
        let resp: TaskMessagesResponse = serde_json::from_str(
            r#"{
                "messages": [
                    {
                        "id": "msg-1",
                        "content": {
                            "type": "text",
                            "author": "user",
                            "content": "What is CS101?"
                        }
                    },
                    {
                        "id": "msg-2",
                        "content": {
                            "type": "text",
                            "author": "agent",
                            "content": "An intro course."
                        }
                    },
                    {
                        "id": "msg-3",
                        "content": {
                            "type": "file",
                            "author": "user",
                            "content": "syllabus.pdf"
                        }
                    }
                ]
            }"#,
        )
        .unwrap();
        let messages = collect_messages(resp);
        assert_eq!(
            messages,
            vec![
                StoredMessage {
                    kind: "text".to_owned(),
                    author: "user".to_owned(),
                    content: "What is CS101?".to_owned(),
                },
                StoredMessage {
                    kind: "text".to_owned(),
                    author: "agent".to_owned(),
                    content: "An intro course.".to_owned(),
                },
                StoredMessage {
                    kind: "file".to_owned(),
                    author: "user".to_owned(),
                    content: "syllabus.pdf".to_owned(),
                },
            ]
        );
    }
}
