use std::sync::Arc;

use syllabi_agent_core::index::DocumentIndex;
use syllabi_agent_core::store::ConversationStore;
use syllabi_agent_core::trace::Tracer;
use syllabi_agent_core::{Agent, AgentBuilder, TurnError};
use syllabi_agent_model::Reasoner;

use crate::tools::*;

/// The default system instructions for the agent.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("./system_prompt.md");

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    index: Arc<dyn DocumentIndex>,
}

impl SessionBuilder {
    /// Creates a session builder with the reasoner backend and the
    /// document index the syllabi tools operate on.
    pub fn with_backends<R: Reasoner + 'static>(
        reasoner: R,
        index: Arc<dyn DocumentIndex>,
    ) -> Self {
        let agent_builder = AgentBuilder::with_reasoner(reasoner)
            .with_system_prompt(DEFAULT_SYSTEM_PROMPT);
        Self {
            agent_builder,
            index,
        }
    }

    /// Overrides the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.agent_builder = self.agent_builder.with_system_prompt(prompt);
        self
    }

    /// Attaches the external message store used to load prior turns.
    #[inline]
    pub fn with_conversation_store(
        mut self,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        self.agent_builder = self.agent_builder.with_conversation_store(store);
        self
    }

    /// Attaches a tracing backend.
    #[inline]
    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.agent_builder = self.agent_builder.with_tracer(tracer);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let agent = self
            .agent_builder
            .with_tool(SearchSyllabiTool::new(Arc::clone(&self.index)))
            .with_tool(UploadSyllabusTool::new(Arc::clone(&self.index)))
            .with_tool(GetIndexStatsTool::new(Arc::clone(&self.index)))
            .with_tool(ListIndexedFilesTool::new(self.index))
            .build();

        Session { agent }
    }
}

/// A chat session over the syllabi index.
///
/// The session holds a fully configured agent with the syllabi tools
/// registered; it is basically a wrapper around [`Agent`].
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Handles one inbound message for the conversation, forwarding
    /// streamed answer fragments to `on_delta` in arrival order.
    #[inline]
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        text: &str,
        on_delta: impl Fn(String) + Send + 'static,
    ) -> Result<(), TurnError> {
        self.agent
            .handle_message(conversation_id, text, on_delta)
            .await
    }
}
