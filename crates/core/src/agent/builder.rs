use std::sync::Arc;

use syllabi_agent_model::Reasoner;

use super::Agent;
use crate::reasoner_client::ReasonerClient;
use crate::store::ConversationStore;
use crate::tool::{AnyTool, Executor as ToolExecutor, Tool, ToolObject};
use crate::trace::Tracer;

/// [`Agent`] builder.
pub struct AgentBuilder {
    reasoner: ReasonerClient,
    system_prompt: String,
    tools: Vec<Box<dyn ToolObject>>,
    store: Option<Arc<dyn ConversationStore>>,
    tracer: Option<Arc<dyn Tracer>>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified reasoner backend.
    #[inline]
    pub fn with_reasoner<R: Reasoner + 'static>(reasoner: R) -> Self {
        Self {
            reasoner: ReasonerClient::new(reasoner),
            system_prompt: String::new(),
            tools: vec![],
            store: None,
            tracer: None,
        }
    }

    /// Sets the fixed system instructions for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        let tool = Box::new(AnyTool(tool));
        self.tools.push(tool);
        self
    }

    /// Attaches the external message store used to load prior turns.
    #[inline]
    pub fn with_conversation_store(
        mut self,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    /// Attaches a tracing backend. Tracing stays best-effort: a failing
    /// backend never affects the turn.
    #[inline]
    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent {
            reasoner: self.reasoner,
            tools: ToolExecutor::with_tools(self.tools),
            store: self.store,
            tracer: self.tracer,
            system_prompt: self.system_prompt,
        }
    }
}
