mod builder;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::json;
use syllabi_agent_model::{
    ChatMessage, ErrorKind, ReasonerError, ToolCallResult,
};

use crate::conversation::Conversation;
use crate::reasoner_client::ReasonerClient;
use crate::store::{self, ConversationStore};
use crate::tool::Executor as ToolExecutor;
use crate::trace::{TraceContext, Tracer};
pub use builder::AgentBuilder;

/// The notice emitted when the inbound message carries no text.
pub const EMPTY_MESSAGE_NOTICE: &str =
    "I didn't receive a message. Please try again.";

/// A turn-level failure from the reasoning service.
///
/// These are not retried by the orchestrator; the caller owns any retry
/// policy. Fragments already streamed before the failure remain
/// delivered.
#[derive(Debug)]
pub struct TurnError {
    source: Box<dyn ReasonerError>,
}

impl TurnError {
    #[inline]
    fn new(source: Box<dyn ReasonerError>) -> Self {
        Self { source }
    }

    /// Returns the kind of the underlying reasoner error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reasoning service request failed: {}", self.source)
    }
}

impl StdError for TurnError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// The turn orchestrator.
///
/// One inbound message is processed on one sequential control flow:
/// load history, ask the reasoner for a tool decision, execute requested
/// tools in order, then stream the final answer. The agent holds only
/// shared read-mostly handles, so concurrent turns for different
/// conversations need no synchronization.
pub struct Agent {
    reasoner: ReasonerClient,
    tools: ToolExecutor,
    store: Option<Arc<dyn ConversationStore>>,
    tracer: Option<Arc<dyn Tracer>>,
    system_prompt: String,
}

impl Agent {
    /// Handles one inbound user message, forwarding streamed answer
    /// fragments to `on_delta` in arrival order. All fragments belong to
    /// a single logical output block.
    ///
    /// An empty (or whitespace-only) message emits a single notice
    /// fragment and completes without contacting any collaborator.
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        text: &str,
        on_delta: impl Fn(String) + Send + 'static,
    ) -> Result<(), TurnError> {
        let text = text.trim();
        if text.is_empty() {
            on_delta(EMPTY_MESSAGE_NOTICE.to_owned());
            return Ok(());
        }

        let trace = TraceContext::new(self.tracer.clone(), conversation_id);
        let root = trace
            .start("handle_message", None, Some(json!({ "message": text })))
            .await;

        let result = self
            .run_turn(&trace, root.id().map(ToOwned::to_owned), conversation_id, text, on_delta)
            .await;

        let output = match &result {
            Ok(answer) => json!({ "answer": answer }),
            Err(err) => json!({ "error": err.to_string() }),
        };
        trace.finish(root, Some(output)).await;

        result.map(|_| ())
    }

    async fn run_turn(
        &self,
        trace: &TraceContext,
        root_id: Option<String>,
        conversation_id: &str,
        text: &str,
        on_delta: impl Fn(String) + Send + 'static,
    ) -> Result<String, TurnError> {
        let root_id = root_id.as_deref();
        let mut conversation =
            Conversation::with_system_prompt(&self.system_prompt);

        if let Some(store) = &self.store {
            let span = trace.start("load_history", root_id, None).await;
            let history =
                store::load_history(store.as_ref(), conversation_id).await;
            trace
                .finish(span, Some(json!({ "messages": history.len() })))
                .await;
            // System-role entries from history would duplicate the fixed
            // system prompt.
            conversation.extend(
                history
                    .into_iter()
                    .filter(|msg| !matches!(msg, ChatMessage::System(_))),
            );
        }
        conversation.push(ChatMessage::User(text.to_owned()));

        // Ask the reasoner whether tools are needed. Fragments of this
        // response are collected, not forwarded to the caller.
        let span = trace
            .start("tool_decision", root_id, Some(json!({ "message": text })))
            .await;
        let decision = self
            .reasoner
            .send_request(
                conversation.make_request(self.tools.definitions()),
                |_| {},
            )
            .await;
        let output = match &decision {
            Ok(resp) => json!({
                "tool_calls": resp.tool_calls.len(),
                "usage": resp.usage,
            }),
            Err(err) => json!({ "error": err.to_string() }),
        };
        trace.finish(span, Some(output)).await;
        let decision = decision.map_err(TurnError::new)?;

        if !decision.tool_calls.is_empty() {
            debug!(
                "reasoner requested {} tool call(s)",
                decision.tool_calls.len()
            );

            // The reasoner's own call record must precede the results.
            let record = match decision.opaque_msg {
                Some(opaque) => ChatMessage::Opaque(opaque),
                None => ChatMessage::Assistant(decision.text.clone()),
            };
            conversation.push(record);

            for call in &decision.tool_calls {
                let span = trace
                    .start(
                        &format!("tool:{}", call.name),
                        root_id,
                        Some(json!({ "arguments": call.arguments })),
                    )
                    .await;
                let content = self.tools.dispatch(call).await;
                trace
                    .finish(span, Some(json!({ "result": content })))
                    .await;
                conversation.push(ChatMessage::Tool(ToolCallResult {
                    id: call.id.clone(),
                    content,
                }));
            }
        }

        // The final-answer pass streams over the extended conversation,
        // without the tool catalog.
        let span = trace.start("final_answer", root_id, None).await;
        let resp = self
            .reasoner
            .send_request(conversation.make_request(vec![]), on_delta)
            .await;
        let output = match &resp {
            Ok(resp) => json!({ "usage": resp.usage }),
            Err(err) => json!({ "error": err.to_string() }),
        };
        trace.finish(span, Some(output)).await;
        let resp = resp.map_err(TurnError::new)?;

        Ok(resp.text)
    }
}
