use serde_json::Value;

use crate::OpaqueMessage;

/// A request to be sent to the reasoning service.
#[derive(Clone, Debug, PartialEq)]
pub struct ReasonerRequest {
    /// The input messages, in conversation order.
    pub messages: Vec<ChatMessage>,
    /// Tools that are available to the reasoner. An empty catalog means
    /// the reasoner must answer directly.
    pub tools: Vec<ToolSpec>,
}

/// A complete message.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
    /// A tool call result.
    Tool(ToolCallResult),
    /// An opaque message (usually the assistant's own tool-call record
    /// from the reasoner).
    Opaque(OpaqueMessage),
}

/// The result of calling a tool.
///
/// The content is always a JSON-encoded string; tool failures are
/// reported inside the payload, never through this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolCallResult {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The result of the tool call.
    pub content: String,
}

/// Describes a tool that can be used by the reasoner.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolSpec {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most reasoner backends, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}
