use std::collections::HashMap;

use serde_json::{Value, json};
use syllabi_agent_model::{ToolCallRequest, ToolSpec};
use tracing::Instrument;

use crate::tool::{ToolObject, ToolResult};

/// An executor that handles tool call requests from the reasoner.
///
/// Dispatch is strictly sequential: each call is executed and folded
/// into the conversation before the next begins, since later tools may
/// depend on conversation state shaped by earlier ones.
pub struct Executor {
    tools: HashMap<String, Box<dyn ToolObject>>,
}

impl Executor {
    pub(crate) fn with_tools(tools: Vec<Box<dyn ToolObject>>) -> Self {
        let mut tool_map = HashMap::with_capacity(tools.len());
        for tool in tools {
            let name = tool.name();
            tool_map.insert(name.to_owned(), tool);
        }
        let tools = tool_map;
        Self { tools }
    }

    /// Returns the catalog to hand to the reasoner.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.as_ref().spec()).collect()
    }

    /// Executes one tool call request and returns its string payload.
    ///
    /// All failure reporting happens via the payload: an unknown tool
    /// name, an invalid input, or a tool-level error all produce an
    /// `{"error": ...}` JSON object.
    pub async fn dispatch(&self, req: &ToolCallRequest) -> String {
        let Some(tool) = self.tools.get(&req.name) else {
            warn!("tool not found: {}", req.name);
            return json!({
                "error": format!("Unknown tool: {}", req.name),
            })
            .to_string();
        };

        let mut arguments = req.arguments.clone();
        if arguments.is_null() {
            arguments = Value::Object(Default::default());
        }
        trace!("executing tool ({}) with args: {arguments:?}", req.id);

        let fut = tool
            .execute(arguments)
            .instrument(debug_span!("tool dispatch", tool = %req.name));
        match fut.await {
            Ok(payload) => payload,
            Err(err) => json!({ "error": err.reason() }).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use super::*;
    use crate::tool::{AnyTool, Error, Tool};
    use serde::Deserialize;

    static SCHEMA: std::sync::LazyLock<Value> = std::sync::LazyLock::new(|| {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "num_results": { "type": "integer", "default": 5 }
            },
            "required": ["query"]
        })
    });

    #[derive(Deserialize)]
    struct TestInput {
        query: String,
        #[serde(default = "default_num_results")]
        num_results: u32,
    }

    fn default_num_results() -> u32 {
        5
    }

    struct TestTool;

    impl Tool for TestTool {
        type Input = TestInput;

        fn name(&self) -> &str {
            "test_search"
        }

        fn description(&self) -> &str {
            "A test search tool"
        }

        fn parameter_schema(&self) -> &Value {
            &SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(json!({
                "query": input.query,
                "num_results": input.num_results,
            })
            .to_string()))
        }
    }

    struct FailingTool;

    impl Tool for FailingTool {
        type Input = Value;

        fn name(&self) -> &str {
            "failing_tool"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn parameter_schema(&self) -> &Value {
            &SCHEMA
        }

        fn execute(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Err(Error::execution_error().with_reason("index offline")))
        }
    }

    fn executor() -> Executor {
        Executor::with_tools(vec![
            Box::new(AnyTool(TestTool)),
            Box::new(AnyTool(FailingTool)),
        ])
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_error_payload() {
        let result = executor()
            .dispatch(&ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "bogus_tool".to_owned(),
                arguments: json!({}),
            })
            .await;
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["error"], "Unknown tool: bogus_tool");
    }

    #[tokio::test]
    async fn test_declared_default_applied() {
        let result = executor()
            .dispatch(&ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "test_search".to_owned(),
                arguments: json!({ "query": "grading" }),
            })
            .await;
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["num_results"], 5);
    }

    #[tokio::test]
    async fn test_null_arguments_as_empty_object() {
        let result = executor()
            .dispatch(&ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "test_search".to_owned(),
                arguments: Value::Null,
            })
            .await;
        // `query` is required, so this surfaces as an input error rather
        // than a deserialization panic.
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert!(payload.get("error").is_some());
    }

    #[tokio::test]
    async fn test_tool_error_contained() {
        let result = executor()
            .dispatch(&ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "failing_tool".to_owned(),
                arguments: json!({}),
            })
            .await;
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["error"], "index offline");
    }

    #[tokio::test]
    async fn test_definitions_expose_schema() {
        let defs = executor().definitions();
        assert_eq!(defs.len(), 2);
        let search =
            defs.iter().find(|def| def.name == "test_search").unwrap();
        assert_eq!(search.parameters["required"][0], "query");
    }
}
