use std::sync::Arc;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use syllabi_agent_core::index::DocumentIndex;
use syllabi_agent_core::tool::{Error as ToolError, Tool, ToolResult};

#[derive(Deserialize, JsonSchema)]
pub struct GetIndexStatsParameters {}

/// A tool that reports statistics about the hosted index.
pub struct GetIndexStatsTool {
    index: Arc<dyn DocumentIndex>,
    parameter_schema: Value,
}

impl GetIndexStatsTool {
    /// Creates a new stats tool over the given index.
    #[inline]
    pub fn new(index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            index,
            parameter_schema: schema_for!(GetIndexStatsParameters).to_value(),
        }
    }
}

impl Tool for GetIndexStatsTool {
    type Input = GetIndexStatsParameters;

    fn name(&self) -> &str {
        "get_index_stats"
    }

    fn description(&self) -> &str {
        "Get statistics about the vector store - how many files are \
         indexed, storage used, etc."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        _input: GetIndexStatsParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let index = Arc::clone(&self.index);
        async move {
            let stats = index.stats().await.map_err(|err| {
                ToolError::execution_error()
                    .with_reason(err.message().to_owned())
            })?;
            serde_json::to_string(&stats).map_err(|err| {
                ToolError::execution_error().with_reason(format!("{err}"))
            })
        }
    }
}
