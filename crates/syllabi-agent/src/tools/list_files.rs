use std::sync::Arc;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};
use syllabi_agent_core::index::DocumentIndex;
use syllabi_agent_core::tool::{Error as ToolError, Tool, ToolResult};

#[derive(Deserialize, JsonSchema)]
pub struct ListIndexedFilesParameters {}

/// A tool that lists the files currently registered in the index.
pub struct ListIndexedFilesTool {
    index: Arc<dyn DocumentIndex>,
    parameter_schema: Value,
}

impl ListIndexedFilesTool {
    /// Creates a new listing tool over the given index.
    #[inline]
    pub fn new(index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            index,
            parameter_schema: schema_for!(ListIndexedFilesParameters)
                .to_value(),
        }
    }
}

impl Tool for ListIndexedFilesTool {
    type Input = ListIndexedFilesParameters;

    fn name(&self) -> &str {
        "list_indexed_files"
    }

    fn description(&self) -> &str {
        "List all files currently indexed in the vector store."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        _input: ListIndexedFilesParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let index = Arc::clone(&self.index);
        async move {
            let files = index.list_files().await.map_err(|err| {
                ToolError::execution_error()
                    .with_reason(err.message().to_owned())
            })?;
            let total = files.len();
            Ok(json!({
                "files": files,
                "total": total,
            })
            .to_string())
        }
    }
}
