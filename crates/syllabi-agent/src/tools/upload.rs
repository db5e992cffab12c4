use std::sync::Arc;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};
use syllabi_agent_core::index::{DocumentIndex, ErrorKind};
use syllabi_agent_core::tool::{Tool, ToolResult};

#[derive(Deserialize, JsonSchema)]
pub struct UploadSyllabusParameters {
    #[schemars(
        description = "Path to the syllabus file on the local filesystem."
    )]
    file_path: String,
}

/// A tool for registering a local syllabus file into the index.
pub struct UploadSyllabusTool {
    index: Arc<dyn DocumentIndex>,
    parameter_schema: Value,
}

impl UploadSyllabusTool {
    /// Creates a new upload tool over the given index.
    #[inline]
    pub fn new(index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            index,
            parameter_schema: schema_for!(UploadSyllabusParameters)
                .to_value(),
        }
    }
}

impl Tool for UploadSyllabusTool {
    type Input = UploadSyllabusParameters;

    fn name(&self) -> &str {
        "upload_syllabus"
    }

    fn description(&self) -> &str {
        "Upload a new syllabus document to the vector store. Supports \
         PDF, DOCX, TXT, and other text files."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: UploadSyllabusParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let index = Arc::clone(&self.index);
        async move {
            match index.upload(&input.file_path).await {
                Ok(receipt) => Ok(json!({
                    "success": true,
                    "message": "File uploaded successfully",
                    "file_id": receipt.file_id,
                    "status": receipt.status,
                })
                .to_string()),
                // Upload failures are something the reasoner should
                // explain to the user, not execution failures.
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    Ok(json!({
                        "success": false,
                        "error": format!(
                            "File not found: {}",
                            input.file_path
                        ),
                    })
                    .to_string())
                }
                Err(err) => Ok(json!({
                    "success": false,
                    "error": err.message(),
                })
                .to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syllabi_agent_core::index::{Error as IndexError, UploadReceipt};

    use super::*;
    use crate::tools::testing::FakeIndex;

    #[tokio::test]
    async fn test_successful_upload() {
        let index = FakeIndex {
            upload: Some(Ok(UploadReceipt {
                file_id: "file-1".to_owned(),
                status: "in_progress".to_owned(),
            })),
            ..Default::default()
        };
        let tool = UploadSyllabusTool::new(index.into_arc());

        let result = tool
            .execute(UploadSyllabusParameters {
                file_path: "/tmp/cs101.pdf".to_owned(),
            })
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["message"], "File uploaded successfully");
        assert_eq!(payload["file_id"], "file-1");
        assert_eq!(payload["status"], "in_progress");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let index = FakeIndex {
            upload: Some(Err(IndexError::not_found("no such file"))),
            ..Default::default()
        };
        let tool = UploadSyllabusTool::new(index.into_arc());

        let result = tool
            .execute(UploadSyllabusParameters {
                file_path: "/tmp/missing.pdf".to_owned(),
            })
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "File not found: /tmp/missing.pdf");
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let index = FakeIndex {
            upload: Some(Err(IndexError::upstream("service unavailable"))),
            ..Default::default()
        };
        let tool = UploadSyllabusTool::new(index.into_arc());

        let result = tool
            .execute(UploadSyllabusParameters {
                file_path: "/tmp/cs101.pdf".to_owned(),
            })
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "service unavailable");
    }
}
