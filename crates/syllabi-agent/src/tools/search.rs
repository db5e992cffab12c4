use std::sync::Arc;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};
use syllabi_agent_core::index::DocumentIndex;
use syllabi_agent_core::tool::{Error as ToolError, Tool, ToolResult};

const DEFAULT_NUM_RESULTS: u32 = 5;
const EXCERPT_LIMIT: usize = 500;

#[derive(Deserialize, JsonSchema)]
pub struct SearchSyllabiParameters {
    #[schemars(
        description = "The search query - what you're looking for in the syllabi."
    )]
    query: String,
    #[schemars(description = "Number of results to return (default: 5).")]
    num_results: Option<u32>,
}

/// A tool for searching the syllabi index by semantic similarity.
pub struct SearchSyllabiTool {
    index: Arc<dyn DocumentIndex>,
    parameter_schema: Value,
}

impl SearchSyllabiTool {
    /// Creates a new search tool over the given index.
    #[inline]
    pub fn new(index: Arc<dyn DocumentIndex>) -> Self {
        Self {
            index,
            parameter_schema: schema_for!(SearchSyllabiParameters).to_value(),
        }
    }
}

fn excerpt(content: &str) -> String {
    // The limit is in characters, not bytes.
    match content.char_indices().nth(EXCERPT_LIMIT) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_owned(),
    }
}

fn relevance(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

impl Tool for SearchSyllabiTool {
    type Input = SearchSyllabiParameters;

    fn name(&self) -> &str {
        "search_syllabi"
    }

    fn description(&self) -> &str {
        "Search through syllabi documents in the vector store using \
         semantic similarity. Use this to find relevant course \
         information before answering questions."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SearchSyllabiParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let index = Arc::clone(&self.index);
        async move {
            let top_k = input.num_results.unwrap_or(DEFAULT_NUM_RESULTS);
            let hits = index
                .search(&input.query, top_k)
                .await
                .map_err(|err| {
                    ToolError::execution_error()
                        .with_reason(err.message().to_owned())
                })?;

            if hits.is_empty() {
                return Ok(json!({
                    "results": [],
                    "message": "No matching content found. Make sure you \
                                have files in your vector store.",
                })
                .to_string());
            }

            let results: Vec<Value> = hits
                .iter()
                .map(|hit| {
                    json!({
                        "content": excerpt(&hit.content),
                        "filename": hit.filename,
                        "relevance": relevance(hit.score),
                    })
                })
                .collect();
            Ok(json!({
                "results": results,
                "total_found": hits.len(),
            })
            .to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use syllabi_agent_core::index::{Error as IndexError, SearchHit};

    use super::*;
    use crate::tools::testing::FakeIndex;

    fn hit(content: &str, filename: &str, score: f64) -> SearchHit {
        SearchHit {
            content: content.to_owned(),
            filename: filename.to_owned(),
            score,
        }
    }

    #[tokio::test]
    async fn test_results_payload() {
        let index = FakeIndex {
            hits: vec![
                hit("Grading: 40% exams.", "cs101.pdf", 0.81234),
                hit(&"x".repeat(600), "cs102.pdf", 0.5),
                hit(&"é".repeat(600), "cs103.pdf", 0.4),
            ],
            ..Default::default()
        };
        let tool = SearchSyllabiTool::new(index.into_arc());

        let result = tool
            .execute(SearchSyllabiParameters {
                query: "grading policy".to_owned(),
                num_results: None,
            })
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["total_found"], 3);
        assert_eq!(payload["results"][0]["content"], "Grading: 40% exams.");
        assert_eq!(payload["results"][0]["filename"], "cs101.pdf");
        assert_eq!(payload["results"][0]["relevance"], 0.812);
        // Long excerpts are truncated to 500 characters with an ellipsis.
        let truncated = payload["results"][1]["content"].as_str().unwrap();
        assert_eq!(truncated.chars().count(), 503);
        assert!(truncated.ends_with("..."));
        let truncated = payload["results"][2]["content"].as_str().unwrap();
        assert_eq!(truncated.chars().count(), 503);
        assert!(truncated.ends_with("..."));
    }

    #[tokio::test]
    async fn test_default_num_results() {
        let index = FakeIndex::default();
        let arc = std::sync::Arc::new(index);
        let tool = SearchSyllabiTool::new(arc.clone());

        tool.execute(SearchSyllabiParameters {
            query: "anything".to_owned(),
            num_results: None,
        })
        .await
        .unwrap();
        tool.execute(SearchSyllabiParameters {
            query: "anything".to_owned(),
            num_results: Some(3),
        })
        .await
        .unwrap();
        assert_eq!(*arc.recorded_top_k.lock().unwrap(), vec![5, 3]);
    }

    #[tokio::test]
    async fn test_no_matching_content() {
        let tool = SearchSyllabiTool::new(FakeIndex::default().into_arc());
        let result = tool
            .execute(SearchSyllabiParameters {
                query: "anything".to_owned(),
                num_results: None,
            })
            .await
            .unwrap();
        let payload: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(payload["results"].as_array().unwrap().len(), 0);
        assert!(
            payload["message"]
                .as_str()
                .unwrap()
                .starts_with("No matching content found.")
        );
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let index = FakeIndex {
            search_err: Some(IndexError::upstream("index offline")),
            ..Default::default()
        };
        let tool = SearchSyllabiTool::new(index.into_arc());
        let result = tool
            .execute(SearchSyllabiParameters {
                query: "anything".to_owned(),
                num_results: None,
            })
            .await;
        assert_eq!(result.unwrap_err().reason(), "index offline");
    }
}
