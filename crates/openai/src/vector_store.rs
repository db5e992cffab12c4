//! Client for the hosted vector store endpoints.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, header, multipart};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use syllabi_agent_core::index::{
    DocumentIndex, Error, IndexStats, IndexedFile, SearchHit, UploadReceipt,
};

use crate::OpenAIConfig;

const DEFAULT_STORE_NAME: &str = "syllabi-insights-store";

// -----------
// Wire shapes
// -----------

#[derive(Serialize)]
struct CreateStoreRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_num_results: u32,
}

#[derive(Debug, PartialEq, Deserialize)]
struct SearchResponse {
    data: Vec<SearchResult>,
}

#[derive(Debug, PartialEq, Deserialize)]
struct SearchResult {
    filename: String,
    score: f64,
    content: Vec<ContentPart>,
}

#[derive(Debug, PartialEq, Deserialize)]
struct ContentPart {
    r#type: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Serialize)]
struct AttachFileRequest<'a> {
    file_id: &'a str,
}

#[derive(Debug, PartialEq, Deserialize)]
struct VectorStoreFile {
    id: String,
    status: String,
}

#[derive(Debug, PartialEq, Deserialize)]
struct ListFilesResponse {
    data: Vec<VectorStoreFile>,
}

#[derive(Debug, PartialEq, Deserialize)]
struct VectorStoreObject {
    id: String,
    name: String,
    status: String,
    usage_bytes: u64,
    file_counts: FileCounts,
}

#[derive(Debug, PartialEq, Deserialize)]
struct FileCounts {
    completed: u64,
}

// --------
// Mappings
// --------

fn collect_hits(resp: SearchResponse) -> Vec<SearchHit> {
    resp.data
        .into_iter()
        .map(|result| {
            let content = result
                .content
                .iter()
                .filter(|part| part.r#type == "text")
                .map(|part| part.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            SearchHit {
                content,
                filename: result.filename,
                score: result.score,
            }
        })
        .collect()
}

fn collect_stats(store: VectorStoreObject) -> IndexStats {
    IndexStats {
        id: store.id,
        name: store.name,
        file_count: store.file_counts.completed,
        status: store.status,
        usage_bytes: store.usage_bytes,
    }
}

// ------
// Client
// ------

/// A [`DocumentIndex`] backed by the hosted vector store service.
#[derive(Clone, Debug)]
pub struct VectorStoreClient {
    client: Client,
    config: Arc<OpenAIConfig>,
    store_id: String,
}

impl VectorStoreClient {
    /// Connects to the hosted vector store.
    ///
    /// When `store_id` is `None`, a fresh store is created and its id is
    /// logged so it can be pinned via configuration on the next run.
    pub async fn connect(
        config: OpenAIConfig,
        store_id: Option<String>,
    ) -> Result<Self, Error> {
        let client = Client::new();
        let config = Arc::new(config);
        let store_id = match store_id {
            Some(id) => id,
            None => {
                warn!("no vector store id configured, creating a new store");
                let store: VectorStoreObject = read_json(
                    client
                        .post(format!("{}/vector_stores", config.base_url))
                        .header(
                            header::AUTHORIZATION,
                            format!("Bearer {}", config.api_key),
                        )
                        .json(&CreateStoreRequest {
                            name: DEFAULT_STORE_NAME,
                        })
                        .send()
                        .await,
                )
                .await?;
                info!("created vector store: {}", store.id);
                info!(
                    "set OPENAI_VECTOR_STORE_ID={} to reuse this store",
                    store.id
                );
                store.id
            }
        };
        Ok(Self {
            client,
            config,
            store_id,
        })
    }

    /// The identifier of the store this client operates on.
    #[inline]
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/vector_stores/{}{}",
            self.config.base_url, self.store_id, path
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.api_key)
    }
}

async fn read_json<T: DeserializeOwned>(
    resp: Result<Response, reqwest::Error>,
) -> Result<T, Error> {
    let resp = resp
        .and_then(Response::error_for_status)
        .map_err(|err| Error::upstream(format!("{err}")))?;
    resp.json()
        .await
        .map_err(|err| Error::upstream(format!("{err}")))
}

#[async_trait]
impl DocumentIndex for VectorStoreClient {
    async fn search(
        &self,
        query: &str,
        top_k: u32,
    ) -> Result<Vec<SearchHit>, Error> {
        debug!("searching store {} for: {query}", self.store_id);
        let resp: SearchResponse = read_json(
            self.client
                .post(self.endpoint("/search"))
                .header(header::AUTHORIZATION, self.bearer())
                .json(&SearchRequest {
                    query,
                    max_num_results: top_k,
                })
                .send()
                .await,
        )
        .await?;
        Ok(collect_hits(resp))
    }

    async fn upload(&self, file_path: &str) -> Result<UploadReceipt, Error> {
        let bytes = tokio::fs::read(file_path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                Error::not_found(format!("{file_path}: {err}"))
            } else {
                Error::upstream(format!("{file_path}: {err}"))
            }
        })?;
        let file_name = Path::new(file_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_owned();

        // The service ingests in two steps: upload the raw file, then
        // attach it to the store so it gets chunked and embedded.
        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));
        let file: FileObject = read_json(
            self.client
                .post(format!("{}/files", self.config.base_url))
                .header(header::AUTHORIZATION, self.bearer())
                .multipart(form)
                .send()
                .await,
        )
        .await?;

        let vs_file: VectorStoreFile = read_json(
            self.client
                .post(self.endpoint("/files"))
                .header(header::AUTHORIZATION, self.bearer())
                .json(&AttachFileRequest { file_id: &file.id })
                .send()
                .await,
        )
        .await?;
        info!("uploaded {} as {} ({})", file_path, file.id, vs_file.status);

        Ok(UploadReceipt {
            file_id: file.id,
            status: vs_file.status,
        })
    }

    async fn list_files(&self) -> Result<Vec<IndexedFile>, Error> {
        let resp: ListFilesResponse = read_json(
            self.client
                .get(self.endpoint("/files"))
                .header(header::AUTHORIZATION, self.bearer())
                .send()
                .await,
        )
        .await?;
        Ok(resp
            .data
            .into_iter()
            .map(|file| IndexedFile {
                id: file.id,
                status: file.status,
            })
            .collect())
    }

    async fn stats(&self) -> Result<IndexStats, Error> {
        let store: VectorStoreObject = read_json(
            self.client
                .get(self.endpoint(""))
                .header(header::AUTHORIZATION, self.bearer())
                .send()
                .await,
        )
        .await?;
        Ok(collect_stats(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_hits() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{
                "object": "vector_store.search_results.page",
                "search_query": "grading policy",
                "data": [
                    {
                        "file_id": "file-1",
                        "filename": "cs101.pdf",
                        "score": 0.8123,
                        "attributes": {},
                        "content": [
                            {"type": "text", "text": "Grading: 40% exams"},
                            {"type": "text", "text": "and 60% projects."}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();
        let hits = collect_hits(resp);
        assert_eq!(
            hits,
            vec![SearchHit {
                content: "Grading: 40% exams\nand 60% projects.".to_owned(),
                filename: "cs101.pdf".to_owned(),
                score: 0.8123,
            }]
        );
    }

    #[test]
    fn test_collect_hits_empty() {
        let resp: SearchResponse =
            serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(collect_hits(resp), vec![]);
    }

    #[test]
    fn test_collect_stats() {
        let store: VectorStoreObject = serde_json::from_str(
            r#"{
                "id": "vs_abc",
                "object": "vector_store",
                "name": "syllabi-insights-store",
                "status": "completed",
                "usage_bytes": 123456,
                "file_counts": {
                    "in_progress": 1,
                    "completed": 3,
                    "failed": 0,
                    "cancelled": 0,
                    "total": 4
                }
            }"#,
        )
        .unwrap();
        let stats = collect_stats(store);
        assert_eq!(
            stats,
            IndexStats {
                id: "vs_abc".to_owned(),
                name: "syllabi-insights-store".to_owned(),
                file_count: 3,
                status: "completed".to_owned(),
                usage_bytes: 123456,
            }
        );
    }
}
