//! The hosted document index capability.
//!
//! The index itself lives entirely outside this codebase; this module
//! only defines the narrow request/response contract a concrete hosted
//! backend has to implement.

use std::error::Error as StdError;
use std::fmt::{self, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One ranked excerpt returned by a search.
///
/// The score is a relevance measure in a service-defined range; it is
/// passed through without any range invariant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched text excerpt.
    pub content: String,
    /// Name of the file the excerpt came from.
    pub filename: String,
    /// Relevance as reported by the service.
    pub score: f64,
}

/// The result of registering a file into the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// The hosted file identifier.
    pub file_id: String,
    /// Indexing status of the file.
    pub status: String,
}

/// One file currently registered in the index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedFile {
    /// The hosted file identifier.
    pub id: String,
    /// Indexing status of the file.
    pub status: String,
}

/// Statistics about the hosted store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// The store identifier.
    pub id: String,
    /// The store name.
    pub name: String,
    /// Number of fully indexed files.
    pub file_count: u64,
    /// The store status.
    pub status: String,
    /// Storage used, in bytes.
    pub usage_bytes: u64,
}

/// The kind of index error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced local file does not exist.
    NotFound,
    /// The hosted call itself failed (auth, network, invalid store id).
    Upstream,
}

/// Describes a document index error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    /// Creates a new error with the `NotFound` kind.
    #[inline]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: message.into(),
        }
    }

    /// Creates a new error with the `Upstream` kind.
    #[inline]
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self {
            kind: ErrorKind::Upstream,
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

/// A hosted document index, queried by similarity.
///
/// Implementations are stateless from the orchestrator's perspective:
/// the store identifier is resolved once at initialization and no remote
/// state is cached locally, so a shared handle is safe for concurrent
/// use without synchronization.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Searches the index, returning at most `top_k` hits ordered by
    /// descending relevance as reported by the service. No matching
    /// content yields an empty vec, not an error.
    async fn search(
        &self,
        query: &str,
        top_k: u32,
    ) -> Result<Vec<SearchHit>, Error>;

    /// Reads a local file and registers it into the index.
    async fn upload(&self, file_path: &str) -> Result<UploadReceipt, Error>;

    /// Lists all files registered in the index.
    async fn list_files(&self) -> Result<Vec<IndexedFile>, Error>;

    /// Returns statistics about the hosted store.
    async fn stats(&self) -> Result<IndexStats, Error>;
}
