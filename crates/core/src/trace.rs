//! The observability tracing capability.
//!
//! Spans form a call tree scoped to one conversation turn. Tracing is
//! best-effort end to end: any failure talking to the backend is logged
//! and swallowed, and must never alter or abort the step being traced.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fields for creating a span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSpan {
    /// The trace this span belongs to (the conversation identifier).
    pub trace_id: String,
    /// The enclosing span, if any.
    pub parent_id: Option<String>,
    /// Name of the wrapped operation.
    pub name: String,
    /// When the wrapped operation started.
    pub start_time: DateTime<Utc>,
    /// Structured input payload.
    pub input: Option<Value>,
}

/// The fields for finalizing a span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpanUpdate {
    /// When the wrapped operation concluded.
    pub end_time: Option<DateTime<Utc>>,
    /// Structured output payload.
    pub output: Option<Value>,
}

/// Describes a tracing backend error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    message: String,
}

impl Error {
    /// Creates a new error with the given message.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

/// A backend that records hierarchical trace spans.
#[async_trait]
pub trait Tracer: Send + Sync {
    /// Creates a span and returns its backend-issued identifier.
    async fn create_span(&self, span: NewSpan) -> Result<String, Error>;

    /// Attaches end time and/or output to an existing span.
    async fn update_span(
        &self,
        span_id: &str,
        update: SpanUpdate,
    ) -> Result<(), Error>;
}

/// A handle for one started span.
///
/// The guard carries no backend resource by itself; finalize it with
/// [`TraceContext::finish`] once the wrapped step concludes, on every
/// exit path.
#[derive(Debug)]
pub struct SpanGuard {
    span_id: Option<String>,
}

impl SpanGuard {
    /// Returns the span identifier, if a span was actually created.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.span_id.as_deref()
    }
}

/// Best-effort span creation scoped to one conversation turn.
///
/// When no tracer is configured, all operations are no-ops. When the
/// backend fails, the failure is logged and the turn proceeds untouched.
#[derive(Clone)]
pub struct TraceContext {
    tracer: Option<Arc<dyn Tracer>>,
    trace_id: String,
}

impl TraceContext {
    /// Creates a context for one turn. `trace_id` is the conversation
    /// identifier.
    #[inline]
    pub fn new(
        tracer: Option<Arc<dyn Tracer>>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            tracer,
            trace_id: trace_id.into(),
        }
    }

    /// Starts a span for a named step.
    pub async fn start(
        &self,
        name: &str,
        parent_id: Option<&str>,
        input: Option<Value>,
    ) -> SpanGuard {
        let Some(tracer) = &self.tracer else {
            return SpanGuard { span_id: None };
        };

        let span = NewSpan {
            trace_id: self.trace_id.clone(),
            parent_id: parent_id.map(ToOwned::to_owned),
            name: name.to_owned(),
            start_time: Utc::now(),
            input,
        };
        let span_id = match tracer.create_span(span).await {
            Ok(span_id) => Some(span_id),
            Err(err) => {
                warn!("failed to create span `{name}`: {err}");
                None
            }
        };
        SpanGuard { span_id }
    }

    /// Stamps the end time on a span and attaches its output.
    pub async fn finish(&self, guard: SpanGuard, output: Option<Value>) {
        let Some(span_id) = guard.span_id else {
            return;
        };
        let Some(tracer) = &self.tracer else {
            return;
        };

        let update = SpanUpdate {
            end_time: Some(Utc::now()),
            output,
        };
        if let Err(err) = tracer.update_span(&span_id, update).await {
            warn!("failed to finish span `{span_id}`: {err}");
        }
    }
}
