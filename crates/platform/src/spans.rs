//! Client for the span tracing backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use syllabi_agent_core::trace::{Error, NewSpan, SpanUpdate, Tracer};

use crate::PlatformConfig;

#[derive(Debug, Deserialize)]
struct CreatedSpan {
    id: String,
}

/// A [`Tracer`] backed by the platform's span API.
#[derive(Clone, Debug)]
pub struct TraceClient {
    client: Client,
    config: Arc<PlatformConfig>,
}

impl TraceClient {
    /// Creates a new client for the given backend.
    #[inline]
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl Tracer for TraceClient {
    async fn create_span(&self, span: NewSpan) -> Result<String, Error> {
        trace!("creating span `{}` in trace {}", span.name, span.trace_id);
        let req = self
            .client
            .post(format!("{}/spans", self.config.base_url))
            .json(&span);
        let created: CreatedSpan = self
            .config
            .with_auth(req)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|err| Error::new(format!("{err}")))?
            .json()
            .await
            .map_err(|err| Error::new(format!("{err}")))?;
        Ok(created.id)
    }

    async fn update_span(
        &self,
        span_id: &str,
        update: SpanUpdate,
    ) -> Result<(), Error> {
        trace!("updating span {span_id}");
        let req = self
            .client
            .patch(format!("{}/spans/{}", self.config.base_url, span_id))
            .json(&update);
        self.config
            .with_auth(req)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|err| Error::new(format!("{err}")))?;
        Ok(())
    }
}
