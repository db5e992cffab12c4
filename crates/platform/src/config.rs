use std::fmt::Debug;

/// Builder for [`PlatformConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlatformConfigBuilder {
    base_url: String,
    api_key: Option<String>,
}

impl PlatformConfigBuilder {
    /// Creates a builder with the given base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Sets the API key, for deployments that require one.
    #[inline]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> PlatformConfig {
        PlatformConfig {
            base_url: self.base_url,
            api_key: self.api_key,
        }
    }
}

impl Debug for PlatformConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfigBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Configuration for the platform backend clients.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlatformConfig {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl PlatformConfig {
    pub(crate) fn with_auth(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(api_key) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {api_key}"),
            ),
            None => builder,
        }
    }
}

impl Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
