//! Stable provider construction surface for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use crate::{ModelProvider, ProviderError, ProviderOperationHooks, SecretString};

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Clone)]
pub struct ProviderBuildConfig {
    pub api_key: SecretString,
    pub base_url: Option<String>,
    /// Used when a request arrives without a model.
    pub fallback_model: Option<String>,
    pub timeout: Duration,
    pub hooks: Option<Arc<dyn ProviderOperationHooks>>,
}

impl ProviderBuildConfig {
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            fallback_model: None,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            hooks: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }
}

impl std::fmt::Debug for ProviderBuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBuildConfig")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("fallback_model", &self.fallback_model)
            .field("timeout", &self.timeout)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

#[cfg(feature = "provider-openai")]
pub fn build_openai_provider(
    config: ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    use pprovider::adapters::openai::{OpenAiHttpTransport, OpenAiProvider};

    if config.api_key.is_empty() {
        return Err(ProviderError::authentication(
            "provider API key must not be empty",
        ));
    }

    let http = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))?;

    let mut transport = OpenAiHttpTransport::new(http);
    if let Some(base_url) = config.base_url.filter(|url| !url.trim().is_empty()) {
        transport = transport.with_base_url(base_url.trim());
    }

    let mut provider = OpenAiProvider::new(config.api_key, Arc::new(transport))?;
    if let Some(model) = config.fallback_model {
        provider = provider.with_fallback_model(model);
    }
    if let Some(hooks) = config.hooks {
        provider = provider.with_hooks(hooks);
    }

    Ok(Arc::new(provider))
}

#[cfg(not(feature = "provider-openai"))]
pub fn build_openai_provider(
    _config: ProviderBuildConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-openai feature is not enabled on parley",
    ))
}
