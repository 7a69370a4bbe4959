//! Runtime wiring: environment configuration, tool registry, assistant, and server.
//!
//! ```rust
//! use parley::ParleyConfig;
//!
//! let config = ParleyConfig::from_lookup(|key| match key {
//!     "OPENAI_API_KEY" => Some("sk-test".to_string()),
//!     "PARLEY_MODEL" => Some("gpt-4.1-mini".to_string()),
//!     _ => None,
//! });
//!
//! assert_eq!(config.model.as_deref(), Some("gpt-4.1-mini"));
//! assert!(config.weather_api_key.is_none());
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::providers::DEFAULT_PROVIDER_TIMEOUT;
use crate::{
    Assistant, ChatError, ChatServer, ConversationStore, Coordinator, DefaultToolRuntime,
    InMemoryConversationStore, ModelProvider, ProviderBuildConfig, ProviderError, ReplyPolicy,
    SafeChatHooks, SafeProviderHooks, SafeToolHooks, SecretString, TitlePolicy, ToolError,
    ToolRegistry, TracingObservabilityHooks, build_openai_provider,
};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "PARLEY_MODEL";
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const HOLIDAY_CALENDAR_LINK_VAR: &str = "HOLIDAY_CALENDAR_LINK";

/// Process-level settings. Blank values are treated as unset.
#[derive(Debug, Clone)]
pub struct ParleyConfig {
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub model: Option<String>,
    pub weather_api_key: Option<SecretString>,
    pub holiday_calendar_link: Option<String>,
    pub provider_timeout: Duration,
    pub turn_timeout: Option<Duration>,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            model: None,
            weather_api_key: None,
            holiday_calendar_link: None,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            turn_timeout: None,
        }
    }
}

impl ParleyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            openai_api_key: read(OPENAI_API_KEY_VAR).map(SecretString::from),
            openai_base_url: read(OPENAI_BASE_URL_VAR),
            model: read(MODEL_VAR),
            weather_api_key: read(WEATHER_API_KEY_VAR).map(SecretString::from),
            holiday_calendar_link: read(HOLIDAY_CALENDAR_LINK_VAR),
            ..Self::default()
        }
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }

    pub fn provider_config(&self) -> Result<ProviderBuildConfig, ProviderError> {
        let api_key = self.openai_api_key.clone().ok_or_else(|| {
            ProviderError::authentication(format!("{OPENAI_API_KEY_VAR} must be set"))
        })?;

        let mut config = ProviderBuildConfig::new(api_key).with_timeout(self.provider_timeout);
        if let Some(base_url) = &self.openai_base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(model) = &self.model {
            config = config.with_fallback_model(model.clone());
        }
        Ok(config)
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        let mut options = RuntimeOptions::default();
        if let Some(model) = &self.model {
            options.reply_policy = options.reply_policy.with_model(model.clone());
            options.title_policy = options.title_policy.with_model(model.clone());
        }
        options.turn_timeout = self.turn_timeout;
        options
    }

    #[cfg(feature = "builtin-tools")]
    pub fn builtin_tools_config(&self) -> ptooling::builtin::BuiltinToolsConfig {
        let mut config = ptooling::builtin::BuiltinToolsConfig::default();
        if let Some(api_key) = &self.weather_api_key {
            config = config.with_weather_api_key(api_key.clone());
        }
        if let Some(link) = &self.holiday_calendar_link {
            config = config.with_holiday_calendar_link(link.clone());
        }
        config
    }
}

#[derive(Clone, Default)]
pub struct RuntimeOptions {
    pub reply_policy: ReplyPolicy,
    pub title_policy: TitlePolicy,
    pub store: Option<Arc<dyn ConversationStore>>,
    pub turn_timeout: Option<Duration>,
}

impl RuntimeOptions {
    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.reply_policy = policy;
        self
    }

    pub fn with_title_policy(mut self, policy: TitlePolicy) -> Self {
        self.title_policy = policy;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }
}

#[derive(Clone)]
pub struct RuntimeBundle {
    pub registry: Arc<ToolRegistry>,
    pub assistant: Arc<Assistant>,
    pub store: Arc<dyn ConversationStore>,
    pub server: ChatServer,
}

/// Registry holding the built-in tools; empty when the `builtin-tools` feature is off.
pub fn build_tool_registry(config: &ParleyConfig) -> Result<ToolRegistry, ToolError> {
    #[cfg_attr(not(feature = "builtin-tools"), allow(unused_mut))]
    let mut registry = ToolRegistry::new();

    #[cfg(feature = "builtin-tools")]
    ptooling::builtin::register_builtin_tools(&mut registry, &config.builtin_tools_config())?;
    #[cfg(not(feature = "builtin-tools"))]
    let _ = config;

    Ok(registry)
}

pub fn build_runtime(
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
) -> Result<RuntimeBundle, ChatError> {
    build_runtime_with(provider, registry, RuntimeOptions::default())
}

pub fn build_runtime_with(
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
    options: RuntimeOptions,
) -> Result<RuntimeBundle, ChatError> {
    let chat_hooks = Arc::new(SafeChatHooks::new(TracingObservabilityHooks));
    let tool_runtime = DefaultToolRuntime::new(Arc::clone(&registry))
        .with_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)));

    let assistant = Arc::new(
        Assistant::builder(provider)
            .tool_runtime(Arc::new(tool_runtime))
            .reply_policy(options.reply_policy)
            .title_policy(options.title_policy)
            .hooks(chat_hooks.clone())
            .build()?,
    );

    let store = options
        .store
        .unwrap_or_else(|| Arc::new(InMemoryConversationStore::new()) as Arc<dyn ConversationStore>);
    let coordinator =
        Coordinator::new(assistant.clone(), Arc::clone(&store)).with_hooks(chat_hooks);

    let mut server = ChatServer::new(coordinator);
    if let Some(timeout) = options.turn_timeout {
        server = server.with_turn_timeout(timeout);
    }

    Ok(RuntimeBundle {
        registry,
        assistant,
        store,
        server,
    })
}

/// Builds the OpenAI provider, the built-in tool registry, and the server from `config`.
/// A missing API key fails here rather than on the first request.
pub fn build_runtime_from_config(config: &ParleyConfig) -> Result<RuntimeBundle, ChatError> {
    let provider_config = config
        .provider_config()?
        .with_hooks(Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)));
    let provider = build_openai_provider(provider_config)?;
    let registry = build_tool_registry(config)?;

    build_runtime_with(provider, Arc::new(registry), config.runtime_options())
}
