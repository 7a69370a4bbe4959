//! OpenAI provider implementation over transport and shared models.

use std::sync::Arc;
use std::time::Instant;

use crate::{
    ModelProvider, ModelRequest, ModelResponse, NoopOperationHooks, ProviderError,
    ProviderFuture, ProviderId, ProviderOperationHooks, SecretString,
};

use super::transport::OpenAiTransport;
use super::types::{OpenAiMessage, OpenAiRequest, OpenAiTool};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: SecretString,
    transport: Arc<dyn OpenAiTransport>,
    fallback_model: String,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &self.api_key)
            .field("transport", &self.transport)
            .field("fallback_model", &self.fallback_model)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    pub fn new(
        api_key: impl Into<SecretString>,
        transport: Arc<dyn OpenAiTransport>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::authentication(
                "OpenAI API key must not be empty",
            ));
        }

        Ok(Self {
            api_key,
            transport,
            fallback_model: DEFAULT_OPENAI_MODEL.to_string(),
            hooks: Arc::new(NoopOperationHooks),
        })
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub(crate) fn build_openai_request(&self, request: ModelRequest) -> OpenAiRequest {
        let model = if request.model.trim().is_empty() {
            self.fallback_model.clone()
        } else {
            request.model
        };

        let messages = request
            .messages
            .into_iter()
            .map(OpenAiMessage::from)
            .collect::<Vec<_>>();

        let tools = request
            .tools
            .into_iter()
            .map(OpenAiTool::from)
            .collect::<Vec<_>>();

        OpenAiRequest {
            model,
            messages,
            tools,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        }
    }
}

impl ModelProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn complete<'a>(
        &'a self,
        mut request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            if request.model.trim().is_empty() {
                request.model = self.fallback_model.clone();
            }
            let model = request.model.clone();
            let started = Instant::now();
            self.hooks
                .on_request_start(ProviderId::OpenAi, "complete", &model);

            let result = async {
                request.validate()?;
                let openai_request = self.build_openai_request(request);
                let response = self.transport.complete(openai_request, &self.api_key).await?;
                Ok(response.into_model_response())
            }
            .await;

            match &result {
                Ok(_) => self.hooks.on_success(
                    ProviderId::OpenAi,
                    "complete",
                    &model,
                    started.elapsed(),
                ),
                Err(error) => self.hooks.on_failure(
                    ProviderId::OpenAi,
                    "complete",
                    &model,
                    error,
                    started.elapsed(),
                ),
            }

            result
        })
    }
}
