#![cfg(feature = "provider-openai")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pprovider::adapters::openai::{
    OpenAiAssistantMessage, OpenAiChoice, OpenAiFinishReason, OpenAiHttpTransport,
    OpenAiProvider, OpenAiRequest, OpenAiResponse, OpenAiToolCall, OpenAiTransport, OpenAiUsage,
};
use pprovider::{
    Message, ModelProvider, ModelRequest, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderId, ProviderOperationHooks, SecretString, StopReason, ToolDefinition,
};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct FakeTransport {
    captured_key: Mutex<Option<String>>,
    captured_request: Mutex<Option<OpenAiRequest>>,
}

impl OpenAiTransport for FakeTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiRequest,
        api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<OpenAiResponse, ProviderError>> {
        Box::pin(async move {
            *self.captured_request.lock().expect("request lock") = Some(request);
            *self.captured_key.lock().expect("key lock") = Some(api_key.expose().to_string());

            Ok(OpenAiResponse {
                model: "gpt-4.1".to_string(),
                choices: vec![OpenAiChoice {
                    message: OpenAiAssistantMessage {
                        content: String::new(),
                        tool_calls: vec![OpenAiToolCall {
                            id: "call_1".to_string(),
                            name: "get_current_weather".to_string(),
                            arguments: "{\"location\":\"Bangkok\"}".to_string(),
                        }],
                    },
                    finish_reason: OpenAiFinishReason::ToolCalls,
                }],
                usage: OpenAiUsage {
                    prompt_tokens: 7,
                    completion_tokens: 3,
                    total_tokens: 10,
                },
            })
        })
    }
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_request_start(&self, provider: ProviderId, operation: &str, model: &str) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("start:{provider}:{operation}:{model}"));
    }

    fn on_success(&self, _provider: ProviderId, operation: &str, _model: &str, _elapsed: Duration) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("success:{operation}"));
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        operation: &str,
        _model: &str,
        error: &ProviderError,
        _elapsed: Duration,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("failure:{operation}:{:?}", error.kind));
    }
}

fn weather_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get_current_weather".to_string(),
        description: "Get the current weather for a location".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {"location": {"type": "string"}},
            "required": ["location"]
        }),
    }
}

#[tokio::test]
async fn complete_maps_openai_response_to_provider_response() {
    let transport = Arc::new(FakeTransport::default());
    let provider = OpenAiProvider::new("sk-live-123", transport.clone()).expect("provider");

    let request = ModelRequest::new("gpt-4.1", vec![Message::user("Weather in Bangkok?")])
        .with_tools(vec![weather_tool()]);

    let response = provider.complete(request).await.expect("response");

    assert_eq!(response.provider, ProviderId::OpenAi);
    assert_eq!(response.usage.total_tokens, 10);
    let choice = response.first_choice().expect("choice");
    assert_eq!(choice.stop_reason, StopReason::ToolUse);
    assert_eq!(choice.message.tool_calls[0].id, "call_1");

    let key = transport.captured_key.lock().expect("key lock").clone();
    assert_eq!(key.as_deref(), Some("sk-live-123"));

    let captured = transport
        .captured_request
        .lock()
        .expect("request lock")
        .clone()
        .expect("request captured");
    assert_eq!(captured.tools.len(), 1);
    assert_eq!(captured.tools[0].name, "get_current_weather");
}

#[tokio::test]
async fn invalid_request_reports_failure_to_hooks() {
    let hooks = Arc::new(RecordingHooks::default());
    let provider = OpenAiProvider::new("sk-live-123", Arc::new(FakeTransport::default()))
        .expect("provider")
        .with_hooks(hooks.clone());

    let error = provider
        .complete(ModelRequest::new("gpt-4.1", Vec::new()))
        .await
        .expect_err("empty messages should fail");

    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    let events = hooks.events.lock().expect("events lock").clone();
    assert_eq!(
        events,
        vec![
            "start:openai:complete:gpt-4.1".to_string(),
            "failure:complete:InvalidRequest".to_string(),
        ]
    );
}

#[tokio::test]
async fn http_transport_posts_chat_completion_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-wire"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4.1",
            "choices": [{
                "message": {"role": "assistant", "content": "It is sunny."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 4, "total_tokens": 9}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = OpenAiHttpTransport::new(reqwest::Client::new())
        .with_base_url(format!("{}/v1", server.uri()));
    let provider = OpenAiProvider::new("sk-wire", Arc::new(transport)).expect("provider");

    let response = provider
        .complete(ModelRequest::new("gpt-4.1", vec![Message::user("Weather?")]))
        .await
        .expect("response");

    assert_eq!(
        response.first_choice().map(|choice| choice.message.content.as_str()),
        Some("It is sunny.")
    );
}

#[tokio::test]
async fn http_transport_maps_status_codes_to_error_kinds() {
    let cases = [
        (401, ProviderErrorKind::Authentication),
        (429, ProviderErrorKind::RateLimited),
        (400, ProviderErrorKind::InvalidRequest),
        (503, ProviderErrorKind::Unavailable),
        (500, ProviderErrorKind::Transport),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": format!("status {status}")}
            })))
            .mount(&server)
            .await;

        let transport = OpenAiHttpTransport::new(reqwest::Client::new()).with_base_url(server.uri());
        let provider = OpenAiProvider::new("sk-wire", Arc::new(transport)).expect("provider");

        let error = provider
            .complete(ModelRequest::new("gpt-4.1", vec![Message::user("hi")]))
            .await
            .expect_err("non-success status should fail");

        assert_eq!(error.kind, expected, "status {status}");
        assert_eq!(error.message, format!("status {status}"));
    }
}
