//! Focused unit tests for OpenAI adapter internals.

#![cfg(test)]

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::{
    Message, ModelProvider, ModelRequest, ProviderError, ProviderErrorKind, ProviderFuture,
    SecretString, StopReason, ToolCall, ToolDefinition,
};

use super::provider::OpenAiProvider;
use super::serde_api::{OpenAiApiResponse, build_api_request, parse_finish_reason};
use super::transport::OpenAiTransport;
use super::types::{OpenAiFinishReason, OpenAiRequest, OpenAiResponse, OpenAiRole};

#[derive(Debug, Default)]
struct RecordingTransport {
    requests: Mutex<Vec<OpenAiRequest>>,
    response: Option<OpenAiResponse>,
}

impl OpenAiTransport for RecordingTransport {
    fn complete<'a>(
        &'a self,
        request: OpenAiRequest,
        _api_key: &'a SecretString,
    ) -> ProviderFuture<'a, Result<OpenAiResponse, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("lock").push(request);
            self.response
                .clone()
                .ok_or_else(|| ProviderError::other("no response configured"))
        })
    }
}

fn parse_response(body: serde_json::Value) -> OpenAiResponse {
    let parsed: OpenAiApiResponse = serde_json::from_value(body).expect("response should parse");
    OpenAiResponse::from(parsed)
}

#[test]
fn blank_api_key_is_rejected() {
    let error = OpenAiProvider::new("  ", Arc::new(RecordingTransport::default()))
        .expect_err("blank key should fail");
    assert_eq!(error.kind, ProviderErrorKind::Authentication);
}

#[test]
fn build_openai_request_carries_tool_call_history() {
    let provider = OpenAiProvider::new("sk-test", Arc::new(RecordingTransport::default()))
        .expect("provider should build");
    let request = ModelRequest::new(
        "gpt-4.1",
        vec![
            Message::user("weather in Bangkok?"),
            Message::assistant("").with_tool_calls(vec![ToolCall::new(
                "call_1",
                "get_current_weather",
                r#"{"location":"Bangkok"}"#,
            )]),
            Message::tool("call_1", "31C, humid"),
        ],
    );

    let built = provider.build_openai_request(request);
    assert_eq!(built.messages.len(), 3);
    assert_eq!(built.messages[1].tool_calls.len(), 1);
    assert_eq!(built.messages[2].role, OpenAiRole::Tool);
    assert_eq!(built.messages[2].tool_call_id.as_deref(), Some("call_1"));
}

#[test]
fn api_request_serializes_function_tools_and_null_content() {
    let provider = OpenAiProvider::new("sk-test", Arc::new(RecordingTransport::default()))
        .expect("provider should build");
    let request = ModelRequest::new(
        "gpt-4.1",
        vec![
            Message::user("hi"),
            Message::assistant("").with_tool_calls(vec![ToolCall::new(
                "call_9",
                "get_today_date",
                "{}",
            )]),
        ],
    )
    .with_tools(vec![ToolDefinition {
        name: "get_today_date".to_string(),
        description: "Returns today's date".to_string(),
        parameters: json!({"type": "object", "properties": {}}),
    }]);

    let api_request =
        build_api_request(provider.build_openai_request(request)).expect("request should build");
    let value = serde_json::to_value(&api_request).expect("request should serialize");

    assert_eq!(value["tools"][0]["type"], "function");
    assert_eq!(value["tools"][0]["function"]["name"], "get_today_date");
    assert!(value["messages"][1]["content"].is_null());
    assert_eq!(value["messages"][1]["tool_calls"][0]["id"], "call_9");
    assert_eq!(
        value["messages"][1]["tool_calls"][0]["function"]["arguments"],
        "{}"
    );
    assert!(value.get("temperature").is_none());
}

#[test]
fn response_without_choices_is_not_an_adapter_error() {
    let response = parse_response(json!({"model": "gpt-4.1", "choices": []}));
    let model_response = response.into_model_response();
    assert!(model_response.choices.is_empty());
}

#[test]
fn response_tool_calls_keep_ids_and_order() {
    let response = parse_response(json!({
        "model": "gpt-4.1",
        "choices": [{
            "message": {
                "content": null,
                "tool_calls": [
                    {"id": "a", "type": "function", "function": {"name": "x", "arguments": "{}"}},
                    {"id": "b", "type": "function", "function": {"name": "y", "arguments": "{\"k\":1}"}}
                ]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
    }));

    let model_response = response.into_model_response();
    let choice = model_response.first_choice().expect("one choice");
    assert_eq!(choice.stop_reason, StopReason::ToolUse);
    let ids = choice
        .message
        .tool_calls
        .iter()
        .map(|call| call.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(model_response.usage.total_tokens, 7);
}

#[test]
fn parse_finish_reason_maps_expected_values() {
    assert_eq!(parse_finish_reason(Some("stop")), OpenAiFinishReason::Stop);
    assert_eq!(
        parse_finish_reason(Some("length")),
        OpenAiFinishReason::Length
    );
    assert_eq!(
        parse_finish_reason(Some("tool_calls")),
        OpenAiFinishReason::ToolCalls
    );
    assert_eq!(
        parse_finish_reason(Some("unknown")),
        OpenAiFinishReason::Other
    );
    assert_eq!(parse_finish_reason(None), OpenAiFinishReason::Other);
}

#[tokio::test]
async fn complete_uses_fallback_model_when_request_model_is_blank() {
    let transport = Arc::new(RecordingTransport {
        requests: Mutex::new(Vec::new()),
        response: Some(parse_response(json!({
            "model": "gpt-4.1",
            "choices": [{"message": {"content": "hello"}, "finish_reason": "stop"}]
        }))),
    });
    let provider = OpenAiProvider::new("sk-test", transport.clone())
        .expect("provider should build")
        .with_fallback_model("gpt-4.1-mini");

    let response = provider
        .complete(ModelRequest::new("", vec![Message::user("hi")]))
        .await
        .expect("completion should succeed");

    assert_eq!(
        response.first_choice().map(|choice| choice.message.content.as_str()),
        Some("hello")
    );
    let requests = transport.requests.lock().expect("lock");
    assert_eq!(requests[0].model, "gpt-4.1-mini");
}
