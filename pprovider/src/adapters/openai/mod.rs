mod provider;
mod serde_api;
mod tests;
mod transport;
mod types;

pub use provider::{DEFAULT_OPENAI_MODEL, OpenAiProvider};
pub use transport::{DEFAULT_OPENAI_BASE_URL, OpenAiHttpTransport, OpenAiTransport};
pub use types::{
    OpenAiAssistantMessage, OpenAiChoice, OpenAiFinishReason, OpenAiMessage, OpenAiRequest,
    OpenAiResponse, OpenAiRole, OpenAiTool, OpenAiToolCall, OpenAiUsage,
};
