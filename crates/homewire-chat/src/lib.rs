//! AI chat assistant: external LLM streaming (OpenAI / Anthropic), persisted
//! provider configuration, and extraction of search preferences and contact
//! details from visitor messages.

pub mod config;
pub mod intents;
pub mod prompt;
pub mod providers;
pub mod types;

pub use config::ChatConfig;
pub use intents::{extract_contact, extract_preferences, ContactDetails};
pub use prompt::{build_messages, format_context};
pub use providers::{stream_llm, test_api_key, BoxedStream, StreamChunk};
pub use types::{
    ChatConfigResponse, ChatConfigUpdate, ChatMessage, ChatRequest, LLMProvider, ListingContext,
    StreamEvent, TestKeyRequest,
};
