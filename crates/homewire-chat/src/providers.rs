//! External LLM provider streaming.
//!
//! OpenAI and Anthropic both stream SSE `data:` lines; the payload shapes
//! differ, so the byte/line plumbing is shared and only the per-line parse
//! is provider-specific.

use std::pin::Pin;

use futures::Stream;
use reqwest::{Client, RequestBuilder};
use serde_json::json;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::types::{ChatMessage, LLMProvider};

/// Boxed stream type for returning different stream implementations.
pub type BoxedStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// A single streamed token or terminal event.
pub enum StreamChunk {
    Token(String),
    Done { tokens_used: usize },
    Error(String),
}

/// What one SSE `data:` payload meant.
#[derive(Debug, PartialEq)]
enum LineEvent {
    Token(String),
    Stop,
    Error(String),
    Nothing,
}

/// Stream tokens from the configured provider.
pub fn stream_llm(
    client: &Client,
    provider: LLMProvider,
    messages: Vec<ChatMessage>,
    model: &str,
    api_key: &str,
    temperature: f64,
    max_tokens: usize,
) -> BoxedStream {
    let request = build_request(client, provider, &messages, model, api_key, temperature, max_tokens);
    let model = model.to_string();

    Box::pin(async_stream::stream! {
        debug!("Streaming from {} with model {}", provider, model);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();

                if line.is_empty() || line.starts_with(':') {
                    continue;
                }
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };

                match parse_data_line(provider, data) {
                    LineEvent::Token(text) => {
                        token_count += 1;
                        yield StreamChunk::Token(text);
                    }
                    LineEvent::Stop => {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }
                    LineEvent::Error(e) => {
                        yield StreamChunk::Error(e);
                        return;
                    }
                    LineEvent::Nothing => {}
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    })
}

fn build_request(
    client: &Client,
    provider: LLMProvider,
    messages: &[ChatMessage],
    model: &str,
    api_key: &str,
    temperature: f64,
    max_tokens: usize,
) -> RequestBuilder {
    match provider {
        LLMProvider::OpenAI => {
            let msgs: Vec<serde_json::Value> = messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect();
            client
                .post("https://api.openai.com/v1/chat/completions")
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&json!({
                    "model": model,
                    "messages": msgs,
                    "temperature": temperature,
                    "max_tokens": max_tokens,
                    "stream": true,
                }))
        }
        LLMProvider::Anthropic => {
            // Anthropic carries the system prompt out of band.
            let system: Option<String> = messages
                .iter()
                .find(|m| m.role == "system")
                .map(|m| m.content.clone());
            let conv: Vec<serde_json::Value> = messages
                .iter()
                .filter(|m| m.role != "system")
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect();

            let mut body = json!({
                "model": model,
                "messages": conv,
                "temperature": temperature,
                "max_tokens": max_tokens,
                "stream": true,
            });
            if let Some(system) = system {
                body["system"] = json!(system);
            }

            client
                .post("https://api.anthropic.com/v1/messages")
                .header("x-api-key", api_key)
                .header("anthropic-version", "2023-06-01")
                .header("Content-Type", "application/json")
                .json(&body)
        }
    }
}

fn parse_data_line(provider: LLMProvider, data: &str) -> LineEvent {
    match provider {
        LLMProvider::OpenAI => {
            if data.trim() == "[DONE]" {
                return LineEvent::Stop;
            }
            let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) else {
                return LineEvent::Nothing;
            };
            match parsed["choices"][0]["delta"]["content"].as_str() {
                Some(content) if !content.is_empty() => LineEvent::Token(content.to_string()),
                _ => LineEvent::Nothing,
            }
        }
        LLMProvider::Anthropic => {
            let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) else {
                return LineEvent::Nothing;
            };
            match parsed["type"].as_str() {
                Some("content_block_delta") => match parsed["delta"]["text"].as_str() {
                    Some(text) if !text.is_empty() => LineEvent::Token(text.to_string()),
                    _ => LineEvent::Nothing,
                },
                Some("message_stop") => LineEvent::Stop,
                Some("error") => LineEvent::Error(
                    parsed["error"]["message"]
                        .as_str()
                        .unwrap_or("Unknown error")
                        .to_string(),
                ),
                _ => LineEvent::Nothing,
            }
        }
    }
}

/// Test an API key by making a minimal request.
pub async fn test_api_key(provider: &str, api_key: &str) -> Result<(), String> {
    let client = Client::new();

    match provider {
        "openai" => {
            let resp = client
                .get("https://api.openai.com/v1/models")
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        "anthropic" => {
            let resp = client
                .post("https://api.anthropic.com/v1/messages")
                .header("x-api-key", api_key)
                .header("anthropic-version", "2023-06-01")
                .header("Content-Type", "application/json")
                .json(&json!({
                    "model": "claude-3-5-haiku-20241022",
                    "max_tokens": 1,
                    "messages": [{"role": "user", "content": "Hi"}],
                }))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            // 400 with a valid key means the key works (quota/model issue)
            if resp.status().is_success() || resp.status().as_u16() == 400 {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
