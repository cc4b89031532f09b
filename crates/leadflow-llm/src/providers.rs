//! Provider request/response handling for non-streaming completions.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! messages format and its own auth headers.

use leadflow_core::{Error, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::types::{ChatMessage, LLMProvider};

/// One completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub model: &'a str,
    pub api_key: &'a str,
    pub temperature: f64,
    pub max_tokens: usize,
}

/// Send a completion request to the given provider and return the raw text.
pub async fn complete(
    client: &Client,
    provider: LLMProvider,
    request: &CompletionRequest<'_>,
) -> Result<String> {
    match provider {
        LLMProvider::OpenAI | LLMProvider::Groq => {
            complete_openai_compat(client, provider.completion_url(), request).await
        }
        LLMProvider::Anthropic => complete_anthropic(client, request).await,
    }
}

async fn complete_openai_compat(
    client: &Client,
    url: &str,
    request: &CompletionRequest<'_>,
) -> Result<String> {
    let msgs: Vec<Value> = request
        .messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let body = json!({
        "model": request.model,
        "messages": msgs,
        "temperature": request.temperature,
        "max_completion_tokens": request.max_tokens,
        "top_p": 1,
        "stream": false,
    });

    debug!("Completion request to {} with model {}", url, request.model);

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", request.api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Completion(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    extract_openai_text(&parsed)
        .ok_or_else(|| Error::Completion(format!("Unexpected response shape: {}", snippet(&parsed))))
}

async fn complete_anthropic(client: &Client, request: &CompletionRequest<'_>) -> Result<String> {
    let msgs: Vec<Value> = request
        .messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let body = json!({
        "model": request.model,
        "messages": msgs,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });

    debug!("Completion request to Anthropic with model {}", request.model);

    let response = client
        .post(LLMProvider::Anthropic.completion_url())
        .header("x-api-key", request.api_key)
        .header("anthropic-version", "2023-06-01")
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Completion(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    if parsed["type"].as_str() == Some("error") {
        let msg = parsed["error"]["message"].as_str().unwrap_or("Unknown error");
        error!("Anthropic error: {}", msg);
        return Err(Error::Completion(msg.to_string()));
    }
    extract_anthropic_text(&parsed)
        .ok_or_else(|| Error::Completion(format!("Unexpected response shape: {}", snippet(&parsed))))
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Completion(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Completion(format!("Response decode failed: {}", e)))
}

/// Text of the first choice. `None` when the response has no choices; a
/// choice with null content yields an empty string.
pub fn extract_openai_text(response: &Value) -> Option<String> {
    let choice = response["choices"].as_array()?.first()?;
    if let Some(content) = choice["message"]["content"].as_str() {
        return Some(content.to_string());
    }
    if let Some(text) = choice["text"].as_str() {
        return Some(text.to_string());
    }
    Some(String::new())
}

/// Concatenated text blocks of a messages-API response.
pub fn extract_anthropic_text(response: &Value) -> Option<String> {
    let blocks = response["content"].as_array()?;
    Some(
        blocks
            .iter()
            .filter(|b| b["type"].as_str() == Some("text"))
            .filter_map(|b| b["text"].as_str())
            .collect::<Vec<_>>()
            .join(""),
    )
}

/// Check a credential by listing models (OpenAI/Groq) or sending a one-token
/// message (Anthropic).
pub async fn probe(client: &Client, provider: LLMProvider, api_key: &str, model: &str) -> Result<()> {
    let resp = match provider.models_url() {
        Some(url) => {
            client
                .get(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
        }
        None => {
            client
                .post(provider.completion_url())
                .header("x-api-key", api_key)
                .header("anthropic-version", "2023-06-01")
                .header("Content-Type", "application/json")
                .json(&json!({
                    "model": model,
                    "max_tokens": 1,
                    "messages": [{"role": "user", "content": "Hi"}],
                }))
                .send()
                .await
        }
    }
    .map_err(|e| Error::Completion(format!("{} unreachable: {}", provider, e)))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(Error::Completion(format!(
            "{} returned status {}",
            provider,
            resp.status()
        )))
    }
}

fn snippet(value: &Value) -> String {
    let text = value.to_string();
    text.chars().take(300).collect()
}
