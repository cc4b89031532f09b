//! The completion capability used by pipeline stages.

use std::future::Future;
use std::time::{Duration, Instant};

use leadflow_core::{Error, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::config::LLMConfig;
use crate::providers::{self, CompletionRequest};
use crate::types::{ChatMessage, LLMProvider, ResolvedProvider};

/// Text completion: a prompt and a token budget in, generated text out.
///
/// Implementations return trimmed text and fail with `Error::Completion` when
/// the backend cannot produce a response.
pub trait CompletionClient: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        max_tokens: usize,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Completion client backed by a hosted provider API.
pub struct HttpCompletionClient {
    http: Client,
    resolved: ResolvedProvider,
    temperature: f64,
}

impl HttpCompletionClient {
    /// Build a client from config. Fails when no provider has a credential.
    pub fn from_config(config: &LLMConfig) -> Result<Self> {
        let resolved = config.require_provider()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("build HTTP client: {}", e)))?;

        info!(
            "Completion client initialized: provider={}, model={}, timeout={}s",
            resolved.provider, resolved.model, config.timeout_secs
        );

        Ok(Self {
            http,
            resolved,
            temperature: config.temperature,
        })
    }

    pub fn provider(&self) -> LLMProvider {
        self.resolved.provider
    }

    pub fn model(&self) -> &str {
        &self.resolved.model
    }

    /// Verify the backend is reachable and accepts the credential.
    pub async fn preflight(&self) -> Result<()> {
        providers::probe(
            &self.http,
            self.resolved.provider,
            &self.resolved.api_key,
            &self.resolved.model,
        )
        .await
    }
}

impl CompletionClient for HttpCompletionClient {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let start = Instant::now();
        let messages = [ChatMessage::user(prompt)];
        let request = CompletionRequest {
            messages: &messages,
            model: &self.resolved.model,
            api_key: &self.resolved.api_key,
            temperature: self.temperature,
            max_tokens,
        };

        let text = providers::complete(&self.http, self.resolved.provider, &request).await?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            prompt_bytes = prompt.len(),
            response_bytes = text.len(),
            max_tokens,
            "completion complete"
        );

        Ok(text.trim().to_string())
    }
}
