//! Provider and message types shared by the completion client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Anthropic,
    Groq,
}

impl LLMProvider {
    /// Chat/messages endpoint for this provider.
    pub fn completion_url(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1/chat/completions",
            Self::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Self::Anthropic => "https://api.anthropic.com/v1/messages",
        }
    }

    /// Model-list endpoint used to check a credential. `None` for Anthropic,
    /// whose credential is checked with a one-token message instead.
    pub fn models_url(self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some("https://api.openai.com/v1/models"),
            Self::Groq => Some("https://api.groq.com/openai/v1/models"),
            Self::Anthropic => None,
        }
    }

    /// Environment variable consulted for this provider's API key.
    pub fn key_env_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Groq => "GROQ_API_KEY",
        }
    }
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

impl FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "groq" => Ok(Self::Groq),
            other => Err(format!("Unknown provider: {other}")),
        }
    }
}

/// Chat message sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Provider, model and credential chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

/// Overrides applied on top of a loaded `LLMConfig` (CLI flags).
#[derive(Debug, Clone, Default)]
pub struct LLMConfigUpdate {
    pub preferred_provider: Option<String>,
    /// Key for the preferred provider (Groq when the preference is `auto`).
    pub api_key: Option<String>,
    /// Model for the preferred provider (Groq when the preference is `auto`).
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub timeout_secs: Option<u64>,
}
