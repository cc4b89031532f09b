//! LLM configuration loading and provider selection.

use std::path::{Path, PathBuf};

use leadflow_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{LLMConfigUpdate, LLMProvider, ResolvedProvider};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "openai/gpt-oss-20b";

/// LLM configuration (optionally persisted as JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// `groq`, `openai`, `anthropic`, or `auto`.
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn default_preferred() -> String {
    "groq".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            config_path: None,
        }
    }
}

impl LLMConfig {
    /// Load config from an optional JSON file, falling back to env vars for keys.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// Like `load`, with an explicit environment lookup.
    pub fn load_with_env(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("read LLM config {}: {}", path.display(), e))
                })?;
                let mut config: LLMConfig = serde_json::from_str(&raw)?;
                config.config_path = Some(path.to_path_buf());
                info!("Loaded LLM config from {}", path.display());
                config
            }
            None => LLMConfig::default(),
        };

        let lookup = |provider: LLMProvider| {
            env(provider.key_env_var()).filter(|k| !k.trim().is_empty())
        };
        if config.openai_api_key.is_none() {
            config.openai_api_key = lookup(LLMProvider::OpenAI);
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = lookup(LLMProvider::Anthropic);
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = lookup(LLMProvider::Groq);
        }

        Ok(config)
    }

    /// Apply CLI overrides, merging with the loaded config.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.clone();
        }
        let target = self.target_provider();
        if let Some(k) = update.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            *self.key_slot(target) = Some(k.clone());
        }
        if let Some(m) = &update.model {
            *self.model_slot(target) = m.clone();
        }
        if let Some(t) = update.temperature {
            self.temperature = t;
        }
        if let Some(t) = update.timeout_secs {
            self.timeout_secs = t;
        }
    }

    /// Resolve which provider, model and key to use.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        if self.preferred_provider != "auto" {
            let provider = self.preferred_provider.parse::<LLMProvider>().ok()?;
            return self.resolved(provider);
        }

        // Auto mode: Groq > Anthropic > OpenAI
        [LLMProvider::Groq, LLMProvider::Anthropic, LLMProvider::OpenAI]
            .into_iter()
            .find_map(|p| self.resolved(p))
    }

    /// Resolve or explain why no provider is usable.
    pub fn require_provider(&self) -> Result<ResolvedProvider> {
        if self.preferred_provider != "auto" {
            let provider = self
                .preferred_provider
                .parse::<LLMProvider>()
                .map_err(Error::Config)?;
            return self.resolved(provider).ok_or_else(|| {
                Error::Config(format!(
                    "no API key for {}: pass --api-key or set {}",
                    provider,
                    provider.key_env_var()
                ))
            });
        }
        self.resolve_provider().ok_or_else(|| {
            Error::Config(
                "no LLM provider configured: set GROQ_API_KEY, ANTHROPIC_API_KEY or OPENAI_API_KEY"
                    .into(),
            )
        })
    }

    fn resolved(&self, provider: LLMProvider) -> Option<ResolvedProvider> {
        let (key, model) = match provider {
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
        };
        key.as_ref().map(|k| ResolvedProvider {
            provider,
            model: model.clone(),
            api_key: k.clone(),
        })
    }

    /// Provider that key/model overrides apply to.
    fn target_provider(&self) -> LLMProvider {
        self.preferred_provider
            .parse::<LLMProvider>()
            .unwrap_or(LLMProvider::Groq)
    }

    fn key_slot(&mut self, provider: LLMProvider) -> &mut Option<String> {
        match provider {
            LLMProvider::OpenAI => &mut self.openai_api_key,
            LLMProvider::Anthropic => &mut self.anthropic_api_key,
            LLMProvider::Groq => &mut self.groq_api_key,
        }
    }

    fn model_slot(&mut self, provider: LLMProvider) -> &mut String {
        match provider {
            LLMProvider::OpenAI => &mut self.openai_model,
            LLMProvider::Anthropic => &mut self.anthropic_model,
            LLMProvider::Groq => &mut self.groq_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_is_groq_without_key() {
        let config = LLMConfig::load_with_env(None, no_env).unwrap();
        assert_eq!(config.preferred_provider, "groq");
        assert!(config.resolve_provider().is_none());
        assert!(matches!(config.require_provider(), Err(Error::Config(_))));
    }

    #[test]
    fn test_env_fallback() {
        let config = LLMConfig::load_with_env(None, |name| {
            (name == "GROQ_API_KEY").then(|| "gsk-test".to_string())
        })
        .unwrap();
        let resolved = config.require_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::Groq);
        assert_eq!(resolved.model, DEFAULT_GROQ_MODEL);
        assert_eq!(resolved.api_key, "gsk-test");
    }

    #[test]
    fn test_blank_env_key_ignored() {
        let config = LLMConfig::load_with_env(None, |_| Some("  ".to_string())).unwrap();
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn test_update_targets_preferred_provider() {
        let mut config = LLMConfig::load_with_env(None, no_env).unwrap();
        config.apply_update(&LLMConfigUpdate {
            preferred_provider: Some("anthropic".into()),
            api_key: Some("sk-ant".into()),
            model: Some("claude-x".into()),
            ..Default::default()
        });
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-ant"));
        assert!(config.groq_api_key.is_none());
        let resolved = config.require_provider().unwrap();
        assert_eq!(resolved.provider, LLMProvider::Anthropic);
        assert_eq!(resolved.model, "claude-x");
    }

    #[test]
    fn test_auto_prefers_groq() {
        let mut config = LLMConfig::load_with_env(None, no_env).unwrap();
        config.preferred_provider = "auto".into();
        config.openai_api_key = Some("sk-openai".into());
        assert_eq!(
            config.resolve_provider().map(|r| r.provider),
            Some(LLMProvider::OpenAI)
        );
        config.groq_api_key = Some("gsk".into());
        assert_eq!(
            config.resolve_provider().map(|r| r.provider),
            Some(LLMProvider::Groq)
        );
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let mut config = LLMConfig::load_with_env(None, no_env).unwrap();
        config.preferred_provider = "ollama".into();
        assert!(matches!(config.require_provider(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");
        std::fs::write(
            &path,
            r#"{"preferred_provider": "openai", "openai_api_key": "sk-file", "temperature": 0.5}"#,
        )
        .unwrap();

        let config = LLMConfig::load_with_env(Some(&path), no_env).unwrap();
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.require_provider().unwrap().api_key, "sk-file");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = LLMConfig::load_with_env(Some(Path::new("/nonexistent/llm.json")), no_env);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
