//! Pipeline configuration: file locations, delivery endpoint, budgets, pacing.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_INPUT: &str = "data/leads.csv";
pub const DEFAULT_OUTPUT: &str = "data/leads_out.csv";
pub const DEFAULT_REPORT: &str = "reports/campaign_summary.md";

/// SMTP endpoint used by the delivery adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Envelope and header `From` address.
    pub from: String,
    /// Connection/command timeout in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_timeout() -> u64 {
    10
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1025,
            from: "noreply@example.com".into(),
            timeout_secs: default_smtp_timeout(),
        }
    }
}

impl SmtpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Completion token budgets. The report narrative gets a larger budget than
/// the per-record stage calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudgets {
    pub stage: usize,
    pub report: usize,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            stage: 128,
            report: 256,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lead table to read.
    pub input: PathBuf,
    /// Enriched lead table to write.
    pub output: PathBuf,
    /// Markdown campaign report to write.
    pub report: PathBuf,
    pub smtp: SmtpSettings,
    pub budgets: TokenBudgets,
    /// Pause after each record, in milliseconds.
    pub pause_ms: u64,
    /// Seed for the reply-simulation RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            report: PathBuf::from(DEFAULT_REPORT),
            smtp: SmtpSettings::default(),
            budgets: TokenBudgets::default(),
            pause_ms: 500,
            seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Reject configurations that cannot produce a run.
    pub fn validate(&self) -> Result<()> {
        if self.input == self.output {
            return Err(Error::Config(format!(
                "input and output must differ: {}",
                self.input.display()
            )));
        }
        if self.smtp.host.trim().is_empty() {
            return Err(Error::Config("SMTP host is empty".into()));
        }
        if self.smtp.from.trim().is_empty() {
            return Err(Error::Config("from-address is empty".into()));
        }
        if self.budgets.stage == 0 || self.budgets.report == 0 {
            return Err(Error::Config("token budgets must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.smtp.port, 1025);
        assert_eq!(config.budgets.stage, 128);
        assert_eq!(config.budgets.report, 256);
        assert_eq!(config.pause(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_same_paths() {
        let config = PipelineConfig {
            output: PathBuf::from(DEFAULT_INPUT),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = PipelineConfig {
            budgets: TokenBudgets {
                stage: 0,
                report: 256,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
