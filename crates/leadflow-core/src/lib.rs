//! Leadflow Core: lead record model, error types, pipeline configuration.

pub mod config;
pub mod error;
pub mod lead;

pub use config::{PipelineConfig, SmtpSettings, TokenBudgets};
pub use error::{Error, Result};
pub use lead::{
    fill_blank, non_blank, Lead, LeadStatus, Priority, ResponseCategory, OUTPUT_COLUMNS,
    REQUIRED_COLUMNS,
};
