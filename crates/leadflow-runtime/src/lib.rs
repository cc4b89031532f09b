//! Leadflow Runtime: drives each lead through the stages and summarises
//! the campaign.
//!
//! `Pipeline` processes records strictly in order, one at a time, with a
//! fixed pause after each. A failing stage marks only its own record.
//! `report` turns the finished records into the markdown campaign report.

pub mod orchestrator;
pub mod report;
pub mod types;

pub use orchestrator::Pipeline;
pub use report::{generate_report, write_report, CampaignSummary};
pub use types::*;
