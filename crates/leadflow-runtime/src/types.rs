//! Runtime types.

use std::fmt;

use chrono::{DateTime, Utc};
use leadflow_core::Lead;

/// Per-record stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Enrichment,
    Scoring,
    Drafting,
    Delivery,
    ResponseSimulation,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Self::Enrichment,
            Self::Scoring,
            Self::Drafting,
            Self::Delivery,
            Self::ResponseSimulation,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Enrichment => "enrichment",
            Self::Scoring => "scoring",
            Self::Drafting => "drafting",
            Self::Delivery => "delivery",
            Self::ResponseSimulation => "response_simulation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How one record left the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Every stage ran. Delivery may still have failed (`send_error`).
    Completed(Lead),
    /// `stage` returned an error; later stages were skipped and the lead's
    /// status is `error: <reason>`.
    Failed {
        lead: Lead,
        stage: Stage,
        reason: String,
    },
}

impl RecordOutcome {
    pub fn lead(&self) -> &Lead {
        match self {
            Self::Completed(lead) | Self::Failed { lead, .. } => lead,
        }
    }

    pub fn into_lead(self) -> Lead {
        match self {
            Self::Completed(lead) | Self::Failed { lead, .. } => lead,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A record that stopped at a failing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub index: usize,
    pub email: String,
    pub stage: Stage,
    pub reason: String,
}

/// Counters for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub completed: usize,
    pub failures: Vec<StageFailure>,
    pub delivery_failures: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            total: 0,
            completed: 0,
            failures: Vec::new(),
            delivery_failures: 0,
            duration_ms: 0,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failed records per stage, in stage order. Stages without failures
    /// are omitted.
    pub fn failures_by_stage(&self) -> Vec<(Stage, usize)> {
        Stage::all()
            .iter()
            .map(|&stage| {
                let n = self.failures.iter().filter(|f| f.stage == stage).count();
                (stage, n)
            })
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {} started {}: {} leads: {} completed, {} failed, {} delivery failure(s) in {}ms",
            self.run_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.total,
            self.completed,
            self.failed(),
            self.delivery_failures,
            self.duration_ms
        )?;
        for (stage, n) in self.failures_by_stage() {
            write!(f, "; {stage}: {n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let names: Vec<_> = Stage::all().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["enrichment", "scoring", "drafting", "delivery", "response_simulation"]
        );
    }

    #[test]
    fn test_summary_display_groups_failures() {
        let mut summary = RunSummary::new("r1");
        summary.total = 4;
        summary.completed = 2;
        summary.delivery_failures = 1;
        for (index, stage) in [(1, Stage::Scoring), (3, Stage::Scoring)] {
            summary.failures.push(StageFailure {
                index,
                email: format!("lead{index}@example.com"),
                stage,
                reason: "timeout".into(),
            });
        }

        assert_eq!(summary.failures_by_stage(), vec![(Stage::Scoring, 2)]);
        let text = summary.to_string();
        assert!(text.starts_with("run r1 started "));
        assert!(text.contains(" UTC: 4 leads: 2 completed, 2 failed, 1 delivery failure(s)"));
        assert!(text.ends_with("; scoring: 2"));
    }
}
