//! Pipeline: runs every lead through the stages in order.

use std::time::{Duration, Instant};

use leadflow_core::{Lead, LeadStatus, PipelineConfig, Result, TokenBudgets};
use leadflow_llm::CompletionClient;
use leadflow_mail::{Mailer, OutboundEmail};
use leadflow_stages::{draft, enrich, score, simulate_response};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::types::*;

/// Sequential lead pipeline over a completion backend and a mailer.
pub struct Pipeline<C, M> {
    client: C,
    mailer: M,
    budgets: TokenBudgets,
    pause: Duration,
    rng: StdRng,
}

impl<C: CompletionClient, M: Mailer> Pipeline<C, M> {
    /// Build from config. A configured seed makes reply simulation
    /// reproducible; otherwise the RNG is seeded from entropy.
    pub fn new(client: C, mailer: M, config: &PipelineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            client,
            mailer,
            budgets: config.budgets,
            pause: config.pause(),
            rng,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Process every lead in input order. The returned leads are in the same
    /// order, one per input lead.
    pub async fn run(&mut self, leads: Vec<Lead>) -> (Vec<Lead>, RunSummary) {
        self.run_with(leads, |_| {}).await
    }

    /// Like `run`, calling `on_record` with each record's outcome as soon as
    /// the record leaves the pipeline.
    pub async fn run_with<F>(&mut self, leads: Vec<Lead>, on_record: F) -> (Vec<Lead>, RunSummary)
    where
        F: FnMut(&RecordOutcome),
    {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("run", run_id = %run_id);
        self.run_inner(leads, run_id, on_record).instrument(span).await
    }

    async fn run_inner<F>(
        &mut self,
        leads: Vec<Lead>,
        run_id: String,
        mut on_record: F,
    ) -> (Vec<Lead>, RunSummary)
    where
        F: FnMut(&RecordOutcome),
    {
        let start = Instant::now();
        let mut summary = RunSummary::new(run_id);
        summary.total = leads.len();
        info!("Starting pipeline over {} leads", leads.len());

        let mut out = Vec::with_capacity(leads.len());
        for (index, lead) in leads.into_iter().enumerate() {
            let span = info_span!("lead", index, email = %lead.email);
            let outcome = self.process_lead(lead).instrument(span).await;

            match &outcome {
                RecordOutcome::Completed(lead) => {
                    summary.completed += 1;
                    if lead.status.as_ref().is_some_and(LeadStatus::is_send_error) {
                        summary.delivery_failures += 1;
                    }
                }
                RecordOutcome::Failed {
                    lead,
                    stage,
                    reason,
                } => summary.failures.push(StageFailure {
                    index,
                    email: lead.email.clone(),
                    stage: *stage,
                    reason: reason.clone(),
                }),
            }
            on_record(&outcome);
            out.push(outcome.into_lead());

            if !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!("Pipeline complete: {}", summary);
        (out, summary)
    }

    /// Run all stages for one lead. The first failing stage stops the record
    /// with `status = error: <detail>`; fields written by earlier stages stay.
    pub async fn process_lead(&mut self, mut lead: Lead) -> RecordOutcome {
        for &stage in Stage::all() {
            if let Err(e) = self.run_stage(stage, &mut lead).await {
                let reason = e.to_string();
                warn!("Stage {} failed for {}: {}", stage, lead.email, reason);
                lead.status = Some(LeadStatus::Error(reason.clone()));
                return RecordOutcome::Failed {
                    lead,
                    stage,
                    reason,
                };
            }
        }
        info!(
            "Processed {} -> {}",
            lead.email,
            lead.status.as_ref().map(ToString::to_string).unwrap_or_default()
        );
        RecordOutcome::Completed(lead)
    }

    async fn run_stage(&mut self, stage: Stage, lead: &mut Lead) -> Result<()> {
        let budget = self.budgets.stage;
        match stage {
            Stage::Enrichment => enrich(&self.client, lead, budget).await?.apply(lead),
            Stage::Scoring => score(&self.client, lead, budget).await?.apply(lead),
            Stage::Drafting => draft(&self.client, lead, budget).await?.apply(lead),
            Stage::Delivery => self.deliver(lead).await,
            Stage::ResponseSimulation => {
                simulate_response(&self.client, lead, &mut self.rng, budget)
                    .await?
                    .apply(lead)
            }
        }
        Ok(())
    }

    /// Hand the drafted email to the mailer. Failure is recorded on the lead
    /// as `send_error` and does not stop the record.
    async fn deliver(&self, lead: &mut Lead) {
        let email = OutboundEmail {
            to: lead.email.trim().to_string(),
            subject: lead.email_subject.clone().unwrap_or_default(),
            body: lead.email_body.clone().unwrap_or_default(),
        };
        match self.mailer.send(&email).await {
            Ok(()) => {
                debug!("Delivered to {}", email.to);
                lead.status = Some(LeadStatus::Sent);
            }
            Err(e) => {
                warn!("Delivery to {} failed: {}", email.to, e);
                lead.status = Some(LeadStatus::SendError(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::{Priority, ResponseCategory};
    use leadflow_llm::ScriptedCompletion;
    use leadflow_mail::RecordingMailer;

    fn config(seed: u64) -> PipelineConfig {
        PipelineConfig {
            pause_ms: 0,
            seed: Some(seed),
            ..PipelineConfig::default()
        }
    }

    fn scripted() -> ScriptedCompletion {
        ScriptedCompletion::new()
            .reply_when("Classify the following reply", "Not Interested")
            .reply_when("You are the prospect", "No thanks, we're set.")
            .reply_when("enriches a sales lead", "company: Acme\npersona: Ops Lead")
            .reply_when("expert sales analyst", "priority: 1\nreason: Small team.")
            .reply_when("outreach email", "Subject: Hello\n\nBody: Hi there, quick call?")
    }

    #[tokio::test]
    async fn test_process_lead_happy_path() {
        let mut pipeline = Pipeline::new(scripted(), RecordingMailer::new(), &config(1));
        let outcome = pipeline
            .process_lead(Lead::new("Ada", "Lovelace", "ada@example.com"))
            .await;

        let lead = match outcome {
            RecordOutcome::Completed(lead) => lead,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(lead.company.as_deref(), Some("Acme"));
        assert_eq!(lead.persona.as_deref(), Some("Ops Lead"));
        assert_eq!(lead.priority, Priority::new(1));
        assert_eq!(lead.email_subject.as_deref(), Some("Hello"));
        // priority 1 never replies
        assert_eq!(lead.status, Some(LeadStatus::NoResponse));
        assert_eq!(lead.response_category, Some(ResponseCategory::NoResponse));

        let sent = pipeline.mailer().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].body, "Hi there, quick call?");
    }

    #[tokio::test]
    async fn test_stage_failure_keeps_earlier_fields() {
        let client = ScriptedCompletion::new()
            .reply_when("enriches a sales lead", "persona: Ops Lead")
            .fail_when("expert sales analyst", "API error 503: overloaded");
        let mut pipeline = Pipeline::new(client, RecordingMailer::new(), &config(1));

        let outcome = pipeline
            .process_lead(Lead::new("Ada", "Lovelace", "ada@example.com"))
            .await;

        match outcome {
            RecordOutcome::Failed {
                lead,
                stage,
                reason,
            } => {
                assert_eq!(stage, Stage::Scoring);
                assert!(reason.contains("overloaded"));
                assert_eq!(lead.persona.as_deref(), Some("Ops Lead"));
                assert_eq!(lead.priority, None);
                assert_eq!(lead.email_subject, None);
                assert_eq!(lead.status, Some(LeadStatus::Error(reason.clone())));
                assert!(lead.status.unwrap().to_string().starts_with("error: "));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(pipeline.mailer().sent().is_empty());
    }

    #[tokio::test]
    async fn test_run_isolates_failures_and_keeps_order() {
        let client = ScriptedCompletion::new()
            .fail_when("email=bad@example.com", "timed out")
            .reply_when("enriches a sales lead", "persona: Ops Lead")
            .reply_when("expert sales analyst", "priority: 2")
            .reply_when("outreach email", "Subject: Hi\n\nBody: Hello");
        let mailer = RecordingMailer::new().reject("bounce@example.com");
        let mut pipeline = Pipeline::new(client, mailer, &config(9));

        let leads = vec![
            Lead::new("A", "One", "a@example.com"),
            Lead::new("B", "Two", "bad@example.com"),
            Lead::new("C", "Three", "bounce@example.com"),
        ];
        let (out, summary) = pipeline.run(leads).await;

        let emails: Vec<_> = out.iter().map(|l| l.email.as_str()).collect();
        assert_eq!(emails, ["a@example.com", "bad@example.com", "bounce@example.com"]);
        assert_eq!(out[0].status, Some(LeadStatus::NoResponse));
        assert!(matches!(out[1].status, Some(LeadStatus::Error(_))));
        assert_eq!(
            out[2].status,
            Some(LeadStatus::SendError("recipient rejected: bounce@example.com".into()))
        );
        assert_eq!(out[2].response_category, Some(ResponseCategory::NoResponse));

        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures[0].index, 1);
        assert_eq!(summary.failures[0].stage, Stage::Enrichment);
        assert_eq!(summary.delivery_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_follows_each_record() {
        let client = ScriptedCompletion::new()
            .reply_when("expert sales analyst", "priority: 1")
            .otherwise("persona: Ops Lead");
        let config = PipelineConfig {
            pause_ms: 250,
            ..config(5)
        };
        let mut pipeline = Pipeline::new(client, RecordingMailer::new(), &config);
        let leads = (0..4)
            .map(|i| Lead::new("N", "M", format!("n{i}@example.com")))
            .collect();

        let start = tokio::time::Instant::now();
        let mut seen = Vec::new();
        let (out, _) = pipeline
            .run_with(leads, |outcome| {
                seen.push((outcome.lead().email.clone(), tokio::time::Instant::now()));
            })
            .await;

        assert_eq!(out.len(), 4);
        assert!(start.elapsed() >= Duration::from_millis(4 * 250));
        // the next record only starts after the previous record's pause
        for pair in seen.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_millis(250));
        }
    }

    #[tokio::test]
    async fn test_run_with_reports_each_outcome_in_order() {
        let client = ScriptedCompletion::new()
            .fail_when("email=b@example.com", "timed out")
            .reply_when("expert sales analyst", "priority: 2")
            .otherwise("persona: Ops Lead");
        let mut pipeline = Pipeline::new(client, RecordingMailer::new(), &config(3));
        let leads = vec![
            Lead::new("A", "One", "a@example.com"),
            Lead::new("B", "Two", "b@example.com"),
        ];

        let mut seen = Vec::new();
        pipeline
            .run_with(leads, |outcome| {
                seen.push((outcome.lead().email.clone(), outcome.is_failed()));
            })
            .await;

        assert_eq!(
            seen,
            vec![
                ("a@example.com".to_string(), false),
                ("b@example.com".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_same_seed_same_replies() {
        let mut statuses = Vec::new();
        for _ in 0..2 {
            let client = ScriptedCompletion::new()
                .reply_when("Classify the following reply", "Maybe")
                .reply_when("You are the prospect", "Maybe next month.")
                .reply_when("expert sales analyst", "priority: 3")
                .otherwise("persona: Ops Lead");
            let mut pipeline = Pipeline::new(client, RecordingMailer::new(), &config(1234));
            let leads = (0..20)
                .map(|i| Lead::new("N", "M", &format!("n{i}@example.com")))
                .collect();
            let (out, _) = pipeline.run(leads).await;
            statuses.push(out.into_iter().map(|l| l.status).collect::<Vec<_>>());
        }
        assert_eq!(statuses[0], statuses[1]);
    }
}
