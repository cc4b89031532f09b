//! Campaign report: aggregate counts plus a model-written narrative.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use leadflow_core::{Lead, LeadStatus, Result};
use leadflow_llm::CompletionClient;
use leadflow_stages::prompts;
use tracing::{info, warn};

const UNKNOWN_PERSONA: &str = "Unknown";

/// Aggregate over the finished record set.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSummary {
    pub total: usize,
    /// Records whose email was handed off (`sent`, `no_response`, `replied`).
    pub sent: usize,
    pub replied: usize,
    /// Mean over records that have a priority; 0.0 when none do.
    pub average_priority: f64,
    /// Persona counts, most frequent first, ties by label.
    pub personas: Vec<(String, usize)>,
}

impl CampaignSummary {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let sent = leads
            .iter()
            .filter(|l| l.status.as_ref().is_some_and(LeadStatus::is_delivered))
            .count();
        let replied = leads
            .iter()
            .filter(|l| l.status == Some(LeadStatus::Replied))
            .count();

        let priorities: Vec<f64> = leads
            .iter()
            .filter_map(|l| l.priority)
            .map(|p| f64::from(p.get()))
            .collect();
        let average_priority = if priorities.is_empty() {
            0.0
        } else {
            priorities.iter().sum::<f64>() / priorities.len() as f64
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for lead in leads {
            let persona = lead.persona.as_deref().unwrap_or(UNKNOWN_PERSONA);
            *counts.entry(persona).or_default() += 1;
        }
        let mut personas: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(p, n)| (p.to_string(), n))
            .collect();
        personas.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total: leads.len(),
            sent,
            replied,
            average_priority,
            personas,
        }
    }

    /// Fixed-format text block used both in the report and as model input.
    pub fn render(&self) -> String {
        let mut out = String::from("Campaign summary:\n\n");
        let _ = writeln!(out, "Total leads: {}", self.total);
        let _ = writeln!(out, "Sent: {}", self.sent);
        let _ = writeln!(out, "Replied: {}", self.replied);
        let _ = writeln!(out, "Average priority: {:.2}", self.average_priority);
        out.push_str("\nPersona breakdown:\n");
        for (persona, count) in &self.personas {
            let _ = writeln!(out, "- {persona}: {count}");
        }
        out
    }
}

/// Build the full markdown report. A failed narrative call leaves a notice
/// in its place instead of failing the report.
pub async fn generate_report<C: CompletionClient>(
    client: &C,
    leads: &[Lead],
    max_tokens: usize,
) -> String {
    let block = CampaignSummary::from_leads(leads).render();
    let narrative = match client.generate(&prompts::insights(&block), max_tokens).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Report narrative failed: {}", e);
            format!("insights unavailable: {e}")
        }
    };
    format!(
        "# Campaign Summary\n\n{}\n\n## AI Insights\n\n{}\n",
        block.trim_end(),
        narrative
    )
}

/// Generate the report and write it to `path`, creating the parent
/// directory if needed.
pub async fn write_report<C: CompletionClient>(
    client: &C,
    leads: &[Lead],
    max_tokens: usize,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let document = generate_report(client, leads, max_tokens).await;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, document).await?;
    info!("Wrote campaign report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::Priority;
    use leadflow_llm::ScriptedCompletion;

    fn lead(persona: Option<&str>, priority: Option<u8>, status: LeadStatus) -> Lead {
        let mut lead = Lead::new("A", "B", "a@example.com");
        lead.persona = persona.map(str::to_string);
        lead.priority = priority.and_then(Priority::new);
        lead.status = Some(status);
        lead
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead(Some("Founder"), Some(5), LeadStatus::Replied),
            lead(Some("Engineer"), Some(2), LeadStatus::NoResponse),
            lead(Some("Founder"), Some(4), LeadStatus::Sent),
            lead(None, None, LeadStatus::Error("timeout".into())),
            lead(Some("Engineer"), Some(3), LeadStatus::SendError("refused".into())),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = CampaignSummary::from_leads(&sample());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.sent, 3);
        assert_eq!(summary.replied, 1);
        assert!((summary.average_priority - 3.5).abs() < 1e-9);
        assert_eq!(
            summary.personas,
            vec![
                ("Engineer".to_string(), 2),
                ("Founder".to_string(), 2),
                ("Unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_empty_set() {
        let summary = CampaignSummary::from_leads(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_priority, 0.0);
        assert!(summary.render().contains("Average priority: 0.00\n"));
    }

    #[test]
    fn test_render_format() {
        let rendered = CampaignSummary::from_leads(&sample()).render();
        assert_eq!(
            rendered,
            "Campaign summary:\n\nTotal leads: 5\nSent: 3\nReplied: 1\nAverage priority: 3.50\n\n\
             Persona breakdown:\n- Engineer: 2\n- Founder: 2\n- Unknown: 1\n"
        );
    }

    #[tokio::test]
    async fn test_report_document() {
        let client = ScriptedCompletion::new().otherwise("Focus on founders.");
        let doc = generate_report(&client, &sample(), 256).await;

        assert!(doc.starts_with("# Campaign Summary\n\nCampaign summary:\n"));
        assert!(doc.contains("- Unknown: 1\n\n## AI Insights\n\nFocus on founders.\n"));
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, 256);
        assert!(calls[0].prompt.contains("Total leads: 5"));
    }

    #[tokio::test]
    async fn test_narrative_failure_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/summary.md");
        let client = ScriptedCompletion::new().fail_when("sales analyst", "API error 401: bad key");

        write_report(&client, &sample(), 256, &path).await.unwrap();

        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(doc.contains("Persona breakdown:"));
        assert!(doc.contains("## AI Insights\n\ninsights unavailable: Completion error: API error 401: bad key"));
    }
}
