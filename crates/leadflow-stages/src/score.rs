//! Scoring: priority 1-5 with a one-sentence reason.

use leadflow_core::{Lead, Priority, Result};
use leadflow_llm::CompletionClient;

use crate::parse::scoring;
use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub priority: Priority,
    pub reason: Option<String>,
}

impl Score {
    pub fn apply(self, lead: &mut Lead) {
        lead.priority = Some(self.priority);
        lead.priority_reason = self.reason;
    }
}

pub async fn score<C: CompletionClient>(client: &C, lead: &Lead, max_tokens: usize) -> Result<Score> {
    let reply = client.generate(&prompts::scoring(lead), max_tokens).await?;
    let parsed = scoring::parse(&reply);
    Ok(Score {
        priority: parsed.priority,
        reason: parsed.reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_llm::ScriptedCompletion;

    #[tokio::test]
    async fn test_score_applies_priority_and_reason() {
        let client = ScriptedCompletion::new().otherwise("priority: 5\nreason: Budget owner.");
        let mut lead = Lead::new("Ada", "Lovelace", "ada@example.com").with("persona", "Data Leader");

        score(&client, &lead, 128).await.unwrap().apply(&mut lead);

        assert_eq!(lead.priority, Priority::new(5));
        assert_eq!(lead.priority_reason.as_deref(), Some("Budget owner."));
        assert!(client.calls()[0].prompt.contains("persona=Data Leader"));
    }

    #[tokio::test]
    async fn test_malformed_reply_scores_three() {
        let client = ScriptedCompletion::new().otherwise("This lead looks promising!");
        let mut lead = Lead::new("Ada", "Lovelace", "ada@example.com");
        score(&client, &lead, 128).await.unwrap().apply(&mut lead);
        assert_eq!(lead.priority, Some(Priority::DEFAULT));
        assert_eq!(lead.priority_reason, None);
    }
}
