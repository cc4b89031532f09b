//! Drafting: a short outreach email with a single call-to-action.

use leadflow_core::{Lead, Result};
use leadflow_llm::CompletionClient;

use crate::parse::drafting;
use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub subject: String,
    /// Never empty.
    pub body: String,
}

impl Draft {
    pub fn apply(self, lead: &mut Lead) {
        lead.email_subject = Some(self.subject);
        lead.email_body = Some(self.body);
    }
}

pub async fn draft<C: CompletionClient>(client: &C, lead: &Lead, max_tokens: usize) -> Result<Draft> {
    let reply = client.generate(&prompts::drafting(lead), max_tokens).await?;
    let parsed = drafting::parse(&reply, &lead.first_name);
    Ok(Draft {
        subject: parsed.subject,
        body: parsed.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_llm::ScriptedCompletion;

    #[tokio::test]
    async fn test_draft_from_formatted_reply() {
        let client = ScriptedCompletion::new()
            .otherwise("Subject: Ship faster, Ada\n\nBody: Hi Ada, can we talk Thursday?");
        let mut lead = Lead::new("Ada", "Lovelace", "ada@example.com");
        draft(&client, &lead, 128).await.unwrap().apply(&mut lead);
        assert_eq!(lead.email_subject.as_deref(), Some("Ship faster, Ada"));
        assert_eq!(lead.email_body.as_deref(), Some("Hi Ada, can we talk Thursday?"));
    }

    #[tokio::test]
    async fn test_unmarked_reply_synthesizes_subject() {
        let client = ScriptedCompletion::new().otherwise("Hi Grace, quick question for you.");
        let mut lead = Lead::new("Grace", "Hopper", "grace@example.com");
        draft(&client, &lead, 128).await.unwrap().apply(&mut lead);
        assert_eq!(lead.email_subject.as_deref(), Some("Quick note for Grace"));
        assert_eq!(lead.email_body.as_deref(), Some("Hi Grace, quick question for you."));
    }

    #[tokio::test]
    async fn test_empty_reply_still_has_body() {
        let client = ScriptedCompletion::new().otherwise("");
        let mut lead = Lead::new("Grace", "Hopper", "grace@example.com");
        draft(&client, &lead, 128).await.unwrap().apply(&mut lead);
        assert!(lead.email_body.is_some_and(|b| !b.is_empty()));
    }
}
