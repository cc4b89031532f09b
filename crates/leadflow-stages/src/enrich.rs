//! Enrichment: fill blank profile fields and propose a persona.

use leadflow_core::{fill_blank, Lead, Result};
use leadflow_llm::CompletionClient;
use tracing::debug;

use crate::parse::enrichment::{self, ParsedEnrichment};
use crate::prompts;

/// Enrichment proposed for one lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment(pub ParsedEnrichment);

impl Enrichment {
    /// Fill blank profile fields and set the persona. Non-blank profile
    /// fields on the lead are never replaced.
    pub fn apply(self, lead: &mut Lead) {
        let parsed = self.0;
        let filled = [
            fill_blank(&mut lead.company, parsed.company),
            fill_blank(&mut lead.title, parsed.title),
            fill_blank(&mut lead.industry, parsed.industry),
            fill_blank(&mut lead.location, parsed.location),
        ]
        .iter()
        .filter(|f| **f)
        .count();
        debug!("Enrichment filled {} blank field(s) for {}", filled, lead.email);

        lead.persona = Some(parsed.persona);
        lead.persona_desc = parsed.persona_desc;
    }
}

pub async fn enrich<C: CompletionClient>(client: &C, lead: &Lead, max_tokens: usize) -> Result<Enrichment> {
    let reply = client.generate(&prompts::enrichment(lead), max_tokens).await?;
    Ok(Enrichment(enrichment::parse(&reply)))
}
