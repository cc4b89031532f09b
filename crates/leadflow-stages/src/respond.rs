//! Response simulation: a priority-biased coin decides whether the
//! prospect "replies"; a simulated reply is then classified.

use leadflow_core::{Lead, LeadStatus, Priority, ResponseCategory, Result};
use leadflow_llm::CompletionClient;
use rand::Rng;
use tracing::debug;

use crate::parse::classification;
use crate::prompts;

/// Chance that a lead of the given priority gets a simulated reply.
pub fn reply_probability(priority: Priority) -> f64 {
    match priority.get() {
        4..=5 => 0.8,
        3 => 0.25,
        _ => 0.0,
    }
}

pub fn should_simulate<R: Rng + ?Sized>(priority: Priority, rng: &mut R) -> bool {
    rng.gen_bool(reply_probability(priority))
}

/// How the response stage resolved for one lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseResolution {
    /// Delivery failed; the `send_error` status stays.
    DeliveryFailed,
    NoResponse,
    Replied {
        text: String,
        category: ResponseCategory,
    },
}

impl ResponseResolution {
    pub fn apply(self, lead: &mut Lead) {
        match self {
            Self::DeliveryFailed => {
                lead.response_text = None;
                lead.response_category = Some(ResponseCategory::NoResponse);
            }
            Self::NoResponse => {
                lead.status = Some(LeadStatus::NoResponse);
                lead.response_text = None;
                lead.response_category = Some(ResponseCategory::NoResponse);
            }
            Self::Replied { text, category } => {
                lead.status = Some(LeadStatus::Replied);
                lead.response_text = Some(text);
                lead.response_category = Some(category);
            }
        }
    }
}

/// Resolve the response stage. A lead whose delivery failed never gets a
/// reply and no coin is flipped for it. Otherwise a reply is generated and
/// classified with two completion calls.
pub async fn simulate_response<C, R>(
    client: &C,
    lead: &Lead,
    rng: &mut R,
    max_tokens: usize,
) -> Result<ResponseResolution>
where
    C: CompletionClient,
    R: Rng + ?Sized,
{
    if lead.status.as_ref().is_some_and(LeadStatus::is_send_error) {
        return Ok(ResponseResolution::DeliveryFailed);
    }

    let priority = lead.priority.unwrap_or(Priority::DEFAULT);
    if !should_simulate(priority, rng) {
        return Ok(ResponseResolution::NoResponse);
    }

    let text = client.generate(&prompts::reply(lead), max_tokens).await?;
    let label = client
        .generate(&prompts::classification(&text), max_tokens)
        .await?;
    let category = classification::parse(&label);
    debug!("Simulated reply for {} classified as {}", lead.email, category);

    Ok(ResponseResolution::Replied { text, category })
}
