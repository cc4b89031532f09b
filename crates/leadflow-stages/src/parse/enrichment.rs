//! Parser for the enrichment reply (`key: value` lines).

use leadflow_core::non_blank;

use super::{fallback, key_values, FieldDefault};

pub const DEFAULTS: &[FieldDefault] = &[
    FieldDefault {
        field: "persona",
        fallback: "Unknown",
    },
    FieldDefault {
        field: "persona_desc",
        fallback: "",
    },
];

/// Values proposed by the model. Profile fields are `None` when the model
/// left them out or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnrichment {
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub persona: String,
    pub persona_desc: Option<String>,
}

pub fn parse(text: &str) -> ParsedEnrichment {
    let fields = key_values(text);
    let get = |key: &str| fields.get(key).and_then(|v| non_blank(v));

    ParsedEnrichment {
        company: get("company"),
        title: get("title"),
        industry: get("industry"),
        location: get("location"),
        persona: get("persona").unwrap_or_else(|| fallback(DEFAULTS, "persona").to_string()),
        persona_desc: get("persona_desc").or_else(|| non_blank(fallback(DEFAULTS, "persona_desc"))),
    }
}
