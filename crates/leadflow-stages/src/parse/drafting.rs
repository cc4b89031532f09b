//! Parser for the drafting reply (`Subject: ...` / `Body: ...`).

use super::{fallback, FieldDefault};

pub const DEFAULTS: &[FieldDefault] = &[
    FieldDefault {
        field: "email_subject",
        fallback: "Quick note for {first_name}",
    },
    FieldDefault {
        field: "email_body",
        fallback: "Hi {first_name},\n\n\
                   I'd love to share how we help teams like yours move faster. \
                   Would you be open to a quick 15-minute call this week?\n\n\
                   Best regards",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDraft {
    pub subject: String,
    pub body: String,
}

/// Split on the first `Subject:` and then the first `Body:`. Without a
/// `Subject:` marker the whole reply is the body. Empty pieces are replaced
/// from `DEFAULTS`, so the body is never empty.
pub fn parse(text: &str, first_name: &str) -> ParsedDraft {
    let (subject, body) = match text.split_once("Subject:") {
        Some((_, rest)) => match rest.split_once("Body:") {
            Some((subject, body)) => (subject.trim(), body.trim()),
            None => (rest.trim(), ""),
        },
        None => ("", text.trim()),
    };

    let subject = if subject.is_empty() {
        fallback(DEFAULTS, "email_subject").replace("{first_name}", first_name)
    } else {
        subject.to_string()
    };

    let body = if body.is_empty() {
        let greeting = if first_name.trim().is_empty() {
            "there"
        } else {
            first_name
        };
        fallback(DEFAULTS, "email_body").replace("{first_name}", greeting)
    } else {
        body.to_string()
    };

    ParsedDraft { subject, body }
}
