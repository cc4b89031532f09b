//! Parser for the reply-classification answer.

use leadflow_core::ResponseCategory;

use super::{fallback, FieldDefault};

pub const DEFAULTS: &[FieldDefault] = &[FieldDefault {
    field: "response_category",
    fallback: "Maybe",
}];

/// Classify from the first whitespace-delimited token of the first line,
/// ignoring case and surrounding punctuation. `Not ...` means
/// `Not Interested`; anything unrecognised falls back to `DEFAULTS`.
pub fn parse(text: &str) -> ResponseCategory {
    let token = text
        .trim()
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .map(|t| {
            t.trim_matches(|c: char| !c.is_ascii_alphabetic())
                .to_ascii_lowercase()
        })
        .unwrap_or_default();

    match token.as_str() {
        "interested" => ResponseCategory::Interested,
        "maybe" => ResponseCategory::Maybe,
        "not" | "uninterested" => ResponseCategory::NotInterested,
        _ => ResponseCategory::from_label(fallback(DEFAULTS, "response_category"))
            .unwrap_or(ResponseCategory::Maybe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_labels() {
        assert_eq!(parse("Interested"), ResponseCategory::Interested);
        assert_eq!(parse("Maybe"), ResponseCategory::Maybe);
        assert_eq!(parse("Not Interested"), ResponseCategory::NotInterested);
    }

    #[test]
    fn test_decorated_labels() {
        assert_eq!(parse("**Interested**\nThe prospect asked for a demo."), ResponseCategory::Interested);
        assert_eq!(parse("  maybe."), ResponseCategory::Maybe);
        assert_eq!(parse("NOT interested"), ResponseCategory::NotInterested);
    }

    #[test]
    fn test_unrecognised_falls_back_to_maybe() {
        assert_eq!(parse(""), ResponseCategory::Maybe);
        assert_eq!(parse("Positive"), ResponseCategory::Maybe);
        assert_eq!(parse("The reply is Interested"), ResponseCategory::Maybe);
    }
}
