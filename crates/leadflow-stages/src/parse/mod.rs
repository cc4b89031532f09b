//! Best-effort parsers for model output, one per stage.
//!
//! Every parser is total: any input text yields a value. Fields the model
//! did not provide come from the stage's `DEFAULTS` table.

pub mod classification;
pub mod drafting;
pub mod enrichment;
pub mod scoring;

use std::collections::BTreeMap;

/// Fallback value for a field the model output did not supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefault {
    pub field: &'static str,
    pub fallback: &'static str,
}

/// Look up the fallback for `field` in a defaults table.
pub fn fallback(table: &[FieldDefault], field: &str) -> &'static str {
    table
        .iter()
        .find(|d| d.field == field)
        .map(|d| d.fallback)
        .unwrap_or("")
}

/// Collect `key: value` lines. Keys are trimmed and lowercased; the value is
/// everything after the first colon, trimmed. Later lines win.
pub fn key_values(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_values() {
        let parsed = key_values("Company: Acme\nnoise without colon\nurl: https://acme.io\n");
        assert_eq!(parsed.get("company").map(String::as_str), Some("Acme"));
        assert_eq!(parsed.get("url").map(String::as_str), Some("https://acme.io"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_fallback_lookup() {
        const TABLE: &[FieldDefault] = &[FieldDefault {
            field: "persona",
            fallback: "Unknown",
        }];
        assert_eq!(fallback(TABLE, "persona"), "Unknown");
        assert_eq!(fallback(TABLE, "other"), "");
    }
}
