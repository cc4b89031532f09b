//! Parser for the scoring reply (`priority:` / `reason:` lines).

use leadflow_core::{non_blank, Priority};

use super::FieldDefault;

pub const DEFAULTS: &[FieldDefault] = &[
    FieldDefault {
        field: "priority",
        fallback: "3",
    },
    FieldDefault {
        field: "priority_reason",
        fallback: "",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScore {
    pub priority: Priority,
    pub reason: Option<String>,
}

/// Lines are matched case-insensitively on their leading word. A `priority`
/// line keeps only its digits; a result outside 1..=5 (or no digits at all)
/// means the default priority. The last matching line of each kind wins.
pub fn parse(text: &str) -> ParsedScore {
    let mut priority = Priority::DEFAULT;
    let mut reason = None;

    for line in text.lines() {
        let lowered = line.trim_start().to_ascii_lowercase();
        if lowered.starts_with("priority") {
            priority = digits_priority(line).unwrap_or(Priority::DEFAULT);
        }
        if lowered.starts_with("reason") {
            if let Some((_, r)) = line.split_once(':') {
                reason = non_blank(r);
            }
        }
    }

    ParsedScore { priority, reason }
}

fn digits_priority(line: &str) -> Option<Priority> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u8>().ok().and_then(Priority::new)
}
