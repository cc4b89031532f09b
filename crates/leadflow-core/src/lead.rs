//! Lead record and the typed values it carries through the pipeline.
//!
//! Optional attributes are `Option`s: a blank cell in the input table loads
//! as `None`, and `None` is written back as an empty cell. Non-blank cells
//! load verbatim.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["first_name", "last_name", "email"];

/// Columns the pipeline populates, in the order they are appended to the
/// output table when the input lacks them.
pub const OUTPUT_COLUMNS: [&str; 13] = [
    "company",
    "title",
    "industry",
    "location",
    "persona",
    "persona_desc",
    "priority",
    "priority_reason",
    "email_subject",
    "email_body",
    "status",
    "response_text",
    "response_category",
];

/// Trimmed copy of `value`, or `None` when it is blank.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Untouched copy of a table cell, or `None` when it is blank.
fn cell(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

// ---------------------------------------------------------------
// Priority
// ---------------------------------------------------------------

/// Lead priority, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Used whenever a score cannot be read.
    pub const DEFAULT: Priority = Priority(3);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Parse a table cell. Anything that is not an integer in range is `None`.
    pub fn parse(cell: &str) -> Option<Self> {
        cell.trim().parse::<u8>().ok().and_then(Self::new)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("priority out of range: {value}"))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------
// Status
// ---------------------------------------------------------------

/// Terminal status of a lead. Last writer wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Sent,
    SendError(String),
    Error(String),
    NoResponse,
    Replied,
}

impl LeadStatus {
    /// Whether the outreach email was handed off successfully.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Sent | Self::NoResponse | Self::Replied)
    }

    pub fn is_send_error(&self) -> bool {
        matches!(self, Self::SendError(_))
    }

    /// Parse the rendered form back. Unrecognised text is `None`.
    pub fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        match cell {
            "sent" => Some(Self::Sent),
            "no_response" => Some(Self::NoResponse),
            "replied" => Some(Self::Replied),
            _ => {
                if let Some(detail) = cell.strip_prefix("send_error:") {
                    Some(Self::SendError(detail.trim().to_string()))
                } else {
                    cell.strip_prefix("error:")
                        .map(|detail| Self::Error(detail.trim().to_string()))
                }
            }
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::SendError(detail) => write!(f, "send_error: {detail}"),
            Self::Error(detail) => write!(f, "error: {detail}"),
            Self::NoResponse => write!(f, "no_response"),
            Self::Replied => write!(f, "replied"),
        }
    }
}

// ---------------------------------------------------------------
// Response category
// ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCategory {
    Interested,
    Maybe,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "No Response")]
    NoResponse,
}

impl ResponseCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Interested => "Interested",
            Self::Maybe => "Maybe",
            Self::NotInterested => "Not Interested",
            Self::NoResponse => "No Response",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "interested" => Some(Self::Interested),
            "maybe" => Some(Self::Maybe),
            "not interested" => Some(Self::NotInterested),
            "no response" => Some(Self::NoResponse),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------
// Lead
// ---------------------------------------------------------------

/// One sales lead, created from an input row and written back as one output row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub persona: Option<String>,
    pub persona_desc: Option<String>,
    pub priority: Option<Priority>,
    pub priority_reason: Option<String>,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    pub status: Option<LeadStatus>,
    pub response_text: Option<String>,
    pub response_category: Option<ResponseCategory>,
    /// Input columns the pipeline does not know about, passed through verbatim.
    pub extra: BTreeMap<String, String>,
    /// Input text of typed columns (`priority`, `status`,
    /// `response_category`) that did not parse. Written back until a stage
    /// sets the typed field.
    pub unparsed: BTreeMap<String, String>,
}

impl Lead {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Builder-style `set`, handy when assembling records by hand.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.set(column, value);
        self
    }

    /// Rendered value of a column, `None` when absent.
    pub fn get(&self, column: &str) -> Option<String> {
        match column {
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            "email" => Some(self.email.clone()),
            "company" => self.company.clone(),
            "title" => self.title.clone(),
            "industry" => self.industry.clone(),
            "location" => self.location.clone(),
            "persona" => self.persona.clone(),
            "persona_desc" => self.persona_desc.clone(),
            "priority" => self
                .priority
                .map(|p| p.to_string())
                .or_else(|| self.unparsed_cell(column)),
            "priority_reason" => self.priority_reason.clone(),
            "email_subject" => self.email_subject.clone(),
            "email_body" => self.email_body.clone(),
            "status" => self
                .status
                .as_ref()
                .map(|s| s.to_string())
                .or_else(|| self.unparsed_cell(column)),
            "response_text" => self.response_text.clone(),
            "response_category" => self
                .response_category
                .map(|c| c.label().to_string())
                .or_else(|| self.unparsed_cell(column)),
            other => self.extra.get(other).cloned(),
        }
    }

    fn unparsed_cell(&self, column: &str) -> Option<String> {
        self.unparsed.get(column).cloned()
    }

    /// Set a column from a table cell. Blank cells clear optional fields and
    /// other cells are kept as written. A typed cell that does not parse
    /// leaves the field absent and its text in `unparsed`.
    pub fn set(&mut self, column: &str, value: &str) {
        match column {
            "first_name" => self.first_name = value.to_string(),
            "last_name" => self.last_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "company" => self.company = cell(value),
            "title" => self.title = cell(value),
            "industry" => self.industry = cell(value),
            "location" => self.location = cell(value),
            "persona" => self.persona = cell(value),
            "persona_desc" => self.persona_desc = cell(value),
            "priority" => {
                self.priority = Priority::parse(value);
                self.keep_unparsed(column, value, self.priority.is_some());
            }
            "priority_reason" => self.priority_reason = cell(value),
            "email_subject" => self.email_subject = cell(value),
            "email_body" => self.email_body = cell(value),
            "status" => {
                self.status = LeadStatus::parse(value);
                self.keep_unparsed(column, value, self.status.is_some());
            }
            "response_text" => self.response_text = cell(value),
            "response_category" => {
                self.response_category = ResponseCategory::from_label(value);
                self.keep_unparsed(column, value, self.response_category.is_some());
            }
            other => {
                self.extra.insert(other.to_string(), value.to_string());
            }
        }
    }

    fn keep_unparsed(&mut self, column: &str, value: &str, parsed: bool) {
        match cell(value) {
            Some(raw) if !parsed => {
                self.unparsed.insert(column.to_string(), raw);
            }
            _ => {
                self.unparsed.remove(column);
            }
        }
    }
}

/// Store `value` in `slot` only when `slot` is empty. Returns whether it was filled.
pub fn fill_blank(slot: &mut Option<String>, value: Option<String>) -> bool {
    if slot.is_some() {
        return false;
    }
    match value.as_deref().and_then(non_blank) {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}
