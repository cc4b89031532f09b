//! Prompt templates for each stage and the campaign report.
//!
//! Placeholders are `{name}` and are filled in a single pass, so braces
//! inside lead values are copied as-is. The reply formats requested here are
//! exactly what the parsers in `crate::parse` understand.

use leadflow_core::Lead;

const ENRICH: &str = "\
You are a helpful assistant that enriches a sales lead.
Known fields: first_name={first_name}, last_name={last_name}, email={email}, \
company={company}, title={title}, industry={industry}, location={location}.
Fill any missing fields (company, title, industry, location) with short plausible values, \
then suggest a concise buyer persona label (one or two words) and a 1-2 sentence persona description.
Return one field per line in the format:
company: ...
title: ...
industry: ...
location: ...
persona: ...
persona_desc: ...
";

const SCORE: &str = "\
You are an expert sales analyst. Given this lead, provide a numeric priority from 1 to 5 \
(5 is highest) and one short reason.
Lead: first_name={first_name}, last_name={last_name}, company={company}, title={title}, \
industry={industry}, persona={persona}.
Return exactly:
priority: <1-5>
reason: <one sentence>";

const DRAFT: &str = "\
Write a short, personalized outreach email (subject and body) in a friendly, professional tone. \
Keep the body under 100 words.
Lead: {first_name} {last_name}, title={title}, company={company}, persona={persona}.
Include a single short sentence with a clear call-to-action.
Return exactly as:
Subject: <subject line>

Body: <email body>";

const REPLY: &str = "\
You are the prospect receiving this email. Write a short reply (1-3 sentences) with a realistic \
reaction: interested, maybe later, or not interested.
Email subject: {subject}
Email body: {body}
Persona: {persona}
";

const CLASSIFY: &str = "\
Classify the following reply into one of: Interested, Maybe, Not Interested. \
Return only the label.
Reply: {reply}
";

const INSIGHTS: &str = "\
You are a smart sales analyst. Given the campaign summary below, write a short markdown report \
(3-6 paragraphs) with insights, suggestions to improve outreach, and 3 quick action items.

{summary}";

/// Value shown to the model for an absent field.
const BLANK: &str = "None";

fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(BLANK)
}

/// Fill `{name}` placeholders from `vars`. Substituted text is not scanned
/// again; unknown placeholders are left as written.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| vars.iter().find(|(name, _)| *name == &after[..close]))
            .map(|(name, value)| (name.len(), *value));
        match value {
            Some((len, value)) => {
                out.push_str(value);
                rest = &after[len + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn enrichment(lead: &Lead) -> String {
    render(
        ENRICH,
        &[
            ("first_name", lead.first_name.as_str()),
            ("last_name", lead.last_name.as_str()),
            ("email", lead.email.as_str()),
            ("company", or_blank(&lead.company)),
            ("title", or_blank(&lead.title)),
            ("industry", or_blank(&lead.industry)),
            ("location", or_blank(&lead.location)),
        ],
    )
}

pub fn scoring(lead: &Lead) -> String {
    render(
        SCORE,
        &[
            ("first_name", lead.first_name.as_str()),
            ("last_name", lead.last_name.as_str()),
            ("company", or_blank(&lead.company)),
            ("title", or_blank(&lead.title)),
            ("industry", or_blank(&lead.industry)),
            ("persona", or_blank(&lead.persona)),
        ],
    )
}

pub fn drafting(lead: &Lead) -> String {
    render(
        DRAFT,
        &[
            ("first_name", lead.first_name.as_str()),
            ("last_name", lead.last_name.as_str()),
            ("title", or_blank(&lead.title)),
            ("company", or_blank(&lead.company)),
            ("persona", or_blank(&lead.persona)),
        ],
    )
}

pub fn reply(lead: &Lead) -> String {
    render(
        REPLY,
        &[
            ("subject", or_blank(&lead.email_subject)),
            ("body", or_blank(&lead.email_body)),
            ("persona", or_blank(&lead.persona)),
        ],
    )
}

pub fn classification(reply: &str) -> String {
    render(CLASSIFY, &[("reply", reply)])
}

pub fn insights(summary: &str) -> String {
    render(INSIGHTS, &[("summary", summary)])
}
