//! Canned completion client for tests and offline runs.
//!
//! Replies are chosen by the first rule whose needle occurs in the prompt.

use leadflow_core::{Error, Result};
use parking_lot::Mutex;

use crate::client::CompletionClient;

/// A prompt seen by `ScriptedCompletion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub max_tokens: usize,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    reply: Reply,
}

/// Completion client that answers from substring rules.
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    rules: Vec<Rule>,
    fallback: Option<Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` to prompts containing `needle`.
    pub fn reply_when(mut self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Reply::Text(text.into()),
        });
        self
    }

    /// Fail prompts containing `needle` with `Error::Completion(message)`.
    pub fn fail_when(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Reply::Fail(message.into()),
        });
        self
    }

    /// Reply used when no rule matches. Without one, unmatched prompts fail.
    pub fn otherwise(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(Reply::Text(text.into()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn answer(&self, prompt: &str) -> Result<String> {
        let reply = self
            .rules
            .iter()
            .find(|rule| prompt.contains(&rule.needle))
            .map(|rule| &rule.reply)
            .or(self.fallback.as_ref());

        match reply {
            Some(Reply::Text(text)) => Ok(text.trim().to_string()),
            Some(Reply::Fail(message)) => Err(Error::Completion(message.clone())),
            None => Err(Error::Completion("no scripted reply for prompt".into())),
        }
    }
}

impl CompletionClient for ScriptedCompletion {
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            prompt: prompt.to_string(),
            max_tokens,
        });
        self.answer(prompt)
    }
}
