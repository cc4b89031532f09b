//! Completion client for the hosted LLM backends (Groq/OpenAI/Anthropic).
//!
//! Pipeline stages only see the `CompletionClient` trait: a prompt and a
//! token budget in, generated text out. `HttpCompletionClient` talks to the
//! provider APIs; `ScriptedCompletion` answers from canned rules in tests.

pub mod client;
pub mod config;
pub mod providers;
pub mod scripted;
pub mod types;

pub use client::{CompletionClient, HttpCompletionClient};
pub use config::LLMConfig;
pub use scripted::{RecordedCall, ScriptedCompletion};
pub use types::*;
