//! Leadflow Stages: the four model-backed transforms applied to each lead.
//!
//! Each stage builds one prompt, calls the `CompletionClient`, parses the
//! reply best-effort and returns an update value that the orchestrator
//! applies to the lead. Malformed model output never fails a stage; only a
//! failed completion call does.

pub mod draft;
pub mod enrich;
pub mod parse;
pub mod prompts;
pub mod respond;
pub mod score;

pub use draft::{draft, Draft};
pub use enrich::{enrich, Enrichment};
pub use parse::FieldDefault;
pub use respond::{reply_probability, should_simulate, simulate_response, ResponseResolution};
pub use score::{score, Score};
