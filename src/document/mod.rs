//! Document data model.
//!
//! Everything here is created fresh for one generation request and handed
//! back to the caller; nothing is mutated after it is returned.
//!
//! - [`GenerationRequest`] - what the caller wants generated
//! - [`TenderContext`] - optional procurement record merged into prompts and fill data
//! - [`GeneratedDocument`] - the assembled result with per-section and aggregate metadata

mod generated;
mod request;
mod tender;

pub use generated::{
    count_words, DocumentMetadata, GeneratedDocument, GeneratedSection, GenerationParameters,
};
pub use request::{DocumentType, GenerationError, GenerationRequest, DEFAULT_MAX_TOKENS};
pub use tender::{TenderContext, DEFAULT_CURRENCY};

/// Flat key/value data used for template fill and content hints.
pub type TemplateData = serde_json::Map<String, serde_json::Value>;
