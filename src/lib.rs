#![allow(clippy::format_push_string)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::case_sensitive_file_extension_comparisons)]

//! # Tenderdoc
//!
//! Procurement document generation - proposals, technical specifications,
//! cost estimates and contracts assembled from templates and a language model.
//!
//! A [`GenerationRequest`] names a document type and optional template,
//! section filters, style and token budget. One of three generators turns it
//! into a [`GeneratedDocument`]:
//!
//! - **transformer**: every section written by a completion backend
//! - **template**: template bodies filled from request and tender data
//! - **hybrid**: template first, then thin sections elaborated by the model
//!
//! ## Quick Start
//!
//! ```bash
//! # Fill the built-in template, no model needed
//! tenderdoc generate --request request.json --generator template
//!
//! # Hybrid generation with a tender record, as Markdown
//! tenderdoc generate --request request.json --tender tender.json --format markdown
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::uninlined_format_args)]

pub mod ai;
pub mod core;
pub mod document;
pub mod generator;
pub mod template;

pub use ai::{CompletionError, CompletionManager, CompletionProvider};

#[cfg(feature = "ai")]
pub use ai::{ClaudeProvider, OllamaProvider, OpenAIProvider};

pub use document::{
    DocumentType, GeneratedDocument, GeneratedSection, GenerationError, GenerationRequest,
    TenderContext,
};
pub use generator::{create_generator, DocumentGenerator, GeneratorKind, GeneratorOptions};
pub use template::{Template, TemplateStore};

// Re-export commonly used types
pub use core::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "tenderdoc";
