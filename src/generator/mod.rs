//! Document generation pipeline.
//!
//! Three generators share one contract, [`DocumentGenerator`]:
//!
//! - [`AiGenerator`] - one completion per section, template used for structure only
//! - [`TemplateGenerator`] - template bodies expanded with request and tender data
//! - [`HybridGenerator`] - template first, then AI elaboration of thin sections
//!
//! [`create_generator`] picks one from a [`GeneratorKind`]. Every generator
//! returns a best-effort document; only an invalid request is an error.

mod budget;
mod context;
mod hybrid;
mod template;
mod transformer;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

pub use budget::{allocate, allocate_capped, MAX_SECTION_TOKENS};
pub use context::{
    enhance_context, enhance_prompt, generation_context, section_prompt, template_data,
};
pub use hybrid::HybridGenerator;
pub use template::TemplateGenerator;
pub use transformer::AiGenerator;

pub use crate::document::GenerationError;
use crate::ai::CompletionProvider;
use crate::core::GenerationConfig;
use crate::document::{GeneratedDocument, GenerationRequest, TenderContext};
use crate::template::{SectionSpec, TemplateStore};

/// Trait for document generators.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Generate a document for `request`, optionally grounded in a tender.
    async fn generate(
        &self,
        request: &GenerationRequest,
        tender: Option<&TenderContext>,
    ) -> Result<GeneratedDocument, GenerationError>;

    /// Which variant this is.
    fn kind(&self) -> GeneratorKind;
}

/// Generator variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Every section written by the language model
    Transformer,
    /// Template expansion only
    Template,
    /// Template expansion plus AI elaboration
    Hybrid,
}

impl GeneratorKind {
    /// Map a key to a generator. Unknown keys fall back to hybrid.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "transformer" => Self::Transformer,
            "template" => Self::Template,
            "hybrid" => Self::Hybrid,
            other => {
                tracing::warn!(generator = other, "Unknown generator type, using hybrid");
                Self::Hybrid
            }
        }
    }

    /// Choose a generator: explicit key, then the request's
    /// `generator_type` hint, then the configured default.
    pub fn select(explicit: Option<&str>, request: &GenerationRequest, default: &str) -> Self {
        Self::from_key(explicit.or_else(|| request.generator_hint()).unwrap_or(default))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transformer => "transformer",
            Self::Template => "template",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables shared by the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Cap on one section's token allocation
    pub max_section_tokens: u32,
    /// Hybrid leaves sections with more words than this alone
    pub enhance_word_threshold: usize,
    /// Token budget for one hybrid enhancement
    pub enhance_max_tokens: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_section_tokens: MAX_SECTION_TOKENS,
            enhance_word_threshold: 20,
            enhance_max_tokens: 500,
        }
    }
}

impl From<&GenerationConfig> for GeneratorOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_section_tokens: config.max_section_tokens,
            enhance_word_threshold: config.enhance_word_threshold,
            enhance_max_tokens: config.enhance_max_tokens,
        }
    }
}

/// Build a generator of the given kind.
pub fn create_generator(
    kind: GeneratorKind,
    store: Arc<TemplateStore>,
    completion: Arc<dyn CompletionProvider>,
    options: GeneratorOptions,
) -> Box<dyn DocumentGenerator> {
    match kind {
        GeneratorKind::Transformer => Box::new(AiGenerator::new(store, completion, options)),
        GeneratorKind::Template => Box::new(TemplateGenerator::new(store)),
        GeneratorKind::Hybrid => Box::new(HybridGenerator::new(store, completion, options)),
    }
}

/// Apply `include` then `exclude` to a section list, keeping template order.
///
/// Empty lists are treated as absent. A name in both lists is excluded.
pub fn select_sections<'a>(
    sections: &'a [SectionSpec],
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Vec<&'a SectionSpec> {
    let include = include.filter(|names| !names.is_empty());
    let exclude = exclude.filter(|names| !names.is_empty());

    sections
        .iter()
        .filter(|s| include.map_or(true, |names| names.contains(&s.name)))
        .filter(|s| exclude.map_or(true, |names| !names.contains(&s.name)))
        .collect()
}
