//! Template-first generator with AI elaboration.
//!
//! The template document is produced first. Sections that come out thin are
//! offered to the language model for a longer rewrite. A rewrite is only
//! accepted when it does not lose words, and a failed call leaves the
//! template text in place.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    enhance_context, enhance_prompt, DocumentGenerator, GenerationError, GeneratorKind,
    GeneratorOptions, TemplateGenerator,
};
use crate::ai::{strip_prompt, CompletionProvider};
use crate::document::{
    count_words, GeneratedDocument, GeneratedSection, GenerationRequest, TenderContext,
};
use crate::template::TemplateStore;

pub struct HybridGenerator {
    template: TemplateGenerator,
    completion: Arc<dyn CompletionProvider>,
    options: GeneratorOptions,
}

impl HybridGenerator {
    pub fn new(
        store: Arc<TemplateStore>,
        completion: Arc<dyn CompletionProvider>,
        options: GeneratorOptions,
    ) -> Self {
        Self { template: TemplateGenerator::new(store), completion, options }
    }

    async fn enhance(&self, section: &mut GeneratedSection, context: &str) {
        let original_words = section.word_count();
        if original_words > self.options.enhance_word_threshold {
            tracing::debug!(
                section = %section.name,
                words = original_words,
                "Section long enough, not enhancing"
            );
            return;
        }

        let prompt = enhance_prompt(context, &section.name, &section.content);
        let raw = match self.completion.complete(&prompt, self.options.enhance_max_tokens).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(section = %section.name, error = %e, "Section enhancement failed");
                return;
            }
        };

        let enhanced = strip_prompt(&raw, &prompt);
        let enhanced_words = count_words(enhanced);
        if enhanced.is_empty() || enhanced_words < original_words {
            tracing::warn!(
                section = %section.name,
                original_words,
                enhanced_words,
                "Discarding enhancement shorter than template text"
            );
            return;
        }

        section.content = enhanced.to_string();
        section.is_ai_enhanced = true;
    }
}

#[async_trait]
impl DocumentGenerator for HybridGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        tender: Option<&TenderContext>,
    ) -> Result<GeneratedDocument, GenerationError> {
        let mut document = self.template.render(request, tender)?;
        let context = enhance_context(request, tender);

        tracing::info!(
            sections = document.sections.len(),
            provider = self.completion.name(),
            "Enhancing template document"
        );

        for section in &mut document.sections {
            self.enhance(section, &context).await;
        }

        document.refresh_metadata();
        document.is_hybrid_generated = true;
        Ok(document)
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Hybrid
    }
}
