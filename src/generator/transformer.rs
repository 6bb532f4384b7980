//! Language-model generator.
//!
//! Every selected section is written by one completion call. The template
//! only supplies section structure and style defaults.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::{
    allocate_capped, generation_context, section_prompt, select_sections, DocumentGenerator,
    GenerationError, GeneratorKind, GeneratorOptions,
};
use crate::ai::{strip_prompt, CompletionProvider};
use crate::document::{
    DocumentMetadata, GeneratedDocument, GeneratedSection, GenerationParameters,
    GenerationRequest, TenderContext,
};
use crate::template::TemplateStore;

/// Writes each section with a completion backend.
pub struct AiGenerator {
    store: Arc<TemplateStore>,
    completion: Arc<dyn CompletionProvider>,
    options: GeneratorOptions,
}

impl AiGenerator {
    pub fn new(
        store: Arc<TemplateStore>,
        completion: Arc<dyn CompletionProvider>,
        options: GeneratorOptions,
    ) -> Self {
        Self { store, completion, options }
    }
}

#[async_trait]
impl DocumentGenerator for AiGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        tender: Option<&TenderContext>,
    ) -> Result<GeneratedDocument, GenerationError> {
        request.validate()?;

        let template = self.store.resolve(request.document_type, request.template_id.as_deref());
        let context = generation_context(request, tender);
        let style = template.style_guide.resolve(&request.style_parameters);

        let selected = select_sections(
            &template.sections,
            request.include_sections.as_deref(),
            request.exclude_sections.as_deref(),
        );
        let budget =
            allocate_capped(request.max_tokens, selected.len(), self.options.max_section_tokens);

        tracing::info!(
            template = %template.id,
            sections = selected.len(),
            tokens_per_section = budget,
            provider = self.completion.name(),
            "Generating document with language model"
        );

        let mut sections = Vec::with_capacity(selected.len());
        for (idx, spec) in selected.iter().enumerate() {
            tracing::debug!(section = %spec.name, order = idx + 1, "Generating section");
            let prompt = section_prompt(&context, spec, &style);

            let start = Instant::now();
            let content = if budget == 0 {
                // Fewer tokens than sections leaves nothing to generate with
                tracing::debug!(section = %spec.name, "No token budget, leaving section empty");
                String::new()
            } else {
                match self.completion.complete(&prompt, budget).await {
                    Ok(raw) => strip_prompt(&raw, &prompt).to_string(),
                    Err(e) => {
                        tracing::error!(
                            section = %spec.name,
                            error = %e,
                            "Section generation failed"
                        );
                        format!("[Text generation error: {e}]")
                    }
                }
            };
            let elapsed = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;

            sections.push(GeneratedSection {
                name: spec.name.clone(),
                order: idx + 1,
                content,
                required: spec.required,
                description: spec.description.clone(),
                is_ai_generated: true,
                template_based: false,
                generation_time: Some(elapsed),
                is_ai_enhanced: false,
            });
        }

        let metadata = DocumentMetadata::from_sections(&sections).with_timing(&sections);
        let mut document = GeneratedDocument::new(&request.title, request.document_type, sections);
        document.template_id = Some(template.id.clone());
        document.parameters =
            Some(GenerationParameters { style, max_tokens: request.max_tokens });
        document.metadata = metadata;

        Ok(document)
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Transformer
    }
}
