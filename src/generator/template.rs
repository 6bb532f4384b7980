//! Template expansion generator.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;

use super::{select_sections, template_data, DocumentGenerator, GenerationError, GeneratorKind};
use crate::document::{GeneratedDocument, GeneratedSection, GenerationRequest, TenderContext};
use crate::template::{expand, TemplateStore};

/// Fills each section's body from request and tender data. No model calls.
pub struct TemplateGenerator {
    store: Arc<TemplateStore>,
}

impl TemplateGenerator {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    /// Expand the resolved template. Synchronous since nothing here waits.
    pub fn render(
        &self,
        request: &GenerationRequest,
        tender: Option<&TenderContext>,
    ) -> Result<GeneratedDocument, GenerationError> {
        request.validate()?;

        let template = self.store.resolve(request.document_type, request.template_id.as_deref());
        let data = template_data(request, tender, Local::now());

        let selected = select_sections(
            &template.sections,
            request.include_sections.as_deref(),
            request.exclude_sections.as_deref(),
        );

        tracing::info!(
            template = %template.id,
            sections = selected.len(),
            "Expanding document template"
        );

        let sections = selected
            .iter()
            .enumerate()
            .map(|(idx, spec)| GeneratedSection {
                name: spec.name.clone(),
                order: idx + 1,
                content: expand(spec.body.as_deref().unwrap_or_default(), &data),
                required: spec.required,
                description: spec.description.clone(),
                is_ai_generated: false,
                template_based: true,
                generation_time: None,
                is_ai_enhanced: false,
            })
            .collect();

        let title = expand(template.title_pattern(), &data);
        let title = if title.trim().is_empty() { request.title.clone() } else { title };

        let mut document = GeneratedDocument::new(title, request.document_type, sections);
        document.template_id = Some(template.id.clone());
        Ok(document)
    }
}

#[async_trait]
impl DocumentGenerator for TemplateGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        tender: Option<&TenderContext>,
    ) -> Result<GeneratedDocument, GenerationError> {
        self.render(request, tender)
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Template
    }
}
