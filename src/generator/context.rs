//! Prompt and fill-data construction.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::document::{GenerationRequest, TemplateData, TenderContext};
use crate::template::{value_to_text, SectionSpec, StyleGuide};

/// Request keys that steer the pipeline rather than describe content.
const CONTROL_KEYS: &[&str] = &["generator_type"];

/// Shared context block for AI section prompts.
pub fn generation_context(request: &GenerationRequest, tender: Option<&TenderContext>) -> String {
    let mut lines = vec![
        format!("Title: {}", request.title),
        format!("Document type: {}", request.document_type),
    ];

    if let Some(tender) = tender {
        lines.push(format!("Tender: {}", tender.title.as_deref().unwrap_or("Untitled")));
        lines.push(format!(
            "Contracting authority: {}",
            tender.organization_name.as_deref().unwrap_or("Unknown")
        ));
        lines.push(format!(
            "Budget: {} {}",
            tender.value_text().unwrap_or_else(|| "Unknown".to_string()),
            tender.currency_or_default()
        ));

        if let Some(description) = tender.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("Tender description: {description}"));
        }
    }

    let requirements: Vec<_> = request
        .content_requirements
        .iter()
        .filter(|(key, _)| !CONTROL_KEYS.contains(&key.as_str()))
        .collect();
    if !requirements.is_empty() {
        lines.push("Content requirements:".to_string());
        for (key, value) in requirements {
            lines.push(format!("- {key}: {}", value_to_text(value)));
        }
    }

    lines.join("\n")
}

/// Prompt for one AI-written section.
pub fn section_prompt(context: &str, section: &SectionSpec, style: &StyleGuide) -> String {
    format!(
        "{context}\n\n{} section ({}):\n[Tone: {}, Formality: {}, Technical level: {}]\n\n",
        section.name, section.description, style.tone, style.formality, style.technical_level
    )
}

/// Lighter context block for hybrid enhancement prompts.
pub fn enhance_context(request: &GenerationRequest, tender: Option<&TenderContext>) -> String {
    let mut ctx = format!("Title: {}\nDocument type: {}\n", request.title, request.document_type);

    if let Some(tender) = tender {
        ctx.push_str(&format!("Tender: {}\n", tender.title.as_deref().unwrap_or_default()));
        ctx.push_str(&format!(
            "Contracting authority: {}\n",
            tender.organization_name.as_deref().unwrap_or_default()
        ));
        ctx.push_str(&format!(
            "Description: {}\n",
            tender.description.as_deref().unwrap_or_default()
        ));
    }

    ctx
}

/// Prompt asking the model to elaborate an existing section.
pub fn enhance_prompt(context: &str, section_name: &str, content: &str) -> String {
    format!(
        "{context}\nSection: {section_name}\nExisting content: {content}\n\n\
         Rewrite the existing content above so it is more detailed and persuasive."
    )
}

/// Fill data for template expansion.
///
/// Request fields, tender fields (when present), the generation date and
/// time, and `content_requirements` as one nested value.
pub fn template_data(
    request: &GenerationRequest,
    tender: Option<&TenderContext>,
    now: DateTime<Local>,
) -> TemplateData {
    let mut data = TemplateData::new();
    data.insert("title".to_string(), Value::String(request.title.clone()));
    data.insert(
        "document_type".to_string(),
        Value::String(request.document_type.as_str().to_string()),
    );
    data.insert("generation_date".to_string(), Value::String(now.format("%Y-%m-%d").to_string()));
    data.insert("generation_time".to_string(), Value::String(now.format("%H:%M:%S").to_string()));

    if let Some(tender) = tender {
        data.extend(tender.to_template_data());
    }

    if !request.content_requirements.is_empty() {
        data.insert(
            "content_requirements".to_string(),
            Value::Object(request.content_requirements.clone()),
        );
    }

    data
}
