//! Generated document output.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::DocumentType;
use crate::template::StyleGuide;

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One section of a generated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSection {
    /// Section name from the template
    pub name: String,

    /// 1-based position within the filtered section list
    pub order: usize,

    /// Section body
    pub content: String,

    /// Whether the template marks this section as required
    pub required: bool,

    /// Section description from the template
    pub description: String,

    /// Content was written by a language model
    pub is_ai_generated: bool,

    /// Content was expanded from the template body
    #[serde(default, skip_serializing_if = "is_false")]
    pub template_based: bool,

    /// Seconds spent in the completion call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,

    /// Template content was replaced by an AI elaboration
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_ai_enhanced: bool,
}

impl GeneratedSection {
    /// Number of words in the section body.
    pub fn word_count(&self) -> usize {
        count_words(&self.content)
    }
}

/// Aggregate statistics over a document's sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub total_sections: usize,

    /// Sum of section content lengths in characters
    pub content_length: usize,

    /// Word count of all section contents joined by a single space
    pub content_words: usize,

    /// Sum of per-section generation times (AI generation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time_total: Option<f64>,
}

impl DocumentMetadata {
    /// Compute content statistics for a section list.
    pub fn from_sections(sections: &[GeneratedSection]) -> Self {
        let content_length = sections.iter().map(|s| s.content.chars().count()).sum();
        let joined = sections.iter().map(|s| s.content.as_str()).collect::<Vec<_>>().join(" ");

        Self {
            total_sections: sections.len(),
            content_length,
            content_words: count_words(&joined),
            generation_time_total: None,
        }
    }

    /// Also total the per-section generation times.
    pub fn with_timing(mut self, sections: &[GeneratedSection]) -> Self {
        let total: f64 = sections.iter().filter_map(|s| s.generation_time).sum();
        self.generation_time_total = Some((total * 100.0).round() / 100.0);
        self
    }
}

/// Parameters the AI generator used, echoed on the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub style: StyleGuide,
    pub max_tokens: u32,
}

/// A fully assembled document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub title: String,
    pub document_type: DocumentType,

    /// Template the structure came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,

    pub generated_at: DateTime<Local>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<GenerationParameters>,

    pub sections: Vec<GeneratedSection>,
    pub metadata: DocumentMetadata,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hybrid_generated: bool,
}

impl GeneratedDocument {
    /// Assemble a document and compute its metadata.
    pub fn new(
        title: impl Into<String>,
        document_type: DocumentType,
        sections: Vec<GeneratedSection>,
    ) -> Self {
        let metadata = DocumentMetadata::from_sections(&sections);
        Self {
            title: title.into(),
            document_type,
            template_id: None,
            generated_at: Local::now(),
            parameters: None,
            sections,
            metadata,
            is_hybrid_generated: false,
        }
    }

    /// Recompute content statistics after sections changed.
    /// Timing totals are left as they were.
    pub fn refresh_metadata(&mut self) {
        let timing = self.metadata.generation_time_total;
        self.metadata = DocumentMetadata::from_sections(&self.sections);
        self.metadata.generation_time_total = timing;
    }

    /// Find a section by name.
    pub fn section(&self, name: &str) -> Option<&GeneratedSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section bodies separated by blank lines.
    pub fn full_text(&self) -> String {
        self.sections.iter().map(|s| s.content.as_str()).collect::<Vec<_>>().join("\n\n")
    }

    /// Markdown rendering with one heading per section.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n", section.name));
            if !section.content.is_empty() {
                out.push_str(section.content.trim_end());
                out.push('\n');
            }
        }
        out
    }
}
