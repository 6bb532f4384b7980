//! Document templates.
//!
//! A template is an ordered list of sections for one document type. Section
//! bodies may contain `{{placeholders}}` and single-level `{if key}…{endif}`
//! blocks, filled by [`expand`].

mod builtin;
mod expand;
mod store;

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use builtin::{default_template, DEFAULT_TEMPLATE_ID};
pub use expand::{expand, has_nested_conditionals, is_truthy, value_to_text};
pub use store::TemplateStore;

use crate::document::{DocumentType, TemplateData};

/// Errors raised while loading template files.
///
/// These never reach generation callers: the store logs them and skips the
/// offending file.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Template '{template}' declares section '{section}' more than once")]
    DuplicateSection { template: String, section: String },

    #[error("Template '{template}' has a nested conditional in '{location}'")]
    NestedConditional { template: String, location: String },
}

/// Style defaults: tone, formality and technical level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleGuide {
    pub tone: String,
    pub formality: String,
    pub technical_level: String,
}

impl Default for StyleGuide {
    fn default() -> Self {
        Self {
            tone: "professional".to_string(),
            formality: "high".to_string(),
            technical_level: "medium".to_string(),
        }
    }
}

impl StyleGuide {
    /// Per-key resolution: request parameter, else this guide's value.
    pub fn resolve(&self, params: &TemplateData) -> Self {
        let pick = |key: &str, fallback: &str| {
            params
                .get(key)
                .map(value_to_text)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            tone: pick("tone", &self.tone),
            formality: pick("formality", &self.formality),
            technical_level: pick("technical_level", &self.technical_level),
        }
    }
}

/// One section declaration in a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: String,

    /// Literal body with placeholders, used by template expansion only
    #[serde(default, alias = "content", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl SectionSpec {
    pub fn new(name: impl Into<String>, required: bool, description: impl Into<String>) -> Self {
        Self { name: name.into(), required, description: description.into(), body: None }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A named, ordered section structure for one document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Identifier; file stem when the file does not declare one
    #[serde(default)]
    pub id: String,

    pub document_type: DocumentType,

    /// Title pattern, `{{title}}` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sections in output order
    #[serde(default, alias = "structure")]
    pub sections: Vec<SectionSpec>,

    #[serde(default)]
    pub style_guide: StyleGuide,
}

impl Template {
    /// Section names in declaration order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Title pattern to expand.
    pub fn title_pattern(&self) -> &str {
        self.title.as_deref().unwrap_or("{{title}}")
    }

    /// Check that section names are unique and bodies use only
    /// single-level conditionals.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.name.as_str()) {
                return Err(TemplateError::DuplicateSection {
                    template: self.id.clone(),
                    section: section.name.clone(),
                });
            }
        }

        let nested = |location: &str| TemplateError::NestedConditional {
            template: self.id.clone(),
            location: location.to_string(),
        };

        if has_nested_conditionals(self.title_pattern()) {
            return Err(nested("title"));
        }
        for section in &self.sections {
            if let Some(body) = &section.body {
                if has_nested_conditionals(body) {
                    return Err(nested(&section.name));
                }
            }
        }

        Ok(())
    }
}
