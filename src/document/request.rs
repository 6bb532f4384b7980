//! Generation requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::TemplateData;

/// Default total token budget for a request.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Kind of procurement document being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Proposal,
    TechnicalSpec,
    CostEstimate,
    Contract,
    Reference,
    Template,
    Other,
}

impl DocumentType {
    /// All document types, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Proposal,
        Self::TechnicalSpec,
        Self::CostEstimate,
        Self::Contract,
        Self::Reference,
        Self::Template,
        Self::Other,
    ];

    /// Wire name used in template files and requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::TechnicalSpec => "technical_spec",
            Self::CostEstimate => "cost_estimate",
            Self::Contract => "contract",
            Self::Reference => "reference",
            Self::Template => "template",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| GenerationError::InvalidRequest(format!("unknown document type: {s}")))
    }
}

/// Errors surfaced to the caller before any generation work starts.
///
/// Everything that goes wrong during generation itself is recovered
/// per section and never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A request to generate one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Document title
    pub title: String,

    /// Kind of document to produce
    pub document_type: DocumentType,

    /// Explicit template to use (numeric ids are accepted and stringified)
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,

    /// Tender this document responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tender_id: Option<u64>,

    /// Generation hints, also exposed to templates as `content_requirements`
    #[serde(default)]
    pub content_requirements: TemplateData,

    /// Style hints: conventionally `tone`, `formality` and `technical_level`
    #[serde(default)]
    pub style_parameters: TemplateData,

    /// Desired length in words, must be positive when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_length: Option<i64>,

    /// Total token budget shared by all AI-written sections
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Keep only these sections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_sections: Option<Vec<String>>,

    /// Drop these sections (applied after `include_sections`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_sections: Option<Vec<String>>,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl GenerationRequest {
    /// Create a request with default budget and no hints.
    pub fn new(title: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            title: title.into(),
            document_type,
            template_id: None,
            tender_id: None,
            content_requirements: TemplateData::new(),
            style_parameters: TemplateData::new(),
            target_length: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            include_sections: None,
            exclude_sections: None,
        }
    }

    /// Parse and validate a JSON request.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let request: Self = serde_json::from_str(json)
            .map_err(|e| GenerationError::InvalidRequest(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Use a specific template.
    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Add a content requirement.
    pub fn with_requirement(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.content_requirements.insert(key.into(), value.into());
        self
    }

    /// Set a style parameter.
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style_parameters.insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Set the total token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the desired length, rejecting non-positive values.
    pub fn with_target_length(mut self, target_length: i64) -> Result<Self, GenerationError> {
        self.target_length = Some(target_length);
        self.validate()?;
        Ok(self)
    }

    /// Keep only the named sections.
    pub fn with_include_sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_sections = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Drop the named sections.
    pub fn with_exclude_sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_sections = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Check request invariants.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if let Some(len) = self.target_length {
            if len <= 0 {
                return Err(GenerationError::InvalidRequest(format!(
                    "target_length must be positive, got {len}"
                )));
            }
        }

        if self.max_tokens == 0 {
            return Err(GenerationError::InvalidRequest(
                "max_tokens must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Generator requested through `content_requirements.generator_type`, if any.
    pub fn generator_hint(&self) -> Option<&str> {
        self.content_requirements.get("generator_type").and_then(|v| v.as_str())
    }
}
