//! Tender context supplied by the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TemplateData;

/// Currency assumed when a tender does not declare one.
pub const DEFAULT_CURRENCY: &str = "KRW";

/// Read-only procurement record merged into generation context.
///
/// The caller fetches this from wherever tenders live; the pipeline never
/// looks it up itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenderContext {
    pub title: Option<String>,
    pub organization_name: Option<String>,
    pub estimated_value: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub submission_deadline: Option<String>,
}

impl TenderContext {
    /// Create a tender with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn with_organization(mut self, name: impl Into<String>) -> Self {
        self.organization_name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: f64, currency: impl Into<String>) -> Self {
        self.estimated_value = Some(value);
        self.currency = Some(currency.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.submission_deadline = Some(deadline.into());
        self
    }

    /// Declared currency or [`DEFAULT_CURRENCY`].
    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Estimated value as display text; whole amounts print without a fraction.
    pub fn value_text(&self) -> Option<String> {
        self.estimated_value.map(|v| value_to_json(v).to_string())
    }

    /// Template fill data. Missing fields become empty strings so that
    /// conditionals on them evaluate false.
    pub fn to_template_data(&self) -> TemplateData {
        let text = |v: &Option<String>| Value::String(v.clone().unwrap_or_default());

        let mut data = TemplateData::new();
        data.insert("tender_title".to_string(), text(&self.title));
        data.insert("tender_description".to_string(), text(&self.description));
        data.insert("organization_name".to_string(), text(&self.organization_name));
        data.insert(
            "estimated_value".to_string(),
            self.estimated_value.map_or_else(|| Value::String(String::new()), value_to_json),
        );
        data.insert("currency".to_string(), Value::String(self.currency_or_default().to_string()));
        data.insert("submission_deadline".to_string(), text(&self.submission_deadline));
        data
    }
}

fn value_to_json(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}
