//! Placeholder and conditional expansion.
//!
//! Expansion runs three passes in a fixed order:
//!
//! 1. `{{key}}` placeholders whose key is in the data map are replaced by the
//!    value's text form
//! 2. `{if key}…{endif}` (or `{% if key %}…{% endif %}`) blocks keep their inner
//!    text when `key` is truthy in the data map, otherwise the whole block goes
//! 3. any placeholder left over from pass 1 is deleted
//!
//! Conditionals are single-level only. A nested block is matched against the
//! first `{endif}` and produces garbage, so templates are checked with
//! [`has_nested_conditionals`] when they are loaded.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::document::TemplateData;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder pattern"));

static CONDITIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{%?\s*if\s+([^%}]+?)\s*%?\}(.*?)\{%?\s*endif\s*%?\}")
        .expect("conditional pattern")
});

static CONDITIONAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{%?\s*(if\s+[^%}]+?|endif)\s*%?\}").expect("conditional marker pattern")
});

/// Text form of a fill value.
///
/// Strings are inserted without quotes, null as nothing, and arrays or
/// objects as compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Whether a value counts as true in a conditional.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Expand a template string against a data map.
pub fn expand(template: &str, data: &TemplateData) -> String {
    let substituted = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        data.get(caps[1].trim()).map_or_else(|| caps[0].to_string(), value_to_text)
    });

    let conditioned = CONDITIONAL.replace_all(&substituted, |caps: &Captures| {
        let condition = caps[1].trim();
        if data.get(condition).is_some_and(is_truthy) {
            caps[2].to_string()
        } else {
            String::new()
        }
    });

    PLACEHOLDER.replace_all(&conditioned, "").into_owned()
}

/// Whether any conditional block opens inside another one.
pub fn has_nested_conditionals(template: &str) -> bool {
    let mut depth = 0usize;
    for caps in CONDITIONAL_MARKER.captures_iter(template) {
        if caps[1].starts_with("endif") {
            depth = depth.saturating_sub(1);
        } else {
            depth += 1;
            if depth > 1 {
                return true;
            }
        }
    }
    false
}
