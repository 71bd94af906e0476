//! Raw record JSON → [`Record`] with defaults.
//!
//! Source files are loosely typed. A field counts as absent when it is
//! missing, `null`, `false`, `0` or an empty string; absent fields take the
//! defaults below. Objects and arrays in scalar positions are also treated
//! as absent.

use crate::{AggregatorConfig, AggregatorError, Result};
use serde_json::{Map, Value};
use sigma_protocol::{Record, DEFAULT_CATEGORY};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_AUTHOR: &str = "Unknown";
const DEFAULT_DATE: &str = "Unknown";
const PREVIEW_SUFFIX: &str = "...";

/// Turns parsed source objects into normalized records
#[derive(Debug, Clone)]
pub struct Normalizer {
    preview_chars: usize,
    default_source: String,
}

impl Normalizer {
    pub fn new(preview_chars: usize, default_source: impl Into<String>) -> Self {
        Self {
            preview_chars,
            default_source: default_source.into(),
        }
    }

    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self::new(config.preview_chars, config.default_source.clone())
    }

    /// Normalize one source object. `file_name` supplies the fallback id.
    pub fn normalize(&self, raw: &Value, file_name: &str) -> Result<Record> {
        let Value::Object(fields) = raw else {
            return Err(AggregatorError::invalid_record(
                file_name,
                "expected a JSON object",
            ));
        };

        let id = fields
            .get("id")
            .and_then(integer)
            .filter(|id| *id != 0)
            .or_else(|| id_from_file_name(file_name))
            .ok_or_else(|| {
                AggregatorError::invalid_record(file_name, "no id field and no numeric file name")
            })?;

        let content = text(fields, "content").unwrap_or_default();
        let content_preview = self.preview(&content);

        Ok(Record {
            id,
            title: text(fields, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            author: text(fields, "author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            date: text(fields, "date").unwrap_or_else(|| DEFAULT_DATE.to_string()),
            date_parsed: fields.get("date_parsed").and_then(integer).unwrap_or(0),
            cves: cve_list(fields.get("cves")),
            cve_id: text(fields, "cve_id"),
            category: text(fields, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            platform: text(fields, "platform"),
            source: text(fields, "source").unwrap_or_else(|| self.default_source.clone()),
            content,
            content_preview,
        })
    }

    /// Leading graphemes of the content with a `...` marker; empty content has no preview.
    pub fn preview(&self, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }
        let mut preview: String = content.graphemes(true).take(self.preview_chars).collect();
        preview.push_str(PREVIEW_SUFFIX);
        preview
    }
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn cve_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(single)) if !single.is_empty() => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn id_from_file_name(file_name: &str) -> Option<i64> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    parse_leading_int(stem).filter(|id| *id != 0)
}

/// Parse an optional sign and the digits that follow, ignoring any trailing text.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
