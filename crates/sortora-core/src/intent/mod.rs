//! Parsed-intent record: the structured filters extracted from free text.
//!
//! Every field is independently optional. Decoding is lenient: a field with an
//! unexpected shape is treated as absent instead of failing the whole record,
//! so a partially useful answer from the parser still yields a search.

mod fence;
mod price;

pub use fence::strip_code_fence;
pub use price::{PriceBounds, PriceRange};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Structured shopping filters. Keys are camelCase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct ParsedIntent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
}

/// Failure to turn parser output into a [`ParsedIntent`].
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("parser output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parser output is not a JSON object")]
    NotAnObject,
}

impl ParsedIntent {
    /// Builds an intent from an arbitrary JSON value. Non-objects yield an
    /// empty intent; fields of the wrong shape are dropped.
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        Self {
            query: text(obj.get("query")),
            brand: text(obj.get("brand")),
            category: text(obj.get("category")),
            car_type: text(obj.get("carType")),
            year_min: integer(obj.get("yearMin")),
            mileage_max: integer(obj.get("mileageMax")),
            color: text(obj.get("color")),
            interior_color: text(obj.get("interiorColor")),
            price_range: obj.get("priceRange").and_then(PriceRange::from_value),
            delivery: text(obj.get("delivery")),
            sort: text(obj.get("sort")),
            radius: number(obj.get("radius")),
            date_posted: text(obj.get("datePosted")),
        }
    }
}

impl From<Value> for ParsedIntent {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Decodes parser output text, stripping a Markdown code fence first.
pub fn decode(text: &str) -> Result<ParsedIntent, IntentError> {
    let cleaned = strip_code_fence(text);
    let value: Value = serde_json::from_str(cleaned)?;
    if !value.is_object() {
        return Err(IntentError::NotAnObject);
    }
    Ok(ParsedIntent::from_value(&value))
}

/// Text field: non-blank strings, or numbers rendered as text.
fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer field: JSON integers, integral floats, or integer strings.
fn integer(v: Option<&Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Numeric field: any finite number or numeric string.
pub(crate) fn number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Renders a number the way it reads: integral values without a decimal point.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
