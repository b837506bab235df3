//! Price range: either explicit bounds or free text such as "under $500".

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

use super::{format_number, number};

/// Price constraint as produced by the parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PriceRange {
    /// `{ "min": .., "max": .. }`; each bound kept as its decimal text.
    Bounds {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },
    /// Free text, parsed on demand by [`PriceRange::bounds`].
    Text(String),
}

/// Resolved lower/upper price bounds, as decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl PriceBounds {
    /// True if at least one bound is a number greater than zero.
    pub fn has_positive(&self) -> bool {
        [&self.min, &self.max]
            .into_iter()
            .flatten()
            .any(|b| b.parse::<f64>().map(|v| v > 0.0).unwrap_or(false))
    }
}

impl PriceRange {
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(PriceRange::Bounds {
                min: bound(obj.get("min")),
                max: bound(obj.get("max")),
            }),
            Value::String(s) if !s.trim().is_empty() => Some(PriceRange::Text(s.clone())),
            _ => None,
        }
    }

    /// Resolves the range to bounds. Text that matches no known phrasing
    /// yields empty bounds.
    pub fn bounds(&self) -> PriceBounds {
        match self {
            PriceRange::Bounds { min, max } => PriceBounds {
                min: min.clone(),
                max: max.clone(),
            },
            PriceRange::Text(text) => parse_price_text(text),
        }
    }
}

fn bound(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|_| s.to_string())
        }
        other => number(Some(other)).map(format_number),
    }
}

struct PricePatterns {
    between: Regex,
    range: Regex,
    under: Regex,
    above: Regex,
}

fn patterns() -> &'static PricePatterns {
    static PATTERNS: OnceLock<PricePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| PricePatterns {
        between: Regex::new(r"(?i)\$?([0-9]+)[^0-9]+(?:and|to)[^0-9]+\$?([0-9]+)")
            .expect("valid between pattern"),
        range: Regex::new(r"\$?([0-9]+)\s*-\s*\$?([0-9]+)").expect("valid range pattern"),
        under: Regex::new(r"(?i)under\s*\$?([0-9]+)").expect("valid under pattern"),
        above: Regex::new(r"(?i)(?:above|over)\s*\$?([0-9]+)").expect("valid above pattern"),
    })
}

/// First matching phrasing wins: "X to/and Y", "X-Y", "under X", "above/over X".
fn parse_price_text(text: &str) -> PriceBounds {
    let p = patterns();
    let group = |c: &regex::Captures<'_>, i: usize| c.get(i).map(|m| m.as_str().to_string());

    if let Some(c) = p.between.captures(text).or_else(|| p.range.captures(text)) {
        return PriceBounds {
            min: group(&c, 1),
            max: group(&c, 2),
        };
    }
    if let Some(c) = p.under.captures(text) {
        return PriceBounds {
            min: None,
            max: group(&c, 1),
        };
    }
    if let Some(c) = p.above.captures(text) {
        return PriceBounds {
            min: group(&c, 1),
            max: None,
        };
    }
    PriceBounds::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> PriceBounds {
        PriceRange::Text(s.to_string()).bounds()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn between_phrasings() {
        assert_eq!(text("$100 to $200"), PriceBounds { min: some("100"), max: some("200") });
        assert_eq!(text("between 50 and 75"), PriceBounds { min: some("50"), max: some("75") });
        assert_eq!(text("$10 TO $20"), PriceBounds { min: some("10"), max: some("20") });
    }

    #[test]
    fn dash_range() {
        assert_eq!(text("100-200"), PriceBounds { min: some("100"), max: some("200") });
        assert_eq!(text("$300 - $450"), PriceBounds { min: some("300"), max: some("450") });
    }

    #[test]
    fn under_and_above() {
        assert_eq!(text("under $500"), PriceBounds { min: None, max: some("500") });
        assert_eq!(text("Under 80"), PriceBounds { min: None, max: some("80") });
        assert_eq!(text("above $50"), PriceBounds { min: some("50"), max: None });
        assert_eq!(text("over 1000"), PriceBounds { min: some("1000"), max: None });
    }

    #[test]
    fn between_wins_over_under() {
        // "under" also matches, but the two-number phrasing is checked first.
        assert_eq!(
            text("under $300, ideally $100 to $200"),
            PriceBounds { min: some("100"), max: some("200") }
        );
    }

    #[test]
    fn unmatched_text_has_no_bounds() {
        assert_eq!(text("cheap"), PriceBounds::default());
        assert_eq!(text("$400"), PriceBounds::default());
    }

    #[test]
    fn object_bounds() {
        let r = PriceRange::from_value(&json!({ "min": 100, "max": "250" })).unwrap();
        assert_eq!(r.bounds(), PriceBounds { min: some("100"), max: some("250") });

        let r = PriceRange::from_value(&json!({ "min": null, "max": 99.5 })).unwrap();
        assert_eq!(r.bounds(), PriceBounds { min: None, max: some("99.5") });

        let r = PriceRange::from_value(&json!({ "min": "cheap", "max": "" })).unwrap();
        assert_eq!(r.bounds(), PriceBounds::default());
    }

    #[test]
    fn other_shapes_are_absent() {
        assert!(PriceRange::from_value(&json!(500)).is_none());
        assert!(PriceRange::from_value(&json!("  ")).is_none());
        assert!(PriceRange::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn positivity() {
        assert!(!PriceBounds { min: some("0"), max: some("0") }.has_positive());
        assert!(!PriceBounds::default().has_positive());
        assert!(PriceBounds { min: some("0"), max: some("10") }.has_positive());
        assert!(PriceBounds { min: some("0.5"), max: None }.has_positive());
    }
}
