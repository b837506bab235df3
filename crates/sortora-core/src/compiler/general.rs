//! General marketplace search parameters.

use regex::Regex;
use std::sync::OnceLock;

use super::params::SearchParams;
use super::sort::normalize_sort;
use crate::intent::{format_number, ParsedIntent};

/// Builds general-search parameters. `raw_query` is used when the intent
/// carries no query terms.
pub fn general_params(intent: &ParsedIntent, raw_query: &str) -> SearchParams {
    let mut params = SearchParams::new();
    params.set("query", query_terms(intent, raw_query));

    if let Some(range) = &intent.price_range {
        let bounds = range.bounds();
        if bounds.has_positive() {
            params.set_opt("minPrice", bounds.min);
            params.set_opt("maxPrice", bounds.max);
        }
    }

    params.set_opt("deliveryMethod", delivery_method(intent.delivery.as_deref()));
    params.set_opt(
        "sortBy",
        normalize_sort(intent.sort.as_deref(), false).map(|s| s.as_param()),
    );
    params.set_opt("radiusKM", intent.radius.map(format_number));
    params.set_opt("daysSinceListed", days_since_listed(intent.date_posted.as_deref()));
    params
}

/// Query and brand, first occurrence kept, space-joined; falls back to the
/// raw user text. Always trimmed.
fn query_terms(intent: &ParsedIntent, raw_query: &str) -> String {
    let mut terms: Vec<&str> = Vec::with_capacity(2);
    for term in [&intent.query, &intent.brand].into_iter().flatten() {
        if !term.is_empty() && !terms.contains(&term.as_str()) {
            terms.push(term);
        }
    }
    let joined = terms.join(" ");
    if joined.is_empty() {
        raw_query.trim().to_string()
    } else {
        joined.trim().to_string()
    }
}

fn delivery_method(delivery: Option<&str>) -> Option<&'static str> {
    let d = delivery?.to_lowercase();
    if d.contains("local") {
        Some("2")
    } else if d.contains("ship") {
        Some("1")
    } else {
        None
    }
}

/// First run of ASCII digits anywhere in the text.
fn days_since_listed(date_posted: Option<&str>) -> Option<String> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));
    digits
        .find(date_posted?)
        .map(|m| m.as_str().to_string())
}
