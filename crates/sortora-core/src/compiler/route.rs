//! Vehicle vs. general route selection.

use regex::Regex;
use std::sync::OnceLock;

use crate::intent::ParsedIntent;

fn vehicle_terms() -> &'static Regex {
    static TERMS: OnceLock<Regex> = OnceLock::new();
    TERMS.get_or_init(|| {
        Regex::new(r"(?-u:\b)(?:car|truck|suv|van|sedan|hatchback|motorcycle)(?-u:\b)")
            .expect("valid vehicle term pattern")
    })
}

/// True if the intent should compile to a vehicle search: either the category
/// is "vehicles", or query/category/brand name a vehicle as a whole word.
pub fn is_vehicle_intent(intent: &ParsedIntent) -> bool {
    let category_is_vehicles = intent
        .category
        .as_deref()
        .is_some_and(|c| c.trim().to_lowercase() == "vehicles");
    if category_is_vehicles {
        return true;
    }

    let combined = [&intent.query, &intent.category, &intent.brand]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    vehicle_terms().is_match(&combined)
}
