//! Vehicle search parameters.

use super::params::SearchParams;
use super::sort::normalize_sort;
use crate::intent::ParsedIntent;

/// Builds vehicle-category parameters. Delivery, radius, date and price
/// fields do not apply to this page and are ignored.
pub fn vehicle_params(intent: &ParsedIntent) -> SearchParams {
    let mut params = SearchParams::new();
    params.set("topLevelVehicleType", "car_truck");
    params.set_opt("query", intent.query.as_deref());
    params.set_opt("carType", intent.car_type.as_deref().map(str::to_lowercase));
    params.set_opt("minYear", intent.year_min.map(|y| y.to_string()));
    params.set_opt("maxMileage", intent.mileage_max.map(|m| m.to_string()));
    params.set_opt(
        "vehicleExteriorColors",
        intent.color.as_deref().map(str::to_lowercase),
    );
    params.set_opt(
        "vehicleInteriorColors",
        intent.interior_color.as_deref().map(str::to_lowercase),
    );
    params.set_opt(
        "sortBy",
        normalize_sort(intent.sort.as_deref(), true).map(|s| s.as_param()),
    );
    params
}
