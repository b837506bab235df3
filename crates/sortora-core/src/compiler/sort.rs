//! Sort phrase normalization.

/// `sortBy` values understood by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    MileageAscend,
    PriceAscend,
    PriceDescend,
    Newest,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::MileageAscend => "vehicle_mileage_ascend",
            SortOrder::PriceAscend => "price_ascend",
            SortOrder::PriceDescend => "price_descend",
            SortOrder::Newest => "creation_time_descend",
        }
    }
}

/// Maps a free-text sort phrase to a sort order. Mileage sorting only exists
/// on vehicle searches and is checked before the price phrasings there.
pub fn normalize_sort(phrase: Option<&str>, allow_mileage: bool) -> Option<SortOrder> {
    let s = phrase?.to_lowercase();
    if allow_mileage && s.contains("mileage") {
        Some(SortOrder::MileageAscend)
    } else if s.contains("low to high") {
        Some(SortOrder::PriceAscend)
    } else if s.contains("high to low") {
        Some(SortOrder::PriceDescend)
    } else if s.contains("new") || s.contains("recent") {
        Some(SortOrder::Newest)
    } else {
        None
    }
}
