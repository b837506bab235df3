//! Alternate filter path: fill the marketplace's own search form instead of
//! navigating to a compiled URL.
//!
//! The page is reached through [`MarketplacePage`]; controls are located by
//! attribute selectors and waited for with a bounded poll.

mod wait;

pub use wait::{wait_for, WaitError};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const SEARCH_BOX: &str = r#"input[placeholder*="Search Marketplace"]"#;
pub const MIN_PRICE_INPUT: &str = r#"[aria-label*="Minimum Price"]"#;
pub const MAX_PRICE_INPUT: &str = r#"[aria-label*="Maximum Price"]"#;
pub const SORT_BUTTON: &str = r#"[aria-label*="Sort"]"#;
pub const LOW_TO_HIGH_LABEL: &str = "Price: Low to High";

/// Opaque handle to a page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Minimal page-automation surface.
pub trait MarketplacePage {
    fn find(&self, selector: &str) -> Option<ElementId>;
    /// Sets an input's value and dispatches a bubbling `input` event.
    fn set_value(&mut self, element: ElementId, value: &str);
    fn click(&mut self, element: ElementId);
    /// First `span` whose text contains `text`.
    fn find_span_with_text(&self, text: &str) -> Option<ElementId>;
}

/// Filters carried by an `APPLY_FILTERS` message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFilters {
    #[serde(default, deserialize_with = "lenient_text")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub min_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub max_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sort_by: Option<String>,
}

impl FormFilters {
    /// Search box text: query, condition and category, space-joined.
    pub fn search_text(&self) -> String {
        [&self.query, &self.condition, &self.category]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Message from the front end to the page script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum FilterMessage {
    #[serde(rename = "APPLY_FILTERS")]
    ApplyFilters { filters: FormFilters },
}

impl FilterMessage {
    /// Decodes a message; unknown message types yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FillOptions {
    /// How long to wait for each control to appear.
    pub element_timeout: Duration,
    pub poll_interval: Duration,
    /// Pause between opening the sort menu and picking an option.
    pub menu_delay: Duration,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            menu_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillError {
    #[error("element not found: {selector}")]
    ElementNotFound {
        selector: &'static str,
        #[source]
        source: WaitError,
    },
}

/// Result of handling one message, with its user-facing notice.
#[derive(Debug, PartialEq, Eq)]
pub enum FillOutcome {
    Applied,
    Failed(FillError),
}

impl FillOutcome {
    pub fn notice(&self) -> &'static str {
        match self {
            FillOutcome::Applied => "Sortora filters applied!",
            FillOutcome::Failed(_) => "Could not apply filters.",
        }
    }
}

/// Fills the search box, price inputs and (for ascending price) the sort menu.
pub fn apply_filters<P: MarketplacePage + ?Sized>(
    page: &mut P,
    filters: &FormFilters,
    opts: &FillOptions,
) -> Result<(), FillError> {
    tracing::debug!(?filters, "applying filters");

    let search_box = wait_for_element(page, SEARCH_BOX, opts)?;
    page.set_value(search_box, &filters.search_text());

    if filters.min_price.is_some() || filters.max_price.is_some() {
        let min_input = wait_for_element(page, MIN_PRICE_INPUT, opts)?;
        let max_input = wait_for_element(page, MAX_PRICE_INPUT, opts)?;
        if let Some(min) = &filters.min_price {
            page.set_value(min_input, min);
        }
        if let Some(max) = &filters.max_price {
            page.set_value(max_input, max);
        }
    }

    if filters.sort_by.as_deref() == Some("price_ascend") {
        let sort_button = wait_for_element(page, SORT_BUTTON, opts)?;
        page.click(sort_button);
        std::thread::sleep(opts.menu_delay);
        match page.find_span_with_text(LOW_TO_HIGH_LABEL) {
            Some(option) => page.click(option),
            None => tracing::debug!("sort option not present; leaving sort unchanged"),
        }
    }

    Ok(())
}

/// Handles a raw front-end message. Returns `None` for message types this
/// path does not handle.
pub fn handle_message<P: MarketplacePage + ?Sized>(
    page: &mut P,
    message: &Value,
    opts: &FillOptions,
) -> Option<FillOutcome> {
    let FilterMessage::ApplyFilters { filters } = FilterMessage::from_value(message)?;
    let outcome = match apply_filters(page, &filters, opts) {
        Ok(()) => FillOutcome::Applied,
        Err(e) => {
            tracing::error!(error = %e, "error applying filters");
            FillOutcome::Failed(e)
        }
    };
    Some(outcome)
}

fn wait_for_element<P: MarketplacePage + ?Sized>(
    page: &P,
    selector: &'static str,
    opts: &FillOptions,
) -> Result<ElementId, FillError> {
    wait_for(opts.element_timeout, opts.poll_interval, || page.find(selector))
        .map_err(|source| FillError::ElementNotFound { selector, source })
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// In-memory page: selectors map to elements that appear after N lookups.
    #[derive(Default)]
    struct FakePage {
        elements: HashMap<&'static str, (ElementId, u32)>,
        lookups: Cell<u32>,
        spans: Vec<(String, ElementId)>,
        values: HashMap<ElementId, String>,
        clicks: Vec<ElementId>,
    }

    impl FakePage {
        fn with(mut self, selector: &'static str, id: u64, after_lookups: u32) -> Self {
            self.elements.insert(selector, (ElementId(id), after_lookups));
            self
        }
    }

    impl MarketplacePage for FakePage {
        fn find(&self, selector: &str) -> Option<ElementId> {
            let n = self.lookups.get() + 1;
            self.lookups.set(n);
            self.elements
                .get(selector)
                .filter(|(_, after)| n > *after)
                .map(|(id, _)| *id)
        }

        fn set_value(&mut self, element: ElementId, value: &str) {
            self.values.insert(element, value.to_string());
        }

        fn click(&mut self, element: ElementId) {
            self.clicks.push(element);
        }

        fn find_span_with_text(&self, text: &str) -> Option<ElementId> {
            self.spans
                .iter()
                .find(|(t, _)| t.contains(text))
                .map(|(_, id)| *id)
        }
    }

    fn fast() -> FillOptions {
        FillOptions {
            element_timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(2),
            menu_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn search_text_joins_present_parts() {
        let f = FormFilters {
            query: Some("desk".to_string()),
            category: Some("furniture".to_string()),
            ..Default::default()
        };
        assert_eq!(f.search_text(), "desk furniture");
        assert_eq!(FormFilters::default().search_text(), "");
    }

    #[test]
    fn decodes_message_with_numeric_prices() {
        let msg = json!({
            "type": "APPLY_FILTERS",
            "filters": { "query": "desk", "minPrice": 50, "maxPrice": "200", "sortBy": "price_ascend" }
        });
        let FilterMessage::ApplyFilters { filters } = FilterMessage::from_value(&msg).unwrap();
        assert_eq!(filters.min_price.as_deref(), Some("50"));
        assert_eq!(filters.max_price.as_deref(), Some("200"));
        assert_eq!(filters.sort_by.as_deref(), Some("price_ascend"));
    }

    #[test]
    fn other_messages_ignored() {
        let mut page = FakePage::default();
        assert!(handle_message(&mut page, &json!({ "type": "PING" }), &fast()).is_none());
        assert!(handle_message(&mut page, &json!("hello"), &fast()).is_none());
    }

    #[test]
    fn fills_search_prices_and_sort() {
        let mut page = FakePage::default()
            .with(SEARCH_BOX, 1, 2)
            .with(MIN_PRICE_INPUT, 2, 0)
            .with(MAX_PRICE_INPUT, 3, 0)
            .with(SORT_BUTTON, 4, 0);
        page.spans.push(("Price: Low to High".to_string(), ElementId(5)));

        let msg = json!({
            "type": "APPLY_FILTERS",
            "filters": {
                "query": "desk",
                "condition": "used",
                "maxPrice": "200",
                "sortBy": "price_ascend"
            }
        });
        let outcome = handle_message(&mut page, &msg, &fast()).unwrap();
        assert_eq!(outcome, FillOutcome::Applied);
        assert_eq!(outcome.notice(), "Sortora filters applied!");
        assert_eq!(page.values.get(&ElementId(1)).map(String::as_str), Some("desk used"));
        assert!(!page.values.contains_key(&ElementId(2)));
        assert_eq!(page.values.get(&ElementId(3)).map(String::as_str), Some("200"));
        assert_eq!(page.clicks, vec![ElementId(4), ElementId(5)]);
    }

    #[test]
    fn missing_sort_option_is_not_an_error() {
        let mut page = FakePage::default()
            .with(SEARCH_BOX, 1, 0)
            .with(SORT_BUTTON, 4, 0);
        let filters = FormFilters {
            sort_by: Some("price_ascend".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&mut page, &filters, &fast()).is_ok());
        assert_eq!(page.clicks, vec![ElementId(4)]);
    }

    #[test]
    fn other_sorts_leave_menu_alone() {
        let mut page = FakePage::default().with(SEARCH_BOX, 1, 0);
        let filters = FormFilters {
            sort_by: Some("price_descend".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&mut page, &filters, &fast()).is_ok());
        assert!(page.clicks.is_empty());
    }

    #[test]
    fn missing_price_input_fails() {
        let mut page = FakePage::default()
            .with(SEARCH_BOX, 1, 0)
            .with(MIN_PRICE_INPUT, 2, 0);
        let msg = json!({ "type": "APPLY_FILTERS", "filters": { "minPrice": "10" } });
        let outcome = handle_message(&mut page, &msg, &fast()).unwrap();
        match &outcome {
            FillOutcome::Failed(FillError::ElementNotFound { selector, .. }) => {
                assert_eq!(*selector, MAX_PRICE_INPUT)
            }
            other => panic!("expected ElementNotFound, got {other:?}"),
        }
        assert_eq!(outcome.notice(), "Could not apply filters.");
    }
}
