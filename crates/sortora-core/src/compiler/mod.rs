//! Parsed intent → marketplace search URL.
//!
//! Compilation is pure and total: every combination of present and absent
//! intent fields yields a URL, and fields that cannot be interpreted are
//! skipped rather than reported.

mod general;
mod params;
mod route;
mod sort;
mod vehicle;

pub use general::general_params;
pub use params::SearchParams;
pub use route::is_vehicle_intent;
pub use sort::{normalize_sort, SortOrder};
pub use vehicle::vehicle_params;

use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

use crate::config::MarketplaceTarget;
use crate::intent::ParsedIntent;

/// Which search page a compiled URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Vehicle,
    General,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Vehicle => "vehicle",
            SearchKind::General => "general",
        }
    }
}

/// Destination URL tagged with the branch that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledUrl {
    VehicleSearch { url: Url },
    GeneralSearch { url: Url },
}

impl CompiledUrl {
    pub fn url(&self) -> &Url {
        match self {
            CompiledUrl::VehicleSearch { url } | CompiledUrl::GeneralSearch { url } => url,
        }
    }

    pub fn as_str(&self) -> &str {
        self.url().as_str()
    }

    pub fn kind(&self) -> SearchKind {
        match self {
            CompiledUrl::VehicleSearch { .. } => SearchKind::Vehicle,
            CompiledUrl::GeneralSearch { .. } => SearchKind::General,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("invalid {which} search URL {url:?}: {source}")]
    InvalidBase {
        which: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{which} search URL {url:?} cannot carry query parameters")]
    CannotBeABase { which: &'static str, url: String },
}

/// Compiler bound to a pair of validated marketplace base URLs.
#[derive(Debug, Clone)]
pub struct UrlCompiler {
    vehicle_base: Url,
    general_base: Url,
}

impl UrlCompiler {
    pub fn new(target: &MarketplaceTarget) -> Result<Self, CompilerError> {
        Ok(Self {
            vehicle_base: parse_base("vehicle", &target.vehicle_url)?,
            general_base: parse_base("general", &target.general_url)?,
        })
    }

    /// Compiles `intent` into a search URL. `raw_query` is the user's original
    /// text, used when the intent has no query terms.
    pub fn compile(&self, intent: &ParsedIntent, raw_query: &str) -> CompiledUrl {
        if is_vehicle_intent(intent) {
            let url = vehicle_params(intent).apply_to(&self.vehicle_base);
            tracing::debug!(url = %url, "compiled vehicle search");
            CompiledUrl::VehicleSearch { url }
        } else {
            let url = general_params(intent, raw_query).apply_to(&self.general_base);
            tracing::debug!(url = %url, "compiled general search");
            CompiledUrl::GeneralSearch { url }
        }
    }
}

impl Default for UrlCompiler {
    fn default() -> Self {
        Self::new(&MarketplaceTarget::default()).expect("default marketplace target is valid")
    }
}

/// Compiles against the default marketplace target.
pub fn compile(intent: &ParsedIntent, raw_query: &str) -> CompiledUrl {
    static DEFAULT: OnceLock<UrlCompiler> = OnceLock::new();
    DEFAULT
        .get_or_init(UrlCompiler::default)
        .compile(intent, raw_query)
}

fn parse_base(which: &'static str, raw: &str) -> Result<Url, CompilerError> {
    let url = Url::parse(raw).map_err(|source| CompilerError::InvalidBase {
        which,
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(CompilerError::CannotBeABase {
            which,
            url: raw.to_string(),
        });
    }
    Ok(url)
}
