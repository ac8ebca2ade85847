//! API models for request and response payloads

use serde::Deserialize;

pub mod order;
pub mod product;
pub mod stall;
pub mod user;

/// Optional `?search=` (or `?s=`) filter accepted by listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(alias = "s")]
    pub search: Option<String>,
}

impl SearchQuery {
    /// Search term, with blank input treated as no filter
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}
