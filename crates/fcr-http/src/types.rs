//! JSON request/response types for the HTTP API.

use serde::{Deserialize, Serialize};

use fcr_core::catalog::CatalogItem;

/// Query string of `/api/latest`. Kept as raw strings so malformed numbers
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl LatestParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: first(pairs, "page"),
            per_page: first(pairs, "per_page"),
        }
    }
}

/// Query string of `/api/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub year: Option<String>,
    pub file_type: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl SearchParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: first(pairs, "q"),
            year: first(pairs, "year"),
            file_type: first(pairs, "type"),
            sort: first(pairs, "sort"),
            page: first(pairs, "page"),
            per_page: first(pairs, "per_page"),
        }
    }
}

/// First value of a possibly repeated query key.
fn first(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// One page of catalog items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: u64,
    pub per_page: u64,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
