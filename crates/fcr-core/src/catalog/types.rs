use serde::{Deserialize, Serialize};

/// One catalog entry as returned by the listing and search endpoints.
///
/// Absent fields are filled with the same defaults for every store: `"N/A"`
/// for the name, `0` for the size, `""` for the caption and `null` otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub file_name: String,
    pub file_size: i64,
    pub caption: String,
    /// Stored years are a mix of integers and strings; kept verbatim.
    pub year: Option<serde_json::Value>,
    pub file_type: Option<String>,
}

impl CatalogItem {
    pub const UNKNOWN_NAME: &'static str = "N/A";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: Self::UNKNOWN_NAME.to_string(),
            file_size: 0,
            caption: String::new(),
            year: None,
            file_type: None,
        }
    }
}
