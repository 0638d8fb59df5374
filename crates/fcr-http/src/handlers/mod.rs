//! HTTP API request handlers.

mod catalog;
mod relay;
mod system;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use fcr_core::{catalog::CatalogStore, deeplink::DeepLinkConfig, relay::RelayOrchestrator};

use crate::types::ErrorResponse;

/// Catalog knobs the handlers need at request time.
#[derive(Clone, Debug)]
pub struct CatalogSettings {
    pub search_field: String,
    pub max_per_page: u64,
    pub deeplink: DeepLinkConfig,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            search_field: "file_name".to_string(),
            max_per_page: 200,
            deeplink: DeepLinkConfig::default(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub relay: Arc<RelayOrchestrator>,
    pub settings: Arc<CatalogSettings>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

pub use catalog::{latest, search, send_link};
pub use relay::{download, watch};
pub use system::health;
