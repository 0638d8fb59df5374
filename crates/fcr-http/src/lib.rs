//! HTTP surface (axum): catalog listing/search, deep links and the
//! watch/download relay redirects.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::{AppState, CatalogSettings};
pub use routes::create_router;
pub use server::HttpServer;
