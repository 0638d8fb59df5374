//! Read-only view over the file catalog (filter building, paging, item shape).

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod port;
pub mod query;
pub mod types;

pub use port::CatalogStore;
pub use query::{FindQuery, Filter, FilterValue, Pagination, SearchQuery, SortOrder};
pub use types::CatalogItem;
