use async_trait::async_trait;

use crate::{
    catalog::{query::FindQuery, types::CatalogItem},
    Result,
};

/// Hexagonal port for the document store holding file metadata.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Run a filter + sort + skip + limit query.
    async fn find(&self, query: &FindQuery) -> Result<Vec<CatalogItem>>;

    /// Cheap round-trip used at startup to fail fast on an unreachable store.
    async fn ping(&self) -> Result<()>;
}
