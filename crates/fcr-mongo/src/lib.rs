//! MongoDB adapter.
//!
//! Implements the `fcr-core` CatalogStore over a single MongoDB collection.

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{options::FindOptions, Client, Collection};
use tracing::debug;

use fcr_core::{
    catalog::{
        port::CatalogStore,
        query::{Filter, FilterValue, FindQuery, SortOrder, ID_FIELD},
        types::CatalogItem,
    },
    Error, Result,
};

pub struct MongoCatalog {
    client: Client,
    db_name: String,
    collection: Collection<Document>,
}

impl MongoCatalog {
    /// Connect and verify the server answers a ping.
    pub async fn connect(uri: &str, db_name: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(store_err)?;
        let collection = client.database(db_name).collection::<Document>(collection);
        let catalog = Self {
            client,
            db_name: db_name.to_string(),
            collection,
        };
        catalog.ping().await?;
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogStore for MongoCatalog {
    async fn find(&self, query: &FindQuery) -> Result<Vec<CatalogItem>> {
        let filter = compile_filter(&query.filter);
        debug!(?filter, skip = query.skip, limit = query.limit, "catalog find");

        let options = FindOptions::builder()
            .projection(projection())
            .sort(doc! { ID_FIELD: sort_direction(query.sort) })
            .skip(query.skip)
            .limit(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .build();

        let docs: Vec<Document> = self
            .collection
            .find(filter, options)
            .await
            .map_err(store_err)?
            .try_collect()
            .await
            .map_err(store_err)?;

        Ok(docs.iter().map(item_from_document).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

fn store_err(e: mongodb::error::Error) -> Error {
    Error::Store(e.to_string())
}

fn projection() -> Document {
    doc! {
        "_id": 1,
        "file_name": 1,
        "file_size": 1,
        "caption": 1,
        "year": 1,
        "file_type": 1,
    }
}

fn sort_direction(order: SortOrder) -> i32 {
    match order {
        SortOrder::Ascending => 1,
        SortOrder::Descending => -1,
    }
}

/// Compile a store-agnostic filter into a MongoDB query document.
pub fn compile_filter(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::MatchesIgnoreCase { field, pattern } => {
            let mut d = Document::new();
            d.insert(
                field.clone(),
                doc! { "$regex": pattern.clone(), "$options": "i" },
            );
            d
        }
        Filter::Eq { field, value } => {
            let mut d = Document::new();
            let value = match value {
                FilterValue::Int(n) => Bson::Int64(*n),
                FilterValue::Str(s) => Bson::String(s.clone()),
            };
            d.insert(field.clone(), value);
            d
        }
        Filter::And(parts) => doc! { "$and": compile_all(parts) },
        Filter::Or(parts) => doc! { "$or": compile_all(parts) },
    }
}

fn compile_all(parts: &[Filter]) -> Vec<Bson> {
    parts
        .iter()
        .map(|p| Bson::Document(compile_filter(p)))
        .collect()
}

fn item_from_document(doc: &Document) -> CatalogItem {
    let id = match doc.get(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let mut item = CatalogItem::new(id);
    if let Ok(name) = doc.get_str("file_name") {
        item.file_name = name.to_string();
    }
    item.file_size = match doc.get("file_size") {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(f)) => *f as i64,
        _ => 0,
    };
    if let Ok(caption) = doc.get_str("caption") {
        item.caption = caption.to_string();
    }
    item.year = match doc.get("year") {
        Some(Bson::Int32(n)) => Some(serde_json::Value::from(*n)),
        Some(Bson::Int64(n)) => Some(serde_json::Value::from(*n)),
        Some(Bson::Double(f)) => Some(serde_json::Value::from(*f)),
        Some(Bson::String(s)) => Some(serde_json::Value::from(s.as_str())),
        _ => None,
    };
    item.file_type = doc.get_str("file_type").ok().map(str::to_string);
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use fcr_core::catalog::query::{Pagination, SearchQuery};

    #[test]
    fn empty_search_compiles_to_empty_document() {
        assert_eq!(compile_filter(&Filter::All), Document::new());
    }

    #[test]
    fn search_compiles_like_a_mongo_query() {
        let filter = SearchQuery::new(Pagination::parse(None, None, 50))
            .text(Some("star"))
            .year(Some("2020"))
            .file_type(Some("mkv"))
            .filter("file_name");

        assert_eq!(
            compile_filter(&filter),
            doc! {
                "$and": [
                    { "file_name": { "$regex": "star", "$options": "i" } },
                    { "year": 2020_i64 },
                    { "$or": [
                        { "file_type": { "$regex": "mkv", "$options": "i" } },
                        { "file_name": { "$regex": "\\.mkv$", "$options": "i" } },
                    ] },
                ]
            }
        );
    }

    #[test]
    fn string_year_stays_a_string() {
        let filter = SearchQuery::new(Pagination::parse(None, None, 50))
            .year(Some("2020s"))
            .filter("file_name");
        assert_eq!(compile_filter(&filter), doc! { "year": "2020s" });
    }

    #[test]
    fn document_maps_to_item() {
        let oid = ObjectId::new();
        let item = item_from_document(&doc! {
            "_id": oid,
            "file_name": "Movie.2020.mkv",
            "file_size": 1_048_576_i64,
            "caption": "1080p",
            "year": 2020,
            "file_type": "video",
        });
        assert_eq!(item.id, oid.to_hex());
        assert_eq!(item.file_name, "Movie.2020.mkv");
        assert_eq!(item.file_size, 1_048_576);
        assert_eq!(item.caption, "1080p");
        assert_eq!(item.year, Some(serde_json::json!(2020)));
        assert_eq!(item.file_type.as_deref(), Some("video"));
    }

    #[test]
    fn sparse_document_gets_defaults() {
        let item = item_from_document(&doc! { "_id": "x1", "year": null });
        assert_eq!(item, CatalogItem::new("x1"));
    }

    #[test]
    fn sort_direction_matches_order() {
        assert_eq!(sort_direction(SortOrder::Descending), -1);
        assert_eq!(sort_direction(SortOrder::Ascending), 1);
    }
}
