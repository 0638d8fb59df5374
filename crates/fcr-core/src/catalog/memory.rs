use std::sync::RwLock;

use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::{Map, Value};

use crate::{
    catalog::{
        port::CatalogStore,
        query::{Filter, FilterValue, FindQuery, SortOrder, ID_FIELD},
        types::CatalogItem,
    },
    Error, Result,
};

/// Catalog held in process memory. Documents are JSON objects; insertion order
/// is the `_id` sort key, mirroring an auto-increasing store id.
#[derive(Default)]
pub struct InMemoryCatalog {
    docs: RwLock<Vec<(u64, Map<String, Value>)>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document. Its `_id` defaults to the insertion sequence number.
    pub fn insert(&self, mut doc: Map<String, Value>) -> Result<u64> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| Error::Store("catalog lock poisoned".to_string()))?;
        let seq = docs.len() as u64 + 1;
        doc.entry(ID_FIELD.to_string())
            .or_insert_with(|| Value::from(seq));
        docs.push((seq, doc));
        Ok(seq)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find(&self, query: &FindQuery) -> Result<Vec<CatalogItem>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| Error::Store("catalog lock poisoned".to_string()))?;

        let mut hits: Vec<&(u64, Map<String, Value>)> = docs
            .iter()
            .filter(|(_, doc)| matches(&query.filter, doc))
            .collect();
        match query.sort {
            SortOrder::Ascending => hits.sort_by_key(|(seq, _)| *seq),
            SortOrder::Descending => hits.sort_by_key(|(seq, _)| std::cmp::Reverse(*seq)),
        }

        Ok(hits
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .map(|(_, doc)| to_item(doc))
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

fn matches(filter: &Filter, doc: &Map<String, Value>) -> bool {
    match filter {
        Filter::All => true,
        Filter::MatchesIgnoreCase { field, pattern } => {
            let Some(Value::String(s)) = doc.get(field) else {
                return false;
            };
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(s))
                .unwrap_or(false)
        }
        Filter::Eq { field, value } => match (doc.get(field), value) {
            (Some(Value::Number(n)), FilterValue::Int(want)) => {
                n.as_i64() == Some(*want) || n.as_f64() == Some(*want as f64)
            }
            (Some(Value::String(s)), FilterValue::Str(want)) => s == want,
            _ => false,
        },
        Filter::And(parts) => parts.iter().all(|p| matches(p, doc)),
        Filter::Or(parts) => parts.iter().any(|p| matches(p, doc)),
    }
}

fn to_item(doc: &Map<String, Value>) -> CatalogItem {
    let id = match doc.get(ID_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let mut item = CatalogItem::new(id);
    if let Some(Value::String(name)) = doc.get("file_name") {
        item.file_name = name.clone();
    }
    if let Some(size) = doc
        .get("file_size")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
    {
        item.file_size = size;
    }
    if let Some(Value::String(caption)) = doc.get("caption") {
        item.caption = caption.clone();
    }
    item.year = doc.get("year").filter(|v| !v.is_null()).cloned();
    item.file_type = doc
        .get("file_type")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::query::{Pagination, SearchQuery};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    fn seeded() -> InMemoryCatalog {
        let cat = InMemoryCatalog::new();
        for doc in [
            json!({"file_name": "Star.Wars.1977.mkv", "year": 1977, "file_type": "video"}),
            json!({"file_name": "Lone Star State", "year": 2020, "file_type": "document"}),
            json!({"file_name": "Stardust.2020.mp4", "year": "2020", "file_type": "video"}),
            json!({"file_name": "XstarY.2020.mkv", "year": 2020, "file_type": "video"}),
            json!({"file_name": "a+b (cut).mkv", "year": 2019}),
        ] {
            cat.insert(obj(doc)).unwrap();
        }
        cat
    }

    fn ids(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    async fn latest_second_page_newest_first() {
        let cat = seeded();
        let items = cat
            .find(&FindQuery::latest(Pagination::parse(Some("2"), Some("2"), 20)))
            .await
            .unwrap();
        assert_eq!(ids(&items), vec!["3", "2"]);
    }

    #[tokio::test]
    async fn text_and_integer_year() {
        let cat = seeded();
        let q = SearchQuery::new(Pagination::parse(None, None, 50))
            .text(Some("star"))
            .year(Some("2020"));
        let items = cat.find(&q.to_find("file_name")).await.unwrap();
        // "Stardust" has a string year, so integer equality skips it.
        assert_eq!(ids(&items), vec!["4", "2"]);
    }

    #[tokio::test]
    async fn regex_characters_are_literal() {
        let cat = seeded();
        let q = SearchQuery::new(Pagination::parse(None, None, 50)).text(Some("a+b (cut)"));
        let items = cat.find(&q.to_find("file_name")).await.unwrap();
        assert_eq!(ids(&items), vec!["5"]);

        let q = SearchQuery::new(Pagination::parse(None, None, 50)).text(Some(".*"));
        assert!(cat.find(&q.to_find("file_name")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn type_matches_field_or_extension() {
        let cat = seeded();
        let q = SearchQuery::new(Pagination::parse(None, None, 50)).file_type(Some("MKV"));
        let items = cat.find(&q.to_find("file_name")).await.unwrap();
        assert_eq!(ids(&items), vec!["5", "4", "1"]);
    }

    #[tokio::test]
    async fn missing_fields_get_defaults() {
        let cat = InMemoryCatalog::new();
        cat.insert(obj(json!({"_id": "abc"}))).unwrap();
        let items = cat
            .find(&FindQuery::latest(Pagination::parse(None, None, 20)))
            .await
            .unwrap();
        assert_eq!(items, vec![CatalogItem::new("abc")]);
    }
}
