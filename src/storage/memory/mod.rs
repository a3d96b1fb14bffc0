//! In-memory DocumentStore implementation.
//!
//! Mirrors the filter and sort behavior of the MongoDB backend closely
//! enough for repository tests and local runs without a server.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;
use tracing::error;

use crate::codec::ID_FIELD;
use crate::interfaces::{DocumentStore, Filter, Result, SortOrder, StorageError};

/// Document store that keeps collections in process memory.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unavailable: RwLock<bool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail as if the store were unreachable.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Insert a raw document without going through a codec.
    pub async fn insert_raw(&self, collection: &str, document: Document) -> Result<ObjectId> {
        self.insert(collection, document).await
    }

    pub async fn stored_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    async fn check_available(&self, op: &str, collection: &str) -> Result<()> {
        if *self.unavailable.read().await {
            error!(collection, "Error during {}: store unavailable", op);
            return Err(StorageError::Unavailable(format!(
                "memory store offline ({op} on {collection})"
            )));
        }
        Ok(())
    }

    async fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.check_available("list", collection).await?;
        Ok(self.snapshot(collection).await)
    }

    async fn get_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        self.check_available("get by id", collection).await?;
        let store = self.collections.read().await;
        Ok(store
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        self.check_available("find", collection).await?;
        let predicate = Predicate::compile(filter)?;
        Ok(self
            .snapshot(collection)
            .await
            .into_iter()
            .filter(|d| predicate.matches(d))
            .collect())
    }

    async fn find_sorted(
        &self,
        collection: &str,
        field: &str,
        order: SortOrder,
    ) -> Result<Vec<Document>> {
        self.check_available("sorted find", collection).await?;
        let mut docs = self.snapshot(collection).await;
        docs.sort_by(|a, b| {
            let ord = compare_values(a.get(field), b.get(field));
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        Ok(docs)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<ObjectId> {
        self.check_available("insert", collection).await?;
        let id = match document.get(ID_FIELD) {
            Some(Bson::ObjectId(id)) => *id,
            None => {
                let id = ObjectId::new();
                // Stored documents carry _id first, as the server does.
                let mut with_id = Document::new();
                with_id.insert(ID_FIELD, id);
                for (key, value) in document {
                    with_id.insert(key, value);
                }
                document = with_id;
                id
            }
            Some(other) => {
                return Err(StorageError::Unavailable(format!(
                    "insert rejected: _id must be an ObjectId, got {:?}",
                    other.element_type()
                )))
            }
        };

        let mut store = self.collections.write().await;
        let docs = store.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| has_id(d, id)) {
            return Err(StorageError::Unavailable(format!(
                "insert rejected: duplicate key {} in {}",
                id, collection
            )));
        }
        docs.push(document);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> Result<bool> {
        self.check_available("delete", collection).await?;
        let mut store = self.collections.write().await;
        let Some(docs) = store.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|d| has_id(d, id)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn has_id(doc: &Document, id: ObjectId) -> bool {
    matches!(doc.get(ID_FIELD), Some(Bson::ObjectId(stored)) if *stored == id)
}

/// A filter ready to evaluate against documents.
enum Predicate<'a> {
    Matches { field: &'a str, regex: regex::Regex },
    Equals { field: &'a str, value: &'a Bson },
}

impl<'a> Predicate<'a> {
    fn compile(filter: &'a Filter) -> Result<Self> {
        match filter {
            Filter::Matches { field, pattern } => {
                let regex = regex::RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| StorageError::InvalidPattern(e.to_string()))?;
                Ok(Predicate::Matches { field, regex })
            }
            Filter::Equals { field, value } => Ok(Predicate::Equals { field, value }),
        }
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            Predicate::Matches { field, regex } => match doc.get(*field) {
                Some(Bson::String(s)) => regex.is_match(s),
                _ => false,
            },
            Predicate::Equals { field, value } => match doc.get(*field) {
                Some(stored) => values_equal(stored, value),
                None => matches!(value, Bson::Null),
            },
        }
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

/// Numbers compare by value across int32/int64/double.
fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Cross-type ordering rank, following the server's comparison order for
/// the types records use.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::ObjectId(_)) => 5,
        Some(Bson::Boolean(_)) => 6,
        Some(Bson::DateTime(_)) => 7,
        Some(_) => 8,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.bytes().cmp(&y.bytes()),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_number(x), as_number(y)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}
