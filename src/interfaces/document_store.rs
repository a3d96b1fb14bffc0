//! Document storage interface.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};

use crate::codec::DecodeError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored document that could not be decoded into its record type.
#[derive(Debug, thiserror::Error)]
#[error("Malformed record in {collection} (id={}): {source}", display_id(.id))]
pub struct MalformedRecord {
    pub collection: &'static str,
    pub id: Option<ObjectId>,
    #[source]
    pub source: DecodeError,
}

fn display_id(id: &Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_else(|| "<none>".to_string())
}

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Store unreachable or the operation was rejected.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Malformed(#[from] MalformedRecord),

    #[error("Field '{field}' is not a supported sort/search field for {collection}")]
    UnsupportedField {
        collection: &'static str,
        field: String,
    },

    #[error("Invalid record id: {0}")]
    InvalidId(#[from] mongodb::bson::oid::Error),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),
}

impl StorageError {
    /// True when the store could not be asked at all, as opposed to the
    /// request or the stored data being wrong.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

impl From<mongodb::error::Error> for StorageError {
    fn from(e: mongodb::error::Error) -> Self {
        StorageError::Unavailable(e.to_string())
    }
}

/// Structured filter pushed down to the store.
///
/// Only two shapes are ever issued: a case-insensitive pattern match on a
/// text field and an exact equality on a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive regular expression match. The pattern is used as
    /// given, so metacharacters keep their regex meaning.
    Matches { field: String, pattern: String },
    /// Exact equality.
    Equals { field: String, value: Bson },
}

impl Filter {
    pub fn matches(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Matches {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Filter::Matches { field, .. } | Filter::Equals { field, .. } => field,
        }
    }

    /// Query document in MongoDB filter syntax.
    pub fn to_document(&self) -> Document {
        match self {
            Filter::Matches { field, pattern } => {
                doc! { field.as_str(): { "$regex": pattern.as_str(), "$options": "i" } }
            }
            Filter::Equals { field, value } => doc! { field.as_str(): value.clone() },
        }
    }
}

/// Sort direction for ordered scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    /// Direction value used in a MongoDB sort document.
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Interface for document persistence, scoped by collection name.
///
/// Implementations:
/// - `MongoDocumentStore`: MongoDB over the network
/// - `MemoryDocumentStore`: in-process, for tests and local runs
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection, in store order.
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// The document whose `_id` equals `id`, if any.
    async fn get_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>>;

    /// Documents matching `filter`, in store order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    /// Every document ordered by one field. Ties keep no guaranteed order.
    async fn find_sorted(
        &self,
        collection: &str,
        field: &str,
        order: SortOrder,
    ) -> Result<Vec<Document>>;

    /// Insert a document, assigning `_id` if absent. Returns the id.
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId>;

    /// Remove the document with `id`. True iff one document was removed.
    async fn delete(&self, collection: &str, id: ObjectId) -> Result<bool>;
}
