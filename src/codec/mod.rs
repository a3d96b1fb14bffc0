//! Record codecs.
//!
//! A [`Record`] knows its collection, which of its fields may be sorted or
//! searched, and how to turn itself into a document and back. Codecs do no
//! I/O; the field readers below hold the shared decoding rules.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::spec::ElementType;
use mongodb::bson::{Bson, Document};

/// Wire name of the record id.
pub const ID_FIELD: &str = "_id";

/// Errors raised while decoding a stored document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' has type {found:?}, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: ElementType,
    },

    #[error("field '{field}' is out of range")]
    OutOfRange { field: &'static str },

    #[error("unknown order status '{0}'")]
    UnknownStatus(String),
}

/// A typed record persisted as one document in a fixed collection.
pub trait Record: Sized + Send + Sync + 'static {
    /// Collection holding this record type.
    const COLLECTION: &'static str;
    /// Fields accepted by ordered scans.
    const SORT_FIELDS: &'static [&'static str];
    /// Fields accepted by case-insensitive pattern search.
    const TEXT_FIELDS: &'static [&'static str];
    /// Fields accepted by exact-match search.
    const EXACT_FIELDS: &'static [&'static str];

    /// Store-assigned id; `None` until inserted.
    fn id(&self) -> Option<ObjectId>;

    /// Encode to a document. `_id` is emitted only when present.
    fn encode(&self) -> Document;

    /// Decode from a stored document.
    fn decode(doc: &Document) -> Result<Self, DecodeError>;
}

fn wrong_type(field: &'static str, expected: &'static str, value: &Bson) -> DecodeError {
    DecodeError::WrongType {
        field,
        expected,
        found: value.element_type(),
    }
}

fn required<'a>(doc: &'a Document, field: &'static str) -> Result<&'a Bson, DecodeError> {
    match doc.get(field) {
        None | Some(Bson::Null) => Err(DecodeError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

/// The `_id` of a document, absent on records not yet inserted.
pub fn read_id(doc: &Document) -> Result<Option<ObjectId>, DecodeError> {
    match doc.get(ID_FIELD) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::ObjectId(id)) => Ok(Some(*id)),
        Some(other) => Err(wrong_type(ID_FIELD, "objectId", other)),
    }
}

pub fn read_object_id(doc: &Document, field: &'static str) -> Result<ObjectId, DecodeError> {
    match required(doc, field)? {
        Bson::ObjectId(id) => Ok(*id),
        other => Err(wrong_type(field, "objectId", other)),
    }
}

pub fn read_string(doc: &Document, field: &'static str) -> Result<String, DecodeError> {
    match required(doc, field)? {
        Bson::String(s) => Ok(s.clone()),
        other => Err(wrong_type(field, "string", other)),
    }
}

/// Missing and null both read as `None`.
pub fn read_optional_string(
    doc: &Document,
    field: &'static str,
) -> Result<Option<String>, DecodeError> {
    match doc.get(field) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(field, "string", other)),
    }
}

/// Decimal field stored either integrally or fractionally.
///
/// Int32 converts exactly; Int64 converts exactly up to 2^53.
pub fn read_decimal(doc: &Document, field: &'static str) -> Result<f64, DecodeError> {
    match required(doc, field)? {
        Bson::Double(v) => Ok(*v),
        Bson::Int32(v) => Ok(f64::from(*v)),
        Bson::Int64(v) => Ok(*v as f64),
        other => Err(wrong_type(field, "number", other)),
    }
}

/// Non-negative integer count.
pub fn read_count(doc: &Document, field: &'static str) -> Result<u32, DecodeError> {
    match required(doc, field)? {
        Bson::Int32(v) => u32::try_from(*v).map_err(|_| DecodeError::OutOfRange { field }),
        Bson::Int64(v) => u32::try_from(*v).map_err(|_| DecodeError::OutOfRange { field }),
        other => Err(wrong_type(field, "int", other)),
    }
}

pub fn read_datetime(doc: &Document, field: &'static str) -> Result<DateTime<Utc>, DecodeError> {
    match required(doc, field)? {
        Bson::DateTime(dt) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
            .ok_or(DecodeError::OutOfRange { field }),
        other => Err(wrong_type(field, "date", other)),
    }
}

/// Ordered list of nested documents. A missing or null field is an empty list.
pub fn read_nested_list<T>(
    doc: &Document,
    field: &'static str,
    decode_item: impl Fn(&Document) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    match doc.get(field) {
        None | Some(Bson::Null) => Ok(Vec::new()),
        Some(Bson::Array(items)) => items
            .iter()
            .map(|item| match item {
                Bson::Document(d) => decode_item(d),
                other => Err(wrong_type(field, "embedded document", other)),
            })
            .collect(),
        Some(other) => Err(wrong_type(field, "array", other)),
    }
}

/// Counts go on the wire as int32 when they fit.
pub fn count_to_bson(count: u32) -> Bson {
    match i32::try_from(count) {
        Ok(v) => Bson::Int32(v),
        Err(_) => Bson::Int64(i64::from(count)),
    }
}

/// Drop anything finer than a millisecond, the precision of a stored datetime.
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

/// Timestamps are stored at millisecond precision.
pub fn datetime_to_bson(dt: DateTime<Utc>) -> Bson {
    Bson::DateTime(mongodb::bson::DateTime::from_millis(dt.timestamp_millis()))
}

/// Start a document with `_id` when the record has one.
pub fn document_with_id(id: Option<ObjectId>) -> Document {
    let mut doc = Document::new();
    if let Some(id) = id {
        doc.insert(ID_FIELD, id);
    }
    doc
}
