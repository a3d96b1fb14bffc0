//! Abstract interfaces for workshop-records components.
//!
//! The only seam is document storage: repositories talk to a
//! `DocumentStore`, never to a driver directly.

pub mod document_store;

pub use document_store::{
    DocumentStore, Filter, MalformedRecord, Result, SortOrder, StorageError,
};
