//! Entity repositories.
//!
//! One generic [`Repository`] serves every record type; each entity adds
//! only its typed query methods on top.

mod entities;
mod fail_soft;

use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use tracing::{debug, warn};

use crate::codec::{self, Record};
use crate::interfaces::{DocumentStore, Filter, MalformedRecord, Result, SortOrder, StorageError};
use crate::models::{Customer, Furniture, FurnitureDetails, Material, Order};

pub use fail_soft::FailSoft;

pub type CustomerRepository = Repository<Customer>;
pub type FurnitureRepository = Repository<Furniture>;
pub type MaterialRepository = Repository<Material>;
pub type FurnitureDetailsRepository = Repository<FurnitureDetails>;
pub type OrderRepository = Repository<Order>;

/// Records decoded from a listing, in store order.
///
/// Documents that failed to decode are kept aside in `malformed` so one bad
/// document does not hide the rest.
#[derive(Debug)]
pub struct Listing<R> {
    pub records: Vec<R>,
    pub malformed: Vec<MalformedRecord>,
}

impl<R> Listing<R> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            malformed: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Append another listing, keeping order.
    pub fn extend(&mut self, other: Listing<R>) {
        self.records.extend(other.records);
        self.malformed.extend(other.malformed);
    }
}

impl<R> Default for Listing<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> IntoIterator for Listing<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Typed access to one collection.
///
/// Holds no cache; constructing many repositories over the same store is
/// cheap and needs no coordination.
pub struct Repository<R> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> Repository<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        R::COLLECTION
    }

    /// Every record, in store order.
    pub async fn get_all(&self) -> Result<Listing<R>> {
        let docs = self.store.list_all(R::COLLECTION).await?;
        Ok(decode_all(docs))
    }

    /// The record with `id`, or `None` if there is none.
    pub async fn get_by_id(&self, id: ObjectId) -> Result<Option<R>> {
        match self.store.get_by_id(R::COLLECTION, id).await? {
            Some(doc) => Ok(Some(decode_one(&doc)?)),
            None => Ok(None),
        }
    }

    /// Like [`get_by_id`](Self::get_by_id) with the id given as hex text.
    pub async fn get_by_id_str(&self, id: &str) -> Result<Option<R>> {
        let id = ObjectId::parse_str(id)?;
        self.get_by_id(id).await
    }

    /// Case-insensitive pattern search on a text field.
    ///
    /// `pattern` is used as a regular expression as given; metacharacters are
    /// not escaped.
    pub async fn find_matching(&self, field: &str, pattern: &str) -> Result<Listing<R>> {
        check_field::<R>(field, R::TEXT_FIELDS)?;
        self.find(Filter::matches(field, pattern)).await
    }

    /// Exact-match search.
    pub async fn find_equal(&self, field: &str, value: impl Into<Bson>) -> Result<Listing<R>> {
        check_field::<R>(field, R::EXACT_FIELDS)?;
        self.find(Filter::equals(field, value)).await
    }

    /// Every record ordered by `field`. Records with equal keys come back in
    /// no particular order.
    pub async fn get_sorted(&self, field: &str, ascending: bool) -> Result<Listing<R>> {
        check_field::<R>(field, R::SORT_FIELDS)?;
        let docs = self
            .store
            .find_sorted(R::COLLECTION, field, SortOrder::from_ascending(ascending))
            .await?;
        Ok(decode_all(docs))
    }

    /// Insert a new record and return its store-assigned id.
    ///
    /// A record that already carries an id is inserted under that id.
    pub async fn add(&self, record: &R) -> Result<ObjectId> {
        let id = self.store.insert(R::COLLECTION, record.encode()).await?;
        debug!(collection = R::COLLECTION, %id, "Record added");
        Ok(id)
    }

    /// Hard-delete by id. Dependent records are left as they are.
    pub async fn delete(&self, id: ObjectId) -> Result<bool> {
        let removed = self.store.delete(R::COLLECTION, id).await?;
        debug!(collection = R::COLLECTION, %id, removed, "Record delete");
        Ok(removed)
    }

    async fn find(&self, filter: Filter) -> Result<Listing<R>> {
        let docs = self.store.find(R::COLLECTION, &filter).await?;
        Ok(decode_all(docs))
    }
}

fn check_field<R: Record>(field: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&field) {
        Ok(())
    } else {
        Err(StorageError::UnsupportedField {
            collection: R::COLLECTION,
            field: field.to_string(),
        })
    }
}

fn decode_one<R: Record>(doc: &Document) -> std::result::Result<R, MalformedRecord> {
    R::decode(doc).map_err(|source| MalformedRecord {
        collection: R::COLLECTION,
        id: codec::read_id(doc).ok().flatten(),
        source,
    })
}

fn decode_all<R: Record>(docs: Vec<Document>) -> Listing<R> {
    let mut listing = Listing::empty();
    for doc in &docs {
        match decode_one(doc) {
            Ok(record) => listing.records.push(record),
            Err(malformed) => {
                warn!("Skipping document: {}", malformed);
                listing.malformed.push(malformed);
            }
        }
    }
    listing
}

#[cfg(test)]
mod tests;
