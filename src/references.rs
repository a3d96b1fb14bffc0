//! Reference resolution.
//!
//! Records point at each other by id only (order → customer, order item →
//! furniture, details → furniture, material usage → material). Nothing
//! guarantees the target still exists, so a missing target is a normal
//! outcome here and is shown with a placeholder. Every call goes to the
//! store; there is no batching or caching.

use mongodb::bson::oid::ObjectId;

use crate::codec::Record;
use crate::interfaces::Result;
use crate::models::{Customer, Furniture, Material};
use crate::repository::Repository;

/// Shown in place of a record that a reference no longer points at.
pub const UNKNOWN: &str = "Unknown";

/// Outcome of following a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<R> {
    Found(R),
    /// The referenced id matched no record.
    Missing(ObjectId),
}

impl<R> Resolved<R> {
    pub fn found(self) -> Option<R> {
        match self {
            Resolved::Found(record) => Some(record),
            Resolved::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Resolved::Missing(_))
    }
}

/// A record with a short human-readable label.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for Customer {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Furniture {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Material {
    fn label(&self) -> &str {
        &self.name
    }
}

/// Follow a reference. A dangling id is `Resolved::Missing`, not an error.
pub async fn resolve<R: Record>(repo: &Repository<R>, id: ObjectId) -> Result<Resolved<R>> {
    Ok(match repo.get_by_id(id).await? {
        Some(record) => Resolved::Found(record),
        None => Resolved::Missing(id),
    })
}

/// Label of the referenced record, or [`UNKNOWN`] when it does not exist.
///
/// Store failures are still returned as errors.
pub async fn resolve_label<R: Record + Labeled>(
    repo: &Repository<R>,
    id: ObjectId,
) -> Result<String> {
    Ok(match resolve(repo, id).await? {
        Resolved::Found(record) => record.label().to_string(),
        Resolved::Missing(_) => UNKNOWN.to_string(),
    })
}
