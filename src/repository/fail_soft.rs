//! Fail-soft adapters.
//!
//! Callers that prefer "no data" over an error (a list view that must keep
//! rendering while the store is down) opt in per call. Errors are logged
//! before being dropped.

use tracing::warn;

use super::Listing;
use crate::interfaces::Result;

/// Degrade a storage result to its empty value.
pub trait FailSoft {
    type Output;

    fn fail_soft(self) -> Self::Output;
}

impl<R> FailSoft for Result<Listing<R>> {
    type Output = Listing<R>;

    fn fail_soft(self) -> Listing<R> {
        self.unwrap_or_else(|e| {
            warn!("Listing degraded to empty: {}", e);
            Listing::empty()
        })
    }
}

impl<R> FailSoft for Result<Option<R>> {
    type Output = Option<R>;

    fn fail_soft(self) -> Option<R> {
        self.unwrap_or_else(|e| {
            warn!("Lookup degraded to absent: {}", e);
            None
        })
    }
}

impl FailSoft for Result<bool> {
    type Output = bool;

    fn fail_soft(self) -> bool {
        self.unwrap_or_else(|e| {
            warn!("Mutation degraded to false: {}", e);
            false
        })
    }
}

impl FailSoft for Result<mongodb::bson::oid::ObjectId> {
    type Output = Option<mongodb::bson::oid::ObjectId>;

    fn fail_soft(self) -> Self::Output {
        self.map_err(|e| warn!("Insert degraded to failure: {}", e)).ok()
    }
}
