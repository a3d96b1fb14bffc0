//! Workshop records - document-mapping persistence for a furniture workshop.
//!
//! Customers, furniture, materials, furniture specifications and orders are
//! stored as documents in five collections. Records are mapped to and from
//! documents by per-entity codecs and accessed through typed repositories
//! that share one explicitly opened store.

pub mod codec;
pub mod config;
pub mod interfaces;
pub mod models;
pub mod references;
pub mod repository;
pub mod services;
pub mod storage;
pub mod utils;
