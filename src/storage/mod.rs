//! Storage implementations.

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageConfig, StorageType};
use crate::interfaces::{DocumentStore, Result};

pub mod memory;
pub mod mongodb;

pub use self::memory::MemoryDocumentStore;
pub use self::mongodb::MongoDocumentStore;

/// Handle on the configured backend, owned by the process entry point.
pub enum Storage {
    Mongodb(Arc<MongoDocumentStore>),
    Memory(Arc<MemoryDocumentStore>),
}

impl Storage {
    /// The store shared by every repository.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        match self {
            Storage::Mongodb(store) => store.clone(),
            Storage::Memory(store) => store.clone(),
        }
    }

    /// Release the connection. Repositories still holding the store must be
    /// dropped first; otherwise the client is left to close on drop.
    pub async fn close(self) {
        match self {
            Storage::Mongodb(store) => match Arc::try_unwrap(store) {
                Ok(store) => store.close().await,
                Err(_) => tracing::warn!("MongoDB store still shared at close; leaving it to drop"),
            },
            Storage::Memory(_) => {}
        }
    }
}

/// Initialize storage based on configuration.
pub async fn init_storage(config: &StorageConfig) -> Result<Storage> {
    match config.storage_type {
        StorageType::Mongodb => {
            info!(
                "Storage: mongodb at {} (database {})",
                config.mongodb.uri, config.mongodb.database
            );
            let store = MongoDocumentStore::connect(&config.mongodb).await?;
            Ok(Storage::Mongodb(Arc::new(store)))
        }
        StorageType::Memory => {
            info!("Storage: in-memory");
            Ok(Storage::Memory(Arc::new(MemoryDocumentStore::new())))
        }
    }
}
