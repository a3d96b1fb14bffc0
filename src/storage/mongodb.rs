//! MongoDB implementation of DocumentStore.
//!
//! One `MongoDocumentStore` holds the single client for the process. The
//! driver connects lazily, so construction does no network I/O; failures
//! surface on the first operation.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::{error, info};

use crate::codec::ID_FIELD;
use crate::config::MongodbConfig;
use crate::interfaces::{DocumentStore, Filter, Result, SortOrder, StorageError};

/// MongoDB-backed document store.
pub struct MongoDocumentStore {
    client: Client,
    database: Database,
}

impl MongoDocumentStore {
    /// Build the client from configuration.
    pub async fn connect(config: &MongodbConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        if let Some(app_name) = &config.app_name {
            options.app_name = Some(app_name.clone());
        }
        if let Some(ms) = config.server_selection_timeout_ms {
            options.server_selection_timeout = Some(Duration::from_millis(ms));
        }

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        info!(database = %config.database, "MongoDB client created");

        Ok(Self { client, database })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        Self { client, database }
    }

    /// Named collection handle. Does no I/O and never fails by itself.
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Round-trip to the server to check it is reachable.
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| unavailable("ping", self.database.name(), e))?;
        Ok(())
    }

    /// Shut the client down. Consumes the store so it happens once.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("MongoDB connection closed");
    }
}

fn unavailable(op: &str, collection: &str, e: mongodb::error::Error) -> StorageError {
    error!(collection, "Error during {}: {}", op, e);
    StorageError::from(e)
}

async fn collect(
    mut cursor: mongodb::Cursor<Document>,
    op: &str,
    collection: &str,
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| unavailable(op, collection, e))?
    {
        let doc = cursor
            .deserialize_current()
            .map_err(|e| unavailable(op, collection, e))?;
        documents.push(doc);
    }
    Ok(documents)
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(|e| unavailable("list", collection, e))?;
        collect(cursor, "list", collection).await
    }

    async fn get_by_id(&self, collection: &str, id: ObjectId) -> Result<Option<Document>> {
        self.collection(collection)
            .find_one(doc! { ID_FIELD: id })
            .await
            .map_err(|e| unavailable("get by id", collection, e))
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(filter.to_document())
            .await
            .map_err(|e| unavailable("find", collection, e))?;
        collect(cursor, "find", collection).await
    }

    async fn find_sorted(
        &self,
        collection: &str,
        field: &str,
        order: SortOrder,
    ) -> Result<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(doc! {})
            .sort(doc! { field: order.direction() })
            .await
            .map_err(|e| unavailable("sorted find", collection, e))?;
        collect(cursor, "sorted find", collection).await
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId> {
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| unavailable("insert", collection, e))?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            StorageError::Unavailable(format!(
                "insert into {} returned a non-ObjectId id: {}",
                collection, result.inserted_id
            ))
        })
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> Result<bool> {
        let result = self
            .collection(collection)
            .delete_one(doc! { ID_FIELD: id })
            .await
            .map_err(|e| unavailable("delete", collection, e))?;
        Ok(result.deleted_count == 1)
    }
}
