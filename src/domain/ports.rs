use crate::domain::model::{Record, Table};
use crate::utils::error::Result;
use async_trait::async_trait;
use mongodb::bson::Document;

/// Read side of a migration: the relational store holding the rows.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Reads every row of `table`, in arrival order.
    async fn extract(&self, table: Table) -> Result<Vec<Record>>;

    /// Releases the connection. Called exactly once, on success and on failure.
    async fn close(self);
}

/// Write side of a migration: the document store receiving the rows.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Removes every document from `collection`, returning how many were deleted.
    async fn clear(&self, collection: &str) -> Result<u64>;

    /// Inserts `documents` in order. A document whose `_id` already exists
    /// fails the whole call.
    async fn insert(&self, collection: &str, documents: Vec<Document>) -> Result<u64>;

    async fn close(self);
}
