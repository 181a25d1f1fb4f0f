//! # Storage Traits
//!
//! The domain layer talks to persistence through a document-store
//! abstraction: JSON documents addressed by `(collection, id)`, each of which
//! can own ordered subcollections. Any backend offering per-document
//! transactional updates can sit behind it.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub type Document = Value;

/// Read-modify-write step run by [`DocumentStore::update_with`].
///
/// Receives the current document and returns the replacement. An `Err`
/// aborts the update and leaves the stored document untouched.
pub type DocumentMutation = Box<dyn Fn(Document) -> Result<Document> + Send + Sync>;

/// A document stored in a subcollection together with its id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when absent
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, document: &Document) -> Result<()>;

    /// Merge top-level fields into an existing document.
    /// Returns false when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<bool>;

    /// Apply `mutation` to a document as one indivisible update.
    ///
    /// Concurrent updates of the same document are serialised: no reader or
    /// writer ever observes a state that lost another writer's mutation. The
    /// mutation may run more than once when it races with another writer, so
    /// it must be a pure function of its input. Returns the stored result, or
    /// `None` when the document does not exist.
    async fn update_with(
        &self,
        collection: &str,
        id: &str,
        mutation: DocumentMutation,
    ) -> Result<Option<Document>>;

    /// Append a document to a subcollection and return its generated id
    async fn add_to_subcollection(
        &self,
        collection: &str,
        id: &str,
        subcollection: &str,
        document: &Document,
    ) -> Result<String>;

    /// All documents of a subcollection in insertion order
    async fn stream_subcollection(
        &self,
        collection: &str,
        id: &str,
        subcollection: &str,
    ) -> Result<Vec<StoredDocument>>;
}
