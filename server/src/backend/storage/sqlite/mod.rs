//! # SQLite Storage Module
//!
//! SQLite-backed implementation of the document store.

pub mod document_store;

pub use document_store::SqliteDocumentStore;
