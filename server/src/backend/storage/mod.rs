//! # Storage Module
//!
//! Handles all data persistence for the budget tracker.
//!
//! The domain layer never sees SQL or JSON documents directly. It goes
//! through repositories, which map documents to domain models on top of the
//! [`DocumentStore`] abstraction.
//!
//! ## Components
//!
//! - **traits.rs** - the `DocumentStore` contract
//! - **connection.rs** - SQLite pool and schema setup
//! - **sqlite/** - `SqliteDocumentStore`, locked per-document transactions
//! - **repositories/** - account and goal repositories
//!
//! ## Layout
//!
//! - `users/{uid}` - account document: profile fields, balance and the
//!   period-keyed entry buckets
//! - `users/{uid}/goals/{goalId}` - one document per goal

pub mod connection;
pub mod repositories;
pub mod sqlite;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{AccountRepository, GoalRepository};
pub use sqlite::SqliteDocumentStore;
pub use traits::{Document, DocumentMutation, DocumentStore, StoredDocument};
