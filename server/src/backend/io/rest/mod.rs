//! # REST API Interface Layer
//!
//! HTTP endpoints of the budget tracker. This layer only translates:
//! DTOs from the `shared` crate become domain commands, domain results become
//! DTOs, and domain errors become status codes with a JSON `{"error": ...}`
//! body. No business rule lives here.
//!
//! ## Status Codes
//!
//! - **200**: success
//! - **400**: invalid input, malformed JSON, rejected credentials
//! - **404**: unknown account
//! - **502**: store, identity provider or language model failed

pub mod chat_apis;
pub mod error;
pub mod goal_apis;
pub mod mappers;
pub mod transaction_apis;
pub mod user_apis;

pub use error::ApiError;
