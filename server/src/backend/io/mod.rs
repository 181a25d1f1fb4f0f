//! # IO Module
//!
//! Interface layer between HTTP clients and the domain logic.
//!
//! ## Supported Operations
//!
//! - **/user**: register, login, profile
//! - **/transactions, /balance, /summary**: the ledger
//! - **/goals**: savings goals and the next goal to work on
//! - **/chat**: transaction extraction and budgeting conversations

pub mod rest;
