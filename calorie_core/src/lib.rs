#![forbid(unsafe_code)]

//! Core domain model and bookkeeping for the kcal calorie tracker.
//!
//! This crate provides:
//! - Domain types (entries, entry kinds, summaries)
//! - The calorie ledger and its running balance
//! - Persistence (durable store trait, in-memory and JSON file stores)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod json_store;
pub mod ledger;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{DurableStore, MemoryStore, ScalarKey, StoreDocument};
pub use json_store::JsonFileStore;
pub use ledger::Ledger;
