//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for contact rows.
//! - Isolate SQLite query details from the store and view-model.
//!
//! # Invariants
//! - Repositories only operate on fully migrated connections.
//! - Deletes match the complete row, not the id alone.

pub mod contact_repo;
