//! Domain model for persisted contacts.
//!
//! # Responsibility
//! - Define the canonical record shared by the store and the view-model.
//!
//! # Invariants
//! - Every stored contact has a store-assigned `ContactId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
