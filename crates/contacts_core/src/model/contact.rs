//! Contact domain model.
//!
//! # Responsibility
//! - Define the `Contact` record persisted in the `contacts` table.
//! - Provide the blank-check used by form validation.
//!
//! # Invariants
//! - `id == UNASSIGNED_CONTACT_ID` only before the first insert.
//! - Storage does not enforce non-blank `name`/`email`; callers do.

use serde::{Deserialize, Serialize};

/// Integer identity assigned by the store on insertion.
pub type ContactId = i64;

/// Identity carried by a contact that has not been stored yet.
///
/// Upserting a contact with this id makes the store assign a fresh one.
pub const UNASSIGNED_CONTACT_ID: ContactId = 0;

/// One persisted name/email pair.
///
/// Equality compares every field, which is also how deletes match rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
}

impl Contact {
    /// Creates a contact with an unassigned id, ready for upsert.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(UNASSIGNED_CONTACT_ID, name, email)
    }

    /// Creates a contact with a known id, as read back from the store.
    pub fn with_id(id: ContactId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns whether the store has assigned this contact an id.
    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED_CONTACT_ID
    }
}

/// Returns whether a text input holds at least one non-whitespace char.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}
