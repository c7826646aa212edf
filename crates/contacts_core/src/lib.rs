//! Core domain logic for the contacts screen.
//! This crate is the single source of truth for stored contacts and the
//! screen state derived from them.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;
pub mod worker;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{is_filled, Contact, ContactId, UNASSIGNED_CONTACT_ID};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use store::{
    ContactStore, ContactSubscription, Snapshot, StoreError, StoreLocation, StoreResult,
};
pub use view::form::{ContactForm, FILL_ALL_FIELDS_MESSAGE};
pub use view::mirror::ContactMirror;
pub use view::screen::{ContactScreen, RowModel, ScreenModel, SubmitOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
