//! Storage bootstrap for the named `contacts` database.
//!
//! # Responsibility
//! - Locate the database file from configuration.
//! - Open SQLite connections that are ready for the repository.
//!
//! # Invariants
//! - A connection is handed out only after its schema is current.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// File name used for the named `contacts` store.
pub const CONTACTS_DB_FILE_NAME: &str = "contacts_db.sqlite3";

/// Environment variable overriding the store file location.
pub const CONTACTS_DB_PATH_ENV: &str = "CONTACTS_DB_PATH";

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the contacts database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a binary with a newer schema; there is no
    /// path back.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "contacts schema version {found} is unknown to this build (max {supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Picks the store file: `explicit` when non-blank, then
/// `CONTACTS_DB_PATH`, then `contacts_db.sqlite3` in the temp directory.
pub fn resolve_db_path(explicit: Option<&str>) -> PathBuf {
    let from_env = std::env::var(CONTACTS_DB_PATH_ENV).ok();
    let resolved = [explicit, from_env.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(CONTACTS_DB_FILE_NAME));
    resolved
}

#[cfg(test)]
mod tests {
    use super::resolve_db_path;
    use std::path::PathBuf;

    #[test]
    fn explicit_path_wins_and_is_trimmed() {
        assert_eq!(
            resolve_db_path(Some("  /data/contacts.db ")),
            PathBuf::from("/data/contacts.db")
        );
    }

    #[test]
    fn blank_explicit_path_falls_through() {
        let resolved = resolve_db_path(Some("   "));
        assert_ne!(resolved, PathBuf::from("   "));
        assert!(!resolved.as_os_str().is_empty());
    }
}
