//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/upsert/delete APIs over the `contacts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Listing order is ascending `id`, which is insertion order.
//! - Upsert replaces the existing row on `id` collision.
//! - Delete removes only a row equal to the given contact in every field.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, UNASSIGNED_CONTACT_ID};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT id, name, email FROM contacts";
const CONTACTS_TABLE: &str = "contacts";
const REQUIRED_CONTACT_COLUMNS: &[&str] = &["id", "name", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact rows.
pub trait ContactRepository {
    /// Returns every stored contact in ascending `id` order.
    fn list_contacts(&self) -> RepoResult<Vec<Contact>>;

    /// Inserts `contact`, or replaces the row sharing its `id`.
    ///
    /// Returns the id of the written row, freshly assigned when
    /// `contact.id` is unassigned.
    fn upsert_contact(&self, contact: &Contact) -> RepoResult<ContactId>;

    /// Deletes the row equal to `contact` in every field.
    ///
    /// Returns the number of removed rows; `0` means the contact was stale
    /// or already gone.
    fn delete_contact(&self, contact: &Contact) -> RepoResult<usize>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Wraps a connection without checking its schema.
    ///
    /// Callers must pass a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after checking that it is migrated and carries
    /// the expected `contacts` columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, CONTACTS_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(CONTACTS_TABLE));
        }
        if let Some(column) = REQUIRED_CONTACT_COLUMNS
            .iter()
            .copied()
            .find(|required| !columns.iter().any(|name| name == required))
        {
            return Err(RepoError::MissingRequiredColumn {
                table: CONTACTS_TABLE,
                column,
            });
        }

        Ok(Self::new(conn))
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn upsert_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        if contact.id == UNASSIGNED_CONTACT_ID {
            self.conn.execute(
                "INSERT INTO contacts (name, email) VALUES (?1, ?2);",
                params![contact.name.as_str(), contact.email.as_str()],
            )?;
            return Ok(self.conn.last_insert_rowid());
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO contacts (id, name, email) VALUES (?1, ?2, ?3);",
            params![contact.id, contact.name.as_str(), contact.email.as_str()],
        )?;
        Ok(contact.id)
    }

    fn delete_contact(&self, contact: &Contact) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM contacts WHERE id = ?1 AND name = ?2 AND email = ?3;",
            params![contact.id, contact.name.as_str(), contact.email.as_str()],
        )?;
        Ok(removed)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;
    if id == UNASSIGNED_CONTACT_ID {
        return Err(RepoError::InvalidData(
            "contacts.id holds the unassigned id 0".to_string(),
        ));
    }

    Ok(Contact {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
