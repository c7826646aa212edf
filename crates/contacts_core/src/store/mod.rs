//! Contact store handle: the single owner of the SQLite connection.
//!
//! # Responsibility
//! - Serialize every statement through one connection lock.
//! - Publish a full snapshot after each write that changed the table.
//! - Run writes on the blocking pool for async callers.
//! - Offer a lazily-opened process-wide instance next to explicit handles.
//!
//! # Invariants
//! - A snapshot is taken under the same lock as its triggering write, so
//!   published snapshots are totally ordered.
//! - Snapshots are immutable; a new write publishes a new `Arc`.
//! - The shared instance is opened at most once per process.

mod subscription;

pub use subscription::ContactSubscription;

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{
    ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
use log::{debug, error, info};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinError;

/// Complete ordered set of contacts at one point in time.
pub type Snapshot = Arc<Vec<Contact>>;

pub type StoreResult<T> = Result<T, StoreError>;

static SHARED_STORE: OnceCell<ContactStore> = OnceCell::new();

/// Store-level error.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// The blocking write task panicked or was cancelled.
    Task(JoinError),
    /// `ContactStore::shared` was asked for a different file than the one
    /// already opened.
    SharedPathConflict {
        active: StoreLocation,
        requested: PathBuf,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "store task failed: {err}"),
            Self::SharedPathConflict { active, requested } => write!(
                f,
                "shared contact store already open at `{active}`; refusing to switch to `{}`",
                requested.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Task(err) => Some(err),
            Self::SharedPathConflict { .. } => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<JoinError> for StoreError {
    fn from(value: JoinError) -> Self {
        Self::Task(value)
    }
}

/// Where a store keeps its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, ":memory:"),
        }
    }
}

/// Cloneable handle to one opened contacts database.
///
/// Clones share the connection and the snapshot channel.
#[derive(Clone, Debug)]
pub struct ContactStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    location: StoreLocation,
    conn: Mutex<Connection>,
    snapshots: watch::Sender<Snapshot>,
}

impl ContactStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        Self::from_connection(conn, StoreLocation::File(path.to_path_buf()))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Self::from_connection(conn, StoreLocation::Memory)
    }

    /// Returns the process-wide store, opening it at `path` on first use.
    ///
    /// Concurrent first callers block until one of them has opened the
    /// database; all of them then share that instance.
    ///
    /// # Errors
    /// - Returns the open error when the first open fails; a later call
    ///   retries.
    /// - Returns `SharedPathConflict` when the instance lives at another path.
    pub fn shared(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let store = SHARED_STORE.get_or_try_init(|| Self::open(path))?;

        match &store.inner.location {
            StoreLocation::File(active) if active == path => Ok(store.clone()),
            active => Err(StoreError::SharedPathConflict {
                active: active.clone(),
                requested: path.to_path_buf(),
            }),
        }
    }

    fn from_connection(conn: Connection, location: StoreLocation) -> StoreResult<Self> {
        let initial = SqliteContactRepository::try_new(&conn)?.list_contacts()?;
        info!(
            "event=store_open module=store status=ok location={location} contacts={}",
            initial.len()
        );
        let (snapshots, _) = watch::channel(Arc::new(initial));

        Ok(Self {
            inner: Arc::new(StoreInner {
                location,
                conn: Mutex::new(conn),
                snapshots,
            }),
        })
    }

    /// Returns where this store keeps its rows.
    pub fn location(&self) -> &StoreLocation {
        &self.inner.location
    }

    /// Returns the latest published snapshot without waiting.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Subscribes to the live list of all contacts.
    ///
    /// The first `next()` yields the current snapshot; later calls wait for
    /// the next write.
    pub fn list_all(&self) -> ContactSubscription {
        ContactSubscription::new(self.inner.snapshots.subscribe())
    }

    /// Returns how many live subscriptions are attached to this store.
    pub fn subscriber_count(&self) -> usize {
        self.inner.snapshots.receiver_count()
    }

    /// Inserts `contact`, or replaces the row sharing its id.
    ///
    /// Suspends until the write is committed and its snapshot published.
    pub async fn upsert(&self, contact: Contact) -> StoreResult<()> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.upsert_blocking(&contact)).await??;
        Ok(())
    }

    /// Deletes the row equal to `contact` in every field.
    ///
    /// A contact that matches no row is ignored without error.
    pub async fn delete(&self, contact: Contact) -> StoreResult<()> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.delete_blocking(&contact)).await??;
        Ok(())
    }

    /// Blocking form of [`ContactStore::upsert`]; returns the written id.
    pub fn upsert_blocking(&self, contact: &Contact) -> StoreResult<ContactId> {
        let started_at = Instant::now();
        let id = self.write(|repo| {
            let id = repo.upsert_contact(contact)?;
            Ok((id, true))
        })?;
        debug!(
            "event=contact_upsert module=store status=ok contact_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    /// Blocking form of [`ContactStore::delete`]; returns removed rows.
    pub fn delete_blocking(&self, contact: &Contact) -> StoreResult<usize> {
        let started_at = Instant::now();
        let removed = self.write(|repo| {
            let removed = repo.delete_contact(contact)?;
            Ok((removed, removed > 0))
        })?;
        debug!(
            "event=contact_delete module=store status=ok contact_id={} removed={removed} duration_ms={}",
            contact.id,
            started_at.elapsed().as_millis()
        );
        Ok(removed)
    }

    /// Runs `op` under the connection lock and publishes a fresh snapshot
    /// when `op` reports that the table changed.
    ///
    /// The write is committed before the snapshot is read. A failed re-read
    /// is logged and leaves the previous snapshot published; it does not
    /// turn the committed write into an error.
    fn write<T>(
        &self,
        op: impl FnOnce(&SqliteContactRepository<'_>) -> RepoResult<(T, bool)>,
    ) -> StoreResult<T> {
        let conn = self.inner.conn.lock();
        let repo = SqliteContactRepository::new(&conn);
        let (output, changed) = op(&repo)?;
        if changed {
            match repo.list_contacts() {
                Ok(contacts) => {
                    self.inner.snapshots.send_replace(Arc::new(contacts));
                }
                Err(err) => error!(
                    "event=snapshot_publish module=store status=error error_code=snapshot_read_failed error={err}"
                ),
            }
        }
        Ok(output)
    }
}
