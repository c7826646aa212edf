//! Versioned schema steps for the contacts database.
//!
//! The schema version lives in `PRAGMA user_version`. Pending steps run in
//! one transaction; a database newer than this build is refused.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// `(version, sql)` pairs in increasing version order.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the connection's schema up to `latest_version()`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = current_user_version(conn)?;
    let supported = latest_version();

    match found.cmp(&supported) {
        Ordering::Greater => Err(DbError::UnsupportedSchemaVersion { found, supported }),
        Ordering::Equal => Ok(()),
        Ordering::Less => {
            let tx = conn.transaction()?;
            for (version, sql) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > found) {
                tx.execute_batch(sql)?;
                tx.pragma_update(None, "user_version", version)?;
            }
            tx.commit()?;
            info!("event=db_migrate module=db status=ok from_version={found} to_version={supported}");
            Ok(())
        }
    }
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
