//! Catalog schema installation.
//!
//! # Invariants
//! - The installed schema version lives in `PRAGMA user_version`.
//! - A store stamped with a newer version than `SCHEMA_VERSION` is never
//!   touched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const CATALOG_SCHEMA: &str = include_str!("catalog.sql");

/// Reads the schema version stamped on `conn`; `0` for a fresh store.
pub fn installed_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Creates the catalog tables when missing and stamps `SCHEMA_VERSION`.
///
/// Table creation and the version stamp commit together.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = installed_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CATALOG_SCHEMA)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!("event=db_schema module=db status=installed from={found} to={SCHEMA_VERSION}");
    Ok(())
}
