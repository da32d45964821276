//! SQLite store bootstrap for the catalog.
//!
//! # Responsibility
//! - Open connections configured the way every repository expects them.
//! - Install the catalog schema before any record is read or written.
//!
//! # Invariants
//! - Every returned connection enforces foreign keys.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Store bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The store was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// SQLite primary error code, when the failure came from SQLite.
    pub fn sqlite_code(&self) -> Option<rusqlite::ErrorCode> {
        if let Self::Sqlite(err) = self {
            err.sqlite_error_code()
        } else {
            None
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "catalog schema v{found} is newer than this build supports (v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
