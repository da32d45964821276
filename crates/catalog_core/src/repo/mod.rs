//! Repository layer: a generic, table-parameterized CRUD accessor.
//!
//! # Responsibility
//! - Describe how one row struct maps onto one table (`Record`).
//! - Provide the read/stage contract every entity repository offers
//!   (`Repository`).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Reads hit the store immediately and return materialized collections.
//! - Writes are only staged; the owning `UnitOfWork` executes them on save.
//! - Absence is a value (`None` / empty `Vec`), never an error, on reads.

use crate::db::DbError;
use crate::model::validation::{FieldViolation, ValidationFailure};
use rusqlite::types::Value;
use rusqlite::{ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod generic_repo;
mod records;

pub use generic_repo::SqliteRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors raised by repositories and the unit of work.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite or bootstrap failure.
    Db(DbError),
    /// No row matched the requested identity.
    NotFound { entity: &'static str, id: Uuid },
    /// Staged records broke field rules; nothing was written.
    Validation(ValidationFailure),
    /// The store rejected the commit on a constraint (foreign key, unique).
    Constraint(String),
    /// Persisted row cannot be converted into a record.
    InvalidData(String),
    /// Equality lookup named a column the table does not have.
    UnknownColumn {
        table: &'static str,
        column: String,
    },
    /// A transaction scope is already open on this unit of work.
    ScopeAlreadyOpen,
}

impl RepoError {
    /// Returns whether the failure is a busy/locked store that may succeed
    /// on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Db(err) => matches!(
                err.sqlite_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Validation(failure) => write!(f, "{failure}"),
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnknownColumn { table, column } => {
                write!(f, "table `{table}` has no column `{column}`")
            }
            Self::ScopeAlreadyOpen => write!(f, "a transaction scope is already open"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(failure) => Some(failure),
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
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::Constraint(value.to_string());
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Value compared by an equality lookup.
///
/// Ids compare against their hyphenated text form, the stored shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Id(Uuid),
    Null,
}

impl FieldValue {
    pub(crate) fn into_sql(self) -> Value {
        match self {
            Self::Text(text) => Value::Text(text),
            Self::Integer(number) => Value::Integer(number),
            Self::Id(id) => Value::Text(id.to_string()),
            Self::Null => Value::Null,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Id(value)
    }
}

/// Maps one row struct onto one table.
///
/// `COLUMNS[0]` is the identity column; `to_values` must yield values in
/// `COLUMNS` order.
pub trait Record: Sized {
    const TABLE: &'static str;
    const ENTITY_NAME: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Uuid;
    fn to_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
    fn validate(&self) -> Vec<FieldViolation>;
}

/// CRUD contract over one entity table.
pub trait Repository<T: Record> {
    /// Loads one record by identity.
    fn get_by_id(&self, id: Uuid) -> RepoResult<Option<T>>;
    /// Loads every record in insertion order.
    fn get_all(&self) -> RepoResult<Vec<T>>;
    /// Loads every record matching `predicate`, in insertion order.
    fn get_all_where<P>(&self, predicate: P) -> RepoResult<Vec<T>>
    where
        P: Fn(&T) -> bool;
    /// Loads every record whose `column` equals `value`, filtered in SQL.
    fn get_all_by(&self, column: &str, value: impl Into<FieldValue>) -> RepoResult<Vec<T>>;
    /// Loads the first record matching `predicate`.
    fn get<P>(&self, predicate: P) -> RepoResult<Option<T>>
    where
        P: Fn(&T) -> bool;
    /// Stages creation of `entity`.
    fn insert(&self, entity: &T) -> RepoResult<()>;
    /// Stages full replacement of the stored row with `entity`.
    fn update(&self, entity: &T) -> RepoResult<()>;
    /// Stages removal of `entity`.
    fn delete(&self, entity: &T) -> RepoResult<()>;
    /// Resolves `id` and stages its removal.
    fn delete_by_id(&self, id: Uuid) -> RepoResult<()>;
    /// Stages removal of every record currently matching `predicate` and
    /// returns how many were staged.
    fn delete_where<P>(&self, predicate: P) -> RepoResult<usize>
    where
        P: Fn(&T) -> bool;
}
