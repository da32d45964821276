//! Catalog use-case services.
//!
//! # Responsibility
//! - Expose product and product-option use cases over one unit of work.
//! - Wrap every mutation in an explicit transaction scope.
//! - Translate repository failures into caller-actionable categories.
//!
//! # Invariants
//! - A nil identifier on any required id fails before the store is touched.
//! - Reads never start a transaction scope.
//! - A failed mutation leaves the store exactly as it was before the call.

pub mod product_option_service;
pub mod product_service;

use crate::model::validation::ValidationFailure;
use crate::repo::RepoError;
use crate::uow::UnitOfWork;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Why a service call failed.
#[derive(Debug)]
pub enum ServiceError {
    /// A required identifier was the unset (nil) value.
    InvalidInput(&'static str),
    /// The target record does not exist.
    NotFound { entity: &'static str, id: Uuid },
    /// Staged records broke field rules; diagnostics were already recorded.
    Validation(ValidationFailure),
    /// The store rejected the change on a constraint.
    Conflict(String),
    /// The store was busy or locked; the call may succeed on retry.
    Transient(RepoError),
    /// Any other store failure.
    Store(RepoError),
}

impl ServiceError {
    /// Returns whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Validation(failure) => write!(f, "{failure}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::Transient(err) => write!(f, "store temporarily unavailable: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(failure) => Some(failure),
            Self::Transient(err) | Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Validation(failure) => Self::Validation(failure),
            RepoError::Constraint(message) => Self::Conflict(message),
            other if other.is_transient() => Self::Transient(other),
            other => Self::Store(other),
        }
    }
}

pub(crate) fn require_id(id: Uuid, message: &'static str) -> ServiceResult<()> {
    if id.is_nil() {
        return Err(ServiceError::InvalidInput(message));
    }
    Ok(())
}

/// Runs `body` inside a transaction scope: stage, save, complete.
///
/// Any error releases the scope uncompleted, rolling back every change.
pub(crate) fn run_in_transaction<T, F>(
    uow: &UnitOfWork,
    operation: &'static str,
    body: F,
) -> ServiceResult<T>
where
    F: FnOnce(&UnitOfWork) -> ServiceResult<T>,
{
    let started_at = Instant::now();
    let result = transact(uow, body);
    match &result {
        Ok(_) => info!(
            "event=service_call module=service op={operation} status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=service_call module=service op={operation} status=error duration_ms={} retryable={} error={err}",
            started_at.elapsed().as_millis(),
            err.is_retryable()
        ),
    }
    result
}

fn transact<T, F>(uow: &UnitOfWork, body: F) -> ServiceResult<T>
where
    F: FnOnce(&UnitOfWork) -> ServiceResult<T>,
{
    let scope = uow.begin_scope()?;
    let value = body(uow)?;
    uow.save()?;
    scope.complete()?;
    Ok(value)
}
