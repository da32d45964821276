//! Unit of work: one database context, one repository per entity type, one
//! atomic save.
//!
//! # Responsibility
//! - Own the connection for a single logical operation.
//! - Lazily build and memoize the product and product-option repositories.
//! - Execute every staged write atomically on `save`.
//! - Record validation diagnostics before surfacing a validation error.
//!
//! # Invariants
//! - Repositories are only reachable by reference, so they never outlive
//!   the unit of work.
//! - The connection is released exactly once, when the unit of work drops.
//! - Pending writes are cleared after every `save`, successful or not.
//! - Not `Send`/`Sync`: one unit of work serves one request on one thread.

pub(crate) mod context;
mod scope;

pub use scope::TransactionScope;

use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::diagnostics::{DiagnosticSink, FileDiagnosticSink, LogDiagnosticSink};
use crate::model::product::{Product, ProductOption};
use crate::model::validation::{EntityViolations, ValidationFailure};
use crate::repo::{RepoError, RepoResult, SqliteRepository};
use context::{DbContext, StagedWrite};
use log::{debug, error, info, warn};
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const SAVE_SAVEPOINT: &str = "uow_save";

pub struct UnitOfWork {
    context: Rc<DbContext>,
    products: OnceCell<SqliteRepository<Product>>,
    product_options: OnceCell<SqliteRepository<ProductOption>>,
    diagnostics: Box<dyn DiagnosticSink>,
    scope_open: Cell<bool>,
}

impl UnitOfWork {
    /// Wraps an already bootstrapped connection.
    pub fn new(conn: Connection) -> Self {
        debug!("event=uow_open module=uow status=ok");
        Self {
            context: Rc::new(DbContext::new(conn)),
            products: OnceCell::new(),
            product_options: OnceCell::new(),
            diagnostics: Box::new(LogDiagnosticSink),
            scope_open: Cell::new(false),
        }
    }

    /// Opens (and if needed initializes) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Opens the configured database and attaches the configured
    /// diagnostics file, if any.
    pub fn from_config(config: &CoreConfig) -> RepoResult<Self> {
        let uow = Self::open(&config.db_path)?;
        Ok(match &config.diagnostics_path {
            Some(path) => uow.with_diagnostics(FileDiagnosticSink::new(path)),
            None => uow,
        })
    }

    /// Replaces the validation diagnostics sink.
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    pub fn products(&self) -> &SqliteRepository<Product> {
        self.products
            .get_or_init(|| SqliteRepository::new(Rc::clone(&self.context)))
    }

    pub fn product_options(&self) -> &SqliteRepository<ProductOption> {
        self.product_options
            .get_or_init(|| SqliteRepository::new(Rc::clone(&self.context)))
    }

    /// Number of writes staged since the last save.
    pub fn pending_writes(&self) -> usize {
        self.context.pending_len()
    }

    /// Number of statements issued against the store so far.
    pub fn store_access_count(&self) -> u64 {
        self.context.store_accesses()
    }

    /// Opens an explicit transaction boundary around staging and saving.
    ///
    /// Dropping the returned scope without `complete()` rolls back every
    /// change made inside it and discards pending writes.
    pub fn begin_scope(&self) -> RepoResult<TransactionScope<'_>> {
        if self.scope_open.get() {
            return Err(RepoError::ScopeAlreadyOpen);
        }
        let scope = TransactionScope::begin(self)?;
        self.scope_open.set(true);
        Ok(scope)
    }

    /// Executes every staged write as one atomic change.
    ///
    /// Returns the number of writes applied.
    ///
    /// # Errors
    /// - `RepoError::Validation` when any staged record breaks a field rule;
    ///   diagnostics are recorded first and nothing is written.
    /// - `RepoError::NotFound` when an update/delete matched no row.
    /// - `RepoError::Constraint` / `RepoError::Db` from the store; all
    ///   writes of this save are rolled back.
    pub fn save(&self) -> RepoResult<usize> {
        let started_at = Instant::now();
        let pending = self.context.take_pending();
        if pending.is_empty() {
            debug!("event=uow_save module=uow status=ok writes=0");
            return Ok(0);
        }

        if let Some(failure) = collect_violations(&pending) {
            self.record_diagnostics(&failure);
            return Err(RepoError::Validation(failure));
        }

        self.context
            .conn()
            .execute_batch(&format!("SAVEPOINT {SAVE_SAVEPOINT};"))?;
        let applied = pending
            .iter()
            .try_for_each(|write| write.execute(&self.context))
            .and_then(|()| {
                self.context
                    .conn()
                    .execute_batch(&format!("RELEASE {SAVE_SAVEPOINT};"))
                    .map_err(RepoError::from)
            });

        if let Err(err) = applied {
            self.rollback_save();
            error!(
                "event=uow_save module=uow status=error writes={} duration_ms={} error={err}",
                pending.len(),
                started_at.elapsed().as_millis()
            );
            return Err(err);
        }

        info!(
            "event=uow_save module=uow status=ok writes={} duration_ms={}",
            pending.len(),
            started_at.elapsed().as_millis()
        );
        Ok(pending.len())
    }

    pub(crate) fn context(&self) -> &DbContext {
        &self.context
    }

    pub(crate) fn close_scope(&self) {
        self.scope_open.set(false);
    }

    fn rollback_save(&self) {
        let sql = format!("ROLLBACK TO {SAVE_SAVEPOINT}; RELEASE {SAVE_SAVEPOINT};");
        if let Err(err) = self.context.conn().execute_batch(&sql) {
            error!("event=uow_save module=uow status=rollback_failed error={err}");
        }
    }

    fn record_diagnostics(&self, failure: &ValidationFailure) {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        warn!(
            "event=validation_failed module=uow status=error entities={} violations={}",
            failure.entries.len(),
            failure.violation_count()
        );
        if let Err(err) = self
            .diagnostics
            .record(&failure.diagnostic_lines(timestamp_ms))
        {
            error!("event=validation_failed module=uow status=sink_error error={err}");
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        let discarded = self.context.discard_pending();
        if discarded > 0 {
            warn!("event=uow_dispose module=uow status=discarded writes={discarded}");
        }
        debug!(
            "event=uow_dispose module=uow status=ok store_accesses={}",
            self.context.store_accesses()
        );
    }
}

fn collect_violations(pending: &[StagedWrite]) -> Option<ValidationFailure> {
    let entries: Vec<EntityViolations> = pending
        .iter()
        .filter(|write| !write.violations.is_empty())
        .map(|write| EntityViolations {
            entity: write.entity,
            id: write.id,
            state: write.state,
            violations: write.violations.clone(),
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(ValidationFailure { entries })
    }
}
