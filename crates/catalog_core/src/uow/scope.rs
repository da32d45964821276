//! Explicit transaction boundary over a unit of work.

use crate::repo::RepoResult;
use crate::uow::UnitOfWork;
use log::{debug, error, warn};
use rusqlite::{Transaction, TransactionBehavior};
use std::time::Instant;

/// Commits on `complete()`, rolls back on drop otherwise.
pub struct TransactionScope<'uow> {
    uow: &'uow UnitOfWork,
    tx: Option<Transaction<'uow>>,
    started_at: Instant,
}

impl<'uow> TransactionScope<'uow> {
    pub(crate) fn begin(uow: &'uow UnitOfWork) -> RepoResult<Self> {
        let tx = Transaction::new_unchecked(uow.context().conn(), TransactionBehavior::Immediate)?;
        debug!("event=uow_scope module=uow status=begin");
        Ok(Self {
            uow,
            tx: Some(tx),
            started_at: Instant::now(),
        })
    }

    /// Marks the scope successful and commits everything saved inside it.
    pub fn complete(mut self) -> RepoResult<()> {
        let leftover = self.uow.context().discard_pending();
        if leftover > 0 {
            warn!("event=uow_scope module=uow status=unsaved_writes writes={leftover}");
        }

        let Some(tx) = self.tx.take() else {
            return Ok(());
        };
        if let Err(err) = tx.commit() {
            error!(
                "event=uow_scope module=uow status=commit_failed duration_ms={} error={err}",
                self.started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
        debug!(
            "event=uow_scope module=uow status=committed duration_ms={}",
            self.started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let discarded = self.uow.context().discard_pending();
            if let Err(err) = tx.rollback() {
                error!("event=uow_scope module=uow status=rollback_failed error={err}");
            }
            debug!(
                "event=uow_scope module=uow status=rolled_back discarded_writes={discarded} duration_ms={}",
                self.started_at.elapsed().as_millis()
            );
        }
        self.uow.close_scope();
    }
}
