//! Database context shared by the repositories of one unit of work.
//!
//! # Invariants
//! - Exactly one connection per context; it closes when the last owner
//!   (the unit of work and its repositories) is dropped.
//! - Staged writes execute in the order they were staged.

use crate::model::validation::{EntryState, FieldViolation};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params_from_iter, Connection};
use std::cell::{Cell, RefCell};
use uuid::Uuid;

pub(crate) struct DbContext {
    conn: Connection,
    pending: RefCell<Vec<StagedWrite>>,
    store_accesses: Cell<u64>,
}

impl DbContext {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn,
            pending: RefCell::new(Vec::new()),
            store_accesses: Cell::new(0),
        }
    }

    /// Hands out the connection for one statement and counts the access.
    pub(crate) fn conn(&self) -> &Connection {
        self.store_accesses.set(self.store_accesses.get() + 1);
        &self.conn
    }

    pub(crate) fn store_accesses(&self) -> u64 {
        self.store_accesses.get()
    }

    pub(crate) fn stage(&self, write: StagedWrite) {
        self.pending.borrow_mut().push(write);
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub(crate) fn take_pending(&self) -> Vec<StagedWrite> {
        self.pending.take()
    }

    /// Drops every staged write and returns how many were dropped.
    pub(crate) fn discard_pending(&self) -> usize {
        self.pending.take().len()
    }
}

/// One insert/update/delete recorded by a repository, executed on save.
#[derive(Debug)]
pub(crate) struct StagedWrite {
    pub state: EntryState,
    pub entity: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub id: Uuid,
    pub values: Vec<rusqlite::types::Value>,
    pub violations: Vec<FieldViolation>,
}

impl StagedWrite {
    fn sql(&self) -> String {
        let id_column = self.columns[0];
        match self.state {
            EntryState::Added => {
                let placeholders: Vec<String> =
                    (1..=self.columns.len()).map(|index| format!("?{index}")).collect();
                format!(
                    "INSERT INTO {} ({}) VALUES ({});",
                    self.table,
                    self.columns.join(", "),
                    placeholders.join(", ")
                )
            }
            EntryState::Modified => {
                let assignments: Vec<String> = self
                    .columns
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(index, column)| format!("{column} = ?{}", index + 1))
                    .collect();
                format!(
                    "UPDATE {} SET {} WHERE {id_column} = ?1;",
                    self.table,
                    assignments.join(", ")
                )
            }
            EntryState::Deleted => format!("DELETE FROM {} WHERE {id_column} = ?1;", self.table),
        }
    }

    /// Runs this write against the context connection.
    ///
    /// Updates and deletes that touch no row fail with `NotFound`.
    pub(crate) fn execute(&self, context: &DbContext) -> RepoResult<()> {
        let sql = self.sql();
        let changed = match self.state {
            EntryState::Deleted => context.conn().execute(&sql, [self.id.to_string()])?,
            EntryState::Added | EntryState::Modified => context
                .conn()
                .execute(&sql, params_from_iter(self.values.iter()))?,
        };

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: self.entity,
                id: self.id,
            });
        }
        Ok(())
    }
}
