//! SQLite-backed generic repository.
//!
//! # Invariants
//! - Reads are ordered by `rowid`, so "first match" is the earliest insert.
//! - Writes only append to the shared staging list of the owning context.

use crate::model::validation::EntryState;
use crate::repo::{FieldValue, Record, RepoError, RepoResult, Repository};
use crate::uow::context::{DbContext, StagedWrite};
use log::debug;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use std::marker::PhantomData;
use std::rc::Rc;
use uuid::Uuid;

/// Repository over the table described by `T`.
///
/// Instances are created and owned by a `UnitOfWork`; callers only ever see
/// borrowed references to them.
pub struct SqliteRepository<T: Record> {
    context: Rc<DbContext>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteRepository<T> {
    pub(crate) fn new(context: Rc<DbContext>) -> Self {
        Self {
            context,
            _record: PhantomData,
        }
    }

    fn id_column() -> &'static str {
        T::COLUMNS[0]
    }

    fn select(&self, filter: Option<&str>, bind_values: Vec<Value>) -> RepoResult<Vec<T>> {
        let mut sql = format!("SELECT {} FROM {}", T::COLUMNS.join(", "), T::TABLE);
        if let Some(filter) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        sql.push_str(" ORDER BY rowid ASC;");

        let conn = self.context.conn();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }

    fn stage(&self, state: EntryState, entity: &T) {
        let (values, violations) = match state {
            EntryState::Deleted => (Vec::new(), Vec::new()),
            EntryState::Added | EntryState::Modified => (entity.to_values(), entity.validate()),
        };
        debug!(
            "event=repo_stage module=repo table={} state={} id={}",
            T::TABLE,
            state.as_str(),
            entity.id()
        );
        self.context.stage(StagedWrite {
            state,
            entity: T::ENTITY_NAME,
            table: T::TABLE,
            columns: T::COLUMNS,
            id: entity.id(),
            values,
            violations,
        });
    }
}

impl<T: Record> Repository<T> for SqliteRepository<T> {
    fn get_by_id(&self, id: Uuid) -> RepoResult<Option<T>> {
        let filter = format!("{} = ?1", Self::id_column());
        let mut records = self.select(Some(&filter), vec![Value::Text(id.to_string())])?;
        Ok(records.pop())
    }

    fn get_all(&self) -> RepoResult<Vec<T>> {
        self.select(None, Vec::new())
    }

    fn get_all_where<P>(&self, predicate: P) -> RepoResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.get_all()?;
        records.retain(|record| predicate(record));
        Ok(records)
    }

    fn get_all_by(&self, column: &str, value: impl Into<FieldValue>) -> RepoResult<Vec<T>> {
        let Some(column) = T::COLUMNS.iter().find(|known| **known == column) else {
            return Err(RepoError::UnknownColumn {
                table: T::TABLE,
                column: column.to_string(),
            });
        };
        let filter = format!("{column} = ?1");
        self.select(Some(&filter), vec![value.into().into_sql()])
    }

    fn get<P>(&self, predicate: P) -> RepoResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().find(|record| predicate(record)))
    }

    fn insert(&self, entity: &T) -> RepoResult<()> {
        self.stage(EntryState::Added, entity);
        Ok(())
    }

    fn update(&self, entity: &T) -> RepoResult<()> {
        self.stage(EntryState::Modified, entity);
        Ok(())
    }

    fn delete(&self, entity: &T) -> RepoResult<()> {
        self.stage(EntryState::Deleted, entity);
        Ok(())
    }

    fn delete_by_id(&self, id: Uuid) -> RepoResult<()> {
        let entity = self.get_by_id(id)?.ok_or(RepoError::NotFound {
            entity: T::ENTITY_NAME,
            id,
        })?;
        self.delete(&entity)
    }

    fn delete_where<P>(&self, predicate: P) -> RepoResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        let matching = self.get_all_where(predicate)?;
        for entity in &matching {
            self.delete(entity)?;
        }
        Ok(matching.len())
    }
}
