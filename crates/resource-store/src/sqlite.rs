//! # SQLite Repository
//!
//! A generic [`Repository`] over a `rusqlite::Connection`. Row mapping is written by hand
//! in each entity's [`SqlEntity`] implementation; this module only assembles the SQL.
//!
//! Table layout convention: an `id INTEGER PRIMARY KEY AUTOINCREMENT` column followed by
//! the entity's [`SqlEntity::COLUMNS`]. `AUTOINCREMENT` keeps ids unique for the lifetime
//! of the database file, deletions included.
//!
//! Every connection also gets a `fold_case(text)` scalar that lowercases with full Unicode
//! case mapping. SQLite's built-in `lower()` only folds ASCII, so case-insensitive filters
//! should compare `fold_case` on both sides.

use crate::entity::ResourceEntity;
use crate::error::StoreError;
use crate::repository::Repository;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};

/// Explicit relational mapping for a record type with integer ids.
pub trait SqlEntity: ResourceEntity<Id = i64> {
    /// Table name.
    const TABLE: &'static str;

    /// Every column except `id`, in the order used by [`values`](Self::values)
    /// and [`draft_values`](Self::draft_values).
    const COLUMNS: &'static [&'static str];

    /// DDL applied when a repository opens. Must be idempotent.
    const SCHEMA: &'static str;

    /// Decodes a row laid out as `id, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> Result<Self, StoreError>;

    /// Column values of a persisted record.
    fn values(&self) -> Vec<Value>;

    /// Column values for a new record, including store-owned fields such as timestamps.
    fn draft_values(draft: Self::Draft) -> Vec<Value>;

    /// `WHERE` clause (with `?1`.. placeholders) and its arguments for a query.
    fn filter(query: &Self::Query) -> (&'static str, Vec<Value>);
}

/// Repository storing one entity type in one SQLite table.
pub struct SqliteRepository<T: SqlEntity> {
    conn: Connection,
    select_sql: String,
    insert_sql: String,
    save_sql: String,
    delete_sql: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: SqlEntity> SqliteRepository<T> {
    /// Opens (or creates) a database file and applies the entity schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!(table = T::TABLE, path = %path.display(), "Opening database");
        Self::bootstrap(Connection::open(path)?)
    }

    /// Opens a private in-memory database and applies the entity schema.
    pub fn in_memory() -> Result<Self, StoreError> {
        info!(table = T::TABLE, "Opening in-memory database");
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.create_scalar_function(
            "fold_case",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        conn.execute_batch(T::SCHEMA)?;

        let columns = T::COLUMNS.join(", ");
        let placeholders = (1..=T::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let id_and_placeholders = (1..=T::COLUMNS.len() + 1)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = T::COLUMNS
            .iter()
            .map(|c| format!("{c} = excluded.{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            select_sql: format!("SELECT id, {columns} FROM {}", T::TABLE),
            insert_sql: format!("INSERT INTO {} ({columns}) VALUES ({placeholders})", T::TABLE),
            save_sql: format!(
                "INSERT INTO {} (id, {columns}) VALUES ({id_and_placeholders}) \
                 ON CONFLICT(id) DO UPDATE SET {assignments}",
                T::TABLE
            ),
            delete_sql: format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
            conn,
            _entity: PhantomData,
        })
    }

    fn select(&self, sql: &str, args: Vec<Value>) -> Result<Vec<T>, StoreError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params_from_iter(args))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }

    fn reload(&self, id: i64) -> Result<T, StoreError> {
        let sql = format!("{} WHERE id = ?1", self.select_sql);
        self.select(&sql, vec![Value::Integer(id)])?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Storage(format!("row {id} missing after write")))
    }
}

impl<T: SqlEntity> Repository<T> for SqliteRepository<T> {
    fn find_all(&mut self) -> Result<Vec<T>, StoreError> {
        let sql = format!("{} ORDER BY id", self.select_sql);
        self.select(&sql, Vec::new())
    }

    fn find_by_id(&mut self, id: i64) -> Result<Option<T>, StoreError> {
        let sql = format!("{} WHERE id = ?1", self.select_sql);
        Ok(self.select(&sql, vec![Value::Integer(id)])?.into_iter().next())
    }

    fn query(&mut self, query: &T::Query) -> Result<Vec<T>, StoreError> {
        let (clause, args) = T::filter(query);
        let sql = format!("{} WHERE {clause} ORDER BY id", self.select_sql);
        self.select(&sql, args)
    }

    fn insert(&mut self, draft: T::Draft) -> Result<T, StoreError> {
        let values = T::draft_values(draft);
        self.conn
            .prepare_cached(&self.insert_sql)?
            .execute(params_from_iter(values))?;
        let id = self.conn.last_insert_rowid();
        debug!(table = T::TABLE, id, "Inserted row");
        self.reload(id)
    }

    fn save(&mut self, entity: T) -> Result<T, StoreError> {
        let id = entity.id();
        let mut values = Vec::with_capacity(T::COLUMNS.len() + 1);
        values.push(Value::Integer(id));
        values.extend(entity.values());
        self.conn
            .prepare_cached(&self.save_sql)?
            .execute(params_from_iter(values))?;
        debug!(table = T::TABLE, id, "Saved row");
        self.reload(id)
    }

    fn delete(&mut self, entity: &T) -> Result<(), StoreError> {
        let removed = self
            .conn
            .prepare_cached(&self.delete_sql)?
            .execute(params![entity.id()])?;
        debug!(table = T::TABLE, id = entity.id(), removed, "Deleted row");
        Ok(())
    }
}
