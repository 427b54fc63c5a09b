//! Store mapping for [`User`].
//!
//! `created_at` is written as RFC 3339 text. It is stamped in
//! [`draft_values`](SqlEntity::draft_values), i.e. on the store thread at insert time, and
//! [`revise`](ResourceEntity::revise) carries it over so a save never changes it.

use crate::model::{User, UserDraft, UserQuery};
use chrono::{DateTime, Utc};
use resource_store::{ResourceEntity, SqlEntity, StoreError};
use rusqlite::types::Value;
use rusqlite::Row;

impl ResourceEntity for User {
    type Id = i64;
    type Draft = UserDraft;
    type Query = UserQuery;

    fn id(&self) -> i64 {
        self.id
    }

    fn revise(&self, draft: UserDraft) -> Self {
        Self {
            id: self.id,
            name: draft.name,
            email: draft.email,
            created_at: self.created_at,
        }
    }

    fn uniqueness_probe(draft: &UserDraft) -> Option<UserQuery> {
        Some(UserQuery::ByEmail(draft.email.clone()))
    }
}

impl SqlEntity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "email", "created_at"];
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    );";

    fn from_row(row: &Row<'_>) -> Result<Self, StoreError> {
        let created_at: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::InvalidData(format!("created_at {created_at:?}: {e}")))?
            .with_timezone(&Utc);

        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            created_at,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.email.clone()),
            Value::Text(self.created_at.to_rfc3339()),
        ]
    }

    fn draft_values(draft: UserDraft) -> Vec<Value> {
        vec![
            Value::Text(draft.name),
            Value::Text(draft.email),
            Value::Text(Utc::now().to_rfc3339()),
        ]
    }

    fn filter(query: &UserQuery) -> (&'static str, Vec<Value>) {
        match query {
            UserQuery::ByEmail(email) => ("email = ?1", vec![Value::Text(email.clone())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::{Repository, SqliteRepository};

    #[test]
    fn insert_stamps_created_at_and_save_keeps_it() {
        let mut repo = SqliteRepository::<User>::in_memory().unwrap();
        let before = Utc::now();
        let user = repo.insert(UserDraft::new("Ada", "ada@x.com")).unwrap();
        assert!(user.created_at >= before && user.created_at <= Utc::now());

        let saved = repo
            .save(user.revise(UserDraft::new("Ada L.", "ada@y.com")))
            .unwrap();
        assert_eq!(saved.created_at, user.created_at);
        assert_eq!(saved.email, "ada@y.com");
    }

    #[test]
    fn email_lookup_is_exact_and_case_sensitive() {
        let mut repo = SqliteRepository::<User>::in_memory().unwrap();
        repo.insert(UserDraft::new("Ada", "ada@x.com")).unwrap();

        let hits = repo.query(&UserQuery::ByEmail("ada@x.com".into())).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(repo
            .query(&UserQuery::ByEmail("ADA@x.com".into()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn duplicate_email_is_a_conflict_at_the_storage_level() {
        let mut repo = SqliteRepository::<User>::in_memory().unwrap();
        repo.insert(UserDraft::new("Ada", "ada@x.com")).unwrap();
        let other = repo.insert(UserDraft::new("Bob", "bob@x.com")).unwrap();

        let err = repo.insert(UserDraft::new("Eve", "ada@x.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = repo
            .save(other.revise(UserDraft::new("Bob", "ada@x.com")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn corrupt_timestamp_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");

        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(User::SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES ('x', 'x@x', 'yesterday')",
            [],
        )
        .unwrap();
        drop(conn);

        let mut repo = SqliteRepository::<User>::open(&path).unwrap();
        let err = repo.find_all().unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)), "got {err:?}");
    }
}
