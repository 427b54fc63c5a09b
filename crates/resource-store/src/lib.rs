//! # Resource Store
//!
//! This crate provides the persistence building blocks shared by the record services.
//! Each record type (Product, User) gets one **store actor** that exclusively owns a
//! repository, and any number of cheap **clients** that talk to it over channels.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into four layers:
//!
//! 1. **Entity Layer** ([`ResourceEntity`], [`SqlEntity`]) - what a record is and how it maps to a table
//! 2. **Persistence Layer** ([`Repository`], [`SqliteRepository`]) - synchronous CRUD over one table
//! 3. **Runtime Layer** ([`StoreActor`]) - serializes every repository call on one thread
//! 4. **Interface Layer** ([`StoreClient`]) - async, type-safe requests from handlers
//!
//! HTTP handlers never see a connection. They hold a `StoreClient<T>`, and the actor behind
//! it processes one request at a time, so two inserts can never receive the same id and
//! no lock guards the connection.
//!
//! ## Defining a Record Type
//!
//! ```rust
//! use resource_store::{ResourceEntity, SqlEntity, StoreError};
//! use rusqlite::{types::Value, Row};
//!
//! #[derive(Clone, Debug)]
//! struct Book { id: i64, title: String }
//!
//! #[derive(Debug)]
//! struct BookDraft { title: String }
//!
//! #[derive(Debug)]
//! enum BookQuery { Title(String) }
//!
//! impl ResourceEntity for Book {
//!     type Id = i64;
//!     type Draft = BookDraft;
//!     type Query = BookQuery;
//!
//!     fn id(&self) -> i64 { self.id }
//!     fn revise(&self, draft: BookDraft) -> Self { Self { id: self.id, title: draft.title } }
//!     fn uniqueness_probe(draft: &BookDraft) -> Option<BookQuery> {
//!         Some(BookQuery::Title(draft.title.clone()))
//!     }
//! }
//!
//! impl SqlEntity for Book {
//!     const TABLE: &'static str = "books";
//!     const COLUMNS: &'static [&'static str] = &["title"];
//!     const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS books (
//!         id INTEGER PRIMARY KEY AUTOINCREMENT,
//!         title TEXT NOT NULL UNIQUE
//!     );";
//!
//!     fn from_row(row: &Row<'_>) -> Result<Self, StoreError> {
//!         Ok(Self { id: row.get(0)?, title: row.get(1)? })
//!     }
//!     fn values(&self) -> Vec<Value> { vec![Value::Text(self.title.clone())] }
//!     fn draft_values(draft: BookDraft) -> Vec<Value> { vec![Value::Text(draft.title)] }
//!     fn filter(query: &BookQuery) -> (&'static str, Vec<Value>) {
//!         match query {
//!             BookQuery::Title(t) => ("title = ?1", vec![Value::Text(t.clone())]),
//!         }
//!     }
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockStore`] hands out a real [`StoreClient`] answered from scripted expectations,
//! which is the easy way to exercise storage failures in the layers above.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod repository;
pub mod sqlite;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use client::StoreClient;
pub use entity::ResourceEntity;
pub use error::StoreError;
pub use message::{Response, StoreRequest};
pub use repository::Repository;
pub use sqlite::{SqlEntity, SqliteRepository};
