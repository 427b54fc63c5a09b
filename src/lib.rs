//! # Record Services
//!
//! Two small REST services, one for **products** and one for **users**, plus an API
//! gateway in front of them. Each service is a single resource: CRUD over one SQLite
//! table, a health probe, and two Prometheus counters.
//!
//! ## Request Flow
//!
//! ```text
//! HTTP request
//!   -> axum router (resource_router)          path/body extraction, 400 on bad input
//!   -> ResourceController<T>                  counts the request, applies the rules
//!   -> StoreClient<T> ==channel==> StoreActor<T>   one repository call at a time
//!   -> SqliteRepository<T>                    hand-written row mapping
//! ```
//!
//! ## Module Tour
//!
//! ### 1. The Store ([`resource_store`])
//! A separate crate with the generic store actor, its client, the repository contract
//! and the SQLite implementation. Record types opt in by implementing
//! [`ResourceEntity`](resource_store::ResourceEntity) and
//! [`SqlEntity`](resource_store::SqlEntity).
//!
//! ### 2. The Controller ([`controller`])
//! [`ResourceController<T>`](controller::ResourceController) is written once for every
//! record type. It maps store outcomes to [`Reply`](controller::Reply) variants and store
//! failures to [`ApiError`](controller::ApiError).
//!
//! ### 3. The Services ([`product_service`], [`user_service`])
//! The entity mappings, the service names and counters, and the routes. Products add a
//! name search; users add email uniqueness through
//! [`uniqueness_probe`](resource_store::ResourceEntity::uniqueness_probe).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`ResourceService`](lifecycle::ResourceService) starts a store actor, hands out the
//! controller, and shuts the actor down.
//!
//! ### 5. The Gateway ([`gateway`])
//! Proxies both services, aggregates a user dashboard, and reports upstream failures as
//! JSON.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run -- user
//! RUST_LOG=info cargo run -- product --database products.db
//! RUST_LOG=info cargo run -- gateway
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod metrics;
pub mod model;
pub mod product_service;
pub mod user_service;
