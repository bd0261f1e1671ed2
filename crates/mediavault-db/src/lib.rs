//! Mediavault-DB: Catalog schema, migrations, and query operations
//!
//! This crate provides the durable object catalog for mediavault using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Stored object model and listing filter
//! - `queries` - Object CRUD and keyset listing queries
//!
//! # Example
//!
//! ```no_run
//! use mediavault_db::models::NewObject;
//! use mediavault_db::pool::{init_pool, get_conn};
//! use mediavault_db::queries::objects;
//!
//! let pool = init_pool("/var/lib/mediavault/catalog.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let object = objects::insert_object(&conn, &NewObject {
//!     name: "k3x9qa.png".into(),
//!     path: "2024-05/k3x9qa.png".into(),
//!     mime: "image/png".into(),
//!     description: String::new(),
//!     tags: vec!["cats".into()],
//! }).unwrap();
//! println!("Stored object {} as {}", object.id, object.name);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
