//! Database query modules.
//!
//! - objects: object CRUD, tags, and name uniqueness
//! - listing: filtered keyset pages, counts, and the newest match

pub mod listing;
pub mod objects;
