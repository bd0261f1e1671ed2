//! Mediavault - self-hosted media vault
//!
//! Uploads are cataloged under generated, collision-free names, listed with
//! stable keyset cursors and delivered by name, optionally as thumbnails.
//!
//! The library crate exposes the services for the CLI and for integration
//! testing; [`vault::Vault`] wires them together from a [`config::Config`].

pub mod catalog;
pub mod config;
pub mod delivery;
pub mod library;
pub mod listing;
pub mod naming;
pub mod storage;
pub mod vault;

pub use mediavault_common::{Error, ObjectId, Result};
