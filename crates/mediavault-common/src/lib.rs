//! Mediavault-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across mediavault:
//!
//! - **Typed IDs**: `ObjectId`, the monotonic catalog key
//! - **Core Types**: `MediaFamily` classification of mime types
//! - **Path Utilities**: mime lookup by file extension
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use mediavault_common::{Error, MediaFamily, ObjectId, Result};
//! use mediavault_common::paths::mime_for_extension;
//!
//! let id = ObjectId::new(42);
//! assert_eq!(id.get(), 42);
//!
//! assert_eq!(MediaFamily::from_mime("image/png"), MediaFamily::Image);
//! assert_eq!(mime_for_extension("mp4"), "video/mp4");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("cat.png"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::ObjectId;
pub use types::*;
