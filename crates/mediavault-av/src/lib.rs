//! # mediavault-av
//!
//! Thumbnail rendering for mediavault.
//!
//! This crate provides:
//! - The [`Transformer`] trait the delivery layer renders through
//! - [`MediaTransformer`], resizing images with the `image` crate and
//!   extracting video frames with the ffmpeg CLI
//! - External tool detection
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use mediavault_av::{MediaTransformer, Transformer};
//!
//! let transformer = MediaTransformer::new();
//! let data = std::fs::read("/path/to/photo.jpg")?;
//! let dims = transformer.decode_metadata(&data)?;
//! let thumb = transformer.resize(&data, dims.fit_larger_side(256))?;
//! println!("thumbnail is {} bytes", thumb.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod frame;
pub mod media;
pub mod resize;
pub mod tools;
pub mod transform;

// Re-exports
pub use error::{Error, Result};
pub use media::MediaTransformer;
pub use tools::{check_tool, check_tools, ToolInfo};
pub use transform::{Dimensions, ResizeBounds, Transformer};
