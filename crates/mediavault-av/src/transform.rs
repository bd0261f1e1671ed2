//! The transform capability consumed by content delivery.

use std::path::Path;

use crate::Result;

/// Natural pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Bounds that scale the larger side to `size`, keeping aspect ratio.
    ///
    /// Square images are bounded by width.
    ///
    /// ```
    /// use mediavault_av::{Dimensions, ResizeBounds};
    ///
    /// let wide = Dimensions { width: 400, height: 100 };
    /// assert_eq!(wide.fit_larger_side(64), ResizeBounds::width(64));
    ///
    /// let tall = Dimensions { width: 100, height: 400 };
    /// assert_eq!(tall.fit_larger_side(64), ResizeBounds::height(64));
    /// ```
    pub fn fit_larger_side(&self, size: u32) -> ResizeBounds {
        if self.width >= self.height {
            ResizeBounds::width(size)
        } else {
            ResizeBounds::height(size)
        }
    }
}

/// Target for a resize. An unset axis follows the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeBounds {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeBounds {
    /// Fix the width.
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    /// Fix the height.
    pub fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }
}

/// Image and video operations used to render thumbnails.
///
/// Implementations must be safe to share across request threads.
pub trait Transformer: Send + Sync {
    /// Read the natural dimensions of an encoded image.
    fn decode_metadata(&self, data: &[u8]) -> Result<Dimensions>;

    /// Resize an encoded image, returning the re-encoded bytes.
    fn resize(&self, data: &[u8], bounds: ResizeBounds) -> Result<Vec<u8>>;

    /// Extract the first video frame of the file at `path` as PNG bytes.
    fn extract_first_frame(&self, path: &Path) -> Result<Vec<u8>>;

    /// Whether video frame extraction can run at all. May block.
    fn probe_available(&self) -> bool;
}
