//! Core type definitions shared by the catalog and delivery layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad family of a stored object's mime type.
///
/// Delivery branches on the family: images are resized in-process, videos
/// get a first-frame thumbnail, everything else is served verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFamily {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// Any other mime type.
    Other,
}

impl MediaFamily {
    /// Classify a mime string by its top-level type.
    ///
    /// ```
    /// use mediavault_common::MediaFamily;
    ///
    /// assert_eq!(MediaFamily::from_mime("image/jpeg"), MediaFamily::Image);
    /// assert_eq!(MediaFamily::from_mime("Video/MP4"), MediaFamily::Video);
    /// assert_eq!(MediaFamily::from_mime("application/pdf"), MediaFamily::Other);
    /// ```
    pub fn from_mime(mime: &str) -> Self {
        let top = mime.split('/').next().unwrap_or_default().trim();
        if top.eq_ignore_ascii_case("image") {
            Self::Image
        } else if top.eq_ignore_ascii_case("video") {
            Self::Video
        } else {
            Self::Other
        }
    }

    /// Whether this family is shown in the gallery view.
    pub fn is_gallery(&self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

impl fmt::Display for MediaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Rendering requested for a single delivery.
///
/// Derived per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformSpec {
    /// The stored bytes as-is.
    Original,
    /// A thumbnail whose larger natural dimension equals the given size.
    ResizedTo(u32),
}

impl TransformSpec {
    /// Build a spec from an optional requested size.
    ///
    /// A size of zero means no resize was requested.
    pub fn from_size(size: Option<u32>) -> Self {
        match size {
            Some(s) if s > 0 => Self::ResizedTo(s),
            _ => Self::Original,
        }
    }

    /// The requested size, if any.
    pub fn size(&self) -> Option<u32> {
        match self {
            Self::Original => None,
            Self::ResizedTo(s) => Some(*s),
        }
    }
}
