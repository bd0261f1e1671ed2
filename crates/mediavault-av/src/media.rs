//! Default [`Transformer`] backed by the `image` crate and the ffmpeg CLI.

use std::path::Path;

use crate::frame;
use crate::resize::{decode_dimensions, resize_image};
use crate::tools::check_tool;
use crate::transform::{Dimensions, ResizeBounds, Transformer};
use crate::Result;

const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Transformer that resizes images in-process and shells out to ffmpeg for
/// video frames.
#[derive(Debug, Clone)]
pub struct MediaTransformer {
    ffmpeg: String,
}

impl MediaTransformer {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self {
            ffmpeg: DEFAULT_FFMPEG.to_string(),
        }
    }

    /// Use a specific ffmpeg executable.
    pub fn with_ffmpeg(path: &Path) -> Self {
        Self {
            ffmpeg: path.to_string_lossy().into_owned(),
        }
    }

    /// The ffmpeg program this transformer runs.
    pub fn ffmpeg(&self) -> &str {
        &self.ffmpeg
    }
}

impl Default for MediaTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for MediaTransformer {
    fn decode_metadata(&self, data: &[u8]) -> Result<Dimensions> {
        decode_dimensions(data)
    }

    fn resize(&self, data: &[u8], bounds: ResizeBounds) -> Result<Vec<u8>> {
        resize_image(data, bounds)
    }

    fn extract_first_frame(&self, path: &Path) -> Result<Vec<u8>> {
        frame::extract_first_frame(&self.ffmpeg, path)
    }

    fn probe_available(&self) -> bool {
        let info = check_tool(&self.ffmpeg);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "ffmpeg probe: available={} version={:?}",
            info.available,
            info.version
        );

        info.available
    }
}
