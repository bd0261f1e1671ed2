//! Transform failures.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a thumbnail could not be rendered.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external program could not be started.
    #[error("{program} is not installed or not executable")]
    ToolUnavailable { program: String },

    /// The external program ran and reported failure.
    #[error("{program} failed: {message}")]
    ToolFailed { program: String, message: String },

    /// The input file for frame extraction does not exist.
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Resize bounds that cannot produce an image.
    #[error("invalid resize bounds: {0}")]
    InvalidBounds(String),
}

impl Error {
    pub fn tool_unavailable(program: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            program: program.into(),
        }
    }

    pub fn tool_failed(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            program: program.into(),
            message: message.into(),
        }
    }
}
