//! Common error types used throughout mediavault.
//!
//! Only [`Error::NotFound`], [`Error::Template`] and [`Error::RetryExhausted`]
//! are meant to reach an end user. Everything else is an infrastructure
//! failure that surfaces as an internal error.

/// Common error type for mediavault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No catalog object matches the given name or id.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// A naming template could not be resolved.
    #[error("Template error: {0}")]
    Template(String),

    /// No unused name was produced within the attempt budget.
    #[error("Couldn't generate file name, exceeded retry count ({attempts} attempts)")]
    RetryExhausted { attempts: u32 },

    /// The catalog rejected a write because the name is taken.
    #[error("Name already exists: {0}")]
    AlreadyExists(String),

    /// An image or video transform failed on a path with no fallback.
    #[error("Transform failed: {0}")]
    Transform(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Template error.
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Create a new AlreadyExists error.
    pub fn already_exists<S: Into<String>>(name: S) -> Self {
        Self::AlreadyExists(name.into())
    }

    /// Create a new Transform error.
    pub fn transform<S: Into<String>>(msg: S) -> Self {
        Self::Transform(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error is meant to be shown to the uploader or viewer.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Template(_) | Self::RetryExhausted { .. }
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
