//! Error types for recital.

use thiserror::Error;

/// Errors that can occur while loading configuration or wiring up data sources.
#[derive(Error, Debug)]
pub enum RecitalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for recital operations.
pub type RecitalResult<T> = Result<T, RecitalError>;

/// A required field is missing or malformed. Raised before any mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Date is required")]
    EmptyDate,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid YouTube URL: {0}")]
    InvalidVideoUrl(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// An operation referenced an id that is not in the collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Record not found: {id}")]
pub struct NotFoundError {
    pub id: String,
}

impl NotFoundError {
    pub fn new(id: &str) -> Self {
        NotFoundError { id: id.to_string() }
    }
}

/// Errors returned synchronously by collection operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

/// The remote call failed. The local mutation that triggered it stays applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Service responded with {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Remote record not found: {0}")]
    NotFound(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PersistenceError::Decode(err.to_string())
        } else {
            PersistenceError::Transport(err.to_string())
        }
    }
}

/// Asset upload failed. The parent record save proceeds without the asset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Could not write asset: {0}")]
    Io(String),

    #[error("Upload request failed: {0}")]
    Transport(String),

    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid asset path: {0}")]
    InvalidPath(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}
