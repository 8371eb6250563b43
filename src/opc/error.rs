/// Error types for directory package operations
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Package not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Package at {} is locked by another handle", path.display())]
    LockConflict {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content types document: {0}")]
    MalformedDocument(String),

    #[error("Package is open read-only: {0}")]
    ReadOnly(String),

    #[error("Package is closed")]
    PackageClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Fieldless category of an [`OpcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    LockConflict,
    MalformedDocument,
    ReadOnly,
    PackageClosed,
    Io,
}

impl OpcError {
    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OpcError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            OpcError::NotFound(_) => ErrorKind::NotFound,
            OpcError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            OpcError::LockConflict { .. } => ErrorKind::LockConflict,
            OpcError::MalformedDocument(_) => ErrorKind::MalformedDocument,
            OpcError::ReadOnly(_) => ErrorKind::ReadOnly,
            OpcError::PackageClosed => ErrorKind::PackageClosed,
            OpcError::IoError(_) => ErrorKind::Io,
        }
    }
}

impl From<quick_xml::Error> for OpcError {
    fn from(err: quick_xml::Error) -> Self {
        OpcError::MalformedDocument(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::MalformedDocument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
