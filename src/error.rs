use thiserror::Error;

use crate::storage::StorageError;

pub type WorkspaceResult<T> = core::result::Result<T, WorkspaceError>;

pub type ServiceResult<T> = core::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Not a data URL: {0}")]
    InvalidDataUrl(String),
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkspaceError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        WorkspaceError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Top-level error of the command-line front end.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    FromString(String),
    #[error("{0}")]
    Workspace(#[from] WorkspaceError),
    #[error("{0}")]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("{0}")]
    Prompt(#[from] dialoguer::Error),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Workspace(WorkspaceError::Storage(err))
    }
}
