use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No file at '{0}' in the remote repository")]
    NotFound(String),

    #[error("Version conflict writing '{path}': {reason}")]
    VersionConflict { path: String, reason: String },

    #[error("Remote returned unsupported encoding '{encoding}' for '{path}'")]
    DecodeUnsupported { path: String, encoding: String },

    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// True for errors where a retry (after re-reading remote state where
    /// needed) can reasonably be expected to succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::RemoteUnavailable(_) => true,
            StoreError::VersionConflict { .. } => true,
            _ => false,
        }
    }

    pub fn is_user_error(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Unauthorized(_) => true,
            _ => false,
        }
    }
}
