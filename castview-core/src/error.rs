use castview_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Opencast returned {status} for {endpoint}")]
    Upstream { status: u16, endpoint: String },

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ModelError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the failure came from talking to Opencast rather than from
    /// local state.
    pub fn is_upstream(&self) -> bool {
        matches!(self, CoreError::Http(_) | CoreError::Upstream { .. })
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
