use thiserror::Error;

/// Failures of a single README sync run.
#[derive(Error, Debug)]
pub(crate) enum SyncError {
    /// Transport failure or a non-success status.
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// A payload that does not have the expected shape.
    #[error("malformed response: {0}")]
    Format(String),

    #[error("marker {marker:?} not found in document")]
    MarkerNotFound { marker: String },

    #[error("failed to render posts: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn marker_not_found(marker: &str) -> Self {
        Self::MarkerNotFound {
            marker: marker.to_string(),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, SyncError>;
