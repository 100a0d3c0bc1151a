//! Errors surfaced by the request pipeline.

use std::time::Duration;

/// Failure of a single backend call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401. The pipeline resets the session before the
    /// caller ever sees this.
    #[error("not authenticated{}", detail_suffix(.detail.as_deref()))]
    Unauthorized { detail: Option<String> },

    /// Any other non-success status.
    #[error("request failed with status {status}{}", detail_suffix(.detail.as_deref()))]
    Status { status: u16, detail: Option<String> },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// No response within the per-request deadline.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The request body could not be serialized.
    #[error("request body not encodable: {0}")]
    Encode(String),

    /// A success body that did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// HTTP is only available in the browser build.
    #[error("not available on server")]
    Unavailable,
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

impl ApiError {
    /// Map a non-success HTTP status to its error variant.
    #[must_use]
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        if status == 401 {
            Self::Unauthorized { detail }
        } else {
            Self::Status { status, detail }
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// HTTP status carried by the error, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
