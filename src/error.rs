use thiserror::Error;

/// Failure taxonomy produced by the HTTP client core.
///
/// The client recovers exactly one class of failure internally (a single
/// 401-triggered refresh-and-resend); everything else reaches the caller
/// as one of these variants, unchanged. Resource services never interpret
/// status codes themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// 401 or 403: missing, expired-beyond-refresh, or insufficient credentials.
    #[error("{message}")]
    Auth { status: u16, message: String },
    /// Any other 4xx, typically malformed input.
    #[error("{message}")]
    Validation { status: u16, message: String },
    /// 5xx, or a status outside the expected ranges.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status code, when the server produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::Validation { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Server-provided message, when one exists.
    ///
    /// Used by the session manager to surface backend `detail` strings
    /// ("Incorrect username or password") instead of transport noise.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Auth { message, .. }
            | Self::Validation { message, .. }
            | Self::Server { message, .. } => Some(message),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}
