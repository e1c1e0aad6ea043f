use thiserror::Error;

use super::AuthToken;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Credentials rejected by server")]
    Unauthorized,

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server timed out waiting for the request")]
    ServerTimeout,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AuthError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            408 => AuthError::ServerTimeout,
            429 => AuthError::RateLimited,
            400..=499 => AuthError::Unauthorized,
            500..=599 => AuthError::ServerError(truncated),
            _ => AuthError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True when the server rejected the credentials themselves
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Unauthorized)
    }
}

/// Result of one exchange as seen by the login controller.
///
/// Only `Unauthorized` says anything about the credentials; everything else
/// means the request could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Token(AuthToken),
    Unauthorized,
    Transport(String),
}

impl ExchangeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ExchangeOutcome::Token(_) => "token",
            ExchangeOutcome::Unauthorized => "unauthorized",
            ExchangeOutcome::Transport(_) => "transport",
        }
    }
}

impl From<Result<AuthToken, AuthError>> for ExchangeOutcome {
    fn from(result: Result<AuthToken, AuthError>) -> Self {
        match result {
            Ok(token) => ExchangeOutcome::Token(token),
            Err(AuthError::Unauthorized) => ExchangeOutcome::Unauthorized,
            Err(e) => ExchangeOutcome::Transport(e.to_string()),
        }
    }
}
