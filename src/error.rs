use thiserror::Error;

/// Status code the provider uses to signal rate limiting.
pub const RATE_LIMIT_STATUS: u16 = 429;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider unavailable{}: {message}", status_suffix(.status))]
    ProviderUnavailable { status: Option<u16>, message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl GenerationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        GenerationError::ProviderUnavailable {
            status: None,
            message: message.into(),
        }
    }

    /// Builds the error for a non-success HTTP status, folding 429s into
    /// `RateLimited`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == RATE_LIMIT_STATUS {
            GenerationError::RateLimited { message }
        } else {
            GenerationError::ProviderUnavailable {
                status: Some(status),
                message,
            }
        }
    }

    /// True when the failure carries a 429, either as its status or somewhere
    /// in its message.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GenerationError::RateLimited { .. } => true,
            GenerationError::ProviderUnavailable { status, message } => {
                *status == Some(RATE_LIMIT_STATUS)
                    || message.contains(&RATE_LIMIT_STATUS.to_string())
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
