//! Errors surfaced by a weather lookup.

use thiserror::Error;

/// Failure of a single lookup. The `Display` text is exactly what the
/// error banner shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Empty input, never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response. `message` comes from the body or is synthesized.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// No response at all.
    #[error("{0}")]
    Network(String),

    /// A body that could not be decoded.
    #[error("{0}")]
    Parse(String),
}

impl LookupError {
    pub fn empty_city() -> Self {
        Self::Validation("Please enter a city name".to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
