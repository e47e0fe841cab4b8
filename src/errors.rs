use thiserror::Error;

pub type Result<T> = std::result::Result<T, SteamError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SteamError {
    #[error("Could not connect to Steam Web API: {0}")]
    Timeout(String),
    #[error("Bad response from Steam Web API: {0}")]
    BadResponse(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Fieldless copy of a [SteamError] variant, for matching without the
/// attached diagnostic text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    BadResponse,
    NotFound,
    InvalidInput,
}

impl SteamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SteamError::Timeout(_) => ErrorKind::Timeout,
            SteamError::BadResponse(_) => ErrorKind::BadResponse,
            SteamError::NotFound(_) => ErrorKind::NotFound,
            SteamError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<serde_json::Error> for SteamError {
    fn from(e: serde_json::Error) -> Self {
        Self::BadResponse(e.to_string())
    }
}

impl From<reqwest::Error> for SteamError {
    fn from(e: reqwest::Error) -> Self {
        // request URLs carry the API key
        let e = e.without_url();
        if e.is_builder() {
            Self::InvalidInput(e.to_string())
        } else if e.is_connect() || e.is_timeout() || e.is_request() {
            Self::Timeout(e.to_string())
        } else {
            Self::BadResponse(e.to_string())
        }
    }
}
