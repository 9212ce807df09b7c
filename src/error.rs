use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("config decode failed: {0}")]
    ConfigDecode(String),

    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("invalid settings: {0}")]
    Settings(String),
}

impl From<reqwest::Error> for SentryError {
    fn from(err: reqwest::Error) -> Self {
        SentryError::Platform(err.to_string())
    }
}
