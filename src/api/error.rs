use thiserror::Error;

/// Why a backend fetch produced no usable payload.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
