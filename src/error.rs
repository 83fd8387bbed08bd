use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not parse job list: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("status update rejected with HTTP {0}")]
    Status(u16),

    #[error("status update failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}
