use std::io;

#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http error: {0}")]
    Http(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("too many searches, try again in {remaining_seconds} seconds")]
    Throttled { remaining_seconds: u64 },
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("locale error: {0}")]
    Locale(String),
    #[error("unknown error")]
    Unknown,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScoutError::Timeout
        } else if err.is_connect() {
            ScoutError::Network(err.to_string())
        } else if err.is_status() || err.is_decode() {
            ScoutError::Http(err.to_string())
        } else {
            ScoutError::Unknown
        }
    }
}
