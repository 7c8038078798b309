use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostwatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Listing parse error: {0}")]
    ListingParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for PostwatchError {
    fn from(e: serde_json::Error) -> Self {
        PostwatchError::ListingParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PostwatchError>;
