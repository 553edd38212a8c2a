use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("request to YouTube failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not parse YouTube response: {0}")]
    Json(#[from] serde_json::Error),

    /// Error payload embedded in an otherwise well-formed API response.
    #[error("YouTube API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("failed to write records: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
