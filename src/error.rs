use reqwest::StatusCode;
use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }
}

/// Range-level validation failures. Raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid date `{input}`, expected YYYY-MM-DD")]
    InvalidDateFormat { input: String },
    #[error("range {start}..={end} covers {days} days, at most {max_days} allowed")]
    RangeTooLarge {
        start: String,
        end: String,
        days: i64,
        max_days: i64,
    },
}

/// Why a single day could not be priced. Recoverable: the day is skipped.
#[derive(Debug, Error)]
pub enum DayFetchFailure {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no price available at `{path}`")]
    MissingPrice { path: String },
    #[error("unusable price value {0}")]
    InvalidPrice(String),
}
