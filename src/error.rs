use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building a search or talking to the ad library API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Start date {start} cannot be later than end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Page limit must be at least 1")]
    InvalidPageLimit,

    #[error("API key is not configured: set {0}")]
    MissingCredential(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Error fetching data: {status}")]
    Upstream { status: u16 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not decode ads response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while serializing flattened records.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A timestamp that could not be turned into a calendar time.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("timestamp is missing")]
    Missing,

    #[error("timestamp is not a number: {0}")]
    NotANumber(String),

    #[error("timestamp {0} is out of range")]
    OutOfRange(i64),
}
