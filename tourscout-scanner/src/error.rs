use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ScanError {
    /// True for the failures the fetcher reports (bad status or transport).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ScanError::HttpError(_) | ScanError::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
