use std::time::Duration;
use thiserror::Error;

/// Errors that stop an analysis before any network call is made.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("A URL is required")]
    EmptyUrl,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid URL scheme '{0}': only http and https are supported")]
    UnsupportedScheme(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Reasons the landing page HTML could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Server responded with HTTP {0}")]
    Status(u16),

    #[error("Response is not an HTML document (content-type: {0})")]
    NonText(String),

    #[error("Empty HTML response")]
    Empty,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(error)
        }
    }
}

/// Failures of the remote on-page crawl task.
#[derive(Error, Debug)]
pub enum RemoteCrawlError {
    #[error("Missing DataForSEO credentials. Set DATAFORSEO_LOGIN and DATAFORSEO_PASSWORD.")]
    CredentialsMissing,

    #[error("Failed to create On-Page task: {0}")]
    TaskCreationFailed(String),

    #[error("Timed out after {}s while waiting for the On-Page task to complete", .0.as_secs())]
    PollTimeout(Duration),

    #[error("On-Page task failed: {0}")]
    TaskFailed(String),

    #[error("On-Page API request failed: {0}")]
    Http(#[from] reqwest::Error),
}
