use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("failed to fetch {url} after {attempts} attempt(s): {reason}")]
    FetchFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("failed to download {url} after {attempts} attempt(s): {reason}")]
    DownloadFailed {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("could not log in at {url}: {reason}")]
    LoginFailed { url: String, reason: String },

    #[error("page {url} is missing expected element: {element}")]
    StructuralMismatch { url: String, element: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("credential prompt failed: {0}")]
    Prompt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error("invalid image provider pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl CrawlError {
    pub(crate) fn structural(url: &str, element: &str) -> Self {
        Self::StructuralMismatch {
            url: url.to_string(),
            element: element.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
