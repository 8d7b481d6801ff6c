#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Network failure, timeout, or malformed body while contacting the
    /// content API or re-fetching the shell. Logged server-side; the
    /// response only carries a generic apology.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The content API answered with a non-success status for an id/slug.
    #[error("Content not found upstream")]
    NotFound,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
