use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteupError {
    #[error("Batch validation failed: {0}")]
    BatchValidation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Host API request failed: {0}")]
    HostApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SiteupError>;
