use thiserror::Error;

pub type Result<T> = std::result::Result<T, SamplerError>;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scan root: {0}")]
    InvalidRoot(String),

    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
