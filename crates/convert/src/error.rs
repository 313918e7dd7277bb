use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported input format: {0}")]
    Unsupported(String),

    #[error("Pandoc executable not found; install pandoc to convert rich formats")]
    PandocNotFound,

    #[error("Pandoc failed converting {input}: {reason}")]
    PandocFailed { input: PathBuf, reason: String },
}
