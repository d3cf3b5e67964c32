use thiserror::Error;

/// Errors raised by the scaffolding pipeline.
///
/// Every variant is a caller-contract or input-data problem; nothing here is
/// transient, so callers abort the run on the first error.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Invalid argument: {field} is invalid: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Duplicate read id: {0}")]
    DuplicateReadId(String),

    #[error("Unknown clone library: {0}")]
    UnknownLibrary(String),

    #[error("Unknown contig: {0}")]
    UnknownContig(usize),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

impl ScaffoldError {
    pub fn invalid_argument(field: &str, reason: impl Into<String>) -> Self {
        ScaffoldError::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ScaffoldError {
    fn from(err: serde_json::Error) -> Self {
        ScaffoldError::Config {
            message: err.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for ScaffoldError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ScaffoldError::ThreadPool {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
