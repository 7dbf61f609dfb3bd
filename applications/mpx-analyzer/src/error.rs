/// Analyzer error types
use mpx_response::ResponseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] ResponseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl From<config::ConfigError> for AnalyzerError {
    fn from(err: config::ConfigError) -> Self {
        AnalyzerError::Config(err.to_string())
    }
}
