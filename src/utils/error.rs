use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UploadError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            UploadError::HttpError(_) => ErrorSeverity::Medium,
            UploadError::IoError(_) | UploadError::SerializationError(_) => ErrorSeverity::High,
            UploadError::ConfigError { .. }
            | UploadError::InvalidConfigValueError { .. }
            | UploadError::MissingConfigError { .. } => ErrorSeverity::High,
            UploadError::TaskError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            UploadError::HttpError(e) if e.is_timeout() => {
                "Increase --timeout-seconds or check the server load"
            }
            UploadError::HttpError(_) => "Check the URL and that the server is reachable",
            UploadError::IoError(_) => "Check that the file exists and is readable",
            UploadError::SerializationError(_) => "Check the event payload",
            UploadError::ConfigError { .. }
            | UploadError::InvalidConfigValueError { .. }
            | UploadError::MissingConfigError { .. } => "Fix the configuration and retry",
            UploadError::TaskError(_) => "This is a bug, please report it",
        }
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
