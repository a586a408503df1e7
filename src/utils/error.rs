use thiserror::Error;

pub const ARCHIVE_USER_MESSAGE: &str =
    "Failed to parse the course file. The file may be corrupted or in an unsupported format.";

#[derive(Error, Debug)]
pub enum ImsccError {
    #[error("Archive could not be read: {reason}")]
    ArchiveError { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Upload rejected: {message}")]
    ValidationError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl From<zip::result::ZipError> for ImsccError {
    fn from(err: zip::result::ZipError) -> Self {
        ImsccError::ArchiveError {
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Archive,
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImsccError {
    pub fn archive(reason: impl Into<String>) -> Self {
        ImsccError::ArchiveError {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ImsccError::ArchiveError { .. } => ErrorCategory::Archive,
            ImsccError::ValidationError { .. } => ErrorCategory::Input,
            ImsccError::ConfigError { .. }
            | ImsccError::ConfigValidationError { .. }
            | ImsccError::InvalidConfigValueError { .. }
            | ImsccError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ImsccError::IoError(_)
            | ImsccError::SerializationError(_)
            | ImsccError::TaskError(_)
            | ImsccError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Archive | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImsccError::ArchiveError { .. } => ARCHIVE_USER_MESSAGE.to_string(),
            ImsccError::ValidationError { message } => message.clone(),
            ImsccError::IoError(e) => format!("Could not access the file: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Archive => {
                "Re-export the course from the LMS and upload the fresh .imscc package"
            }
            ErrorCategory::Input => "Check the file type and size, then upload again",
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
            ErrorCategory::System => "Check file permissions and available disk space, then retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, ImsccError>;
