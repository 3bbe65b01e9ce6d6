use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    #[error("Already enrolled in {course}")]
    AlreadyEnrolled { course: String },

    #[error("Store operation failed: {message}")]
    StoreFailure { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Conflict,
    Store,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn not_found(kind: &str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            key: key.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreFailure {
            message: message.into(),
        }
    }

    /// 給 HTTP 層對應狀態碼用
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyEnrolled { .. } => ErrorCategory::Conflict,
            Self::StoreFailure { .. } | Self::SerializationError(_) | Self::IoError(_) => {
                ErrorCategory::Store
            }
            Self::ConfigError { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound | ErrorCategory::Conflict => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Store => ErrorSeverity::Critical,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { kind, key } => {
                format!("Could not find {} '{}'", kind.to_lowercase(), key)
            }
            Self::AlreadyEnrolled { course } => {
                format!("You have already taken {}", course)
            }
            Self::StoreFailure { .. } | Self::SerializationError(_) | Self::IoError(_) => {
                "The course data store is unavailable".to_string()
            }
            Self::ConfigError { message } => format!("Invalid configuration: {}", message),
            Self::ValidationError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Use the course short name, e.g. CS2400",
            Self::AlreadyEnrolled { .. } => "Pick another course or remove the existing one first",
            Self::StoreFailure { .. } | Self::IoError(_) => {
                "Check that the data file exists and is writable"
            }
            Self::SerializationError(_) => "Check that the data file contains valid records",
            Self::ConfigError { .. } | Self::ValidationError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
