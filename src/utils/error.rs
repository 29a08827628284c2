use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpaError {
    #[error("Unknown grading system '{value}' (expected one of: 4.0, 5.0)")]
    UnknownGradingSystem { value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Could not parse input '{input}': {reason}")]
    InputParseError { input: String, reason: String },

    #[error("Row {index} does not exist (form has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GpaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GpaError::UnknownGradingSystem { .. }
            | GpaError::ConfigValidationError { .. }
            | GpaError::InvalidConfigValueError { .. }
            | GpaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GpaError::CsvError(_)
            | GpaError::InputParseError { .. }
            | GpaError::RowOutOfRange { .. } => ErrorCategory::Input,
            GpaError::IoError(_) => ErrorCategory::Io,
            GpaError::SerializationError(_) | GpaError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GpaError::RowOutOfRange { .. } => ErrorSeverity::Low,
            GpaError::InputParseError { .. } | GpaError::CsvError(_) => ErrorSeverity::Medium,
            GpaError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Short message meant for the terminal, without the debug detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            GpaError::UnknownGradingSystem { value } => {
                format!("'{}' is not a supported grading system", value)
            }
            GpaError::IoError(e) => format!("Could not read or write a file: {}", e),
            GpaError::CsvError(e) => format!("The subject CSV could not be read: {}", e),
            GpaError::SerializationError(e) => format!("Could not produce JSON output: {}", e),
            GpaError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            GpaError::InvalidConfigValueError { field, reason, .. } => {
                format!("{} is invalid: {}", field, reason)
            }
            GpaError::MissingConfigError { field } => format!("{} is required", field),
            GpaError::InputParseError { input, reason } => {
                format!("Could not understand '{}': {}", input, reason)
            }
            GpaError::RowOutOfRange { index, len } => {
                format!("There is no row {} (the form has {} rows)", index, len)
            }
            GpaError::ProcessingError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Use --system 4.0 or --system 5.0 and check the config file",
            ErrorCategory::Input => "Check subjects are written as NAME:GRADE:CREDIT or as a CSV with name,grade,credit headers",
            ErrorCategory::Io => "Check the file path exists and is readable",
            ErrorCategory::Processing => "Try a different --format",
        }
    }
}

pub type Result<T> = std::result::Result<T, GpaError>;
