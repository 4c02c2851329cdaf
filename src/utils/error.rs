use thiserror::Error;

#[derive(Error, Debug)]
pub enum MobilityError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Download request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data format error in {file}: {message}")]
    DataFormatError { file: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Data,
    Network,
    Io,
    Internal,
}

impl MobilityError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MobilityError::ConfigError { .. }
            | MobilityError::InvalidConfigValueError { .. }
            | MobilityError::ConfigValidationError { .. } => ErrorCategory::Config,
            MobilityError::CsvError(_)
            | MobilityError::DataFormatError { .. }
            | MobilityError::ProcessingError { .. }
            | MobilityError::ValidationError { .. } => ErrorCategory::Data,
            MobilityError::HttpError(_) => ErrorCategory::Network,
            MobilityError::IoError(_) => ErrorCategory::Io,
            MobilityError::SerializationError(_) | MobilityError::ZipError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config => ErrorSeverity::Critical,
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MobilityError::ZipError(_) => {
                "Check free disk space and write permissions for the output directory"
            }
            MobilityError::HttpError(_) => {
                "Check the network connection and retry; the download URL may be temporarily unavailable"
            }
            MobilityError::CsvError(_) => {
                "Verify the dataset file is a valid CSV export with the expected column headers"
            }
            MobilityError::IoError(_) => {
                "Check that the configured file paths exist and are readable"
            }
            MobilityError::SerializationError(_) => {
                "Rerun with --verbose and inspect the report writer logs"
            }
            MobilityError::ConfigError { .. }
            | MobilityError::InvalidConfigValueError { .. }
            | MobilityError::ConfigValidationError { .. } => {
                "Fix the configuration value and run again (see --help for accepted values)"
            }
            MobilityError::DataFormatError { .. } => {
                "Confirm the file matches the mobility report card table layout"
            }
            MobilityError::ProcessingError { .. } => {
                "Inspect the input datasets; the selection may be too restrictive or the files empty"
            }
            MobilityError::ValidationError { .. } => {
                "Adjust the provided value; see --help for accepted values"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Io => format!("File problem: {}", self),
            ErrorCategory::Internal => format!("Internal problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MobilityError>;
