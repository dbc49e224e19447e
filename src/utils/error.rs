use crate::domain::ports::HostError;
use crate::geometry::GeometryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SleeveError {
    #[error("Family variant '{name}' not found in the document")]
    FamilyVariantNotFound { name: String },

    #[error("Parameter '{parameter}' is missing on family variant '{variant}'")]
    MissingParameter { parameter: String, variant: String },

    #[error("Host document error: {0}")]
    HostError(#[from] HostError),

    #[error("Geometry error: {0}")]
    GeometryError(#[from] GeometryError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    HostDocument,
    Geometry,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SleeveError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SleeveError::FamilyVariantNotFound { .. }
            | SleeveError::MissingParameter { .. }
            | SleeveError::ConfigError { .. }
            | SleeveError::InvalidConfigValueError { .. }
            | SleeveError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            SleeveError::HostError(_) => ErrorCategory::HostDocument,
            SleeveError::GeometryError(_) => ErrorCategory::Geometry,
            SleeveError::CsvError(_) | SleeveError::SerializationError(_) => ErrorCategory::Data,
            SleeveError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SleeveError::GeometryError(_)
            | SleeveError::CsvError(_)
            | SleeveError::SerializationError(_) => ErrorSeverity::Medium,
            SleeveError::HostError(_) | SleeveError::IoError(_) => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    /// 是否為整次執行都會重複發生的設定錯誤
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(
            self,
            SleeveError::FamilyVariantNotFound { .. } | SleeveError::MissingParameter { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SleeveError::FamilyVariantNotFound { name } => format!(
                "Load the sleeve family and make sure a type named '{}' exists, or change [families] in the config",
                name
            ),
            SleeveError::MissingParameter { parameter, variant } => format!(
                "Add an instance parameter '{}' to family variant '{}', or change [parameters] in the config",
                parameter, variant
            ),
            SleeveError::HostError(_) => {
                "Check that the model is not read-only and re-run the placement".to_string()
            }
            SleeveError::GeometryError(_) => {
                "Fix the host geometry in the model snapshot (closed solids, valid face indices)".to_string()
            }
            SleeveError::CsvError(_) | SleeveError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            SleeveError::SerializationError(_) => {
                "Make sure the model snapshot is valid JSON in the expected layout".to_string()
            }
            SleeveError::ConfigError { .. }
            | SleeveError::InvalidConfigValueError { .. }
            | SleeveError::ConfigValidationError { .. } => {
                "Review the configuration file and command-line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::HostDocument => format!("The model rejected an operation: {}", self),
            ErrorCategory::Geometry => format!("Geometry could not be processed: {}", self),
            ErrorCategory::Data => format!("Input data is malformed: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SleeveError>;
