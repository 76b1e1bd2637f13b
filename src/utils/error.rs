use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Unknown service key: {key}")]
    UnknownServiceKey { key: String },

    #[error("Invalid enrollment value: '{raw}'")]
    InvalidEnrollment { raw: String },

    #[error("School name is required to generate a proposal")]
    MissingSchoolName,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Catalog,
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

impl QuoteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuoteError::InvalidEnrollment { .. } | QuoteError::MissingSchoolName => {
                ErrorCategory::Input
            }
            QuoteError::UnknownServiceKey { .. } => ErrorCategory::Catalog,
            QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. }
            | QuoteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            QuoteError::IoError(_) | QuoteError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 無效的入學人數一律當作 0，只是警告
            QuoteError::InvalidEnrollment { .. } => ErrorSeverity::Low,
            QuoteError::MissingSchoolName => ErrorSeverity::Medium,
            QuoteError::UnknownServiceKey { .. }
            | QuoteError::ConfigValidationError { .. }
            | QuoteError::InvalidConfigValueError { .. }
            | QuoteError::MissingConfigError { .. } => ErrorSeverity::High,
            QuoteError::IoError(_) | QuoteError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            QuoteError::UnknownServiceKey { .. } => {
                "Run with --list to see the available service keys".to_string()
            }
            QuoteError::InvalidEnrollment { .. } => {
                "Enter enrollment as a whole number of students".to_string()
            }
            QuoteError::MissingSchoolName => {
                "Pass --school \"<name>\" to generate the proposal".to_string()
            }
            QuoteError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            QuoteError::SerializationError(_) => {
                "Re-run without --json or report the issue".to_string()
            }
            QuoteError::ConfigValidationError { field, .. }
            | QuoteError::InvalidConfigValueError { field, .. }
            | QuoteError::MissingConfigError { field } => {
                format!("Fix '{}' in the rate card file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuoteError::UnknownServiceKey { key } => {
                format!("'{}' is not a service in the catalog", key)
            }
            QuoteError::InvalidEnrollment { raw } => {
                format!("'{}' is not a valid enrollment, using 0", raw)
            }
            QuoteError::MissingSchoolName => {
                "A school name is needed before a proposal can be generated".to_string()
            }
            QuoteError::IoError(e) => format!("Could not save the proposal: {}", e),
            QuoteError::SerializationError(e) => format!("Could not render JSON: {}", e),
            other => format!("Rate card problem: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_is_high_severity() {
        let err = QuoteError::UnknownServiceKey {
            key: "tuitionAudit".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Catalog);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("tuitionAudit"));
    }

    #[test]
    fn test_invalid_enrollment_is_low_severity() {
        let err = QuoteError::InvalidEnrollment {
            raw: "abc".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_config_errors_point_at_field() {
        let err = QuoteError::InvalidConfigValueError {
            field: "tiers[1].min".to_string(),
            value: "60".to_string(),
            reason: "gap".to_string(),
        };
        assert!(err.recovery_suggestion().contains("tiers[1].min"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
