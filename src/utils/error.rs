use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Invalid input for {field}: '{value}'")]
    ParseError { field: String, value: String },

    #[error("Undefined operation: {message}")]
    DomainError { message: String },

    #[error("Result out of range: {message}")]
    RangeError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Domain,
    Range,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    High,
    Critical,
}

impl CalcError {
    pub fn parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ParseError {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::DomainError {
            message: message.into(),
        }
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::RangeError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseError { .. } => ErrorCategory::Input,
            Self::DomainError { .. } => ErrorCategory::Domain,
            Self::RangeError { .. } => ErrorCategory::Range,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Calculation errors are user mistakes and never fatal; storage and
    /// configuration problems stop the current command.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Domain | ErrorCategory::Range => {
                ErrorSeverity::Low
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ParseError { field, value } => {
                format!("Invalid Input: '{}' is not a valid value for {}", value, field)
            }
            Self::DomainError { message } => format!("Cannot calculate: {}", message),
            Self::RangeError { message } => format!("Result not meaningful: {}", message),
            Self::IoError(e) => format!("Could not access history or export files: {}", e),
            Self::SerializationError(e) => format!("History data is corrupted: {}", e),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => "Please enter a valid number or fraction.",
            Self::DomainError { .. } => "Check for zero or negative values where they are not allowed.",
            Self::RangeError { .. } => "Adjust the inputs so the result falls within a meaningful range.",
            Self::IoError(_) => "Check that the history and export directories exist and are writable.",
            Self::SerializationError(_) => "Clear the affected history with `clear-history`.",
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Check the configuration file syntax."
            }
            Self::InvalidConfigValueError { .. } => "Correct the highlighted configuration value.",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_errors_are_low_severity() {
        assert_eq!(CalcError::parse("value", "abc").severity(), ErrorSeverity::Low);
        assert_eq!(CalcError::domain("x").category(), ErrorCategory::Domain);
        assert_eq!(CalcError::range("x").category(), ErrorCategory::Range);
    }

    #[test]
    fn test_storage_errors_are_critical() {
        let err: CalcError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_names_field() {
        let msg = CalcError::parse("initial value", "ten").user_friendly_message();
        assert!(msg.contains("initial value"));
        assert!(msg.contains("ten"));
    }
}
