//! Core error types for the risk mapping tool.
//!
//! Errors fall into four families. Incomplete input and upstream fetch
//! failures are recoverable and never lose entered data. Configuration errors
//! and invariant violations indicate defects and abort the computation.

use thiserror::Error;

use crate::assessment::AssessmentError;
use crate::diseases::Disease;
use crate::pathways::Pathway;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the risk mapping core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Assessment error: {0}")]
    Assessment(#[from] AssessmentError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Record collections of the active assessment disagree with each other.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user-entered scores.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} score {value} is outside the allowed range 0..={max}")]
    ScoreOutOfRange { field: String, value: u8, max: u8 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    /// Creates a ScoreOutOfRange error.
    pub fn out_of_range(field: impl Into<String>, value: u8, max: u8) -> Self {
        Self::ScoreOutOfRange {
            field: field.into(),
            value,
            max,
        }
    }
}

/// Errors in reference data or model parameters.
///
/// The engine never substitutes a default when it meets one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Pathway matrix has no entry for pathway '{pathway}' and disease '{disease}'")]
    MissingPathwayEntry { pathway: Pathway, disease: Disease },

    #[error("Pathway matrix lists pathway '{pathway}' and disease '{disease}' more than once")]
    DuplicatePathwayEntry { pathway: Pathway, disease: Disease },

    #[error("Pathway effectiveness for '{pathway}' / '{disease}' is {score}, expected 0..={max}")]
    EffectivenessOutOfRange {
        pathway: Pathway,
        disease: Disease,
        score: u8,
        max: u8,
    },

    #[error("Invalid pathway weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Configuration(ConfigurationError::Parse(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigurationError::MissingPathwayEntry {
            pathway: Pathway::Airborne,
            disease: Disease::Fmd,
        };
        assert_eq!(
            err.to_string(),
            "Pathway matrix has no entry for pathway 'airborne' and disease 'FMD'"
        );

        let err = ValidationError::out_of_range("FMD mitigation", 5, 4);
        assert_eq!(
            err.to_string(),
            "FMD mitigation score 5 is outside the allowed range 0..=4"
        );
    }

    #[test]
    fn test_json_error_maps_to_configuration() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Configuration(ConfigurationError::Parse(_))));
    }
}
