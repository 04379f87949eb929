//! Error types for fitting and evaluation.

use std::fmt;

/// Main error type for model fitting, prediction, and metric evaluation.
///
/// # Examples
///
/// ```
/// use regresar::error::ModelError;
///
/// let err = ModelError::DimensionMismatch {
///     expected: "150 samples".to_string(),
///     actual: "140 targets".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum ModelError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Closed-form solve hit a rank-deficient (non positive definite) system.
    SingularMatrix {
        /// Description of the system that failed to factor
        what: String,
    },

    /// Invalid hyperparameter value provided. Raised before any computation.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Predict or score called before a successful fit.
    NotFitted {
        /// The component that was not fitted
        what: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            ModelError::SingularMatrix { what } => {
                write!(f, "singular matrix: {what} is not positive definite")
            }
            ModelError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            ModelError::NotFitted { what } => {
                write!(f, "{what} is not fitted: call fit() first")
            }
            ModelError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<&str> for ModelError {
    fn from(msg: &str) -> Self {
        ModelError::Other(msg.to_string())
    }
}

impl From<String> for ModelError {
    fn from(msg: String) -> Self {
        ModelError::Other(msg)
    }
}

impl ModelError {
    /// Create a dimension mismatch error from two shape descriptions.
    #[must_use]
    pub fn dimension_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid hyperparameter error.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, ModelError>;
