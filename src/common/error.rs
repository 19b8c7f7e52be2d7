//! Error types for bicycle_mpc

use std::fmt;

/// Main error type for the tracking controller
#[derive(Debug)]
pub enum MpcError {
    /// Configuration rejected at controller construction
    InvalidConfig(String),
    /// Reference polynomial rejected at solve entry
    InvalidReference(String),
    /// The solver itself failed (distinct from recoverable non-convergence)
    SolverFailure(String),
}

impl fmt::Display for MpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpcError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            MpcError::InvalidReference(msg) => write!(f, "Invalid reference path: {}", msg),
            MpcError::SolverFailure(msg) => write!(f, "Solver failure: {}", msg),
        }
    }
}

impl std::error::Error for MpcError {}

impl From<optimization_engine::SolverError> for MpcError {
    fn from(e: optimization_engine::SolverError) -> Self {
        MpcError::SolverFailure(format!("{:?}", e))
    }
}

/// Result type alias for controller operations
pub type MpcResult<T> = Result<T, MpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MpcError::InvalidConfig("horizon must be at least 2".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid configuration: horizon must be at least 2"
        );
    }

    #[test]
    fn test_error_from_solver() {
        let err: MpcError = optimization_engine::SolverError::NotFiniteComputation.into();
        assert!(matches!(err, MpcError::SolverFailure(_)));
    }
}
