//! Error types for FEA Solver

use thiserror::Error;

/// Code reported when two constrained nodes end up in the same rigid group
pub const CONFLICTING_RIGID_CONSTRAINTS: &str = "MA20000";

/// Kind of a solver failure that is not a definiteness problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverFailureKind {
    /// Solve was requested before the solver was initialized
    NotInitialized,
    /// Iterative method broke down (zero curvature direction)
    Breakdown,
    /// Anything else the backend reports
    Other,
}

/// Main error type for FEA operations
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Load case '{0}' not found in results")]
    LoadCaseNotFound(String),

    /// A constrained node of a rigid group is not the group's master
    #[error("[{code}] conflicting rigid-element constraints: node {node} is constrained but defers to master node {master}")]
    ConflictingRigidConstraints {
        code: &'static str,
        master: usize,
        node: usize,
    },

    /// Stiffness of the free part is not positive definite (mechanism or missing supports)
    #[error("Stiffness matrix is not positive definite - model may be unstable or have insufficient supports: {0}")]
    NotPositiveDefinite(String),

    #[error("Solver failed ({kind:?}): {message}")]
    SolverFailed {
        kind: SolverFailureKind,
        message: String,
    },

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Element does not provide a {0} matrix")]
    UnsupportedMatrix(&'static str),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Model not analyzed - run solve() first")]
    NotAnalyzed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FEAError {
    /// Stable error code for configuration errors, if any
    pub fn code(&self) -> Option<&'static str> {
        match self {
            FEAError::ConflictingRigidConstraints { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True for failures that indicate an unstable or under-constrained structure
    pub fn is_instability(&self) -> bool {
        matches!(self, FEAError::NotPositiveDefinite(_))
    }

    pub(crate) fn conflicting_constraints(master: usize, node: usize) -> Self {
        FEAError::ConflictingRigidConstraints {
            code: CONFLICTING_RIGID_CONSTRAINTS,
            master,
            node,
        }
    }

    pub(crate) fn dimension(context: &'static str, expected: usize, found: usize) -> Self {
        FEAError::DimensionMismatch {
            context,
            expected,
            found,
        }
    }
}

/// Result type for FEA operations
pub type FEAResult<T> = Result<T, FEAError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_code() {
        let err = FEAError::conflicting_constraints(0, 3);
        assert_eq!(err.code(), Some("MA20000"));
        assert!(err.to_string().contains("MA20000"));
        assert!(!err.is_instability());
    }

    #[test]
    fn test_instability_is_distinct() {
        let err = FEAError::NotPositiveDefinite("pivot 4".to_string());
        assert!(err.is_instability());
        assert_eq!(err.code(), None);

        let err = FEAError::SolverFailed {
            kind: SolverFailureKind::Breakdown,
            message: "p'Ap = 0".to_string(),
        };
        assert!(!err.is_instability());
    }
}
