//! Analysis options and the linear static orchestrator

mod static_linear;

use serde::{Deserialize, Serialize};

use crate::loads::LoadCase;
use crate::math::{BuiltInSolverFactory, BuiltInSolverType};

pub use static_linear::{CaseResult, StaticLinearAnalysisResult};

/// Options for linear static analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Solver used for the free-free stiffness block
    pub solver_type: BuiltInSolverType,
    /// Load cases to solve (empty = every case that carries loads)
    pub load_cases: Vec<LoadCase>,
    /// Relative residual tolerance of the iterative solver
    pub tolerance: f64,
    /// Iteration cap of the iterative solver
    pub max_iterations: usize,
    /// Check static equilibrium after analysis
    pub check_statics: bool,
    /// Allowed equilibrium residual relative to the applied load
    pub statics_tolerance: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            solver_type: BuiltInSolverType::CholeskyDecomposition,
            load_cases: Vec::new(),
            tolerance: 1e-10,
            max_iterations: 10_000,
            check_statics: false,
            statics_tolerance: 1e-6,
        }
    }
}

impl AnalysisOptions {
    /// Direct solve with a sparse Cholesky factorization
    pub fn linear() -> Self {
        Self::default()
    }

    /// Iterative solve with preconditioned conjugate gradient
    pub fn iterative() -> Self {
        Self {
            solver_type: BuiltInSolverType::ConjugateGradient,
            ..Self::default()
        }
    }

    pub fn with_load_case(mut self, case: LoadCase) -> Self {
        self.load_cases.push(case);
        self
    }

    pub fn with_load_cases(mut self, cases: Vec<LoadCase>) -> Self {
        self.load_cases = cases;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Enable the equilibrium check
    pub fn with_statics_check(mut self) -> Self {
        self.check_statics = true;
        self
    }

    /// Factory for the configured built-in solver
    pub fn solver_factory(&self) -> BuiltInSolverFactory {
        BuiltInSolverFactory {
            solver_type: self.solver_type,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let options = AnalysisOptions::iterative()
            .with_tolerance(1e-8)
            .with_max_iter(50)
            .with_load_case(LoadCase::dead("D"))
            .with_statics_check();
        let factory = options.solver_factory();
        assert_eq!(factory.solver_type, BuiltInSolverType::ConjugateGradient);
        assert_eq!(factory.max_iterations, 50);
        assert_eq!(options.load_cases.len(), 1);
        assert!(options.check_statics);
    }

    #[test]
    fn test_options_round_trip_through_json() {
        let options = AnalysisOptions::linear().with_load_case(LoadCase::live("L"));
        let json = serde_json::to_string(&options).unwrap();
        let back: AnalysisOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.load_cases, options.load_cases);
        assert_eq!(back.solver_type, BuiltInSolverType::CholeskyDecomposition);
    }
}
