//! Linear solvers for the free-free stiffness block
//!
//! A solver owns its matrix. Direct solvers factor once in
//! [`LinearSolver::initialize`] and reuse the factor for every right-hand
//! side; iterative solvers need no initialization.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::{CholeskyError, CscCholesky};
use nalgebra_sparse::CscMatrix;
use serde::{Deserialize, Serialize};

use super::sparse::{csc_diagonal, solve_pcg};
use crate::error::{FEAError, FEAResult, SolverFailureKind};

/// A solver for `A * x = b` with a fixed sparse symmetric `A`
pub trait LinearSolver: Send {
    /// Human readable solver name, used in logs
    fn name(&self) -> &str;

    fn matrix(&self) -> &CscMatrix<f64>;

    /// Whether [`LinearSolver::initialize`] must run before [`LinearSolver::solve`]
    fn needs_initialization(&self) -> bool;

    fn is_initialized(&self) -> bool;

    fn initialize(&mut self) -> FEAResult<()>;

    fn solve(&self, b: &DVector<f64>) -> FEAResult<DVector<f64>>;
}

/// Creates solvers for reduced free-free matrices
pub trait SolverFactory: Send + Sync {
    fn create_solver(&self, matrix: CscMatrix<f64>) -> FEAResult<Box<dyn LinearSolver>>;
}

/// Solvers shipped with the crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltInSolverType {
    /// Sparse Cholesky factorization, reused across load cases
    #[default]
    CholeskyDecomposition,
    /// Jacobi-preconditioned conjugate gradient
    ConjugateGradient,
}

/// Factory for the built-in solvers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltInSolverFactory {
    pub solver_type: BuiltInSolverType,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl BuiltInSolverFactory {
    pub fn new(solver_type: BuiltInSolverType) -> Self {
        Self {
            solver_type,
            tolerance: 1e-10,
            max_iterations: 10_000,
        }
    }
}

impl SolverFactory for BuiltInSolverFactory {
    fn create_solver(&self, matrix: CscMatrix<f64>) -> FEAResult<Box<dyn LinearSolver>> {
        Ok(match self.solver_type {
            BuiltInSolverType::CholeskyDecomposition => Box::new(CholeskySolver::new(matrix)),
            BuiltInSolverType::ConjugateGradient => Box::new(ConjugateGradientSolver::new(
                matrix,
                self.tolerance,
                self.max_iterations,
            )),
        })
    }
}

/// Direct solver backed by a sparse Cholesky factorization
pub struct CholeskySolver {
    matrix: CscMatrix<f64>,
    factor: Option<CscCholesky<f64>>,
}

impl CholeskySolver {
    pub fn new(matrix: CscMatrix<f64>) -> Self {
        Self {
            matrix,
            factor: None,
        }
    }
}

impl LinearSolver for CholeskySolver {
    fn name(&self) -> &str {
        "cholesky"
    }

    fn matrix(&self) -> &CscMatrix<f64> {
        &self.matrix
    }

    fn needs_initialization(&self) -> bool {
        true
    }

    fn is_initialized(&self) -> bool {
        self.factor.is_some()
    }

    fn initialize(&mut self) -> FEAResult<()> {
        if self.matrix.nrows() != self.matrix.ncols() {
            return Err(FEAError::dimension(
                "cholesky factorization",
                self.matrix.nrows(),
                self.matrix.ncols(),
            ));
        }
        if let Some(dof) = csc_diagonal(&self.matrix).iter().position(|&d| d <= 0.0) {
            return Err(FEAError::NotPositiveDefinite(format!(
                "non-positive diagonal at equation {dof}"
            )));
        }
        let factor = CscCholesky::factor(&self.matrix).map_err(|err| match err {
            CholeskyError::NotPositiveDefinite => FEAError::NotPositiveDefinite(format!(
                "cholesky factorization of {0}x{0} matrix failed",
                self.matrix.nrows()
            )),
            other => FEAError::SolverFailed {
                kind: SolverFailureKind::Other,
                message: format!("{other:?}"),
            },
        })?;
        self.factor = Some(factor);
        Ok(())
    }

    fn solve(&self, b: &DVector<f64>) -> FEAResult<DVector<f64>> {
        let factor = self.factor.as_ref().ok_or_else(|| FEAError::SolverFailed {
            kind: SolverFailureKind::NotInitialized,
            message: "cholesky solver used before initialize()".to_string(),
        })?;
        if b.len() != self.matrix.nrows() {
            return Err(FEAError::dimension("right-hand side", self.matrix.nrows(), b.len()));
        }
        let rhs = DMatrix::from_column_slice(b.len(), 1, b.as_slice());
        let x = factor.solve(&rhs);
        Ok(DVector::from_column_slice(x.as_slice()))
    }
}

/// Iterative solver, no factorization to keep
pub struct ConjugateGradientSolver {
    matrix: CscMatrix<f64>,
    tolerance: f64,
    max_iterations: usize,
}

impl ConjugateGradientSolver {
    pub fn new(matrix: CscMatrix<f64>, tolerance: f64, max_iterations: usize) -> Self {
        Self {
            matrix,
            tolerance,
            max_iterations,
        }
    }
}

impl LinearSolver for ConjugateGradientSolver {
    fn name(&self) -> &str {
        "pcg"
    }

    fn matrix(&self) -> &CscMatrix<f64> {
        &self.matrix
    }

    fn needs_initialization(&self) -> bool {
        false
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn initialize(&mut self) -> FEAResult<()> {
        Ok(())
    }

    fn solve(&self, b: &DVector<f64>) -> FEAResult<DVector<f64>> {
        solve_pcg(&self.matrix, b, self.tolerance, self.max_iterations)
    }
}
