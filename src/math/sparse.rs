//! Sparse matrix utilities for assembly and iterative solves
//!
//! Global matrices are accumulated as triplets and compressed to column
//! storage, where duplicate entries are summed.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::error::{FEAError, FEAResult, SolverFailureKind};

/// Sparse matrix builder using COO (triplet) format
pub struct SparseMatrixBuilder {
    nrows: usize,
    ncols: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a builder for an `nrows x ncols` matrix
    pub fn new(nrows: usize, ncols: usize) -> Self {
        // 6 DOFs per node with a handful of neighbours is typical
        let estimated_nnz = nrows.max(ncols) * 60;
        Self {
            nrows,
            ncols,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Create a builder for a square matrix
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter a dense block through a DOF map: entry `(i, j)` lands at `(dofs[i], dofs[j])`
    pub fn add_dense(&mut self, dofs: &[usize], block: &DMatrix<f64>) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, block[(i, j)]);
            }
        }
    }

    /// Compress to CSC format, summing duplicates
    pub fn to_csc(&self) -> FEAResult<CscMatrix<f64>> {
        let mut coo = CooMatrix::new(self.nrows, self.ncols);

        for &(row, col, val) in &self.entries {
            if row >= self.nrows {
                return Err(FEAError::dimension("triplet row", self.nrows, row));
            }
            if col >= self.ncols {
                return Err(FEAError::dimension("triplet column", self.ncols, col));
            }
            coo.push(row, col, val);
        }

        Ok(CscMatrix::from(&coo))
    }

    /// Convert to dense matrix (for comparison/debugging)
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.nrows, self.ncols);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    /// Number of pushed triplets (duplicates counted)
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Sparse matrix-vector multiplication `y = A * x`
pub fn csc_matvec(a: &CscMatrix<f64>, x: &DVector<f64>) -> FEAResult<DVector<f64>> {
    if x.len() != a.ncols() {
        return Err(FEAError::dimension("matrix-vector product", a.ncols(), x.len()));
    }

    let mut y = DVector::zeros(a.nrows());

    let col_offsets = a.col_offsets();
    let row_indices = a.row_indices();
    let values = a.values();

    for col in 0..a.ncols() {
        let xc = x[col];
        if xc == 0.0 {
            continue;
        }
        for idx in col_offsets[col]..col_offsets[col + 1] {
            y[row_indices[idx]] += values[idx] * xc;
        }
    }

    Ok(y)
}

/// Diagonal of a square sparse matrix; missing entries are zero
pub fn csc_diagonal(a: &CscMatrix<f64>) -> DVector<f64> {
    let n = a.nrows().min(a.ncols());
    let mut diag = DVector::zeros(n);
    for (row, col, &val) in a.triplet_iter() {
        if row == col {
            diag[row] += val;
        }
    }
    diag
}

/// Solve a sparse SPD system using Jacobi-preconditioned Conjugate Gradient
///
/// Converges when `|r| <= tol * |b|`. Zero diagonal entries fall back to a
/// unit preconditioner.
pub fn solve_pcg(
    a: &CscMatrix<f64>,
    b: &DVector<f64>,
    tol: f64,
    max_iter: usize,
) -> FEAResult<DVector<f64>> {
    let n = a.nrows();
    if b.len() != n {
        return Err(FEAError::dimension("right-hand side", n, b.len()));
    }

    let b_norm = b.norm();
    let mut x = DVector::zeros(n);
    if b_norm == 0.0 {
        return Ok(x);
    }
    let threshold = tol * b_norm;

    let mut diag = csc_diagonal(a);
    for d in diag.iter_mut() {
        if d.abs() < 1e-15 {
            *d = 1.0;
        }
    }

    let mut r = b.clone();
    let mut z = r.component_div(&diag);
    let mut p = z.clone();
    let mut r_dot_z = r.dot(&z);

    for _iter in 0..max_iter {
        let ap = csc_matvec(a, &p)?;
        let p_dot_ap = p.dot(&ap);

        if p_dot_ap.abs() < 1e-300 {
            return Err(FEAError::SolverFailed {
                kind: SolverFailureKind::Breakdown,
                message: "search direction has zero curvature (p'Ap = 0)".to_string(),
            });
        }
        if p_dot_ap < 0.0 {
            return Err(FEAError::NotPositiveDefinite(format!(
                "negative curvature p'Ap = {p_dot_ap:e}"
            )));
        }

        let alpha = r_dot_z / p_dot_ap;

        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        if r.norm() <= threshold {
            return Ok(x);
        }

        z = r.component_div(&diag);
        let r_dot_z_new = r.dot(&z);
        let beta = r_dot_z_new / r_dot_z;
        r_dot_z = r_dot_z_new;

        p = &z + beta * &p;
    }

    Err(FEAError::ConvergenceFailed(max_iter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tridiagonal() -> SparseMatrixBuilder {
        let mut builder = SparseMatrixBuilder::square(3);
        builder.add(0, 0, 4.0);
        builder.add(0, 1, -1.0);
        builder.add(1, 0, -1.0);
        builder.add(1, 1, 4.0);
        builder.add(1, 2, -1.0);
        builder.add(2, 1, -1.0);
        builder.add(2, 2, 4.0);
        builder
    }

    #[test]
    fn test_duplicates_are_summed() {
        let mut builder = SparseMatrixBuilder::new(2, 3);
        builder.add(0, 2, 1.5);
        builder.add(0, 2, 2.5);
        builder.add(1, 0, 0.0);
        assert_eq!(builder.nnz(), 2);

        let csc = builder.to_csc().unwrap();
        assert_eq!(csc.nrows(), 2);
        assert_eq!(csc.ncols(), 3);
        let dense = DMatrix::from(&csc);
        assert_relative_eq!(dense[(0, 2)], 4.0);
        assert_eq!(dense, builder.to_dense());
    }

    #[test]
    fn test_out_of_range_triplet() {
        let mut builder = SparseMatrixBuilder::square(2);
        builder.add(2, 0, 1.0);
        assert!(matches!(
            builder.to_csc(),
            Err(FEAError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_scatter_dense_block() {
        let mut builder = SparseMatrixBuilder::square(4);
        let block = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        builder.add_dense(&[3, 1], &block);
        builder.add_dense(&[3, 1], &block);
        let dense = builder.to_dense();
        assert_eq!(dense[(3, 3)], 2.0);
        assert_eq!(dense[(3, 1)], 4.0);
        assert_eq!(dense[(1, 3)], 6.0);
        assert_eq!(dense[(1, 1)], 8.0);
    }

    #[test]
    fn test_matvec_and_diagonal() {
        let csc = tridiagonal().to_csc().unwrap();
        let y = csc_matvec(&csc, &DVector::from_vec(vec![1.0, 1.0, 1.0])).unwrap();
        assert_eq!(y.as_slice(), &[3.0, 2.0, 3.0]);
        assert_eq!(csc_diagonal(&csc).as_slice(), &[4.0, 4.0, 4.0]);
        assert!(csc_matvec(&csc, &DVector::zeros(2)).is_err());
    }

    #[test]
    fn test_pcg_solve() {
        let csc = tridiagonal().to_csc().unwrap();
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        let x = solve_pcg(&csc, &b, 1e-12, 100).unwrap();

        let ax = csc_matvec(&csc, &x).unwrap();
        assert!((&ax - &b).norm() < 1e-9);
    }

    #[test]
    fn test_pcg_reports_non_convergence() {
        let csc = tridiagonal().to_csc().unwrap();
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            solve_pcg(&csc, &b, 1e-14, 1),
            Err(FEAError::ConvergenceFailed(1))
        ));
    }
}
