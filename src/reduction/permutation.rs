//! Kinematic coupling of slave DOFs to their master
//!
//! `Pd` (`6n x 6m`) maps master-space displacements to node space: a slave
//! at `x_s` tied to a master at `x_m` translates by `u_m + θ_m × (x_s - x_m)`
//! and rotates by `θ_m`. `Pf = Pd^T` maps node-space forces to master space.

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use super::mapping::DofMappingManager;
use crate::elements::Node;
use crate::error::{FEAError, FEAResult};
use crate::math::{csc_matvec, SparseMatrixBuilder};

/// The pair of rigid coupling matrices for one master mapping
#[derive(Debug, Clone)]
pub struct RigidPermutation {
    /// Displacement permutation, node space from master space
    pub pd: CscMatrix<f64>,
    /// Force permutation, master space from node space
    pub pf: CscMatrix<f64>,
}

impl RigidPermutation {
    pub fn build(nodes: &[Node], map: &DofMappingManager) -> FEAResult<Self> {
        if nodes.len() != map.n {
            return Err(FEAError::dimension("rigid permutation nodes", map.n, nodes.len()));
        }

        let mut builder = SparseMatrixBuilder::new(6 * map.n, 6 * map.m);

        for (slave, &master) in map.master_map.iter().enumerate() {
            let compact = map.map4[master].ok_or_else(|| {
                FEAError::InvalidInput(format!("node {master} is used as master but defers to another node"))
            })?;
            let (row, col) = (6 * slave, 6 * compact);

            for k in 0..6 {
                builder.add(row + k, col + k, 1.0);
            }
            if slave == master {
                continue;
            }

            let s = nodes[slave].coords();
            let m = nodes[master].coords();
            let (dx, dy, dz) = (m[0] - s[0], m[1] - s[1], m[2] - s[2]);

            builder.add(row + 1, col + 3, dz);
            builder.add(row, col + 4, -dz);
            builder.add(row, col + 5, dy);
            builder.add(row + 2, col + 3, -dy);
            builder.add(row + 2, col + 4, dx);
            builder.add(row + 1, col + 5, -dx);
        }

        let pd = builder.to_csc()?;
        let pf = pd.transpose();
        Ok(Self { pd, pf })
    }

    /// `Pf * K * Pd` for a node-space matrix `K`
    pub fn reduce_matrix(&self, k: &CscMatrix<f64>) -> FEAResult<CscMatrix<f64>> {
        let n = self.pd.nrows();
        if k.nrows() != n || k.ncols() != n {
            return Err(FEAError::dimension(
                "node-space matrix",
                n,
                k.nrows().max(k.ncols()),
            ));
        }
        let kd = k * &self.pd;
        Ok(&self.pf * &kd)
    }

    /// `Pf * f` for a node-space vector
    pub fn reduce_vector(&self, f: &DVector<f64>) -> FEAResult<DVector<f64>> {
        csc_matvec(&self.pf, f)
    }

    /// `Pd * u` for a master-space vector
    pub fn expand_vector(&self, u: &DVector<f64>) -> FEAResult<DVector<f64>> {
        csc_matvec(&self.pd, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::RigidElement;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn pair() -> (Vec<Node>, DofMappingManager) {
        let nodes = vec![Node::new(0.0, 0.0, 0.0), Node::new(2.0, 3.0, 5.0)];
        let rigid = [RigidElement::new(vec![0, 1])];
        let map = DofMappingManager::from_parts(&nodes, &rigid, None).unwrap();
        (nodes, map)
    }

    #[test]
    fn test_identity_without_slaves() {
        let nodes = vec![Node::new(0.0, 0.0, 0.0), Node::new(1.0, 0.0, 0.0)];
        let map = DofMappingManager::from_parts(&nodes, &[], None).unwrap();
        let perm = RigidPermutation::build(&nodes, &map).unwrap();
        assert_eq!(DMatrix::from(&perm.pd), DMatrix::identity(12, 12));
    }

    #[test]
    fn test_slave_follows_master_rotation() {
        let (nodes, map) = pair();
        let perm = RigidPermutation::build(&nodes, &map).unwrap();
        assert_eq!((perm.pd.nrows(), perm.pd.ncols()), (12, 6));

        // Rotate the master (node 0) about each axis in turn
        for axis in 0..3 {
            let mut ur = DVector::zeros(6);
            ur[3 + axis] = 0.01;
            let u = perm.expand_vector(&ur).unwrap();

            let theta = nalgebra::Vector3::new(ur[3], ur[4], ur[5]);
            let arm = nalgebra::Vector3::new(2.0, 3.0, 5.0);
            let expected = theta.cross(&arm);
            for k in 0..3 {
                assert_relative_eq!(u[6 + k], expected[k], epsilon = 1e-14);
                assert_relative_eq!(u[k], 0.0);
            }
            assert_relative_eq!(u[9 + axis], 0.01);
        }
    }

    #[test]
    fn test_force_permutation_is_transpose() {
        let (nodes, map) = pair();
        let perm = RigidPermutation::build(&nodes, &map).unwrap();
        assert_eq!(DMatrix::from(&perm.pf), DMatrix::from(&perm.pd).transpose());

        // A force on the slave reaches the master with its moment arm
        let mut f = DVector::zeros(12);
        f[6] = 1.0;
        let fr = perm.reduce_vector(&f).unwrap();
        assert_relative_eq!(fr[0], 1.0);
        assert_relative_eq!(fr[4], 5.0);
        assert_relative_eq!(fr[5], -3.0);
    }

    #[test]
    fn test_reduce_matrix_rejects_wrong_shape() {
        let (nodes, map) = pair();
        let perm = RigidPermutation::build(&nodes, &map).unwrap();
        let k = SparseMatrixBuilder::square(6).to_csc().unwrap();
        assert!(matches!(
            perm.reduce_matrix(&k),
            Err(FEAError::DimensionMismatch { .. })
        ));
    }
}
