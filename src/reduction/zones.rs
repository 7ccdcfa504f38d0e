//! Free/fixed partitioning of a master-space matrix

use nalgebra_sparse::CscMatrix;

use super::mapping::DofMappingManager;
use crate::error::{FEAError, FEAResult};
use crate::math::SparseMatrixBuilder;

/// A reduced matrix split into free (f) and fixed (s) blocks
#[derive(Debug, Clone)]
pub struct ZoneDividedMatrix {
    pub kff: CscMatrix<f64>,
    pub kfs: CscMatrix<f64>,
    pub ksf: CscMatrix<f64>,
    pub kss: CscMatrix<f64>,
}

impl ZoneDividedMatrix {
    /// Partition a `6m x 6m` master-space matrix
    pub fn divide(reduced: &CscMatrix<f64>, map: &DofMappingManager) -> FEAResult<Self> {
        let size = 6 * map.m;
        if reduced.nrows() != size {
            return Err(FEAError::dimension("zone partition rows", size, reduced.nrows()));
        }
        if reduced.ncols() != size {
            return Err(FEAError::dimension("zone partition columns", size, reduced.ncols()));
        }

        let (nf, ns) = (map.free_count(), map.fixed_count());
        let mut ff = SparseMatrixBuilder::new(nf, nf);
        let mut fs = SparseMatrixBuilder::new(nf, ns);
        let mut sf = SparseMatrixBuilder::new(ns, nf);
        let mut ss = SparseMatrixBuilder::new(ns, ns);

        for (row, col, &value) in reduced.triplet_iter() {
            let row_fixed = map.reduced_fixity(row).is_fixed();
            let col_fixed = map.reduced_fixity(col).is_fixed();

            let index = |reduced_dof: usize, fixed: bool| {
                let slot = if fixed {
                    map.map3[reduced_dof]
                } else {
                    map.map2[reduced_dof]
                };
                slot.ok_or_else(|| {
                    FEAError::InvalidInput(format!(
                        "master-space DOF {reduced_dof} missing from partition maps"
                    ))
                })
            };
            let (r, c) = (index(row, row_fixed)?, index(col, col_fixed)?);

            match (row_fixed, col_fixed) {
                (false, false) => ff.add(r, c, value),
                (false, true) => fs.add(r, c, value),
                (true, false) => sf.add(r, c, value),
                (true, true) => ss.add(r, c, value),
            }
        }

        Ok(Self {
            kff: ff.to_csc()?,
            kfs: fs.to_csc()?,
            ksf: sf.to_csc()?,
            kss: ss.to_csc()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Constraint, Node};
    use nalgebra::DMatrix;

    #[test]
    fn test_blocks_follow_fixity() {
        let nodes = vec![
            Node::new(0.0, 0.0, 0.0).with_constraint(Constraint::fixed_dy()),
            Node::new(1.0, 0.0, 0.0),
        ];
        let map = DofMappingManager::from_parts(&nodes, &[], None).unwrap();

        let mut builder = SparseMatrixBuilder::square(12);
        for i in 0..12 {
            for j in 0..12 {
                builder.add(i, j, (100 * i + j) as f64 + 1.0);
            }
        }
        let full = builder.to_dense();
        let zones = ZoneDividedMatrix::divide(&builder.to_csc().unwrap(), &map).unwrap();

        assert_eq!(zones.kff.nrows(), 11);
        assert_eq!((zones.kfs.nrows(), zones.kfs.ncols()), (11, 1));
        assert_eq!((zones.ksf.nrows(), zones.ksf.ncols()), (1, 11));
        assert_eq!(DMatrix::from(&zones.kss)[(0, 0)], full[(1, 1)]);

        let kff = DMatrix::from(&zones.kff);
        let kfs = DMatrix::from(&zones.kfs);
        for (fi, &ri) in map.rmap2.iter().enumerate() {
            assert_eq!(kfs[(fi, 0)], full[(ri, 1)]);
            for (fj, &rj) in map.rmap2.iter().enumerate() {
                assert_eq!(kff[(fi, fj)], full[(ri, rj)]);
            }
        }
        let ksf = DMatrix::from(&zones.ksf);
        for (fj, &rj) in map.rmap2.iter().enumerate() {
            assert_eq!(ksf[(0, fj)], full[(1, rj)]);
        }

        // A symmetric matrix gives Ksf = Kfs^T
        let mut symmetric = SparseMatrixBuilder::square(12);
        for i in 0..12 {
            for j in 0..12 {
                symmetric.add(i, j, (i * j + i + j) as f64 + 1.0);
            }
        }
        let zones = ZoneDividedMatrix::divide(&symmetric.to_csc().unwrap(), &map).unwrap();
        assert_eq!(
            DMatrix::from(&zones.ksf),
            DMatrix::from(&zones.kfs).transpose()
        );
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let nodes = vec![Node::new(0.0, 0.0, 0.0)];
        let map = DofMappingManager::from_parts(&nodes, &[], None).unwrap();
        let reduced = SparseMatrixBuilder::new(6, 12).to_csc().unwrap();
        assert!(matches!(
            ZoneDividedMatrix::divide(&reduced, &map),
            Err(FEAError::DimensionMismatch { .. })
        ));
    }
}
