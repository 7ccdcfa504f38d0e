//! Truss element - 2-node axial bar

use nalgebra::{DMatrix, Vector3};
use serde::{Deserialize, Serialize};

use super::frame::check_position;
use super::{end_coords, Element, Material, MatrixKind, Node};
use crate::error::{FEAError, FEAResult};
use crate::loads::ElementLoad;
use crate::math;
use crate::results::Force;

/// Pin-ended bar carrying axial force only
///
/// Rotational DOFs of its nodes get no stiffness, so a node connected to
/// trusses alone needs its rotations restrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrussElement {
    nodes: [usize; 2],
    pub material: Material,
    /// Cross-sectional area
    pub area: f64,
    pub label: Option<String>,
    loads: Vec<ElementLoad>,
}

impl TrussElement {
    pub fn new(i_node: usize, j_node: usize, material: Material, area: f64) -> Self {
        Self {
            nodes: [i_node, j_node],
            material,
            area,
            label: None,
            loads: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Unit vector from the first node to the second, and the length
    fn axis(&self, nodes: &[Node]) -> FEAResult<(Vector3<f64>, f64)> {
        let (i, j) = end_coords(&self.nodes, nodes)?;
        let d = Vector3::new(j[0] - i[0], j[1] - i[1], j[2] - i[2]);
        let length = d.norm();
        if length < 1e-10 {
            return Err(FEAError::InvalidGeometry(
                "truss element has zero length".to_string(),
            ));
        }
        Ok((d / length, length))
    }
}

impl Element for TrussElement {
    fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    fn global_matrix(&self, kind: MatrixKind, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        let (c, length) = self.axis(nodes)?;
        let mut out = DMatrix::zeros(12, 12);
        match kind {
            MatrixKind::Stiffness => {
                let k = self.material.e * self.area / length;
                let block = c * c.transpose() * k;
                for (r0, c0, sign) in [(0, 0, 1.0), (0, 6, -1.0), (6, 0, -1.0), (6, 6, 1.0)] {
                    out.view_mut((r0, c0), (3, 3)).copy_from(&(block * sign));
                }
            }
            MatrixKind::Mass => {
                let half = self.material.rho * self.area * length / 2.0;
                for dof in [0, 1, 2, 6, 7, 8] {
                    out[(dof, dof)] = half;
                }
            }
            MatrixKind::Damping => return Err(FEAError::UnsupportedMatrix(kind.name())),
        }
        Ok(out)
    }

    fn loads(&self) -> &[ElementLoad] {
        &self.loads
    }

    fn add_load(&mut self, load: ElementLoad) {
        self.loads.push(load);
    }

    /// Loads are shared between the ends as on a simply supported span
    fn global_equivalent_nodal_loads(
        &self,
        load: &ElementLoad,
        nodes: &[Node],
    ) -> FEAResult<Vec<Force>> {
        let (i, j) = end_coords(&self.nodes, nodes)?;
        let (_, length) = self.axis(nodes)?;
        let r = math::local_axes(&i, &j, 0.0)?;
        let local = load.direction().local_components(&r);
        let unit = r.transpose() * Vector3::new(local[0], local[1], local[2]);

        let (share_i, share_j) = match load {
            ElementLoad::Uniform { magnitude, .. } => {
                let half = magnitude * length / 2.0;
                (half, half)
            }
            ElementLoad::Concentrated {
                magnitude, position, ..
            } => {
                check_position(*position, length)?;
                let a = *position;
                (magnitude * (length - a) / length, magnitude * a / length)
            }
        };

        let force = |share: f64| {
            let v = unit * share;
            Force::new(v.x, v.y, v.z, 0.0, 0.0, 0.0)
        };
        Ok(vec![force(share_i), force(share_j)])
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
