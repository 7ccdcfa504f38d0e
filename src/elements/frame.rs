//! Frame element - 2-node 3D beam/column

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::{end_coords, Element, Material, MatrixKind, Node, Section};
use crate::error::{FEAError, FEAResult};
use crate::loads::ElementLoad;
use crate::math::{self, Vec12};
use crate::results::Force;

/// A 3D Euler-Bernoulli frame element (beam or column)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameElement {
    nodes: [usize; 2],
    pub material: Material,
    pub section: Section,
    /// Rotation about longitudinal axis (radians)
    pub rotation: f64,
    pub label: Option<String>,
    loads: Vec<ElementLoad>,
}

impl FrameElement {
    pub fn new(i_node: usize, j_node: usize, material: Material, section: Section) -> Self {
        Self {
            nodes: [i_node, j_node],
            material,
            section,
            rotation: 0.0,
            label: None,
            loads: Vec::new(),
        }
    }

    /// Set member rotation about its longitudinal axis
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_load(mut self, load: ElementLoad) -> Self {
        self.loads.push(load);
        self
    }

    pub fn length(&self, nodes: &[Node]) -> FEAResult<f64> {
        let (i, j) = end_coords(&self.nodes, nodes)?;
        Ok(distance(&i, &j))
    }

    fn stiffness(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        let (i, j) = end_coords(&self.nodes, nodes)?;
        let t = math::member_transformation_matrix(&i, &j, self.rotation)?;
        let k = math::member_local_stiffness(
            self.material.e,
            self.material.g,
            self.section.a,
            self.section.iy,
            self.section.iz,
            self.section.j,
            distance(&i, &j),
        );
        Ok(math::to_global(&k, &t))
    }

    /// Lumped translational mass, half the element mass at each end
    fn mass(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        let half = self.material.rho * self.section.a * self.length(nodes)? / 2.0;
        let mut m = DMatrix::zeros(12, 12);
        for dof in [0, 1, 2, 6, 7, 8] {
            m[(dof, dof)] = half;
        }
        Ok(m)
    }
}

impl Element for FrameElement {
    fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    fn global_matrix(&self, kind: MatrixKind, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        match kind {
            MatrixKind::Stiffness => self.stiffness(nodes),
            MatrixKind::Mass => self.mass(nodes),
            MatrixKind::Damping => Err(FEAError::UnsupportedMatrix(kind.name())),
        }
    }

    fn loads(&self) -> &[ElementLoad] {
        &self.loads
    }

    fn add_load(&mut self, load: ElementLoad) {
        self.loads.push(load);
    }

    fn global_equivalent_nodal_loads(
        &self,
        load: &ElementLoad,
        nodes: &[Node],
    ) -> FEAResult<Vec<Force>> {
        let (i, j) = end_coords(&self.nodes, nodes)?;
        let length = distance(&i, &j);
        let r = math::local_axes(&i, &j, self.rotation)?;
        let t = math::member_transformation_matrix(&i, &j, self.rotation)?;

        let components = load.direction().local_components(&r);
        let mut fer = Vec12::zeros();
        for (axis, &c) in components.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            fer += match load {
                ElementLoad::Uniform { magnitude, .. } => {
                    math::fer_uniform_load(magnitude * c, length, axis)
                }
                ElementLoad::Concentrated {
                    magnitude, position, ..
                } => {
                    check_position(*position, length)?;
                    math::fer_point_load(magnitude * c, *position, length, axis)
                }
            };
        }

        // Fixed end reactions oppose the load
        let global = -(t.transpose() * fer);
        Ok(vec![
            Force::from_slice(global.as_slice(), 0),
            Force::from_slice(global.as_slice(), 6),
        ])
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

pub(crate) fn check_position(position: f64, length: f64) -> FEAResult<()> {
    if !(0.0..=length).contains(&position) {
        return Err(FEAError::InvalidInput(format!(
            "load position {position} outside element of length {length}"
        )));
    }
    Ok(())
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
}
