//! Structural elements module
//!
//! Finite elements implement [`Element`]; rigid links are not elements and
//! are handled by DOF reduction instead.

mod constraint;
mod frame;
mod material;
mod node;
mod rigid;
mod section;
mod truss;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FEAError, FEAResult};
use crate::loads::ElementLoad;
use crate::results::Force;

pub use constraint::{Constraint, DofConstraint};
pub use frame::FrameElement;
pub use material::Material;
pub use node::Node;
pub use rigid::RigidElement;
pub use section::Section;
pub use truss::TrussElement;

/// Which global matrix an element contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixKind {
    Stiffness,
    Mass,
    Damping,
}

impl MatrixKind {
    pub fn name(self) -> &'static str {
        match self {
            MatrixKind::Stiffness => "stiffness",
            MatrixKind::Mass => "mass",
            MatrixKind::Damping => "damping",
        }
    }
}

/// Capability interface of a finite element
///
/// Matrices are in global axes with 6 DOFs per node, ordered node-major in
/// the order of [`Element::nodes`].
pub trait Element: fmt::Debug + Send + Sync {
    /// Indices of the connected nodes in the model's node list
    fn nodes(&self) -> &[usize];

    /// Dense `6k x 6k` matrix of the requested kind, `k = nodes().len()`
    fn global_matrix(&self, kind: MatrixKind, nodes: &[Node]) -> FEAResult<DMatrix<f64>>;

    fn loads(&self) -> &[ElementLoad];

    fn add_load(&mut self, load: ElementLoad);

    /// Equivalent nodal loads in global axes, one per element node
    fn global_equivalent_nodal_loads(
        &self,
        load: &ElementLoad,
        nodes: &[Node],
    ) -> FEAResult<Vec<Force>>;

    fn label(&self) -> Option<&str> {
        None
    }

    fn global_stiffness(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        self.global_matrix(MatrixKind::Stiffness, nodes)
    }

    fn global_mass(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        self.global_matrix(MatrixKind::Mass, nodes)
    }

    fn global_damping(&self, nodes: &[Node]) -> FEAResult<DMatrix<f64>> {
        self.global_matrix(MatrixKind::Damping, nodes)
    }
}

/// Coordinates of the two end nodes of a line element
pub(crate) fn end_coords(ends: &[usize; 2], nodes: &[Node]) -> FEAResult<([f64; 3], [f64; 3])> {
    let coords = |index: usize| {
        nodes
            .get(index)
            .map(Node::coords)
            .ok_or_else(|| FEAError::NodeNotFound(format!("#{index}")))
    };
    Ok((coords(ends[0])?, coords(ends[1])?))
}
