//! FEA Static - linear static analysis of 3D frame structures with rigid links
//!
//! The crate reduces a model's degrees of freedom before solving:
//! - Rigid elements are consolidated into groups that follow one master node
//! - Slave DOFs are eliminated through a rigid coupling transformation
//! - Master DOFs are partitioned into free and fixed zones
//! - The free block is solved with a sparse Cholesky or PCG solver, and
//!   displacements, forces and support reactions are recovered per node
//!
//! Reduced systems are cached per master mapping, so load cases that share a
//! rigid configuration reuse one factorization.
//!
//! ## Example
//! ```rust
//! use fea_static::prelude::*;
//!
//! let mut model = Model::new();
//!
//! let n1 = model.add_node(Node::new(0.0, 0.0, 0.0)).unwrap();
//! let n2 = model.add_node(Node::new(10.0, 0.0, 0.0)).unwrap();
//! model
//!     .add_element(FrameElement::new(n1, n2, Material::steel(), Section::rectangular(0.3, 0.5)))
//!     .unwrap();
//! model.set_constraint(n1, Constraint::fixed()).unwrap();
//!
//! let dead = LoadCase::dead("Dead");
//! model
//!     .add_nodal_load(n2, NodalLoad::force(0.0, -10_000.0, 0.0, dead.clone()))
//!     .unwrap();
//!
//! model.solve(&AnalysisOptions::linear()).unwrap();
//!
//! let tip = model.node_displacement(n2, &dead).unwrap();
//! assert!(tip.dy < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod reduction;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, CaseResult, StaticLinearAnalysisResult};
    pub use crate::elements::{
        Constraint, DofConstraint, Element, FrameElement, Material, MatrixKind, Node,
        RigidElement, Section, TrussElement,
    };
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::loads::{
        ElementLoad, LoadCase, LoadCombination, LoadDirection, LoadType, NodalLoad,
    };
    pub use crate::math::{BuiltInSolverFactory, BuiltInSolverType, LinearSolver, SolverFactory};
    pub use crate::model::Model;
    pub use crate::reduction::{DofMappingManager, RigidPermutation, ZoneDividedMatrix};
    pub use crate::results::{AnalysisSummary, Displacement, Force};
}
