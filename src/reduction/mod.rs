//! DOF reduction: rigid consolidation, index maps, coupling and partitioning
//!
//! For one load case the pipeline is
//! [`master_mapping`] → [`DofMappingManager`] → [`RigidPermutation`] and
//! [`assemble_global_matrix`] → `Pf * K * Pd` → [`ZoneDividedMatrix`].

mod assembler;
mod graph;
mod mapping;
mod permutation;
mod zones;

pub use assembler::{assemble, assemble_global_matrix};
pub use graph::master_mapping;
pub use mapping::DofMappingManager;
pub use permutation::RigidPermutation;
pub use zones::ZoneDividedMatrix;
