//! Node element - represents a point in 3D space

use serde::{Deserialize, Serialize};

use super::Constraint;
use crate::loads::NodalLoad;
use crate::results::Displacement;

/// A 3D node in the finite element model
///
/// A node's index is its position in [`crate::model::Model::nodes`]; DOF `k`
/// of node `i` lives at `6 * i + k` in every node-space vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
    /// Optional label, used for lookups and diagnostics
    pub label: Option<String>,

    pub(crate) constraints: Constraint,
    /// Prescribed displacement, applied only under the model's settlement case
    pub(crate) settlements: Displacement,
    /// Concentrated loads applied directly to the node
    pub(crate) loads: Vec<NodalLoad>,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints = constraint;
        self
    }

    pub fn with_settlement(mut self, settlement: Displacement) -> Self {
        self.settlements = settlement;
        self
    }

    pub fn with_load(mut self, load: NodalLoad) -> Self {
        self.loads.push(load);
        self
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn constraints(&self) -> Constraint {
        self.constraints
    }

    pub fn settlements(&self) -> Displacement {
        self.settlements
    }

    pub fn loads(&self) -> &[NodalLoad] {
        &self.loads
    }

    /// Label if set, otherwise `#index`
    pub(crate) fn display_name(&self, index: usize) -> String {
        self.label.clone().unwrap_or_else(|| format!("#{index}"))
    }
}
