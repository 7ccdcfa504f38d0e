//! Nodal support conditions

use serde::{Deserialize, Serialize};

/// Support state of a single degree of freedom
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DofConstraint {
    /// Free to move
    #[default]
    Released,
    /// Restrained by a support (may carry a settlement)
    Fixed,
}

impl DofConstraint {
    pub fn is_fixed(self) -> bool {
        self == DofConstraint::Fixed
    }

    fn from_bool(fixed: bool) -> Self {
        if fixed {
            DofConstraint::Fixed
        } else {
            DofConstraint::Released
        }
    }
}

/// Support conditions of a node, one flag per DOF
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    pub dx: DofConstraint,
    pub dy: DofConstraint,
    pub dz: DofConstraint,
    pub rx: DofConstraint,
    pub ry: DofConstraint,
    pub rz: DofConstraint,
}

impl Constraint {
    /// Create a constraint from per-DOF flags in [DX, DY, DZ, RX, RY, RZ] order
    pub fn new(dofs: [DofConstraint; 6]) -> Self {
        Self {
            dx: dofs[0],
            dy: dofs[1],
            dz: dofs[2],
            rx: dofs[3],
            ry: dofs[4],
            rz: dofs[5],
        }
    }

    /// Create a constraint from restraint booleans (true = fixed)
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self::new([dx, dy, dz, rx, ry, rz].map(DofConstraint::from_bool))
    }

    /// No DOF restrained
    pub fn released() -> Self {
        Self::default()
    }

    /// All DOFs restrained
    pub fn fixed() -> Self {
        Self::new([DofConstraint::Fixed; 6])
    }

    /// Translations restrained, rotations free
    pub fn movement_fixed() -> Self {
        Self::with_restraints(true, true, true, false, false, false)
    }

    /// Rotations restrained, translations free
    pub fn rotation_fixed() -> Self {
        Self::with_restraints(false, false, false, true, true, true)
    }

    /// Only X translation restrained
    pub fn fixed_dx() -> Self {
        Self::with_restraints(true, false, false, false, false, false)
    }

    /// Only Y translation restrained
    pub fn fixed_dy() -> Self {
        Self::with_restraints(false, true, false, false, false, false)
    }

    /// Only Z translation restrained
    pub fn fixed_dz() -> Self {
        Self::with_restraints(false, false, true, false, false, false)
    }

    /// Get the constraint as an array [DX, DY, DZ, RX, RY, RZ]
    pub fn to_array(&self) -> [DofConstraint; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Count number of restrained DOFs
    pub fn fixed_count(&self) -> usize {
        self.to_array().iter().filter(|c| c.is_fixed()).count()
    }

    /// True when no DOF is restrained
    pub fn is_released(&self) -> bool {
        self.fixed_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constraint() {
        let c = Constraint::fixed();
        assert_eq!(c.fixed_count(), 6);
        assert!(!c.is_released());
    }

    #[test]
    fn test_movement_fixed() {
        let c = Constraint::movement_fixed();
        assert_eq!(c.fixed_count(), 3);
        assert_eq!(c.rx, DofConstraint::Released);
        assert_eq!(c.dz, DofConstraint::Fixed);
    }

    #[test]
    fn test_default_is_released() {
        assert!(Constraint::default().is_released());
        assert_eq!(Constraint::fixed_dy().to_array()[1], DofConstraint::Fixed);
    }
}
