//! Loads applied along elements

use serde::{Deserialize, Serialize};

use super::LoadCase;
use crate::math::Mat3;

/// Direction of an element load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDirection {
    /// Element local x (axial)
    Fx,
    /// Element local y
    Fy,
    /// Element local z
    Fz,
    /// Global X
    FX,
    /// Global Y
    FY,
    /// Global Z
    FZ,
}

impl LoadDirection {
    /// Components of a unit load in element local axes
    ///
    /// `r` holds the local axes as rows, so a global vector `v` has local
    /// components `r * v`.
    pub fn local_components(self, r: &Mat3) -> [f64; 3] {
        let global_axis = |k: usize| [r[(0, k)], r[(1, k)], r[(2, k)]];
        match self {
            LoadDirection::Fx => [1.0, 0.0, 0.0],
            LoadDirection::Fy => [0.0, 1.0, 0.0],
            LoadDirection::Fz => [0.0, 0.0, 1.0],
            LoadDirection::FX => global_axis(0),
            LoadDirection::FY => global_axis(1),
            LoadDirection::FZ => global_axis(2),
        }
    }
}

/// A load carried by an element and converted to equivalent nodal loads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementLoad {
    /// Constant intensity (force per length) over the whole element
    Uniform {
        direction: LoadDirection,
        magnitude: f64,
        case: LoadCase,
    },
    /// Single force at `position`, measured from the first node
    Concentrated {
        direction: LoadDirection,
        magnitude: f64,
        position: f64,
        case: LoadCase,
    },
}

impl ElementLoad {
    pub fn uniform(direction: LoadDirection, magnitude: f64, case: LoadCase) -> Self {
        ElementLoad::Uniform {
            direction,
            magnitude,
            case,
        }
    }

    pub fn concentrated(
        direction: LoadDirection,
        magnitude: f64,
        position: f64,
        case: LoadCase,
    ) -> Self {
        ElementLoad::Concentrated {
            direction,
            magnitude,
            position,
            case,
        }
    }

    pub fn case(&self) -> &LoadCase {
        match self {
            ElementLoad::Uniform { case, .. } | ElementLoad::Concentrated { case, .. } => case,
        }
    }

    pub fn direction(&self) -> LoadDirection {
        match self {
            ElementLoad::Uniform { direction, .. }
            | ElementLoad::Concentrated { direction, .. } => *direction,
        }
    }

    /// Total force carried by the load over an element of the given length
    pub fn total_force(&self, length: f64) -> f64 {
        match self {
            ElementLoad::Uniform { magnitude, .. } => magnitude * length,
            ElementLoad::Concentrated { magnitude, .. } => *magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_direction_projects_onto_local_axes() {
        // Element along +Y: local x = Y, local y = -X, local z = Z
        #[rustfmt::skip]
        let r = Mat3::new(
            0.0, 1.0, 0.0,
            -1.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
        );
        assert_eq!(LoadDirection::FX.local_components(&r), [0.0, -1.0, 0.0]);
        assert_eq!(LoadDirection::FY.local_components(&r), [1.0, 0.0, 0.0]);
        assert_eq!(LoadDirection::Fz.local_components(&r), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_case_accessor() {
        let load = ElementLoad::uniform(LoadDirection::FY, -2.0, LoadCase::dead("D"));
        assert_eq!(load.case(), &LoadCase::dead("d"));
        assert_eq!(load.total_force(3.0), -6.0);
    }
}
