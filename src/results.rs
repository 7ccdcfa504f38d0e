//! Result types for FEA analysis

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Displacement (or settlement) of a node: three translations and three rotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl Displacement {
    pub fn new(dx: f64, dy: f64, dz: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self { dx, dy, dz, rx, ry, rz }
    }

    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
    }

    /// Create from the six entries starting at `offset`
    pub fn from_slice(values: &[f64], offset: usize) -> Self {
        let mut arr = [0.0; 6];
        arr.copy_from_slice(&values[offset..offset + 6]);
        Self::from_array(arr)
    }

    /// Get the displacement as an array [DX, DY, DZ, RX, RY, RZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.as_array().iter().all(|v| *v == 0.0)
    }
}

/// Force and moment acting on a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Force in X direction
    pub fx: f64,
    /// Force in Y direction
    pub fy: f64,
    /// Force in Z direction
    pub fz: f64,
    /// Moment about X axis
    pub mx: f64,
    /// Moment about Y axis
    pub my: f64,
    /// Moment about Z axis
    pub mz: f64,
}

impl Force {
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self { fx, fy, fz, mx, my, mz }
    }

    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
    }

    /// Create from the six entries starting at `offset`
    pub fn from_slice(values: &[f64], offset: usize) -> Self {
        let mut arr = [0.0; 6];
        arr.copy_from_slice(&values[offset..offset + 6]);
        Self::from_array(arr)
    }

    /// Get the force as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }

    /// Get total moment magnitude
    pub fn moment_magnitude(&self) -> f64 {
        (self.mx.powi(2) + self.my.powi(2) + self.mz.powi(2)).sqrt()
    }

    /// Equivalent force system about `point` for this force applied at `location`
    pub fn move_to(&self, location: [f64; 3], point: [f64; 3]) -> Self {
        let r = [
            location[0] - point[0],
            location[1] - point[1],
            location[2] - point[2],
        ];
        Self {
            fx: self.fx,
            fy: self.fy,
            fz: self.fz,
            mx: self.mx + r[1] * self.fz - r[2] * self.fy,
            my: self.my + r[2] * self.fx - r[0] * self.fz,
            mz: self.mz + r[0] * self.fy - r[1] * self.fx,
        }
    }
}

impl Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force::new(
            self.fx + rhs.fx,
            self.fy + rhs.fy,
            self.fz + rhs.fz,
            self.mx + rhs.mx,
            self.my + rhs.my,
            self.mz + rhs.mz,
        )
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Force) {
        *self = *self + rhs;
    }
}

impl Sub for Force {
    type Output = Force;

    fn sub(self, rhs: Force) -> Force {
        self + (-rhs)
    }
}

impl Neg for Force {
    type Output = Force;

    fn neg(self) -> Force {
        self * -1.0
    }
}

impl Mul<f64> for Force {
    type Output = Force;

    fn mul(self, factor: f64) -> Force {
        Force::new(
            self.fx * factor,
            self.fy * factor,
            self.fz * factor,
            self.mx * factor,
            self.my * factor,
            self.mz * factor,
        )
    }
}

/// Summary of analysis results for one load case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Node index with maximum displacement
    pub max_disp_node: usize,
    /// Maximum support reaction force magnitude
    pub max_reaction: f64,
    /// Node index with maximum reaction
    pub max_reaction_node: usize,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Number of master nodes after rigid consolidation
    pub num_masters: usize,
    /// Total DOFs in node space
    pub total_dofs: usize,
    /// Free DOFs (unknown) of the reduced system
    pub free_dofs: usize,
    /// Fixed DOFs of the reduced system
    pub fixed_dofs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_force_arithmetic() {
        let a = Force::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        let b = Force::new(0.0, 0.0, 0.0, 4.0, 5.0, 6.0);
        let c = a + b;
        assert_eq!(c.as_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!((c - b).as_array(), a.as_array());
        assert_eq!((a * 2.0).fy, 4.0);
    }

    #[test]
    fn test_move_to_adds_moment_arm() {
        // 10 N downward at x = 2 gives -20 N·m about the origin around Z
        let f = Force::new(0.0, -10.0, 0.0, 0.0, 0.0, 0.0);
        let moved = f.move_to([2.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert_relative_eq!(moved.mz, -20.0);
        assert_relative_eq!(moved.fy, -10.0);
    }

    #[test]
    fn test_displacement_slice() {
        let values = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let d = Displacement::from_slice(&values, 6);
        assert_eq!(d.rz, 6.0);
        assert_relative_eq!(d.translation_magnitude(), 14.0_f64.sqrt());
    }
}
