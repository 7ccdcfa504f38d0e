//! Section properties for frame and truss elements

use serde::{Deserialize, Serialize};

/// Cross-section properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
}

impl Section {
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Solid rectangle, `depth` measured along local z
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        // Approximate torsional constant
        let (long, short) = if width > depth { (width, depth) } else { (depth, width) };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);

        Self { a, iy, iz, j }
    }

    /// Solid circle
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        Self {
            a: std::f64::consts::PI * r.powi(2),
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::rectangular(0.2, 0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(0.3, 0.5);
        assert!((section.a - 0.15).abs() < 1e-10);
        assert!((section.iy - 0.3 * 0.5_f64.powi(3) / 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular(0.5);
        assert!((section.iy - section.iz).abs() < 1e-12);
        assert!((section.j - 2.0 * section.iy).abs() < 1e-12);
    }
}
