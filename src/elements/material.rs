//! Material properties used by the built-in line elements

use serde::{Deserialize, Serialize};

/// Linear elastic isotropic material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    pub rho: f64,
}

impl Material {
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self { e, g, nu, rho }
    }

    /// Create a material from E and nu, with G = E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        Self::new(e, e / (2.0 * (1.0 + nu)), nu, rho)
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self::new(200e9, 77e9, 0.3, 7850.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
