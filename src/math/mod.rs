//! Mathematical utilities for FEA calculations

pub mod solver;
pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector};

use crate::error::{FEAError, FEAResult};

pub use solver::{
    BuiltInSolverFactory, BuiltInSolverType, CholeskySolver, ConjugateGradientSolver,
    LinearSolver, SolverFactory,
};
pub use sparse::{csc_diagonal, csc_matvec, solve_pcg, SparseMatrixBuilder};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;

/// 12x12 matrix for frame element stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for frame end forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Direction cosines of a 2-node element's local axes, rows are local x, y, z
///
/// Local x runs from `i_node` to `j_node`. Vertical elements (along global Y)
/// take local z = global Z; horizontal ones take local y = global Y; inclined
/// ones keep local z horizontal.
pub fn local_axes(i_node: &[f64; 3], j_node: &[f64; 3], rotation: f64) -> FEAResult<Mat3> {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    let dz = j_node[2] - i_node[2];

    let length = (dx * dx + dy * dy + dz * dz).sqrt();

    if length < 1e-10 {
        return Err(FEAError::InvalidGeometry(
            "element has zero length".to_string(),
        ));
    }

    let x = [dx / length, dy / length, dz / length];

    let (y, z) = if (x[0].abs() < 1e-10) && (x[2].abs() < 1e-10) {
        if x[1] > 0.0 {
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        } else {
            ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        }
    } else if dy.abs() < 1e-10 {
        let y = [0.0, 1.0, 0.0];
        let z = normalize(cross(&x, &y));
        (y, z)
    } else {
        // Project x onto the XZ plane so local z stays horizontal
        let proj = [dx, 0.0, dz];
        let z = if x[1] > 0.0 {
            normalize(cross(&proj, &x))
        } else {
            normalize(cross(&x, &proj))
        };
        let y = normalize(cross(&z, &x));
        (y, z)
    };

    let (y, z) = if rotation.abs() > 1e-10 {
        let (sin_r, cos_r) = rotation.sin_cos();
        let y_rot = [
            y[0] * cos_r + z[0] * sin_r,
            y[1] * cos_r + z[1] * sin_r,
            y[2] * cos_r + z[2] * sin_r,
        ];
        let z_rot = [
            -y[0] * sin_r + z[0] * cos_r,
            -y[1] * sin_r + z[1] * cos_r,
            -y[2] * sin_r + z[2] * cos_r,
        ];
        (y_rot, z_rot)
    } else {
        (y, z)
    };

    #[rustfmt::skip]
    let r = Mat3::new(
        x[0], x[1], x[2],
        y[0], y[1], y[2],
        z[0], z[1], z[2],
    );
    Ok(r)
}

/// Compute the 12x12 global-from-local transformation for a 3D frame element
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
/// * `rotation` - Rotation about the longitudinal axis (radians)
pub fn member_transformation_matrix(
    i_node: &[f64; 3],
    j_node: &[f64; 3],
    rotation: f64,
) -> FEAResult<Mat12> {
    let r = local_axes(i_node, j_node, rotation)?;

    let mut t = Mat12::zeros();
    for block in 0..4 {
        t.fixed_view_mut::<3, 3>(block * 3, block * 3).copy_from(&r);
    }
    Ok(t)
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Member length
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;

    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Compute fixed end reactions for a uniformly distributed load
///
/// # Arguments
/// * `w` - Load intensity (force per unit length)
/// * `length` - Member length
/// * `direction` - Load direction index (0=x, 1=y, 2=z in local coords)
pub fn fer_uniform_load(w: f64, length: f64, direction: usize) -> Vec12 {
    let l = length;
    let l2 = l * l;

    let mut fer = Vec12::zeros();

    match direction {
        0 => {
            fer[0] = -w * l / 2.0;
            fer[6] = -w * l / 2.0;
        }
        1 => {
            fer[1] = -w * l / 2.0;
            fer[5] = -w * l2 / 12.0;
            fer[7] = -w * l / 2.0;
            fer[11] = w * l2 / 12.0;
        }
        2 => {
            fer[2] = -w * l / 2.0;
            fer[4] = w * l2 / 12.0;
            fer[8] = -w * l / 2.0;
            fer[10] = -w * l2 / 12.0;
        }
        _ => {}
    }

    fer
}

/// Compute fixed end reactions for a point load
///
/// # Arguments
/// * `p` - Load magnitude
/// * `a` - Distance from i-node to load
/// * `length` - Member length
/// * `direction` - Load direction index (0=x, 1=y, 2=z in local coords)
pub fn fer_point_load(p: f64, a: f64, length: f64, direction: usize) -> Vec12 {
    let l = length;
    let b = l - a;
    let l2 = l * l;
    let l3 = l2 * l;

    let mut fer = Vec12::zeros();

    match direction {
        0 => {
            fer[0] = -p * b / l;
            fer[6] = -p * a / l;
        }
        1 => {
            fer[1] = -p * b * b * (3.0 * a + b) / l3;
            fer[5] = -p * a * b * b / l2;
            fer[7] = -p * a * a * (a + 3.0 * b) / l3;
            fer[11] = p * a * a * b / l2;
        }
        2 => {
            fer[2] = -p * b * b * (3.0 * a + b) / l3;
            fer[4] = p * a * b * b / l2;
            fer[8] = -p * a * a * (a + 3.0 * b) / l3;
            fer[10] = -p * a * a * b / l2;
        }
        _ => {}
    }

    fer
}

/// Rotate a local 12x12 matrix into global axes: `T^T * k * T`
pub fn to_global(k_local: &Mat12, t: &Mat12) -> Mat {
    let k = t.transpose() * k_local * t;
    Mat::from_column_slice(12, 12, k.as_slice())
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let t = member_transformation_matrix(&[0.0, 0.0, 0.0], &[10.0, 0.0, 0.0], 0.0).unwrap();

        // local x = X, local y = Y, local z = Z
        assert_relative_eq!(t[(0, 0)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(11, 11)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let t = member_transformation_matrix(&[0.0, 0.0, 0.0], &[0.0, 10.0, 0.0], 0.0).unwrap();

        // local x = Y, local y = -X, local z = Z
        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_transformation_matrix_along_z() {
        let r = local_axes(&[0.0, 0.0, 0.0], &[0.0, 0.0, 4.0], 0.0).unwrap();

        // local y = Y, local z = x cross y = -X
        assert_relative_eq!(r[(0, 2)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(r[(1, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(r[(2, 0)], -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_length_is_rejected() {
        let err = local_axes(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], 0.0).unwrap_err();
        assert!(matches!(err, FEAError::InvalidGeometry(_)));
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = member_local_stiffness(200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5, 10.0);

        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_fer_uniform_balances_load() {
        let fer = fer_uniform_load(-2.0, 6.0, 1);
        // Reactions carry the full 12 units and opposite end moments
        assert_relative_eq!(fer[1] + fer[7], 12.0);
        assert_relative_eq!(fer[5], -fer[11]);
        assert_relative_eq!(fer[5], 6.0);
    }

    #[test]
    fn test_fer_point_load_midspan() {
        let fer = fer_point_load(-10.0, 2.0, 4.0, 1);
        assert_relative_eq!(fer[1], 5.0);
        assert_relative_eq!(fer[7], 5.0);
        assert_relative_eq!(fer[5], 5.0);
        assert_relative_eq!(fer[11], -5.0);
    }
}
