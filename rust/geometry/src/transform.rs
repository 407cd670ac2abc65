// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared transform utilities
//!
//! Object transforms follow the usual host convention: scale first, then
//! rotation (XYZ Euler angles in radians), then translation.

use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};

/// Bounding dimensions along the local x, y and z axes.
pub type Extents = [f64; 3];

/// Rotation matrix for XYZ Euler angles (radians).
#[inline]
pub fn rotation_matrix(euler: [f64; 3]) -> Matrix3<f64> {
    Rotation3::from_euler_angles(euler[0], euler[1], euler[2]).into_inner()
}

/// Linear part of an object transform: `R * S`.
#[inline]
pub fn linear_part(euler: [f64; 3], scale: [f64; 3]) -> Matrix3<f64> {
    rotation_matrix(euler) * Matrix3::from_diagonal(&Vector3::from(scale))
}

/// Full local-to-parent matrix: `T * R * S`.
pub fn local_matrix(location: [f64; 3], euler: [f64; 3], scale: [f64; 3]) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&linear_part(euler, scale));
    m[(0, 3)] = location[0];
    m[(1, 3)] = location[1];
    m[(2, 3)] = location[2];
    m
}

/// Per-axis product of extents and a scale factor.
#[inline]
pub fn scale_extents(extents: Extents, factor: [f64; 3]) -> Extents {
    [
        extents[0] * factor[0],
        extents[1] * factor[1],
        extents[2] * factor[2],
    ]
}

/// Lengths of the three box edges `extents[i] * e_i` after mapping through
/// `linear`.
///
/// Pure rotations leave every length unchanged; a non-uniform scale applied
/// after a rotation stretches the edges by the projection of each edge onto
/// the scaled axes.
pub fn mapped_extents(linear: &Matrix3<f64>, extents: Extents) -> Extents {
    let mut out = [0.0; 3];
    for (axis, value) in out.iter_mut().enumerate() {
        let column = linear.column(axis);
        *value = column.norm() * extents[axis];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_scale_extents() {
        assert_eq!(
            scale_extents([1.0, 2.0, 3.0], [2.0, 0.5, 1.0]),
            [2.0, 1.0, 3.0]
        );
    }

    #[test]
    fn test_rotation_preserves_extents() {
        let linear = linear_part([0.3, 1.1, -0.7], [1.0, 1.0, 1.0]);
        let out = mapped_extents(&linear, [1.0, 2.0, 3.0]);
        assert_relative_eq!(out[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_after_rotation_swaps_axes() {
        // Child rotated 90 degrees about z, then parent scales x by 2:
        // the child's local y edge now lies along parent x.
        let child = rotation_matrix([0.0, 0.0, FRAC_PI_2]);
        let parent = Matrix3::from_diagonal(&Vector3::new(2.0, 1.0, 1.0));
        let out = mapped_extents(&(parent * child), [1.0, 1.0, 1.0]);
        assert_relative_eq!(out[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_local_matrix_order() {
        let m = local_matrix([1.0, 0.0, 0.0], [0.0, 0.0, FRAC_PI_2], [2.0, 1.0, 1.0]);
        // (1,0,0) -> scaled to (2,0,0) -> rotated to (0,2,0) -> translated to (1,2,0)
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
    }
}
