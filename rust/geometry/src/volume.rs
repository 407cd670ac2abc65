// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume estimation for closed triangle meshes.
//!
//! Each triangle contributes the volume of the prism between itself and the
//! z = 0 plane: its projected XY area times its mean height, signed by the
//! z component of its normal. For a closed, consistently oriented surface the
//! prisms under downward faces cancel those under upward faces, leaving the
//! enclosed volume (divergence theorem with the field `(0, 0, z)`).

use crate::mesh::Face;
use nalgebra::Point3;

/// Result of a volume estimate over a face list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolumeEstimate {
    /// Absolute enclosed volume
    pub volume: f64,
    /// Triangles that contributed
    pub triangles: usize,
    /// Faces that still had more than 3 vertices; only their first 3 were used
    pub oversized_faces: usize,
    /// Faces with fewer than 3 vertices, ignored
    pub skipped_faces: usize,
}

/// Signed prism volume of triangle `(a, b, c)` above z = 0.
#[inline]
pub fn triangle_contribution(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let det = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
    let mean_z = (a.z + b.z + c.z) / 3.0;
    let area = 0.5 * det.abs();

    // z component of (b - a) x (c - a) is the same determinant
    let sign = if det > 0.0 {
        1.0
    } else if det < 0.0 {
        -1.0
    } else {
        0.0
    };

    sign * mean_z * area
}

/// Estimate the volume enclosed by already-triangulated faces.
pub fn estimate_volume<'a, I>(faces: I) -> VolumeEstimate
where
    I: IntoIterator<Item = &'a Face>,
{
    let mut estimate = VolumeEstimate::default();
    let mut signed = 0.0;

    for (index, face) in faces.into_iter().enumerate() {
        if face.len() < 3 {
            estimate.skipped_faces += 1;
            continue;
        }
        if face.len() > 3 {
            tracing::warn!(
                face = index,
                vertices = face.len(),
                "Face not triangulated, using its first 3 vertices"
            );
            estimate.oversized_faces += 1;
        }

        signed += triangle_contribution(&face[0], &face[1], &face[2]);
        estimate.triangles += 1;
    }

    estimate.volume = signed.abs();
    estimate
}
