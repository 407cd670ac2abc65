// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BOM-Lite Geometry
//!
//! Polygon meshes, earcutr triangulation, nalgebra transform helpers and the
//! divergence-theorem volume estimator used to tell apart parts that look
//! identical from the outside but differ in internal volume.

pub mod error;
pub mod mesh;
pub mod transform;
pub mod triangulation;
pub mod volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use mesh::{Face, FaceIndices, Mesh};
pub use transform::{
    linear_part, local_matrix, mapped_extents, rotation_matrix, scale_extents, Extents,
};
pub use triangulation::{polygon_normal, triangulate_face, triangulate_mesh, triangulate_polygon};
pub use volume::{estimate_volume, triangle_contribution, VolumeEstimate};
