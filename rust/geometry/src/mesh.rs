// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3};
use smallvec::SmallVec;

/// Vertex indices of one polygon. Triangles and quads stay on the stack.
pub type FaceIndices = SmallVec<[u32; 4]>;

/// One polygon resolved to its vertex positions, in winding order.
pub type Face = SmallVec<[Point3<f64>; 4]>;

/// Polygon mesh in f64 precision.
///
/// Faces are n-gons indexing into `positions`. The winding order of each
/// face defines its outward normal (right-hand rule), which the volume
/// estimator relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Point3<f64>>,
    /// Polygon vertex indices
    pub faces: Vec<FaceIndices>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Build a mesh from raw vertex and face lists, checking every index.
    pub fn from_parts(positions: Vec<Point3<f64>>, faces: Vec<FaceIndices>) -> Result<Self> {
        let mesh = Self { positions, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Axis-aligned box centered at the origin with outward-facing quads.
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        let (hx, hy, hz) = (x / 2.0, y / 2.0, z / 2.0);
        let mut mesh = Self::with_capacity(8, 6);
        for &(px, py, pz) in &[
            (-hx, -hy, -hz),
            (hx, -hy, -hz),
            (hx, hy, -hz),
            (-hx, hy, -hz),
            (-hx, -hy, hz),
            (hx, -hy, hz),
            (hx, hy, hz),
            (-hx, hy, hz),
        ] {
            mesh.add_vertex(Point3::new(px, py, pz));
        }
        mesh.add_face(&[0, 3, 2, 1]); // bottom
        mesh.add_face(&[4, 5, 6, 7]); // top
        mesh.add_face(&[0, 1, 5, 4]); // front
        mesh.add_face(&[2, 3, 7, 6]); // back
        mesh.add_face(&[0, 4, 7, 3]); // left
        mesh.add_face(&[1, 2, 6, 5]); // right
        mesh
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        self.positions.push(position);
        (self.positions.len() - 1) as u32
    }

    /// Add a polygon
    #[inline]
    pub fn add_face(&mut self, indices: &[u32]) {
        self.faces.push(SmallVec::from_slice(indices));
    }

    /// Check that every face index points at an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.positions.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(Error::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.positions.len() as u32;

        self.positions.reserve(other.positions.len());
        self.faces.reserve(other.faces.len());

        self.positions.extend_from_slice(&other.positions);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| f.iter().map(|&i| i + vertex_offset).collect::<FaceIndices>()),
        );
    }

    /// Apply an affine transform to every vertex in-place
    #[inline]
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for p in self.positions.iter_mut() {
            *p = matrix.transform_point(p);
        }
    }

    /// Copy of this mesh with `matrix` applied
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Mesh {
        let mut mesh = self.clone();
        mesh.transform(matrix);
        mesh
    }

    /// Resolve face `index` into its vertex positions.
    ///
    /// Out-of-range vertex indices are dropped, so a damaged face comes back
    /// with fewer corners rather than panicking.
    pub fn face_points(&self, index: usize) -> Option<Face> {
        let indices = self.faces.get(index)?;
        Some(
            indices
                .iter()
                .filter_map(|&i| self.positions.get(i as usize).copied())
                .collect(),
        )
    }

    /// Iterate over all faces as vertex positions
    pub fn iter_faces(&self) -> impl Iterator<Item = Face> + '_ {
        (0..self.faces.len()).filter_map(move |i| self.face_points(i))
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get face count
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.positions[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Size of the axis-aligned bounding box along x, y and z
    pub fn extent(&self) -> [f64; 3] {
        match self.bounds() {
            Some((min, max)) => [max.x - min.x, max.y - min.y, max.z - min.z],
            None => [0.0; 3],
        }
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.faces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.extent(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cuboid_extent() {
        let mesh = Mesh::cuboid(0.05, 0.05, 0.5);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        let [x, y, z] = mesh.extent();
        assert!((x - 0.05).abs() < 1e-12);
        assert!((y - 0.05).abs() < 1e-12);
        assert!((z - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = Mesh::cuboid(1.0, 1.0, 1.0);
        let b = Mesh::cuboid(2.0, 2.0, 2.0);
        a.merge(&b);
        assert_eq!(a.vertex_count(), 16);
        assert_eq!(a.face_count(), 12);
        assert!(a.faces[6].iter().all(|&i| i >= 8));
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_transform_translation() {
        let mut mesh = Mesh::cuboid(1.0, 1.0, 1.0);
        mesh.transform(&Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)));
        let (min, max) = mesh.bounds().unwrap();
        assert!((min.x - 9.5).abs() < 1e-12);
        assert!((max.x - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let faces = vec![FaceIndices::from_slice(&[0, 1, 7])];
        let err = Mesh::from_parts(positions, faces).unwrap_err();
        assert_eq!(
            err,
            Error::IndexOutOfRange {
                face: 0,
                index: 7,
                vertex_count: 2
            }
        );
    }
}
