// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Splitting mesh faces into triangles for volume measurement.
//!
//! N-gons are projected onto the coordinate plane closest to their normal
//! and cut with earcutr; triangles keep the winding of their source face.

use std::f64::consts::TAU;

use crate::mesh::{Face, Mesh};
use crate::{Error, Point2, Point3, Result, Vector3};

/// Turn direction of a convex outline: `Some(true)` when all non-collinear
/// corners turn left, `Some(false)` when all turn right. `None` for a reflex
/// corner, or when the turns do not add up to one revolution (a pentagram
/// turns one way at every corner but winds twice).
fn winding(points: &[Point2<f64>]) -> Option<bool> {
    let n = points.len();
    let mut left = None;
    let mut turning = 0.0_f64;
    for (i, p) in points.iter().copied().enumerate() {
        let q = points[(i + 1) % n];
        let r = points[(i + 2) % n];
        let (a, b) = (q - p, r - q);
        let turn = a.perp(&b);
        turning += turn.atan2(a.dot(&b));
        if turn.abs() <= 1e-10 {
            continue;
        }
        match left {
            None => left = Some(turn > 0.0),
            Some(l) if l != (turn > 0.0) => return None,
            Some(_) => {}
        }
    }
    if (turning.abs() - TAU).abs() > 1e-6 {
        return None;
    }
    Some(left.unwrap_or(true))
}

/// Triangle indices into `points` for a simple outline without holes.
///
/// Small convex outlines (the usual quads and hexagons of CAD meshes) are
/// fanned from their first corner; everything else goes through earcut.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();
    match n {
        0..=2 => {
            return Err(Error::TriangulationError(format!(
                "{n} points cannot form a triangle"
            )))
        }
        3 => return Ok(vec![0, 1, 2]),
        _ => {}
    }

    if n <= 8 && winding(points).is_some() {
        return Ok((1..n - 1).flat_map(|i| [0, i, i + 1]).collect());
    }

    let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = earcutr::earcut(&flat, &[], 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;
    if indices.is_empty() {
        return Err(Error::TriangulationError(format!(
            "no triangles for an outline of {n} points"
        )));
    }
    Ok(indices)
}

/// Polygon normal via Newell's method, `None` for degenerate polygons.
///
/// The direction follows the right-hand rule relative to the winding order.
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len < 1e-15 {
        return None;
    }
    Some(normal / len)
}

/// Triangulate a planar 3D polygon.
///
/// The polygon is projected onto the coordinate plane its normal is most
/// aligned with. Every returned triangle keeps the winding of the source
/// polygon, so outward normals survive triangulation.
pub fn triangulate_face(points: &[Point3<f64>]) -> Result<Vec<[usize; 3]>> {
    if points.len() < 3 {
        return Err(Error::DegenerateFace(format!(
            "{} vertices",
            points.len()
        )));
    }
    if points.len() == 3 {
        return Ok(vec![[0, 1, 2]]);
    }

    let normal = polygon_normal(points)
        .ok_or_else(|| Error::DegenerateFace("zero-area polygon".to_string()))?;

    let abs_n = Vector3::new(normal.x.abs(), normal.y.abs(), normal.z.abs());
    let (ax_u, ax_v) = if abs_n.z >= abs_n.x && abs_n.z >= abs_n.y {
        (0, 1)
    } else if abs_n.y >= abs_n.x {
        (0, 2)
    } else {
        (1, 2)
    };

    let projected: Vec<Point2<f64>> = points
        .iter()
        .map(|p| {
            let c = [p.x, p.y, p.z];
            Point2::new(c[ax_u], c[ax_v])
        })
        .collect();

    let indices = triangulate_polygon(&projected)?;

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for chunk in indices.chunks_exact(3) {
        let (a, b, c) = (chunk[0], chunk[1], chunk[2]);
        let tri_normal = (points[b] - points[a]).cross(&(points[c] - points[a]));
        if tri_normal.dot(&normal) < 0.0 {
            triangles.push([a, c, b]);
        } else {
            triangles.push([a, b, c]);
        }
    }

    Ok(triangles)
}

/// Triangulate every face of a mesh.
///
/// Faces that cannot be triangulated are passed through unchanged so the
/// caller can decide how to treat them; faces with fewer than 3 vertices
/// are dropped.
pub fn triangulate_mesh(mesh: &Mesh) -> Vec<Face> {
    let mut out = Vec::with_capacity(mesh.face_count() * 2);

    for (index, face) in mesh.iter_faces().enumerate() {
        match face.len() {
            0..=2 => {
                tracing::debug!(face = index, vertices = face.len(), "Dropping degenerate face");
            }
            3 => out.push(face),
            _ => match triangulate_face(&face) {
                Ok(triangles) => {
                    out.extend(
                        triangles
                            .into_iter()
                            .map(|[a, b, c]| Face::from_slice(&[face[a], face[b], face[c]])),
                    );
                }
                Err(e) => {
                    tracing::debug!(face = index, error = %e, "Keeping untriangulated face");
                    out.push(face);
                }
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangulate_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_l_shape_uses_earcut() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 12);
    }

    #[test]
    fn test_winding_of_convex_and_reflex_outlines() {
        let ccw = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(winding(&ccw), Some(true));
        let arrow = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.5, 1.0),
        ];
        assert_eq!(winding(&arrow), None);
    }

    #[test]
    fn test_pentagram_is_not_fanned() {
        let star: Vec<Point2<f64>> = (0..5)
            .map(|k| {
                let angle = TAU * (2 * k) as f64 / 5.0;
                Point2::new(angle.cos(), angle.sin())
            })
            .collect();
        assert_eq!(winding(&star), None);

        let pentagon: Vec<Point2<f64>> = (0..5)
            .map(|k| {
                let angle = TAU * k as f64 / 5.0;
                Point2::new(angle.cos(), angle.sin())
            })
            .collect();
        assert_eq!(winding(&pentagon), Some(true));
    }

    #[test]
    fn test_too_few_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_polygon(&points).is_err());
    }

    #[test]
    fn test_polygon_normal_follows_winding() {
        let ccw = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let n = polygon_normal(&ccw).unwrap();
        assert!((n.z - 1.0).abs() < 1e-12);

        let cw = [ccw[0], ccw[2], ccw[1]];
        let n = polygon_normal(&cw).unwrap();
        assert!((n.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_face_keeps_orientation() {
        // Downward-facing quad in the XY plane
        let quad = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let triangles = triangulate_face(&quad).unwrap();
        assert_eq!(triangles.len(), 2);
        for [a, b, c] in triangles {
            let n = (quad[b] - quad[a]).cross(&(quad[c] - quad[a]));
            assert!(n.z < 0.0);
        }
    }

    #[test]
    fn test_triangulate_mesh_cuboid() {
        let mesh = Mesh::cuboid(1.0, 2.0, 3.0);
        let faces = triangulate_mesh(&mesh);
        assert_eq!(faces.len(), 12);
        assert!(faces.iter().all(|f| f.len() == 3));
    }

    #[test]
    fn test_collinear_face_is_degenerate() {
        let line = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        assert!(matches!(
            triangulate_face(&line),
            Err(Error::DegenerateFace(_))
        ));
    }
}
