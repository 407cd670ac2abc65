// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-run measurement caches.
//!
//! Every instance of a group has the same group-local shape, so the joined
//! extent and volume are measured once per group and reused. Instances only
//! differ by transforms, which are applied after the cached result.

use bom_lite_geometry::{estimate_volume, Extents};
use bom_lite_scene::{GeometryProvider, GroupKey, NodeKey};
use rustc_hash::FxHashMap;

/// Joined extents by group. `None` records a failed measurement so it is not
/// retried for every instance.
#[derive(Debug, Default)]
pub struct DimensionCache {
    groups: FxHashMap<GroupKey, Option<Extents>>,
}

impl DimensionCache {
    /// `Some(entry)` once the group was measured.
    pub fn get(&self, group: GroupKey) -> Option<Option<Extents>> {
        self.groups.get(&group).copied()
    }

    pub fn insert(&mut self, group: GroupKey, extents: Option<Extents>) {
        self.groups.insert(group, extents);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Raw volumes of groups and of primitive meshes. `None` means the geometry
/// had no measurable volume.
#[derive(Debug, Default)]
pub struct VolumeCache {
    groups: FxHashMap<GroupKey, Option<f64>>,
    nodes: FxHashMap<NodeKey, Option<f64>>,
}

impl VolumeCache {
    pub fn group(&self, group: GroupKey) -> Option<Option<f64>> {
        self.groups.get(&group).copied()
    }

    pub fn insert_group(&mut self, group: GroupKey, volume: Option<f64>) {
        self.groups.insert(group, volume);
    }

    pub fn node(&self, node: NodeKey) -> Option<Option<f64>> {
        self.nodes.get(&node).copied()
    }

    pub fn insert_node(&mut self, node: NodeKey, volume: Option<f64>) {
        self.nodes.insert(node, volume);
    }

    pub fn len(&self) -> usize {
        self.groups.len() + self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.nodes.is_empty()
    }
}

/// Measurements of one joined group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMeasure {
    pub extents: Extents,
    pub volume: Option<f64>,
}

/// Resolve `group` into a temporary mesh, run `f` on it, and discard the
/// temporary on every path.
///
/// An error from `f` wins over an error from the discard.
pub fn with_temporary<G, R>(
    geometry: &mut G,
    group: GroupKey,
    f: impl FnOnce(&mut G, &G::Handle) -> bom_lite_scene::Result<R>,
) -> bom_lite_scene::Result<R>
where
    G: GeometryProvider,
{
    let handle = geometry.resolve_group_to_mesh(group)?;
    let result = f(geometry, &handle);
    let discarded = geometry.discard(handle);
    let value = result?;
    discarded?;
    Ok(value)
}

/// Measure the joined extent of `group` and, when asked, its volume.
pub fn measure_group<G: GeometryProvider>(
    geometry: &mut G,
    group: GroupKey,
    with_volume: bool,
) -> bom_lite_scene::Result<GroupMeasure> {
    with_temporary(geometry, group, |geometry, handle| {
        let extents = geometry.dimensions(handle)?;
        let volume = if with_volume {
            let faces = geometry.triangulate(handle)?;
            volume_of(&faces)
        } else {
            None
        };
        Ok(GroupMeasure { extents, volume })
    })
}

/// Enclosed volume of triangulated faces, `None` when nothing contributed.
pub fn volume_of(faces: &[bom_lite_geometry::Face]) -> Option<f64> {
    let estimate = estimate_volume(faces);
    (estimate.triangles > 0).then_some(estimate.volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bom_lite_geometry::{Face, Mesh};
    use bom_lite_scene::{Error, InMemoryGeometry, Scene, SceneNode};

    fn boxed_group() -> (Scene, GroupKey) {
        let mut scene = Scene::new("cache");
        let data = scene.add_mesh("box", Mesh::cuboid(2.0, 1.0, 0.5)).unwrap();
        let group = scene.add_group("Box").unwrap();
        let node = scene.add_node(SceneNode::mesh("BoxBody", data)).unwrap();
        scene.add_member(group, node).unwrap();
        (scene, group)
    }

    #[test]
    fn measure_discards_temporary() {
        let (scene, group) = boxed_group();
        let mut geometry = InMemoryGeometry::new(&scene);
        let measure = measure_group(&mut geometry, group, true).unwrap();
        assert_eq!(measure.extents, [2.0, 1.0, 0.5]);
        assert_relative_eq!(measure.volume.unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(geometry.live_temporaries(), 0);
        assert_eq!(geometry.stats().triangulations, 1);
    }

    #[test]
    fn closure_error_still_discards() {
        let (scene, group) = boxed_group();
        let mut geometry = InMemoryGeometry::new(&scene);
        let result: bom_lite_scene::Result<()> = with_temporary(&mut geometry, group, |_, _| {
            Err(Error::Serialization("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(geometry.live_temporaries(), 0);
        assert_eq!(geometry.stats().discards, 1);
    }

    #[test]
    fn dimensions_only_skips_triangulation() {
        let (scene, group) = boxed_group();
        let mut geometry = InMemoryGeometry::new(&scene);
        let measure = measure_group(&mut geometry, group, false).unwrap();
        assert_eq!(measure.volume, None);
        assert_eq!(geometry.stats().triangulations, 0);
    }

    #[test]
    fn no_triangles_no_volume() {
        let faces: Vec<Face> = Vec::new();
        assert_eq!(volume_of(&faces), None);
    }

    #[test]
    fn caches_remember_failures() {
        let (_, group) = boxed_group();
        let mut dims = DimensionCache::default();
        assert_eq!(dims.get(group), None);
        dims.insert(group, None);
        assert_eq!(dims.get(group), Some(None));
        assert_eq!(dims.len(), 1);
    }
}
