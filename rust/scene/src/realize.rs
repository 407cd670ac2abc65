// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory geometry provider.
//!
//! Realizes a group the way a modelling host would: every member is
//! duplicated with its local transform, nested group instances are made real
//! recursively, and the result is joined into one temporary mesh. Temporary
//! meshes live in a slot map until discarded.

use bom_lite_geometry::{local_matrix, triangulate_mesh, Extents, Face, Mesh};
use slotmap::SlotMap;

use crate::arena::Scene;
use crate::error::{Error, Result};
use crate::keys::{GroupKey, NodeKey, TempMeshKey};
use crate::node::{Group, NodeKind, NodeType};
use crate::provider::GeometryProvider;

/// Counters for the work done by an [`InMemoryGeometry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryStats {
    /// Groups realized into temporary meshes
    pub resolutions: usize,
    /// Triangulation requests (joined meshes and primitive meshes)
    pub triangulations: usize,
    /// Temporary meshes discarded
    pub discards: usize,
}

/// [`GeometryProvider`] backed by a [`Scene`].
pub struct InMemoryGeometry<'a> {
    scene: &'a Scene,
    temporaries: SlotMap<TempMeshKey, Mesh>,
    stats: GeometryStats,
    max_depth: usize,
}

impl<'a> InMemoryGeometry<'a> {
    /// Depth limit for nested make-real, so cyclic groups terminate.
    const DEFAULT_MAX_DEPTH: usize = 100;

    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            temporaries: SlotMap::with_key(),
            stats: GeometryStats::default(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting limit used when making group instances real.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn stats(&self) -> GeometryStats {
        self.stats
    }

    /// Temporary meshes that have not been discarded yet.
    pub fn live_temporaries(&self) -> usize {
        self.temporaries.len()
    }

    /// Join the members of `group` into `out`, in the group's local frame.
    ///
    /// `path` holds the groups being realized above this one. A member
    /// instancing any of them is skipped, so cycles are joined once.
    fn realize_group(&self, group: GroupKey, path: &mut Vec<GroupKey>, out: &mut Mesh) -> Result<()> {
        let group_data = self.scene.group(group).ok_or(Error::GroupNotFound(group))?;

        path.push(group);
        let joined = self.join_members(group_data, path, out);
        path.pop();
        joined
    }

    fn join_members(&self, group_data: &Group, path: &mut Vec<GroupKey>, out: &mut Mesh) -> Result<()> {
        for &member in &group_data.members {
            let node = self.scene.node(member).ok_or(Error::NodeNotFound(member))?;
            let matrix = local_matrix(node.location, node.rotation, node.total_scale());

            match node.kind {
                NodeKind::Primitive => {
                    // Empties and helpers have no geometry to join
                    if !matches!(node.node_type, NodeType::Mesh | NodeType::Curve) {
                        continue;
                    }
                    if let Some(data) = node.mesh.and_then(|m| self.scene.mesh(m)) {
                        out.merge(&data.mesh.transformed(&matrix));
                    }
                }
                NodeKind::GroupInstance(inner) => {
                    if path.contains(&inner) {
                        tracing::warn!(
                            group = %group_data.name,
                            member = %node.name,
                            "Member instances a group that is being made real, skipping"
                        );
                        continue;
                    }
                    if path.len() > self.max_depth {
                        tracing::warn!(
                            group = %group_data.name,
                            member = %node.name,
                            depth = path.len(),
                            "Make-real nesting limit reached, skipping member"
                        );
                        continue;
                    }
                    let mut nested = Mesh::new();
                    self.realize_group(inner, path, &mut nested)?;
                    nested.transform(&matrix);
                    out.merge(&nested);
                }
            }
        }

        Ok(())
    }

    fn temporary(&self, handle: &TempMeshKey) -> Result<&Mesh> {
        self.temporaries
            .get(*handle)
            .ok_or(Error::HandleNotFound(*handle))
    }
}

impl GeometryProvider for InMemoryGeometry<'_> {
    type Handle = TempMeshKey;

    fn resolve_group_to_mesh(&mut self, group: GroupKey) -> Result<TempMeshKey> {
        let mut joined = Mesh::new();
        self.realize_group(group, &mut Vec::new(), &mut joined)?;
        self.stats.resolutions += 1;
        tracing::debug!(
            vertices = joined.vertex_count(),
            faces = joined.face_count(),
            "Joined group members"
        );
        Ok(self.temporaries.insert(joined))
    }

    fn dimensions(&self, handle: &TempMeshKey) -> Result<Extents> {
        Ok(self.temporary(handle)?.extent())
    }

    fn triangulate(&mut self, handle: &TempMeshKey) -> Result<Vec<Face>> {
        self.stats.triangulations += 1;
        Ok(triangulate_mesh(self.temporary(handle)?))
    }

    fn discard(&mut self, handle: TempMeshKey) -> Result<()> {
        self.temporaries
            .remove(handle)
            .ok_or(Error::HandleNotFound(handle))?;
        self.stats.discards += 1;
        Ok(())
    }

    fn triangulate_node(&mut self, node: NodeKey) -> Result<Option<Vec<Face>>> {
        let data = self.scene.node(node).ok_or(Error::NodeNotFound(node))?;
        let Some(mesh) = data.mesh.and_then(|m| self.scene.mesh(m)) else {
            return Ok(None);
        };
        self.stats.triangulations += 1;
        Ok(Some(triangulate_mesh(&mesh.mesh)))
    }
}
