// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator traits the BOM engine is written against.

use bom_lite_geometry::{Extents, Face};

use crate::arena::Scene;
use crate::error::Result;
use crate::keys::{GroupKey, NodeKey};
use crate::node::{Group, SceneNode};

/// Read-only view of a scene.
pub trait SceneProvider {
    /// Root nodes of a run: the explicit selection, or an auto-selection of
    /// every visible, considered node when nothing is selected.
    fn roots(&self) -> Vec<NodeKey>;

    fn node(&self, key: NodeKey) -> Option<&SceneNode>;

    fn group(&self, key: GroupKey) -> Option<&Group>;

    /// Whether the node is visible in the active context.
    fn is_visible(&self, key: NodeKey) -> bool;

    /// Local bounding dimensions, already including the node's own scale.
    fn dimensions(&self, key: NodeKey) -> Option<Extents>;

    /// Members of a group; empty for unknown groups.
    fn members(&self, group: GroupKey) -> &[NodeKey];

    /// Material directly assigned to the node.
    fn material(&self, key: NodeKey) -> Option<&str>;
}

/// Geometry operations that create and destroy temporary host geometry.
///
/// Calls are blocking and must not be interleaved: every handle returned by
/// [`GeometryProvider::resolve_group_to_mesh`] has to be discarded before the
/// caller that created it returns.
pub trait GeometryProvider {
    /// Opaque reference to a temporary joined mesh.
    type Handle;

    /// Duplicate the group's members, recursively make group instances real,
    /// and join everything into one mesh in the group's local frame.
    fn resolve_group_to_mesh(&mut self, group: GroupKey) -> Result<Self::Handle>;

    /// Bounding dimensions of a joined mesh.
    fn dimensions(&self, handle: &Self::Handle) -> Result<Extents>;

    /// Triangulated faces of a joined mesh. Faces the provider could not
    /// triangulate may come back with more than 3 vertices.
    fn triangulate(&mut self, handle: &Self::Handle) -> Result<Vec<Face>>;

    /// Remove a temporary mesh from the host.
    fn discard(&mut self, handle: Self::Handle) -> Result<()>;

    /// Triangulated faces of a primitive node's own mesh, in its local
    /// frame. `None` when the node carries no mesh geometry.
    fn triangulate_node(&mut self, node: NodeKey) -> Result<Option<Vec<Face>>>;
}

impl SceneProvider for Scene {
    fn roots(&self) -> Vec<NodeKey> {
        let selection = self.selection();
        if !selection.is_empty() {
            return selection;
        }
        tracing::info!(scene = %self.name, "No selection, selecting visible mechanical nodes");
        self.auto_selection()
    }

    fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        Scene::node(self, key)
    }

    fn group(&self, key: GroupKey) -> Option<&Group> {
        Scene::group(self, key)
    }

    fn is_visible(&self, key: NodeKey) -> bool {
        self.nodes.get(key).map(|n| n.visible).unwrap_or(false)
    }

    fn dimensions(&self, key: NodeKey) -> Option<Extents> {
        self.node_dimensions(key)
    }

    fn members(&self, group: GroupKey) -> &[NodeKey] {
        self.groups
            .get(group)
            .map(|g| g.members.as_slice())
            .unwrap_or(&[])
    }

    fn material(&self, key: NodeKey) -> Option<&str> {
        self.nodes.get(key)?.material.as_deref()
    }
}
