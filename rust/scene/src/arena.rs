// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the scene graph.
//!
//! The [`Scene`] owns every node, group and shared mesh. Group membership is
//! stored as node keys, so the same node can be a member of several groups
//! and a group can (directly or indirectly) contain instances of itself.

use bom_lite_geometry::{scale_extents, Extents, Mesh};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::node::{Group, SceneNode};

/// Mesh data shared between nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMesh {
    pub name: String,
    pub mesh: Mesh,
}

/// The scene graph: nodes, groups and mesh data.
///
/// # Example
///
/// ```
/// use bom_lite_geometry::Mesh;
/// use bom_lite_scene::{Scene, SceneNode};
///
/// let mut scene = Scene::new("Workshop");
/// let data = scene.add_mesh("plate", Mesh::cuboid(1.0, 0.5, 0.01)).unwrap();
/// let plate = scene.add_node(SceneNode::mesh("Plate", data)).unwrap();
///
/// assert_eq!(scene.node_count(), 1);
/// assert_eq!(scene.node_dimensions(plate), Some([1.0, 0.5, 0.01]));
/// ```
#[derive(Debug, Default)]
pub struct Scene {
    pub name: String,
    pub(crate) nodes: SlotMap<NodeKey, SceneNode>,
    pub(crate) groups: SlotMap<GroupKey, Group>,
    pub(crate) meshes: SlotMap<MeshKey, NamedMesh>,

    // Name lookups
    pub(crate) node_names: FxHashMap<String, NodeKey>,
    pub(crate) group_names: FxHashMap<String, GroupKey>,
    pub(crate) mesh_names: FxHashMap<String, MeshKey>,

    /// Nodes in insertion order, for deterministic iteration.
    pub(crate) node_order: Vec<NodeKey>,
}

impl Scene {
    /// Creates a new, empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    // --- Mesh operations ---

    /// Adds named mesh data after validating its face indices.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> Result<MeshKey> {
        let name = name.into();
        if self.mesh_names.contains_key(&name) {
            return Err(Error::DuplicateName { kind: "mesh", name });
        }
        mesh.validate().map_err(|source| Error::InvalidMesh {
            name: name.clone(),
            source,
        })?;
        let key = self.meshes.insert(NamedMesh {
            name: name.clone(),
            mesh,
        });
        self.mesh_names.insert(name, key);
        Ok(key)
    }

    /// Returns the mesh data for the given key.
    pub fn mesh(&self, key: MeshKey) -> Option<&NamedMesh> {
        self.meshes.get(key)
    }

    // --- Group operations ---

    /// Adds an empty group. Members are attached with [`Scene::add_member`],
    /// which allows groups to reference each other in any order.
    pub fn add_group(&mut self, name: impl Into<String>) -> Result<GroupKey> {
        let name = name.into();
        if self.group_names.contains_key(&name) {
            return Err(Error::DuplicateName { kind: "group", name });
        }
        let key = self.groups.insert(Group::new(name.clone()));
        self.group_names.insert(name, key);
        Ok(key)
    }

    /// Appends `node` to the members of `group`.
    pub fn add_member(&mut self, group: GroupKey, node: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(Error::NodeNotFound(node));
        }
        self.groups
            .get_mut(group)
            .ok_or(Error::GroupNotFound(group))?
            .members
            .push(node);
        Ok(())
    }

    /// Returns the group for the given key.
    pub fn group(&self, key: GroupKey) -> Option<&Group> {
        self.groups.get(key)
    }

    /// Looks a group up by name.
    pub fn group_by_name(&self, name: &str) -> Option<GroupKey> {
        self.group_names.get(name).copied()
    }

    /// Returns the number of groups in the scene.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    // --- Node operations ---

    /// Adds a node. Mesh and group references must already exist.
    pub fn add_node(&mut self, node: SceneNode) -> Result<NodeKey> {
        if self.node_names.contains_key(&node.name) {
            return Err(Error::DuplicateName {
                kind: "node",
                name: node.name,
            });
        }
        if let Some(group) = node.instanced_group() {
            if !self.groups.contains_key(group) {
                return Err(Error::GroupNotFound(group));
            }
        }
        if let Some(mesh) = node.mesh {
            if !self.meshes.contains_key(mesh) {
                return Err(Error::UnknownMesh(format!("{:?}", mesh)));
            }
        }

        let name = node.name.clone();
        let key = self.nodes.insert(node);
        self.node_names.insert(name, key);
        self.node_order.push(key);
        Ok(key)
    }

    /// Returns the node for the given key.
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Looks a node up by name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeKey> {
        self.node_names.get(name).copied()
    }

    /// Returns the number of nodes in the scene.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over node keys in insertion order.
    pub fn node_keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.node_order.iter().copied()
    }

    /// Local bounding dimensions of a node, including its own scale.
    ///
    /// Explicit dimensions win; otherwise the mesh extent is scaled by the
    /// node's scale and delta scale. Nodes without either measure zero.
    pub fn node_dimensions(&self, key: NodeKey) -> Option<Extents> {
        let node = self.nodes.get(key)?;
        if let Some(dims) = node.dimensions {
            return Some(dims);
        }
        let extent = node
            .mesh
            .and_then(|m| self.meshes.get(m))
            .map(|m| m.mesh.extent())
            .unwrap_or([0.0; 3]);
        Some(scale_extents(extent, node.total_scale()))
    }

    /// Nodes explicitly selected by the user, in insertion order.
    pub fn selection(&self) -> Vec<NodeKey> {
        self.node_keys()
            .filter(|&k| self.nodes[k].selected)
            .collect()
    }

    /// Every node linked into the scene that is visible and of a considered
    /// type, in insertion order.
    pub fn auto_selection(&self) -> Vec<NodeKey> {
        self.node_keys()
            .filter(|&k| {
                let n = &self.nodes[k];
                n.in_scene && n.visible && n.node_type.is_considered()
            })
            .collect()
    }
}
