// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene nodes and groups.

use serde::{Deserialize, Serialize};

use crate::keys::{GroupKey, MeshKey, NodeKey};

/// Host object type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Mesh,
    Empty,
    Curve,
    Camera,
    Lamp,
    Armature,
    Other,
}

impl NodeType {
    /// Only mechanical object types take part in a bill of materials.
    /// Cameras, lamps and armatures are rendering or animation helpers.
    #[inline]
    pub fn is_considered(&self) -> bool {
        matches!(self, NodeType::Mesh | NodeType::Empty | NodeType::Curve)
    }

    /// Returns the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Mesh => "Mesh",
            NodeType::Empty => "Empty",
            NodeType::Curve => "Curve",
            NodeType::Camera => "Camera",
            NodeType::Lamp => "Lamp",
            NodeType::Armature => "Armature",
            NodeType::Other => "Other",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a node stands for, decided once when the node enters the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A concrete part.
    Primitive,
    /// A stand-in for the members of a group.
    GroupInstance(GroupKey),
}

/// One node of the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub node_type: NodeType,
    pub kind: NodeKind,
    pub mesh: Option<MeshKey>,
    /// Explicit local bounding dimensions, already including the node's own scale.
    pub dimensions: Option<[f64; 3]>,
    pub location: [f64; 3],
    /// XYZ Euler angles in radians.
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
    pub delta_scale: [f64; 3],
    pub material: Option<String>,
    pub visible: bool,
    /// Linked into the active scene (group source objects usually are not).
    pub in_scene: bool,
    pub selected: bool,
}

impl SceneNode {
    /// A primitive part of the given type with identity transform.
    pub fn primitive(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            kind: NodeKind::Primitive,
            mesh: None,
            dimensions: None,
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            delta_scale: [1.0; 3],
            material: None,
            visible: true,
            in_scene: true,
            selected: false,
        }
    }

    /// A mesh part using shared mesh data.
    pub fn mesh(name: impl Into<String>, mesh: MeshKey) -> Self {
        let mut node = Self::primitive(name, NodeType::Mesh);
        node.mesh = Some(mesh);
        node
    }

    /// An empty that instances `group`.
    pub fn instance(name: impl Into<String>, group: GroupKey) -> Self {
        let mut node = Self::primitive(name, NodeType::Empty);
        node.kind = NodeKind::GroupInstance(group);
        node
    }

    pub fn with_dimensions(mut self, dimensions: [f64; 3]) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_location(mut self, location: [f64; 3]) -> Self {
        self.location = location;
        self
    }

    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_delta_scale(mut self, delta_scale: [f64; 3]) -> Self {
        self.delta_scale = delta_scale;
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Keep the node out of the active scene; it is still reachable as a
    /// group member.
    pub fn outside_scene(mut self) -> Self {
        self.in_scene = false;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// The group this node instances, if any.
    #[inline]
    pub fn instanced_group(&self) -> Option<GroupKey> {
        match self.kind {
            NodeKind::GroupInstance(g) => Some(g),
            NodeKind::Primitive => None,
        }
    }

    #[inline]
    pub fn is_group_instance(&self) -> bool {
        matches!(self.kind, NodeKind::GroupInstance(_))
    }

    /// Per-axis `scale * delta_scale`.
    #[inline]
    pub fn total_scale(&self) -> [f64; 3] {
        [
            self.scale[0] * self.delta_scale[0],
            self.scale[1] * self.delta_scale[1],
            self.scale[2] * self.delta_scale[2],
        ]
    }
}

/// A reusable, named collection of nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub name: String,
    /// May be empty; callers must check.
    pub members: Vec<NodeKey>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn considered_types() {
        assert!(NodeType::Mesh.is_considered());
        assert!(NodeType::Empty.is_considered());
        assert!(NodeType::Curve.is_considered());
        assert!(!NodeType::Camera.is_considered());
        assert!(!NodeType::Lamp.is_considered());
        assert!(!NodeType::Armature.is_considered());
        assert!(!NodeType::Other.is_considered());
    }

    #[test]
    fn total_scale_multiplies_delta() {
        let node = SceneNode::primitive("Plate", NodeType::Mesh)
            .with_scale([2.0, 1.0, 1.0])
            .with_delta_scale([1.0, 3.0, 0.5]);
        assert_eq!(node.total_scale(), [2.0, 3.0, 0.5]);
    }

    #[test]
    fn type_names_display() {
        assert_eq!(NodeType::Curve.to_string(), "Curve");
    }
}
