// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scene snapshots.
//!
//! A snapshot refers to meshes, groups and nodes by name. Names are resolved
//! to arena keys once, while the scene is rebuilt, so the rest of the
//! pipeline never looks anything up by string.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::arena::Scene;
use crate::error::{Error, Result};
use crate::keys::GroupKey;
use crate::node::{NodeKind, NodeType, SceneNode};
use bom_lite_geometry::{FaceIndices, Mesh};

/// Serializable representation of a whole scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub meshes: Vec<MeshSnapshot>,
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub name: String,
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    /// Member node names
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<[f64; 3]>,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    #[serde(default = "unit_scale")]
    pub delta_scale: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default = "yes")]
    pub in_scene: bool,
    #[serde(default)]
    pub selected: bool,
}

fn unit_scale() -> [f64; 3] {
    [1.0; 3]
}

fn yes() -> bool {
    true
}

impl Scene {
    /// Serializes the scene to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserializes a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SceneSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Creates a serializable snapshot. Nodes keep insertion order.
    pub fn to_snapshot(&self) -> SceneSnapshot {
        let meshes = self
            .meshes
            .values()
            .map(|m| MeshSnapshot {
                name: m.name.clone(),
                vertices: m.mesh.positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
                faces: m.mesh.faces.iter().map(|f| f.to_vec()).collect(),
            })
            .collect();

        let groups = self
            .groups
            .values()
            .map(|g| GroupSnapshot {
                name: g.name.clone(),
                members: g
                    .members
                    .iter()
                    .filter_map(|&k| self.nodes.get(k))
                    .map(|n| n.name.clone())
                    .collect(),
            })
            .collect();

        let nodes = self
            .node_keys()
            .map(|k| {
                let n = &self.nodes[k];
                NodeSnapshot {
                    name: n.name.clone(),
                    node_type: n.node_type,
                    mesh: n
                        .mesh
                        .and_then(|m| self.meshes.get(m))
                        .map(|m| m.name.clone()),
                    instance_of: n
                        .instanced_group()
                        .and_then(|g| self.groups.get(g))
                        .map(|g| g.name.clone()),
                    dimensions: n.dimensions,
                    location: n.location,
                    rotation: n.rotation,
                    scale: n.scale,
                    delta_scale: n.delta_scale,
                    material: n.material.clone(),
                    visible: n.visible,
                    in_scene: n.in_scene,
                    selected: n.selected,
                }
            })
            .collect();

        SceneSnapshot {
            name: self.name.clone(),
            meshes,
            groups,
            nodes,
        }
    }

    /// Rebuilds a scene from a snapshot.
    ///
    /// Groups are created first (empty), then meshes and nodes, then group
    /// members, so groups may reference each other in any order.
    pub fn from_snapshot(snap: &SceneSnapshot) -> Result<Self> {
        let mut scene = Scene::new(snap.name.clone());

        let mut group_keys: Vec<GroupKey> = Vec::with_capacity(snap.groups.len());
        for gs in &snap.groups {
            group_keys.push(scene.add_group(gs.name.clone())?);
        }

        for ms in &snap.meshes {
            let positions = ms
                .vertices
                .iter()
                .map(|v| Point3::new(v[0], v[1], v[2]))
                .collect();
            let faces = ms
                .faces
                .iter()
                .map(|f| FaceIndices::from_slice(f))
                .collect();
            let mesh = Mesh::from_parts(positions, faces).map_err(|source| Error::InvalidMesh {
                name: ms.name.clone(),
                source,
            })?;
            scene.add_mesh(ms.name.clone(), mesh)?;
        }

        for ns in &snap.nodes {
            scene.add_node(node_from_snapshot(&scene, ns)?)?;
        }

        for (gs, &group) in snap.groups.iter().zip(&group_keys) {
            for member in &gs.members {
                let node = scene
                    .node_by_name(member)
                    .ok_or_else(|| Error::UnknownNode(member.clone()))?;
                scene.add_member(group, node)?;
            }
        }

        tracing::debug!(
            scene = %scene.name,
            nodes = scene.node_count(),
            groups = scene.group_count(),
            "Scene loaded"
        );

        Ok(scene)
    }
}

fn node_from_snapshot(scene: &Scene, ns: &NodeSnapshot) -> Result<SceneNode> {
    let kind = match &ns.instance_of {
        Some(group) => NodeKind::GroupInstance(
            scene
                .group_by_name(group)
                .ok_or_else(|| Error::UnknownGroup(group.clone()))?,
        ),
        None => NodeKind::Primitive,
    };
    let mesh = match &ns.mesh {
        Some(name) => Some(
            scene
                .mesh_names
                .get(name)
                .copied()
                .ok_or_else(|| Error::UnknownMesh(name.clone()))?,
        ),
        None => None,
    };

    Ok(SceneNode {
        name: ns.name.clone(),
        node_type: ns.node_type,
        kind,
        mesh,
        dimensions: ns.dimensions,
        location: ns.location,
        rotation: ns.rotation,
        scale: ns.scale,
        delta_scale: ns.delta_scale,
        material: ns.material.clone(),
        visible: ns.visible,
        in_scene: ns.in_scene,
        selected: ns.selected,
    })
}
