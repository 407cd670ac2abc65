// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical part identity.

use std::fmt;

use bom_lite_geometry::Extents;
use bom_lite_scene::{GroupKey, NodeKey, SceneNode, SceneProvider};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::ancestors::AncestorStack;
use crate::compositor::effective_dimensions;
use crate::config::RunConfig;
use crate::error::ResolveError;
use crate::naming::{parse_name, strip_numeric_suffix, ParsedName};

/// Material of a group instance whose members disagree.
pub const MIXED_MATERIAL: &str = "MIXED";

/// Material of a part nothing assigns one to.
pub const NO_MATERIAL: &str = "-";

/// Identity of one BOM line.
///
/// Dimensions take part as formatted strings, so lengths that print the same
/// at the configured precision are the same part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PartKey {
    pub label: String,
    pub material: String,
    pub dimensions: [String; 3],
    pub optional: bool,
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  Material: {}  [x:{},y:{},z:{}]",
            self.label, self.material, self.dimensions[0], self.dimensions[1], self.dimensions[2]
        )?;
        if self.optional {
            f.write_str("  (optional)")?;
        }
        Ok(())
    }
}

/// Outcome of looking for a common material among group members.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MaterialScan {
    Nothing,
    Uniform(String),
    Mixed,
}

impl MaterialScan {
    fn into_material(self) -> String {
        match self {
            MaterialScan::Nothing => NO_MATERIAL.to_string(),
            MaterialScan::Uniform(m) => m,
            MaterialScan::Mixed => MIXED_MATERIAL.to_string(),
        }
    }
}

/// Builds [`PartKey`]s for nodes of one scene under one configuration.
pub struct KeyBuilder<'a, S> {
    scene: &'a S,
    config: &'a RunConfig,
}

impl<'a, S: SceneProvider> KeyBuilder<'a, S> {
    pub fn new(scene: &'a S, config: &'a RunConfig) -> Self {
        Self { scene, config }
    }

    /// Name hints of a node. A group instance takes its label from the
    /// group's name when it has one, and merges the group's markers.
    pub fn parse(&self, node: &SceneNode) -> ParsedName {
        let mut parsed = parse_name(&node.name);
        let group = node.instanced_group().and_then(|g| self.scene.group(g));
        if let Some(group) = group {
            let from_group = parse_name(&group.name);
            if !from_group.label.is_empty() {
                parsed.label = from_group.label;
            }
            parsed.material = parsed.material.or(from_group.material);
            parsed.markers = parsed.markers.or(from_group.markers);
        }
        parsed
    }

    /// Build the key of `key` from its local dimensions (own scale included)
    /// and the enclosing instances.
    pub fn build(
        &self,
        key: NodeKey,
        local: Extents,
        ancestors: &AncestorStack,
    ) -> Result<PartKey, ResolveError> {
        let node = self
            .scene
            .node(key)
            .ok_or(bom_lite_scene::Error::NodeNotFound(key))?;
        let parsed = self.parse(node);

        let material = match parsed.material {
            Some(material) => material,
            None => match self.direct_material(key) {
                Some(material) => material,
                None => match node.instanced_group() {
                    Some(group) => self
                        .scan_members(group, 0, &mut FxHashSet::default())
                        .into_material(),
                    None => NO_MATERIAL.to_string(),
                },
            },
        };

        let optional =
            parsed.markers.optional || ancestors.last().map_or(false, |frame| frame.key.optional);

        let dims = effective_dimensions(
            self.scene,
            key,
            local,
            ancestors.frames(),
            self.config.rotation_policy,
        );

        Ok(PartKey {
            label: parsed.label,
            material,
            dimensions: dims.map(|d| self.config.format_length(d)),
            optional,
        })
    }

    fn direct_material(&self, key: NodeKey) -> Option<String> {
        self.scene
            .material(key)
            .map(|m| strip_numeric_suffix(m).trim().to_string())
            .filter(|m| !m.is_empty())
    }

    /// Material shared by every member that has one, looking through nested
    /// group instances. Each group is scanned at most once per key; a group
    /// reached again adds nothing new.
    fn scan_members(
        &self,
        group: GroupKey,
        depth: usize,
        visited: &mut FxHashSet<GroupKey>,
    ) -> MaterialScan {
        if depth >= self.config.max_recursion_depth {
            tracing::debug!(depth, "Material scan reached the recursion limit");
            return MaterialScan::Nothing;
        }
        if !visited.insert(group) {
            return MaterialScan::Nothing;
        }

        let mut found: Option<String> = None;
        for &member in self.scene.members(group) {
            let Some(node) = self.scene.node(member) else {
                continue;
            };
            let material = match parse_name(&node.name).material {
                Some(m) => Some(m),
                None => match self.direct_material(member) {
                    Some(m) => Some(m),
                    None => match node.instanced_group() {
                        Some(inner) => match self.scan_members(inner, depth + 1, visited) {
                            MaterialScan::Nothing => None,
                            MaterialScan::Uniform(m) => Some(m),
                            MaterialScan::Mixed => return MaterialScan::Mixed,
                        },
                        None => None,
                    },
                },
            };

            let Some(material) = material else {
                continue;
            };
            match &found {
                None => found = Some(material),
                Some(first) if *first != material => return MaterialScan::Mixed,
                Some(_) => {}
            }
        }

        found.map_or(MaterialScan::Nothing, MaterialScan::Uniform)
    }
}
