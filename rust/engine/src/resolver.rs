// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recursive descent over the scene graph.
//!
//! Each item is either a primitive part, a group instance or a list of
//! siblings. Primitives are counted. Group instances are counted, descended
//! into, or both, depending on the run mode. A failing item never stops its
//! siblings; the worst failure of a list is returned after every element ran.

use bom_lite_geometry::{scale_extents, Extents};
use bom_lite_scene::{GeometryProvider, GroupKey, NodeKey, NodeKind, SceneProvider};

use crate::aggregator::Entry;
use crate::ancestors::{AncestorFrame, AncestorStack};
use crate::cache::{measure_group, volume_of};
use crate::config::{CycleDetection, Mode, RunConfig};
use crate::context::RunContext;
use crate::error::ResolveError;
use crate::key::KeyBuilder;
use crate::output::BomOutput;

/// What the resolver visits, decided from the node kind recorded in the
/// scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneItem {
    Primitive(NodeKey),
    GroupInstance { node: NodeKey, group: GroupKey },
    List(Vec<SceneItem>),
}

impl SceneItem {
    pub fn classify<S: SceneProvider>(scene: &S, key: NodeKey) -> Result<Self, ResolveError> {
        let node = scene
            .node(key)
            .ok_or(bom_lite_scene::Error::NodeNotFound(key))?;
        Ok(match node.kind {
            NodeKind::Primitive => SceneItem::Primitive(key),
            NodeKind::GroupInstance(group) => SceneItem::GroupInstance { node: key, group },
        })
    }
}

/// Walks scene items and feeds the aggregator.
pub struct Resolver<'a, S, G> {
    scene: &'a S,
    geometry: &'a mut G,
    ctx: RunContext,
}

impl<'a, S: SceneProvider, G: GeometryProvider> Resolver<'a, S, G> {
    pub fn new(scene: &'a S, geometry: &'a mut G, config: RunConfig) -> Self {
        Self {
            scene,
            geometry,
            ctx: RunContext::new(config),
        }
    }

    /// Resolve every root as one list. Dangling roots are reported and
    /// skipped.
    pub fn resolve_roots(&mut self, roots: &[NodeKey]) -> Result<(), ResolveError> {
        let mut items = Vec::with_capacity(roots.len());
        let mut worst = None;
        for &root in roots {
            match SceneItem::classify(self.scene, root) {
                Ok(item) => items.push(item),
                Err(err) => worst = ResolveError::worst(worst, self.ctx.fail(err)),
            }
        }

        if let Err(err) = self.resolve(&SceneItem::List(items), &mut AncestorStack::new(), 0) {
            worst = ResolveError::worst(worst, err);
        }
        worst.map_or(Ok(()), Err)
    }

    /// Resolve one item at `depth` below the enclosing `ancestors`.
    pub fn resolve(
        &mut self,
        item: &SceneItem,
        ancestors: &mut AncestorStack,
        depth: usize,
    ) -> Result<(), ResolveError> {
        let limit = self.ctx.config.max_recursion_depth;
        if depth > limit {
            let err = ResolveError::RecursionLimitExceeded {
                node: self.item_name(item),
                depth,
                limit,
            };
            return Err(self.ctx.fail(err));
        }
        self.ctx.stats.visited += 1;

        match item {
            SceneItem::Primitive(node) => self.resolve_primitive(*node, ancestors),
            SceneItem::GroupInstance { node, group } => {
                self.resolve_instance(*node, *group, ancestors, depth)
            }
            SceneItem::List(items) => {
                let mut worst = None;
                for item in items {
                    if let Err(err) = self.resolve(item, ancestors, depth + 1) {
                        worst = ResolveError::worst(worst, err);
                    }
                }
                worst.map_or(Ok(()), Err)
            }
        }
    }

    pub fn finish(self) -> BomOutput {
        self.ctx.finish()
    }

    fn resolve_primitive(
        &mut self,
        key: NodeKey,
        ancestors: &AncestorStack,
    ) -> Result<(), ResolveError> {
        let scene = self.scene;
        let node = self.lookup(key)?;
        if !node.node_type.is_considered() {
            tracing::debug!(node = %node.name, kind = %node.node_type, "Type not considered, skipping");
            return Ok(());
        }
        if !self.ctx.config.include_hidden && !scene.is_visible(key) {
            let err = ResolveError::NotVisible {
                node: node.name.clone(),
            };
            return Err(self.ctx.fail(err));
        }

        let local = scene.dimensions(key).unwrap_or([0.0; 3]);
        let part = self.build_key(key, local, ancestors)?;
        let volume = if self.ctx.config.detect_volume_variants {
            self.node_volume(key, &node.name)
        } else {
            None
        };

        self.record(
            Entry {
                node: key,
                key: part,
                assembly: false,
                volume,
            },
            ancestors,
        );
        Ok(())
    }

    fn resolve_instance(
        &mut self,
        key: NodeKey,
        group: GroupKey,
        ancestors: &mut AncestorStack,
        depth: usize,
    ) -> Result<(), ResolveError> {
        let scene = self.scene;
        let node = self.lookup(key)?;
        if !node.node_type.is_considered() {
            tracing::debug!(node = %node.name, kind = %node.node_type, "Type not considered, skipping");
            return Ok(());
        }

        let group_name = scene
            .group(group)
            .map(|g| g.name.clone())
            .ok_or(bom_lite_scene::Error::GroupNotFound(group))
            .map_err(|e| self.ctx.fail(e.into()))?;

        if self.ctx.config.cycle_detection == CycleDetection::VisitedGroups
            && ancestors.contains_group(group)
        {
            let err = ResolveError::CycleDetected {
                node: node.name.clone(),
                group: group_name,
            };
            return Err(self.ctx.fail(err));
        }

        let members = scene.members(group);
        if members.is_empty() {
            let err = ResolveError::EmptyGroupReference {
                node: node.name.clone(),
                group: group_name,
            };
            return Err(self.ctx.fail(err));
        }

        let atomic = KeyBuilder::new(scene, &self.ctx.config)
            .parse(node)
            .markers
            .atomic;
        let (extents, volume) = self.measure(group, &node.name);
        let local = match extents {
            Some(extents) => scale_extents(extents, node.total_scale()),
            None => scene.dimensions(key).unwrap_or([0.0; 3]),
        };
        let part = self.build_key(key, local, ancestors)?;

        let mode = self.ctx.config.mode;
        tracing::debug!(node = %node.name, group = %group_name, %mode, atomic, depth, "Group instance");

        if mode != Mode::Resolve {
            self.record(
                Entry {
                    node: key,
                    key: part.clone(),
                    assembly: mode == Mode::Hybrid && !atomic,
                    volume,
                },
                ancestors,
            );
        }
        if mode == Mode::Atomic || (mode == Mode::Hybrid && atomic) {
            return Ok(());
        }

        let frame = AncestorFrame {
            node: key,
            group,
            key: part,
        };
        ancestors.descend(frame, |ancestors| {
            let mut worst = None;
            for &member in members {
                if member == key {
                    tracing::debug!(node = %node.name, "Group contains its own instance, skipping");
                    continue;
                }
                let outcome = match SceneItem::classify(scene, member) {
                    Ok(item) => self.resolve(&item, ancestors, depth + 1),
                    Err(err) => Err(self.ctx.fail(err)),
                };
                if let Err(err) = outcome {
                    worst = ResolveError::worst(worst, err);
                }
            }
            worst.map_or(Ok(()), Err)
        })
    }

    /// Joined extent and volume of `group`, measured on first encounter.
    fn measure(&mut self, group: GroupKey, node: &str) -> (Option<Extents>, Option<f64>) {
        if let Some(extents) = self.ctx.dimensions.get(group) {
            self.ctx.stats.cache_hits += 1;
            tracing::debug!(node, "Group measurement cache hit");
            return (extents, self.ctx.volumes.group(group).flatten());
        }

        // Resolve mode never records the instance itself
        let with_volume =
            self.ctx.config.detect_volume_variants && self.ctx.config.mode != Mode::Resolve;
        self.ctx.stats.group_measurements += 1;
        let (extents, volume) = match measure_group(&mut *self.geometry, group, with_volume) {
            Ok(measure) => (Some(measure.extents), measure.volume),
            Err(source) => {
                self.ctx.note(&ResolveError::GeometryProviderFailure {
                    node: node.to_string(),
                    source,
                });
                (None, None)
            }
        };

        self.ctx.dimensions.insert(group, extents);
        if with_volume {
            self.ctx.volumes.insert_group(group, volume);
        }
        (extents, volume)
    }

    /// Raw volume of a primitive's own mesh.
    fn node_volume(&mut self, key: NodeKey, name: &str) -> Option<f64> {
        if let Some(volume) = self.ctx.volumes.node(key) {
            return volume;
        }

        let volume = match self.geometry.triangulate_node(key) {
            Ok(Some(faces)) => volume_of(&faces),
            Ok(None) => None,
            Err(source) => {
                self.ctx.note(&ResolveError::GeometryProviderFailure {
                    node: name.to_string(),
                    source,
                });
                None
            }
        };
        if volume.is_none() {
            let reason = ResolveError::UnsupportedVolumeGeometry {
                node: name.to_string(),
            };
            tracing::debug!(%reason);
        }

        self.ctx.volumes.insert_node(key, volume);
        volume
    }

    fn build_key(
        &mut self,
        key: NodeKey,
        local: Extents,
        ancestors: &AncestorStack,
    ) -> Result<crate::key::PartKey, ResolveError> {
        let built = KeyBuilder::new(self.scene, &self.ctx.config).build(key, local, ancestors);
        built.map_err(|e| self.ctx.fail(e))
    }

    fn record(&mut self, entry: Entry, ancestors: &AncestorStack) {
        self.ctx
            .aggregator
            .record(&entry, ancestors, &self.ctx.config);
        self.ctx.stats.recorded += 1;
    }

    fn lookup(&mut self, key: NodeKey) -> Result<&'a bom_lite_scene::SceneNode, ResolveError> {
        let scene = self.scene;
        match scene.node(key) {
            Some(node) => Ok(node),
            None => Err(self
                .ctx
                .fail(bom_lite_scene::Error::NodeNotFound(key).into())),
        }
    }

    fn item_name(&self, item: &SceneItem) -> String {
        let key = match item {
            SceneItem::Primitive(node) | SceneItem::GroupInstance { node, .. } => *node,
            SceneItem::List(_) => return "<list>".to_string(),
        };
        self.scene
            .node(key)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| format!("{:?}", key))
    }
}
