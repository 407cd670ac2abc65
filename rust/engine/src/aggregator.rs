// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accumulation of part counts.

use bom_lite_scene::NodeKey;

use crate::ancestors::AncestorStack;
use crate::config::RunConfig;
use crate::counts::{CountMap, OrderedMap};
use crate::error::Diagnostic;
use crate::key::PartKey;
use crate::output::{BomOutput, RunStats};

/// One BOM entry about to be counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub node: NodeKey,
    pub key: PartKey,
    /// A non-atomic group instance listed in hybrid mode.
    pub assembly: bool,
    /// Raw volume, when known.
    pub volume: Option<f64>,
}

/// The count maps of a run.
#[derive(Debug, Default)]
pub struct Aggregator {
    parts: CountMap<PartKey>,
    assemblies: CountMap<PartKey>,
    composition: OrderedMap<PartKey, CountMap<PartKey>>,
    variants: OrderedMap<PartKey, CountMap<String>>,
    longest_label: usize,
    longest_material: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `entry` below `ancestors`.
    pub fn record(&mut self, entry: &Entry, ancestors: &AncestorStack, config: &RunConfig) {
        let key = &entry.key;
        let count = self.parts.increment(key);

        if entry.assembly {
            self.assemblies.increment(key);
        }

        // An assembly never lists itself as its only child
        let only_self = ancestors.len() == 1 && ancestors.frames()[0].node == entry.node;
        if let Some(parent) = ancestors.last().filter(|_| !only_self) {
            self.composition
                .get_or_default(&parent.key)
                .increment(key);
        }

        if config.detect_volume_variants {
            if let Some(volume) = entry.volume {
                self.variants
                    .get_or_default(key)
                    .increment(&config.format_volume(volume));
            }
        }

        self.longest_label = self.longest_label.max(key.label.chars().count());
        self.longest_material = self.longest_material.max(key.material.chars().count());

        tracing::debug!(part = %key, count, assembly = entry.assembly, "Recorded");
    }

    pub fn parts(&self) -> &CountMap<PartKey> {
        &self.parts
    }

    pub fn assemblies(&self) -> &CountMap<PartKey> {
        &self.assemblies
    }

    pub fn into_output(self, diagnostics: Vec<Diagnostic>, stats: RunStats) -> BomOutput {
        BomOutput {
            parts: self.parts,
            assemblies: self.assemblies,
            composition: self.composition,
            variants: self.variants,
            longest_label: self.longest_label,
            longest_material: self.longest_material,
            diagnostics,
            stats,
        }
    }
}
