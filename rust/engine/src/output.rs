// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result of a BOM run, handed to report formatters.

use serde::Serialize;

use crate::counts::{CountMap, OrderedMap};
use crate::error::Diagnostic;
use crate::key::PartKey;

/// Work counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Scene items entered by the resolver
    pub visited: usize,
    /// BOM entries counted
    pub recorded: usize,
    /// Groups joined and measured through the geometry provider
    pub group_measurements: usize,
    /// Group measurements served from the caches
    pub cache_hits: usize,
    /// Branch failures collected as diagnostics
    pub failures: usize,
}

/// Count maps and column widths of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BomOutput {
    /// Occurrences of every part, in first-seen order
    pub parts: CountMap<PartKey>,
    /// Occurrences of every assembly (hybrid mode)
    pub assemblies: CountMap<PartKey>,
    /// Children counted below each enclosing group instance
    pub composition: OrderedMap<PartKey, CountMap<PartKey>>,
    /// Occurrences per rounded volume, for each part with a known volume
    pub variants: OrderedMap<PartKey, CountMap<String>>,
    pub longest_label: usize,
    pub longest_material: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
}

impl BomOutput {
    /// Average number of `child` per instance of `assembly`.
    ///
    /// Not necessarily an integer when instances of the assembly differ.
    pub fn parts_per_assembly(&self, assembly: &PartKey, child: &PartKey) -> Option<f64> {
        let instances = match self.assemblies.count(assembly) {
            0 => self.parts.count(assembly),
            n => n,
        };
        let children = self.composition.get(assembly)?.count(child);
        (instances > 0).then(|| children as f64 / instances as f64)
    }

    /// Whether occurrences of `part` differ in volume.
    pub fn has_variants(&self, part: &PartKey) -> bool {
        self.variants.get(part).map_or(false, |v| v.len() > 1)
    }

    /// Look a part up by label, for callers that know only the name.
    pub fn find_part(&self, label: &str) -> Option<&PartKey> {
        self.parts.keys().find(|k| k.label == label)
    }

    /// Pretty-printed JSON of the whole output.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(label: &str) -> PartKey {
        PartKey {
            label: label.to_string(),
            ..PartKey::default()
        }
    }

    #[test]
    fn ratio_uses_assembly_count() {
        let mut output = BomOutput::default();
        let table = part("Table");
        let leg = part("Leg");
        for _ in 0..2 {
            output.parts.increment(&table);
            output.assemblies.increment(&table);
        }
        for _ in 0..7 {
            output.composition.get_or_default(&table).increment(&leg);
        }
        assert_eq!(output.parts_per_assembly(&table, &leg), Some(3.5));
        assert_eq!(output.parts_per_assembly(&leg, &table), None);
    }

    #[test]
    fn json_lists_counts_in_order() {
        let mut output = BomOutput::default();
        output.parts.increment(&part("Top"));
        output.parts.increment(&part("Leg"));
        let json = output.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parts"][0][0]["label"], "Top");
        assert_eq!(value["parts"][1][1], 1);
        assert_eq!(value["stats"]["failures"], 0);
    }

    #[test]
    fn variants_need_two_volumes() {
        let mut output = BomOutput::default();
        let plate = part("Plate");
        output.variants.get_or_default(&plate).increment(&"1.0".to_string());
        assert!(!output.has_variants(&plate));
        output.variants.get_or_default(&plate).increment(&"0.9".to_string());
        assert!(output.has_variants(&plate));
    }
}
