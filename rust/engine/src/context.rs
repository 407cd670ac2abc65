// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State owned by a single run.

use crate::aggregator::Aggregator;
use crate::cache::{DimensionCache, VolumeCache};
use crate::config::RunConfig;
use crate::error::{Diagnostic, ResolveError};
use crate::output::{BomOutput, RunStats};

/// Counters, caches and diagnostics of one run. Created fresh for every
/// run, so nothing leaks between runs.
#[derive(Debug)]
pub struct RunContext {
    pub config: RunConfig,
    pub dimensions: DimensionCache,
    pub volumes: VolumeCache,
    pub aggregator: Aggregator,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: RunStats,
}

impl RunContext {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            dimensions: DimensionCache::default(),
            volumes: VolumeCache::default(),
            aggregator: Aggregator::new(),
            diagnostics: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Record a branch failure and hand it back for propagation.
    pub fn fail(&mut self, err: ResolveError) -> ResolveError {
        self.note(&err);
        err
    }

    /// Record a failure that does not stop the branch.
    pub fn note(&mut self, err: &ResolveError) {
        tracing::warn!(error = %err, severity = ?err.severity(), "Branch failure");
        self.diagnostics.push(Diagnostic::from(err));
        self.stats.failures += 1;
    }

    pub fn finish(self) -> BomOutput {
        self.aggregator.into_output(self.diagnostics, self.stats)
    }
}
