// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BOM-Lite Engine
//!
//! Bill-of-materials resolution over a scene graph of primitive parts and
//! group instances.
//!
//! ## Overview
//!
//! A run walks the selected roots, turns every counted node into a canonical
//! [`PartKey`] (label, material, formatted dimensions, optional flag) and
//! counts occurrences:
//!
//! - **Atomic** mode counts every group instance as one part.
//! - **Resolve** mode replaces group instances by their members.
//! - **Hybrid** mode does both and records which children each assembly holds.
//!
//! Group measurements go through a [`GeometryProvider`] once per group and
//! are cached for the rest of the run. Failures stay local to their branch
//! and end up in [`BomOutput::diagnostics`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bom_lite_engine::{run, Mode, RunConfig};
//! use bom_lite_scene::{InMemoryGeometry, Scene};
//!
//! let scene = Scene::from_json(&std::fs::read_to_string("workbench.json")?)?;
//! let mut geometry = InMemoryGeometry::new(&scene);
//! let output = run(&scene, &mut geometry, &RunConfig::default().with_mode(Mode::Hybrid))?;
//! for (part, count) in output.parts.iter() {
//!     println!("{count}x {part}");
//! }
//! ```

pub mod aggregator;
pub mod ancestors;
pub mod cache;
pub mod compositor;
pub mod config;
pub mod context;
pub mod counts;
pub mod error;
pub mod key;
pub mod naming;
pub mod output;
pub mod resolver;

pub use ancestors::{AncestorFrame, AncestorStack};
pub use config::{CycleDetection, Mode, RotationPolicy, RunConfig, UnitSystem};
pub use counts::{CountMap, OrderedMap};
pub use error::{ConfigError, Diagnostic, ResolveError, Severity};
pub use key::{KeyBuilder, PartKey, MIXED_MATERIAL, NO_MATERIAL};
pub use naming::{parse_name, strip_numeric_suffix, Markers, ParsedName};
pub use output::{BomOutput, RunStats};
pub use resolver::{Resolver, SceneItem};

use bom_lite_scene::{GeometryProvider, NodeKey, SceneProvider};

/// Run over the scene's own root selection.
pub fn run<S, G>(scene: &S, geometry: &mut G, config: &RunConfig) -> Result<BomOutput, ResolveError>
where
    S: SceneProvider,
    G: GeometryProvider,
{
    let roots = scene.roots();
    run_with_roots(scene, geometry, config, &roots)
}

/// Run over explicit roots.
///
/// Fails only for an invalid configuration or an empty root list. Any other
/// failure is reported in the output's diagnostics.
pub fn run_with_roots<S, G>(
    scene: &S,
    geometry: &mut G,
    config: &RunConfig,
    roots: &[NodeKey],
) -> Result<BomOutput, ResolveError>
where
    S: SceneProvider,
    G: GeometryProvider,
{
    config.validate()?;
    if roots.is_empty() {
        return Err(ResolveError::NoRootSelection);
    }

    tracing::info!(roots = roots.len(), mode = %config.mode, "Resolving BOM");

    let mut resolver = Resolver::new(scene, geometry, config.clone());
    if let Err(err) = resolver.resolve_roots(roots) {
        tracing::debug!(error = %err, "Run finished with branch failures");
    }
    let output = resolver.finish();

    tracing::info!(
        parts = output.parts.len(),
        assemblies = output.assemblies.len(),
        failures = output.stats.failures,
        "BOM resolved"
    );
    Ok(output)
}
