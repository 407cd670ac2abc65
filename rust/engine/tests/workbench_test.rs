// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BOM runs over the workbench fixture: a table group (top plus three leg
//! instances) and two loose brackets.

use bom_lite_engine::{run, run_with_roots, Mode, RunConfig, Severity, UnitSystem};
use bom_lite_scene::{InMemoryGeometry, Scene};

const WORKBENCH: &str = include_str!("../../scene/tests/fixtures/workbench.json");

fn workbench() -> Scene {
    Scene::from_json(WORKBENCH).expect("fixture should load")
}

fn config(mode: Mode) -> RunConfig {
    RunConfig::default().with_mode(mode)
}

#[test]
fn test_atomic_counts_table_as_one_part() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let output = run(&scene, &mut geometry, &config(Mode::Atomic)).unwrap();

    assert_eq!(output.parts.len(), 2);
    let table = output.find_part("Table").unwrap();
    assert_eq!(table.material, "MIXED");
    assert_eq!(table.dimensions, ["1.000m", "0.600m", "0.520m"]);
    assert_eq!(output.parts.count(table), 1);

    let bracket = output.find_part("Bracket").unwrap();
    assert_eq!(bracket.material, "Steel");
    assert_eq!(bracket.dimensions, ["0.100m", "0.050m", "0.005m"]);
    assert_eq!(output.parts.count(bracket), 2);

    assert!(output.find_part("Leg").is_none());
    assert!(output.assemblies.is_empty());
    assert!(output.composition.is_empty());
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.stats.group_measurements, 1);
    assert_eq!(geometry.live_temporaries(), 0);
}

#[test]
fn test_resolve_lists_members_only() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let output = run(&scene, &mut geometry, &config(Mode::Resolve)).unwrap();

    assert!(output.find_part("Table").is_none());
    assert!(output.find_part("Leg").is_none());
    assert!(output.assemblies.is_empty());

    let top = output.find_part("Top").unwrap();
    assert_eq!(top.material, "Oak");
    assert_eq!(top.dimensions, ["1.000m", "0.600m", "0.020m"]);
    assert_eq!(output.parts.count(top), 1);

    let body = output.find_part("LegBody").unwrap();
    assert_eq!(body.material, "Aluminium");
    assert_eq!(output.parts.count(body), 3);
    assert_eq!(output.parts.total(), 1 + 3 + 2);

    // Joined groups are measured for dimensions only; the meshes of Top
    // and LegBody are the only ones triangulated
    assert_eq!(geometry.stats().resolutions, 2);
    assert_eq!(geometry.stats().triangulations, 2);
    assert_eq!(geometry.live_temporaries(), 0);
}

#[test]
fn test_hybrid_records_assemblies_and_composition() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let output = run(&scene, &mut geometry, &config(Mode::Hybrid)).unwrap();

    let table = output.find_part("Table").unwrap().clone();
    let leg = output.find_part("Leg").unwrap().clone();
    let top = output.find_part("Top").unwrap().clone();
    let body = output.find_part("LegBody").unwrap().clone();

    assert_eq!(leg.material, "Aluminium");
    assert_eq!(leg.dimensions, ["0.050m", "0.050m", "0.500m"]);

    assert_eq!(output.assemblies.count(&table), 1);
    assert_eq!(output.assemblies.count(&leg), 3);
    assert_eq!(output.parts.count(&leg), 3);
    assert_eq!(output.parts.count(&body), 3);

    let under_table = output.composition.get(&table).unwrap();
    assert_eq!(under_table.count(&leg), 3);
    assert_eq!(under_table.count(&top), 1);
    assert_eq!(under_table.count(&body), 0);
    assert_eq!(output.composition.get(&leg).unwrap().count(&body), 3);

    assert_eq!(output.parts_per_assembly(&table, &leg), Some(3.0));
    assert_eq!(output.parts_per_assembly(&leg, &body), Some(1.0));
}

#[test]
fn test_group_measured_once_per_run() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let output = run(&scene, &mut geometry, &config(Mode::Hybrid)).unwrap();

    // Table and Leg are each joined once; the other two legs hit the cache
    assert_eq!(output.stats.group_measurements, 2);
    assert_eq!(output.stats.cache_hits, 2);
    assert_eq!(geometry.stats().resolutions, 2);
    assert_eq!(geometry.stats().discards, 2);
    // Two joined groups plus the meshes of Top and LegBody
    assert_eq!(geometry.stats().triangulations, 4);
    assert_eq!(geometry.live_temporaries(), 0);
}

#[test]
fn test_identical_instances_have_one_volume() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let output = run(&scene, &mut geometry, &config(Mode::Hybrid)).unwrap();

    let leg = output.find_part("Leg").unwrap();
    let volumes = output.variants.get(leg).unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes.total(), 3);
    assert!(!output.has_variants(leg));

    // No mesh, no volume
    let bracket = output.find_part("Bracket").unwrap();
    assert!(output.variants.get(bracket).is_none());
}

#[test]
fn test_hidden_part_reported_not_counted() {
    let scene = workbench();
    let spare = scene.node_by_name("Spare Bracket").unwrap();
    let bracket = scene.node_by_name("Bracket mat:Steel").unwrap();
    let mut geometry = InMemoryGeometry::new(&scene);

    let output = run_with_roots(&scene, &mut geometry, &RunConfig::default(), &[spare, bracket])
        .unwrap();
    assert!(output.find_part("Spare Bracket").is_none());
    assert_eq!(output.parts.total(), 1);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Notice);
    assert_eq!(output.diagnostics[0].node.as_deref(), Some("Spare Bracket"));

    let config = RunConfig {
        include_hidden: true,
        ..RunConfig::default()
    };
    let output = run_with_roots(&scene, &mut geometry, &config, &[spare, bracket]).unwrap();
    assert!(output.find_part("Spare Bracket").is_some());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_helpers_are_not_parts() {
    let scene = workbench();
    let camera = scene.node_by_name("Camera").unwrap();
    let mut geometry = InMemoryGeometry::new(&scene);
    let output = run_with_roots(&scene, &mut geometry, &RunConfig::default(), &[camera]).unwrap();
    assert!(output.parts.is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_imperial_units() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let config = RunConfig {
        unit_system: UnitSystem::Imperial,
        ..RunConfig::default()
    };
    let output = run(&scene, &mut geometry, &config).unwrap();
    let bracket = output.find_part("Bracket").unwrap();
    assert_eq!(bracket.dimensions, ["0.328ft", "0.164ft", "0.016ft"]);
}

#[test]
fn test_runs_do_not_share_state() {
    let scene = workbench();
    let mut geometry = InMemoryGeometry::new(&scene);
    let first = run(&scene, &mut geometry, &config(Mode::Hybrid)).unwrap();
    let second = run(&scene, &mut geometry, &config(Mode::Hybrid)).unwrap();
    assert_eq!(first, second);
    assert_eq!(geometry.stats().resolutions, 4);
}
