// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading a scene from JSON and querying it through the provider traits.

use approx::assert_relative_eq;
use bom_lite_geometry::estimate_volume;
use bom_lite_scene::{GeometryProvider, InMemoryGeometry, NodeKind, Scene, SceneProvider};

const WORKBENCH: &str = include_str!("fixtures/workbench.json");

fn workbench() -> Scene {
    Scene::from_json(WORKBENCH).expect("fixture should load")
}

#[test]
fn test_fixture_loads() {
    let scene = workbench();
    assert_eq!(scene.name, "Workbench");
    assert_eq!(scene.node_count(), 10);
    assert_eq!(scene.group_count(), 2);

    let table = scene.group_by_name("Table").unwrap();
    assert_eq!(scene.group(table).unwrap().members.len(), 4);

    let instance = scene.node_by_name("Table").unwrap();
    assert_eq!(
        scene.node(instance).unwrap().kind,
        NodeKind::GroupInstance(table)
    );
}

#[test]
fn test_auto_selection_when_nothing_selected() {
    let scene = workbench();
    let names: Vec<&str> = scene
        .roots()
        .into_iter()
        .map(|k| scene.node(k).unwrap().name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Table", "Bracket mat:Steel", "Bracket mat:Steel.001"]
    );
}

#[test]
fn test_explicit_selection_wins() {
    let json = WORKBENCH.replace(
        r#""name": "Spare Bracket","#,
        r#""name": "Spare Bracket", "selected": true,"#,
    );
    let scene = Scene::from_json(&json).unwrap();
    let roots = scene.roots();
    assert_eq!(roots.len(), 1);
    assert!(!scene.is_visible(roots[0]));
}

#[test]
fn test_provider_queries() {
    let scene = workbench();
    let leg_body = scene.node_by_name("LegBody").unwrap();
    assert_eq!(scene.material(leg_body), Some("Aluminium"));

    let [x, y, z] = scene.dimensions(leg_body).unwrap();
    assert_relative_eq!(x, 0.05, epsilon = 1e-12);
    assert_relative_eq!(y, 0.05, epsilon = 1e-12);
    assert_relative_eq!(z, 0.5, epsilon = 1e-12);

    let leg = scene.group_by_name("Leg").unwrap();
    assert_eq!(scene.members(leg), &[leg_body]);
}

#[test]
fn test_joined_table_volume() {
    let scene = workbench();
    let table = scene.group_by_name("Table").unwrap();
    let mut geometry = InMemoryGeometry::new(&scene);

    let handle = geometry.resolve_group_to_mesh(table).unwrap();
    let faces = geometry.triangulate(&handle).unwrap();
    geometry.discard(handle).unwrap();

    // Top 1.0 x 0.6 x 0.02 plus three legs 0.05 x 0.05 x 0.5
    let expected = 1.0 * 0.6 * 0.02 + 3.0 * 0.05 * 0.05 * 0.5;
    assert_relative_eq!(estimate_volume(&faces).volume, expected, epsilon = 1e-9);
    assert_eq!(geometry.live_temporaries(), 0);
}
