// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inherited transforms applied to a node's local dimensions.

use bom_lite_geometry::{
    linear_part, mapped_extents, rotation_matrix, scale_extents, Extents, Matrix3,
};
use bom_lite_scene::{NodeKey, SceneProvider};

use crate::ancestors::AncestorFrame;
use crate::config::RotationPolicy;

/// Dimensions of `node` once every enclosing group instance's transform is
/// applied.
///
/// `local` already includes the node's own scale. Frames referring to the
/// node itself are skipped.
pub fn effective_dimensions<S: SceneProvider>(
    scene: &S,
    node: NodeKey,
    local: Extents,
    ancestors: &[AncestorFrame],
    policy: RotationPolicy,
) -> Extents {
    let chain = ancestors
        .iter()
        .rev()
        .filter(|frame| frame.node != node)
        .filter_map(|frame| scene.node(frame.node));

    match policy {
        RotationPolicy::Ignore => chain.fold(local, |dims, ancestor| {
            scale_extents(dims, ancestor.total_scale())
        }),
        RotationPolicy::Compose => {
            let own = scene
                .node(node)
                .map(|n| rotation_matrix(n.rotation))
                .unwrap_or_else(Matrix3::identity);
            let linear = chain.fold(own, |m, ancestor| {
                linear_part(ancestor.rotation, ancestor.total_scale()) * m
            });
            mapped_extents(&linear, local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::PartKey;
    use approx::assert_relative_eq;
    use bom_lite_scene::{Scene, SceneNode};
    use std::f64::consts::FRAC_PI_2;

    fn frame(scene: &Scene, name: &str) -> AncestorFrame {
        let node = scene.node_by_name(name).unwrap();
        AncestorFrame {
            node,
            group: scene.node(node).unwrap().instanced_group().unwrap(),
            key: PartKey::default(),
        }
    }

    fn nested_scene() -> Scene {
        let mut scene = Scene::new("nested");
        let inner = scene.add_group("Inner").unwrap();
        let outer = scene.add_group("Outer").unwrap();
        scene
            .add_node(
                SceneNode::instance("Outer.001", outer)
                    .with_scale([2.0, 1.0, 1.0])
                    .with_delta_scale([1.0, 1.0, 3.0]),
            )
            .unwrap();
        scene
            .add_node(
                SceneNode::instance("Inner.001", inner)
                    .with_scale([1.0, 0.5, 1.0])
                    .with_rotation([0.0, 0.0, FRAC_PI_2]),
            )
            .unwrap();
        scene
            .add_node(SceneNode::primitive("Rod", bom_lite_scene::NodeType::Mesh))
            .unwrap();
        scene
    }

    #[test]
    fn ignore_multiplies_every_ancestor_scale() {
        let scene = nested_scene();
        let rod = scene.node_by_name("Rod").unwrap();
        let chain = [frame(&scene, "Outer.001"), frame(&scene, "Inner.001")];
        let dims = effective_dimensions(&scene, rod, [1.0, 1.0, 1.0], &chain, RotationPolicy::Ignore);
        assert_eq!(dims, [2.0, 0.5, 3.0]);
    }

    #[test]
    fn node_itself_is_skipped() {
        let scene = nested_scene();
        let outer = frame(&scene, "Outer.001");
        let dims = effective_dimensions(
            &scene,
            outer.node,
            [1.0, 1.0, 1.0],
            &[outer.clone()],
            RotationPolicy::Ignore,
        );
        assert_eq!(dims, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn compose_follows_rotated_axes() {
        let scene = nested_scene();
        let rod = scene.node_by_name("Rod").unwrap();
        let chain = [frame(&scene, "Outer.001"), frame(&scene, "Inner.001")];

        // Inner scales y by 0.5 then turns it onto the outer x axis, which
        // Outer stretches by 2.
        let dims = effective_dimensions(&scene, rod, [1.0, 1.0, 1.0], &chain, RotationPolicy::Compose);
        assert_relative_eq!(dims[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(dims[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(dims[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn policies_agree_without_rotation() {
        let mut scene = nested_scene();
        let rod = scene
            .add_node(SceneNode::primitive("Rod2", bom_lite_scene::NodeType::Mesh))
            .unwrap();
        let chain = [frame(&scene, "Outer.001")];
        let ignore = effective_dimensions(&scene, rod, [0.1, 0.2, 0.3], &chain, RotationPolicy::Ignore);
        let compose = effective_dimensions(&scene, rod, [0.1, 0.2, 0.3], &chain, RotationPolicy::Compose);
        for axis in 0..3 {
            assert_relative_eq!(ignore[axis], compose[axis], epsilon = 1e-12);
        }
    }
}
