use std::sync::Arc;

use glam::Vec3;
use scene_editor::math::Color;
use scene_editor::scene::{Geometry, Hit, Material, MaterialId, NodeId, SceneGraph, Transform};
use scene_editor::traits::{top_level_ancestor, Manipulator, Navigator};
use scene_editor::{Axis, EngineCapabilities, SelectionEngine, TransformField};

#[derive(Default)]
struct MockGizmo {
    attached: Option<NodeId>,
}

impl Manipulator for MockGizmo {
    fn attach(&mut self, node: NodeId) {
        self.attached = Some(node);
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    fn attached(&self) -> Option<NodeId> {
        self.attached
    }
}

struct MockNavigator {
    enabled: bool,
    ticks_while_disabled: u32,
}

impl MockNavigator {
    fn tick(&mut self) {
        if !self.enabled {
            self.ticks_while_disabled += 1;
        }
    }
}

impl Navigator for MockNavigator {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Group "robot" with two meshes (one nested one level deeper) plus a lone cube.
struct Fixture {
    scene: SceneGraph,
    robot: NodeId,
    robot_body: NodeId,
    robot_arm: NodeId,
    cube: NodeId,
    originals: Vec<(NodeId, MaterialId)>,
}

fn fixture() -> Fixture {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let geometry = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
    let red = scene.materials_mut().insert(Material::standard(Color::from_hex(0xff0000)));
    let blue = scene.materials_mut().insert(Material::standard(Color::from_hex(0x0000ff)));

    let robot = scene.add_group(root, "robot", Transform::from_position(Vec3::new(3.0, 0.0, 3.0)));
    let robot_body = scene.add_mesh(robot, "body", Transform::IDENTITY, geometry.clone(), red);
    let shoulder = scene.add_group(robot_body, "shoulder", Transform::from_position(Vec3::Y));
    let robot_arm = scene.add_mesh(shoulder, "arm", Transform::IDENTITY, geometry.clone(), red);
    let cube = scene.add_mesh(
        root,
        "",
        Transform::from_position(Vec3::new(-1.0, 0.5, 0.0)).with_rotation(Vec3::new(0.3, 0.6, -0.9)),
        geometry,
        blue,
    );

    let originals = vec![(robot_body, red), (robot_arm, red), (cube, blue)];
    Fixture {
        scene,
        robot,
        robot_body,
        robot_arm,
        cube,
        originals,
    }
}

fn hits(nodes: &[NodeId]) -> Vec<Hit> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| Hit {
            node: *node,
            distance: 1.0 + i as f32,
        })
        .collect()
}

fn material_of(scene: &SceneGraph, mesh: NodeId) -> MaterialId {
    scene.node(mesh).unwrap().mesh().unwrap().material
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_pick_selects_top_level_ancestor_of_nearest_hit() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        let mut gizmo = MockGizmo::default();

        engine.pick(&hits(&[f.robot_arm, f.cube]), &mut f.scene, &mut gizmo);

        assert_eq!(engine.selected(), Some(f.robot));
        assert_eq!(top_level_ancestor(&f.scene, f.robot_arm), f.robot);
        assert_eq!(engine.selected_name(), "robot");
        assert_eq!(gizmo.attached, Some(f.robot));
        assert_eq!(engine.mirror().position, [3.0, 0.0, 3.0]);
        assert_eq!(engine.mirror().scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_mirror_rotation_is_in_degrees() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();

        engine.pick(&hits(&[f.cube]), &mut f.scene, &mut MockGizmo::default());

        let rotation = engine.mirror().rotation_deg;
        let expected = [0.3f32.to_degrees(), 0.6f32.to_degrees(), (-0.9f32).to_degrees()];
        for (got, want) in rotation.iter().zip(expected) {
            assert!((got - want).abs() < 1e-3, "{got} vs {want}");
        }
    }

    #[test]
    fn test_empty_pick_clears_everything() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        let mut gizmo = MockGizmo::default();

        engine.pick(&hits(&[f.robot_body]), &mut f.scene, &mut gizmo);
        engine.pick(&[], &mut f.scene, &mut gizmo);

        assert_eq!(engine.selected(), None);
        assert_eq!(engine.selected_name(), "");
        assert_eq!(engine.override_count(), 0);
        assert_eq!(gizmo.attached, None);
        for (mesh, original) in &f.originals {
            assert_eq!(material_of(&f.scene, *mesh), *original);
        }
    }

    #[test]
    fn test_clearing_keeps_last_field_values() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        let mut gizmo = MockGizmo::default();

        engine.pick(&hits(&[f.robot_arm]), &mut f.scene, &mut gizmo);
        engine.pick(&[], &mut f.scene, &mut gizmo);

        assert_eq!(engine.selected(), None);
        assert_eq!(engine.mirror().position, [3.0, 0.0, 3.0]);
    }

    #[test]
    fn test_restore_twice_matches_restore_once() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        engine.pick(&hits(&[f.robot_body]), &mut f.scene, &mut MockGizmo::default());

        engine.restore_highlight(&mut f.scene);
        let once: Vec<_> = f.originals.iter().map(|(m, _)| material_of(&f.scene, *m)).collect();
        let library_once = f.scene.materials().len();
        engine.restore_highlight(&mut f.scene);
        let twice: Vec<_> = f.originals.iter().map(|(m, _)| material_of(&f.scene, *m)).collect();

        assert_eq!(once, twice);
        assert_eq!(f.scene.materials().len(), library_once);
    }

    #[test]
    fn test_overrides_never_accumulate() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        let mut gizmo = MockGizmo::default();
        let sequence = [f.robot_arm, f.cube, f.robot_body, f.robot_body, f.cube, f.robot_arm];

        for node in sequence {
            engine.pick(&hits(&[node]), &mut f.scene, &mut gizmo);
            let expected = if node == f.cube { 1 } else { 2 };
            assert_eq!(engine.override_count(), expected);
        }
    }

    #[test]
    fn test_switching_selection_restores_previous_meshes() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        let mut gizmo = MockGizmo::default();

        engine.pick(&hits(&[f.robot_body]), &mut f.scene, &mut gizmo);
        assert_ne!(material_of(&f.scene, f.robot_body), f.originals[0].1);
        engine.pick(&hits(&[f.cube]), &mut f.scene, &mut gizmo);

        assert_eq!(engine.override_count(), 1);
        assert_eq!(material_of(&f.scene, f.robot_body), f.originals[0].1);
        assert_eq!(material_of(&f.scene, f.robot_arm), f.originals[1].1);
        assert_ne!(material_of(&f.scene, f.cube), f.originals[2].1);
    }

    #[test]
    fn test_ui_edit_then_gizmo_change_does_not_drift() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        engine.pick(&hits(&[f.cube]), &mut f.scene, &mut MockGizmo::default());

        assert!(engine.apply_ui_edit(TransformField::Position, Axis::X, 5.0, &mut f.scene));
        assert_eq!(f.scene.node(f.cube).unwrap().transform.position.x, 5.0);

        engine.on_gizmo_change(&f.scene);
        assert_eq!(engine.mirror().position[0], 5.0);
    }

    #[test]
    fn test_ui_edit_writes_every_field_of_the_mirror() {
        let mut f = fixture();
        let mut engine = SelectionEngine::default();
        engine.pick(&hits(&[f.robot_arm]), &mut f.scene, &mut MockGizmo::default());

        engine.apply_ui_edit(TransformField::Scale, Axis::Y, 2.0, &mut f.scene);

        let transform = f.scene.node(f.robot).unwrap().transform;
        assert_eq!(transform.scale, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(transform.position, Vec3::new(3.0, 0.0, 3.0));
    }

    #[test]
    fn test_ui_edit_without_selection_mutates_nothing() {
        let mut f = fixture();
        let before: Vec<_> = f.scene.iter().map(|(id, n)| (id, n.transform)).collect();
        let mut engine = SelectionEngine::default();

        assert!(!engine.apply_ui_edit(TransformField::Position, Axis::Z, 7.0, &mut f.scene));

        assert_eq!(engine.mirror().position, [0.0, 0.0, 7.0]);
        let after: Vec<_> = f.scene.iter().map(|(id, n)| (id, n.transform)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_gizmo_drag_disables_navigator_until_release() {
        let mut engine = SelectionEngine::default();
        let mut navigator = MockNavigator {
            enabled: true,
            ticks_while_disabled: 0,
        };

        engine.on_gizmo_drag_state_change(true, &mut navigator);
        navigator.tick();
        assert!(!navigator.is_enabled());
        assert_eq!(navigator.ticks_while_disabled, 1);

        engine.on_gizmo_drag_state_change(false, &mut navigator);
        navigator.tick();
        assert!(navigator.is_enabled());
        assert_eq!(navigator.ticks_while_disabled, 1);
    }

    #[test]
    fn test_gizmo_change_without_selection_is_ignored() {
        let f = fixture();
        let mut engine = SelectionEngine::default();
        engine.on_gizmo_change(&f.scene);
        assert_eq!(*engine.mirror(), Default::default());
    }

    #[test]
    fn test_view_only_engine_never_selects() {
        let mut f = fixture();
        let mut engine = SelectionEngine::new(EngineCapabilities { editing: false });
        let mut gizmo = MockGizmo::default();

        engine.pick(&hits(&[f.cube]), &mut f.scene, &mut gizmo);

        assert_eq!(engine.selected(), None);
        assert_eq!(engine.override_count(), 0);
        assert_eq!(material_of(&f.scene, f.cube), f.originals[2].1);
    }
}
