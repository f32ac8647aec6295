//! Translate / rotate / scale handles for the selected object.
//!
//! The gizmo never talks to the selection engine directly. It queues
//! [`GizmoEvent`]s which the app drains after each pointer event.

use std::f32::consts::TAU;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::camera::Camera;
use crate::math::Ray;
use crate::scene::{NodeId, Transform};
use crate::selection::Axis;
use crate::traits::{world_matrix, Manipulator, SceneHost};

pub const DEFAULT_GIZMO_SIZE: f32 = 1.5;

/// Handle length as a fraction of the camera distance, before `size`.
const SCREEN_SCALE: f32 = 0.1;
/// Pick tolerance as a fraction of the handle length.
const PICK_TOLERANCE: f32 = 0.12;
const RING_SEGMENTS: usize = 48;
const MIN_SCALE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub const ALL: [GizmoMode; 3] = [GizmoMode::Translate, GizmoMode::Rotate, GizmoMode::Scale];

    /// Keyboard shortcut: T, R or S.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            't' => Some(GizmoMode::Translate),
            'r' => Some(GizmoMode::Rotate),
            's' => Some(GizmoMode::Scale),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GizmoEvent {
    DraggingChanged(bool),
    /// The attached object's transform was changed by a drag.
    ObjectChanged,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    axis: Axis,
    start: Transform,
    pivot: Vec3,
    direction: Vec3,
    /// Axis-line parameter (translate, scale) or the start vector in the ring plane (rotate).
    anchor: Vec3,
    parent: Mat4,
}

/// Handles drawn as world-space polylines, one per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct HandleLine {
    pub axis: Axis,
    pub points: Vec<Vec3>,
    pub active: bool,
}

#[derive(Debug)]
pub struct TransformGizmo {
    mode: GizmoMode,
    size: f32,
    attached: Option<NodeId>,
    hovered: Option<Axis>,
    gesture: Option<Gesture>,
    events: Vec<GizmoEvent>,
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new(DEFAULT_GIZMO_SIZE)
    }
}

impl TransformGizmo {
    pub fn new(size: f32) -> Self {
        Self {
            mode: GizmoMode::default(),
            size: size.max(0.1),
            attached: None,
            hovered: None,
            gesture: None,
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Switching mode mid-drag is ignored.
    pub fn set_mode(&mut self, mode: GizmoMode) {
        if self.gesture.is_none() {
            self.mode = mode;
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn hovered(&self) -> Option<Axis> {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn drain_events(&mut self) -> Vec<GizmoEvent> {
        std::mem::take(&mut self.events)
    }

    /// World length of the handles, constant on screen.
    pub fn handle_length(&self, pivot: Vec3, camera: &Camera) -> f32 {
        (camera.position - pivot).length().max(camera.near) * SCREEN_SCALE * self.size
    }

    /// Updates and returns the axis whose handle is under `ray`.
    pub fn hover<H>(&mut self, ray: &Ray, scene: &H, camera: &Camera) -> Option<Axis>
    where
        H: SceneHost + ?Sized,
    {
        if self.gesture.is_some() {
            return self.hovered;
        }
        self.hovered = self
            .attached
            .and_then(|node| self.pick_axis(ray, world_matrix(scene, node).transform_point3(Vec3::ZERO), camera));
        self.hovered
    }

    /// Starts a gesture on the handle under `ray`. Returns whether one started.
    pub fn begin_drag<H>(&mut self, ray: &Ray, scene: &H, camera: &Camera) -> bool
    where
        H: SceneHost + ?Sized,
    {
        if self.gesture.is_some() {
            return true;
        }
        let Some(node) = self.attached else {
            return false;
        };
        let Some(start) = scene.transform(node) else {
            return false;
        };
        let world = world_matrix(scene, node);
        let pivot = world.transform_point3(Vec3::ZERO);
        let Some(axis) = self.pick_axis(ray, pivot, camera) else {
            return false;
        };
        let direction = axis_vector(axis);
        let Some(anchor) = self.anchor(ray, pivot, direction) else {
            return false;
        };
        let parent = scene
            .parent_of(node)
            .map(|p| world_matrix(scene, p))
            .unwrap_or(Mat4::IDENTITY);

        self.hovered = Some(axis);
        self.gesture = Some(Gesture {
            axis,
            start,
            pivot,
            direction,
            anchor,
            parent,
        });
        log::debug!("{} drag started on {:?} axis", self.mode.label(), axis);
        self.events.push(GizmoEvent::DraggingChanged(true));
        true
    }

    /// Moves the attached object to follow `ray`.
    pub fn drag<H>(&mut self, ray: &Ray, scene: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        let (Some(gesture), Some(node)) = (self.gesture, self.attached) else {
            return;
        };
        let Some(current) = scene.transform(node) else {
            return;
        };
        let Some(next) = self.solve(&gesture, ray) else {
            return;
        };
        if next != current && scene.set_transform(node, next) {
            self.events.push(GizmoEvent::ObjectChanged);
        }
    }

    pub fn end_drag(&mut self) {
        if self.gesture.take().is_some() {
            log::debug!("{} drag ended", self.mode.label());
            self.events.push(GizmoEvent::DraggingChanged(false));
        }
    }

    /// Polylines to draw for the attached object, empty when detached.
    pub fn handle_lines<H>(&self, scene: &H, camera: &Camera) -> Vec<HandleLine>
    where
        H: SceneHost + ?Sized,
    {
        let Some(node) = self.attached else {
            return Vec::new();
        };
        if scene.transform(node).is_none() {
            return Vec::new();
        }
        let pivot = world_matrix(scene, node).transform_point3(Vec3::ZERO);
        let length = self.handle_length(pivot, camera);
        let active = self.gesture.map(|g| g.axis).or(self.hovered);

        Axis::ALL
            .into_iter()
            .map(|axis| {
                let direction = axis_vector(axis);
                let points = match self.mode {
                    GizmoMode::Translate | GizmoMode::Scale => vec![pivot, pivot + direction * length],
                    GizmoMode::Rotate => {
                        let (u, v) = direction.any_orthonormal_pair();
                        (0..=RING_SEGMENTS)
                            .map(|i| {
                                let angle = i as f32 / RING_SEGMENTS as f32 * TAU;
                                pivot + (u * angle.cos() + v * angle.sin()) * length
                            })
                            .collect()
                    }
                };
                HandleLine {
                    axis,
                    points,
                    active: active == Some(axis),
                }
            })
            .collect()
    }

    fn pick_axis(&self, ray: &Ray, pivot: Vec3, camera: &Camera) -> Option<Axis> {
        let length = self.handle_length(pivot, camera);
        let tolerance = length * PICK_TOLERANCE;

        Axis::ALL
            .into_iter()
            .filter_map(|axis| {
                let direction = axis_vector(axis);
                let (t_ray, miss) = match self.mode {
                    GizmoMode::Translate | GizmoMode::Scale => {
                        let (t_ray, t_line) = ray.closest_to_line(pivot, direction)?;
                        if t_ray < 0.0 || !(0.0..=length * 1.05).contains(&t_line) {
                            return None;
                        }
                        (t_ray, (ray.at(t_ray) - (pivot + direction * t_line)).length())
                    }
                    GizmoMode::Rotate => {
                        let t_ray = ray.intersect_plane(pivot, direction)?;
                        (t_ray, ((ray.at(t_ray) - pivot).length() - length).abs())
                    }
                };
                (miss <= tolerance).then_some((axis, t_ray))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(axis, _)| axis)
    }

    fn anchor(&self, ray: &Ray, pivot: Vec3, direction: Vec3) -> Option<Vec3> {
        match self.mode {
            GizmoMode::Translate | GizmoMode::Scale => {
                let (_, t_line) = ray.closest_to_line(pivot, direction)?;
                Some(Vec3::splat(t_line))
            }
            GizmoMode::Rotate => {
                let t = ray.intersect_plane(pivot, direction)?;
                Some(ray.at(t) - pivot)
            }
        }
    }

    fn solve(&self, gesture: &Gesture, ray: &Ray) -> Option<Transform> {
        let start = gesture.start;
        let parent_inverse = gesture.parent.inverse();

        match self.mode {
            GizmoMode::Translate => {
                let (_, t_line) = ray.closest_to_line(gesture.pivot, gesture.direction)?;
                let world = gesture.pivot + gesture.direction * (t_line - gesture.anchor.x);
                Some(Transform {
                    position: parent_inverse.transform_point3(world),
                    ..start
                })
            }
            GizmoMode::Rotate => {
                let t = ray.intersect_plane(gesture.pivot, gesture.direction)?;
                let from = gesture.anchor;
                let to = ray.at(t) - gesture.pivot;
                if from.length_squared() < 1e-12 || to.length_squared() < 1e-12 {
                    return None;
                }
                let angle = gesture.direction.dot(from.cross(to)).atan2(from.dot(to));
                let local_axis = parent_inverse
                    .transform_vector3(gesture.direction)
                    .normalize_or(gesture.direction);
                let rotation = Quat::from_axis_angle(local_axis, angle) * start.quat();
                let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
                Some(Transform {
                    rotation: Vec3::new(x, y, z),
                    ..start
                })
            }
            GizmoMode::Scale => {
                let (_, t_line) = ray.closest_to_line(gesture.pivot, gesture.direction)?;
                let anchor = gesture.anchor.x;
                if anchor.abs() < 1e-6 {
                    return None;
                }
                let ratio = t_line / anchor;
                let mut scale = start.scale;
                let i = gesture.axis.index();
                let scaled = start.scale[i] * ratio;
                scale[i] = if scaled.abs() < MIN_SCALE {
                    MIN_SCALE.copysign(start.scale[i])
                } else {
                    scaled
                };
                Some(Transform { scale, ..start })
            }
        }
    }
}

impl Manipulator for TransformGizmo {
    fn attach(&mut self, node: NodeId) {
        if self.attached != Some(node) {
            self.end_drag();
            self.hovered = None;
        }
        self.attached = Some(node);
    }

    fn detach(&mut self) {
        self.end_drag();
        self.attached = None;
        self.hovered = None;
    }

    fn attached(&self) -> Option<NodeId> {
        self.attached
    }
}

fn axis_vector(axis: Axis) -> Vec3 {
    match axis {
        Axis::X => Vec3::X,
        Axis::Y => Vec3::Y,
        Axis::Z => Vec3::Z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, Material, SceneGraph};
    use crate::math::Color;
    use std::sync::Arc;

    fn scene_with_cube() -> (SceneGraph, NodeId) {
        let mut scene = SceneGraph::new();
        let material = scene.materials_mut().insert(Material::standard(Color::WHITE));
        let cube = scene.add_mesh(
            scene.root(),
            "cube",
            Transform::IDENTITY,
            Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)),
            material,
        );
        (scene, cube)
    }

    /// Camera looking down -Z from in front of the origin.
    fn front_camera() -> Camera {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        camera.resize(800.0, 600.0);
        camera
    }

    fn ray_at(point: Vec3, camera: &Camera) -> Ray {
        Ray::new(camera.position, point - camera.position)
    }

    #[test]
    fn test_mode_keys() {
        assert_eq!(GizmoMode::from_key('T'), Some(GizmoMode::Translate));
        assert_eq!(GizmoMode::from_key('r'), Some(GizmoMode::Rotate));
        assert_eq!(GizmoMode::from_key('s'), Some(GizmoMode::Scale));
        assert_eq!(GizmoMode::from_key('x'), None);
    }

    #[test]
    fn test_hover_requires_attachment() {
        let (scene, _) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        assert_eq!(gizmo.hover(&ray_at(Vec3::new(0.5, 0.0, 0.0), &camera), &scene, &camera), None);
    }

    #[test]
    fn test_hover_finds_x_handle() {
        let (scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(cube);

        let length = gizmo.handle_length(Vec3::ZERO, &camera);
        let ray = ray_at(Vec3::new(length * 0.7, 0.0, 0.0), &camera);
        assert_eq!(gizmo.hover(&ray, &scene, &camera), Some(Axis::X));

        let away = ray_at(Vec3::new(length * 0.7, length * 0.7, 0.0), &camera);
        assert_eq!(gizmo.hover(&away, &scene, &camera), None);
    }

    #[test]
    fn test_translate_drag_moves_along_axis_and_reports_events() {
        let (mut scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);

        assert!(gizmo.begin_drag(&ray_at(Vec3::new(length * 0.5, 0.0, 0.0), &camera), &scene, &camera));
        gizmo.drag(&ray_at(Vec3::new(length * 0.5 + 2.0, 0.0, 0.0), &camera), &mut scene);
        gizmo.end_drag();

        let position = scene.node(cube).unwrap().transform.position;
        assert!((position.x - 2.0).abs() < 1e-3);
        assert_eq!(position.y, 0.0);
        assert_eq!(
            gizmo.drain_events(),
            vec![
                GizmoEvent::DraggingChanged(true),
                GizmoEvent::ObjectChanged,
                GizmoEvent::DraggingChanged(false),
            ]
        );
    }

    #[test]
    fn test_drag_without_change_emits_no_object_event() {
        let (mut scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);
        let ray = ray_at(Vec3::new(length * 0.5, 0.0, 0.0), &camera);

        gizmo.begin_drag(&ray, &scene, &camera);
        gizmo.drag(&ray, &mut scene);

        assert_eq!(gizmo.drain_events(), vec![GizmoEvent::DraggingChanged(true)]);
    }

    #[test]
    fn test_rotate_drag_turns_about_z() {
        let (mut scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.set_mode(GizmoMode::Rotate);
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);

        assert!(gizmo.begin_drag(&ray_at(Vec3::new(length, 0.0, 0.0), &camera), &scene, &camera));
        gizmo.drag(&ray_at(Vec3::new(0.0, length, 0.0), &camera), &mut scene);

        let rotation = scene.node(cube).unwrap().transform.rotation;
        assert!((rotation.z - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_scale_drag_scales_one_axis() {
        let (mut scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.set_mode(GizmoMode::Scale);
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);

        assert!(gizmo.begin_drag(&ray_at(Vec3::new(0.0, length * 0.5, 0.0), &camera), &scene, &camera));
        gizmo.drag(&ray_at(Vec3::new(0.0, length, 0.0), &camera), &mut scene);

        let scale = scene.node(cube).unwrap().transform.scale;
        assert!((scale.y - 2.0).abs() < 1e-3);
        assert_eq!(scale.x, 1.0);
    }

    #[test]
    fn test_detach_mid_drag_ends_gesture() {
        let (scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);
        gizmo.begin_drag(&ray_at(Vec3::new(length * 0.5, 0.0, 0.0), &camera), &scene, &camera);

        gizmo.detach();

        assert!(!gizmo.is_dragging());
        assert_eq!(
            gizmo.drain_events(),
            vec![GizmoEvent::DraggingChanged(true), GizmoEvent::DraggingChanged(false)]
        );
    }

    #[test]
    fn test_mode_is_locked_during_drag() {
        let (scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);
        gizmo.begin_drag(&ray_at(Vec3::new(length * 0.5, 0.0, 0.0), &camera), &scene, &camera);

        gizmo.set_mode(GizmoMode::Scale);
        assert_eq!(gizmo.mode(), GizmoMode::Translate);
    }

    #[test]
    fn test_handle_lines_mark_hovered_axis() {
        let (scene, cube) = scene_with_cube();
        let camera = front_camera();
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(cube);
        let length = gizmo.handle_length(Vec3::ZERO, &camera);
        gizmo.hover(&ray_at(Vec3::new(0.0, length * 0.6, 0.0), &camera), &scene, &camera);

        let lines = gizmo.handle_lines(&scene, &camera);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().any(|l| l.axis == Axis::Y && l.active));
        assert!(lines.iter().filter(|l| l.active).count() == 1);
    }
}
