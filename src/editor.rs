//! Everything the viewer edits, wired together: scene, selection engine, gizmo
//! and orbit navigation. Input arrives in viewport pixels.

use std::path::Path;

use glam::Vec2;

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::gizmo::{GizmoEvent, GizmoMode, TransformGizmo};
use crate::loaders::{self, ImportError};
use crate::navigator::OrbitNavigator;
use crate::scene::{NodeId, SceneGraph};
use crate::scenes::{apply_cube_color, apply_light_settings, create_default_scene, LightingSettings};
use crate::selection::{Axis, EngineCapabilities, SelectionEngine, TransformField};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum PointerDrag {
    #[default]
    Idle,
    Gizmo,
    Orbit,
    Pan,
}

pub struct Editor {
    pub scene: SceneGraph,
    pub engine: SelectionEngine,
    pub gizmo: TransformGizmo,
    pub navigator: OrbitNavigator,
    pub camera: Camera,
    lighting: LightingSettings,
    status: Option<String>,
    drag: PointerDrag,
}

impl Editor {
    pub fn new(config: &ViewerConfig, capabilities: EngineCapabilities) -> Self {
        let camera = Camera::new(config.camera_position());
        let navigator = OrbitNavigator::new(&camera, config.damping);
        Self {
            scene: create_default_scene(config),
            engine: SelectionEngine::new(capabilities).with_highlight_color(config.highlight_color),
            gizmo: TransformGizmo::new(config.gizmo_size),
            navigator,
            camera,
            lighting: LightingSettings {
                intensity: config.light_intensity,
                light_color: config.light_color,
                cube_color: config.cube_color,
            },
            status: None,
            drag: PointerDrag::Idle,
        }
    }

    pub fn lighting(&self) -> &LightingSettings {
        &self.lighting
    }

    /// Last import result for the UI.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_lighting(&mut self, settings: LightingSettings) {
        if settings.intensity != self.lighting.intensity || settings.light_color != self.lighting.light_color {
            apply_light_settings(&mut self.scene, &settings);
        }
        if settings.cube_color != self.lighting.cube_color {
            apply_cube_color(&mut self.scene, &self.engine, settings.cube_color);
        }
        self.lighting = settings;
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<NodeId, ImportError> {
        let path = path.as_ref();
        let result = loaders::import_model_file(&mut self.scene, path);
        self.report_import(&path.display().to_string(), &result);
        result
    }

    pub fn import_bytes(&mut self, bytes: &[u8], file_name: &str) -> Result<NodeId, ImportError> {
        let result = loaders::import_model(&mut self.scene, bytes, file_name);
        self.report_import(file_name, &result);
        result
    }

    fn report_import(&mut self, source: &str, result: &Result<NodeId, ImportError>) {
        self.status = Some(match result {
            Ok(group) => {
                let name = self.scene.node(*group).map(|n| n.name.as_str()).unwrap_or_default();
                format!("Imported {}", name)
            }
            Err(e) => {
                log::warn!("import of {} failed: {}", source, e);
                format!("Import failed: {}", e)
            }
        });
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        self.gizmo.set_mode(mode);
    }

    pub fn apply_field_edit(&mut self, field: TransformField, axis: Axis, value: f32) -> bool {
        self.engine.apply_ui_edit(field, axis, value, &mut self.scene)
    }

    /// Pointer pressed inside the viewport. A gizmo handle takes the press;
    /// otherwise the primary button picks and starts orbiting.
    pub fn pointer_down(&mut self, pos: Vec2, viewport: Vec2, button: PointerButton) {
        self.camera.resize(viewport.x, viewport.y);
        let ray = self.camera.ray_from_screen(pos, viewport);

        self.drag = match button {
            PointerButton::Primary => {
                if self.engine.capabilities().editing && self.gizmo.begin_drag(&ray, &self.scene, &self.camera) {
                    PointerDrag::Gizmo
                } else {
                    let hits = self.scene.hit_test(&ray);
                    self.engine.pick(&hits, &mut self.scene, &mut self.gizmo);
                    PointerDrag::Orbit
                }
            }
            PointerButton::Secondary => PointerDrag::Pan,
        };
        self.dispatch_gizmo_events();
    }

    pub fn pointer_drag(&mut self, pos: Vec2, delta: Vec2, viewport: Vec2) {
        match self.drag {
            PointerDrag::Idle => {}
            PointerDrag::Gizmo => {
                let ray = self.camera.ray_from_screen(pos, viewport);
                self.gizmo.drag(&ray, &mut self.scene);
                self.dispatch_gizmo_events();
            }
            PointerDrag::Orbit => self.navigator.rotate(delta, viewport.y),
            PointerDrag::Pan => self.navigator.pan(delta, &self.camera, viewport.y),
        }
    }

    pub fn pointer_up(&mut self) {
        if self.drag == PointerDrag::Gizmo {
            self.gizmo.end_drag();
            self.dispatch_gizmo_events();
        }
        self.drag = PointerDrag::Idle;
    }

    pub fn pointer_hover(&mut self, pos: Vec2, viewport: Vec2) {
        let ray = self.camera.ray_from_screen(pos, viewport);
        self.gizmo.hover(&ray, &self.scene, &self.camera);
    }

    pub fn scroll(&mut self, notches: f32) {
        self.navigator.zoom(notches);
    }

    /// Advances camera inertia by `dt` seconds. Returns whether the camera moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let moved = self.navigator.update(dt);
        self.navigator.apply_to(&mut self.camera);
        moved
    }

    /// Routes queued gizmo notifications to the selection engine.
    fn dispatch_gizmo_events(&mut self) {
        for event in self.gizmo.drain_events() {
            match event {
                GizmoEvent::DraggingChanged(dragging) => {
                    self.engine.on_gizmo_drag_state_change(dragging, &mut self.navigator)
                }
                GizmoEvent::ObjectChanged => self.engine.on_gizmo_change(&self.scene),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Manipulator, Navigator};
    use glam::Vec3;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn editor() -> Editor {
        Editor::new(&ViewerConfig::default(), EngineCapabilities::default())
    }

    fn screen_of(editor: &mut Editor, point: Vec3) -> Vec2 {
        editor.camera.resize(VIEWPORT.x, VIEWPORT.y);
        editor.camera.project(point, VIEWPORT).unwrap().truncate()
    }

    #[test]
    fn test_click_on_cube_selects_it() {
        let mut editor = editor();
        let pos = screen_of(&mut editor, Vec3::new(0.0, 0.6, 0.0));

        editor.pointer_down(pos, VIEWPORT, PointerButton::Primary);
        editor.pointer_up();

        let selected = editor.engine.selected().unwrap();
        assert_eq!(editor.engine.selected_name(), "Mesh");
        assert_eq!(editor.gizmo.attached(), Some(selected));
        assert_eq!(editor.engine.mirror().position, [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_click_on_sky_clears_selection() {
        let mut editor = editor();
        let cube = screen_of(&mut editor, Vec3::new(0.0, 0.6, 0.0));
        editor.pointer_down(cube, VIEWPORT, PointerButton::Primary);
        editor.pointer_up();

        editor.pointer_down(Vec2::new(5.0, 5.0), VIEWPORT, PointerButton::Primary);
        editor.pointer_up();

        assert_eq!(editor.engine.selected(), None);
        assert_eq!(editor.gizmo.attached(), None);
    }

    #[test]
    fn test_gizmo_drag_disables_orbit_until_release() {
        let mut editor = editor();
        let cube = screen_of(&mut editor, Vec3::new(0.0, 0.6, 0.0));
        editor.pointer_down(cube, VIEWPORT, PointerButton::Primary);
        editor.pointer_up();

        let pivot = Vec3::new(0.0, 0.5, 0.0);
        let length = editor.gizmo.handle_length(pivot, &editor.camera);
        let handle = screen_of(&mut editor, pivot + Vec3::Y * length * 0.6);
        editor.pointer_down(handle, VIEWPORT, PointerButton::Primary);
        assert!(editor.gizmo.is_dragging());
        assert!(!editor.navigator.is_enabled());

        let target = screen_of(&mut editor, pivot + Vec3::Y * (length * 0.6 + 1.0));
        editor.pointer_drag(target, target - handle, VIEWPORT);
        assert!(editor.engine.mirror().position[1] > 1.0);
        assert_eq!(
            editor.engine.mirror().position,
            editor.scene.node(editor.engine.selected().unwrap()).unwrap().transform.position.to_array()
        );

        editor.pointer_up();
        assert!(editor.navigator.is_enabled());
    }

    #[test]
    fn test_view_only_click_selects_nothing() {
        let mut editor = Editor::new(&ViewerConfig::default(), EngineCapabilities { editing: false });
        let pos = screen_of(&mut editor, Vec3::new(0.0, 0.6, 0.0));

        editor.pointer_down(pos, VIEWPORT, PointerButton::Primary);

        assert_eq!(editor.engine.selected(), None);
        assert_eq!(editor.gizmo.attached(), None);
    }

    #[test]
    fn test_failed_import_sets_status() {
        let mut editor = editor();
        assert!(editor.import_bytes(b"nope", "broken.glb").is_err());
        assert!(editor.status().unwrap().starts_with("Import failed"));
    }
}
