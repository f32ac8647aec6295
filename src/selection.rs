//! Selection & transform sync.
//!
//! Owns the picked object, the numeric transform fields shown in the UI and the
//! highlight material overrides. Every trigger updates in one direction only:
//!
//! * a pick writes the fields from the object,
//! * a gizmo change writes the fields from the object,
//! * a field edit writes the object from the fields.
//!
//! Field edits go straight to the scene and never through the gizmo, so an edit
//! cannot come back as a gizmo change and overwrite what was typed.

use std::collections::BTreeMap;

use crate::math::{deg_to_rad3, rad_to_deg3, Color};
use crate::scene::{Hit, MaterialId, NodeId, Transform};
use crate::traits::{top_level_ancestor, Manipulator, Navigator, SceneHost};

pub const HIGHLIGHT_COLOR: u32 = 0xffff00;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformField {
    Position,
    Rotation,
    Scale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Values shown in the transform fields. Rotation is in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformMirror {
    pub position: [f32; 3],
    pub rotation_deg: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for TransformMirror {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformMirror {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.position.to_array(),
            rotation_deg: rad_to_deg3(transform.rotation.to_array()),
            scale: transform.scale.to_array(),
        }
    }

    pub fn to_transform(&self) -> Transform {
        Transform {
            position: self.position.into(),
            rotation: deg_to_rad3(self.rotation_deg).into(),
            scale: self.scale.into(),
        }
    }

    pub fn field(&self, field: TransformField) -> [f32; 3] {
        match field {
            TransformField::Position => self.position,
            TransformField::Rotation => self.rotation_deg,
            TransformField::Scale => self.scale,
        }
    }

    pub fn get(&self, field: TransformField, axis: Axis) -> f32 {
        self.field(field)[axis.index()]
    }

    pub fn set(&mut self, field: TransformField, axis: Axis, value: f32) {
        let slot = match field {
            TransformField::Position => &mut self.position,
            TransformField::Rotation => &mut self.rotation_deg,
            TransformField::Scale => &mut self.scale,
        };
        slot[axis.index()] = value;
    }
}

/// What the engine is allowed to do. A display-only viewer turns `editing` off
/// and every pick or edit becomes a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub editing: bool,
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self { editing: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HighlightOverride {
    original: MaterialId,
    highlight: MaterialId,
}

pub struct SelectionEngine {
    capabilities: EngineCapabilities,
    highlight_color: Color,
    selected: Option<NodeId>,
    selected_name: String,
    mirror: TransformMirror,
    overrides: BTreeMap<NodeId, HighlightOverride>,
}

impl SelectionEngine {
    pub fn new(capabilities: EngineCapabilities) -> Self {
        Self {
            capabilities,
            highlight_color: Color::from_hex(HIGHLIGHT_COLOR),
            selected: None,
            selected_name: String::new(),
            mirror: TransformMirror::default(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_highlight_color(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }

    pub fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Name label for the UI, empty when nothing is selected.
    pub fn selected_name(&self) -> &str {
        &self.selected_name
    }

    pub fn mirror(&self) -> &TransformMirror {
        &self.mirror
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Material `mesh` will get back when the highlight is cleared.
    pub fn original_material(&self, mesh: NodeId) -> Option<MaterialId> {
        self.overrides.get(&mesh).map(|o| o.original)
    }

    /// Applies the result of a hit-test, nearest hit first.
    pub fn pick<H, M>(&mut self, hits: &[Hit], scene: &mut H, gizmo: &mut M)
    where
        H: SceneHost + ?Sized,
        M: Manipulator + ?Sized,
    {
        if !self.capabilities.editing {
            return;
        }

        let picked = hits.first().map(|hit| top_level_ancestor(&*scene, hit.node));
        let Some((object, transform)) = picked.and_then(|node| Some((node, scene.transform(node)?))) else {
            self.clear(scene, gizmo);
            return;
        };

        self.selected = Some(object);
        self.selected_name = match scene.name(object) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => scene.kind_label(object).to_string(),
        };
        gizmo.attach(object);
        self.mirror = TransformMirror::from_transform(&transform);
        self.highlight(object, scene);

        log::debug!(
            "selected {:?} `{}` ({} meshes highlighted)",
            object,
            self.selected_name,
            self.overrides.len()
        );
    }

    /// Drops the selection: empty name, gizmo detached, highlight restored.
    /// The transform fields keep their values.
    pub fn clear<H, M>(&mut self, scene: &mut H, gizmo: &mut M)
    where
        H: SceneHost + ?Sized,
        M: Manipulator + ?Sized,
    {
        if let Some(previous) = self.selected.take() {
            log::debug!("cleared selection {:?}", previous);
        }
        self.selected_name.clear();
        gizmo.detach();
        self.restore_highlight(scene);
    }

    /// The gizmo moved the selected object; refresh the fields from it.
    pub fn on_gizmo_change<H>(&mut self, scene: &H)
    where
        H: SceneHost + ?Sized,
    {
        let Some(transform) = self.selected.and_then(|node| scene.transform(node)) else {
            return;
        };
        self.mirror = TransformMirror::from_transform(&transform);
    }

    /// The navigator is off for exactly as long as a gizmo drag lasts.
    pub fn on_gizmo_drag_state_change<N>(&mut self, dragging: bool, navigator: &mut N)
    where
        N: Navigator + ?Sized,
    {
        navigator.set_enabled(!dragging);
    }

    /// Stores one edited field and writes the whole mirror onto the selected
    /// object. Returns whether an object was updated. Without a selection the
    /// value is kept but applied to nothing; non-finite input is ignored.
    pub fn apply_ui_edit<H>(&mut self, field: TransformField, axis: Axis, value: f32, scene: &mut H) -> bool
    where
        H: SceneHost + ?Sized,
    {
        if !value.is_finite() {
            return false;
        }
        self.mirror.set(field, axis, value);

        match self.selected {
            Some(node) => scene.set_transform(node, self.mirror.to_transform()),
            None => false,
        }
    }

    /// Puts every overridden mesh back on its original material and frees the
    /// highlight copies. Calling it again with nothing recorded does nothing.
    pub fn restore_highlight<H>(&mut self, scene: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        for (mesh, entry) in std::mem::take(&mut self.overrides) {
            scene.set_material(mesh, entry.original);
            scene.release_material(entry.highlight);
        }
    }

    fn highlight<H>(&mut self, object: NodeId, scene: &mut H)
    where
        H: SceneHost + ?Sized,
    {
        self.restore_highlight(scene);

        for mesh in scene.mesh_nodes(object) {
            let Some(original) = scene.material(mesh) else {
                continue;
            };
            let Some(highlight) = scene.clone_material_with_color(original, self.highlight_color) else {
                continue;
            };
            scene.set_material(mesh, highlight);
            self.overrides.insert(mesh, HighlightOverride { original, highlight });
        }
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(EngineCapabilities::default())
    }
}
