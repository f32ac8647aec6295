//! egui panels: lighting, import and the selected object's transform fields.

use std::path::PathBuf;

use egui::{DragValue, RichText, Ui};

use crate::gizmo::GizmoMode;
use crate::loaders::SUPPORTED_EXTENSIONS;
use crate::math::Color;
use crate::scenes::{LightingSettings, LIGHT_INTENSITY_STEP, MAX_LIGHT_INTENSITY};
use crate::selection::{Axis, SelectionEngine, TransformField, TransformMirror};

pub const IMPORT_HINT: &str = "Drag & drop .glb or .gltf files into the viewport";
pub const LOAD_MODEL_LABEL: &str = "Load model…";

/// One changed transform field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldEdit {
    pub field: TransformField,
    pub axis: Axis,
    pub value: f32,
}

impl TransformField {
    pub fn label(self) -> &'static str {
        match self {
            TransformField::Position => "Position",
            TransformField::Rotation => "Rotation (deg)",
            TransformField::Scale => "Scale",
        }
    }

    /// Drag step of the matching UI field.
    pub fn step(self) -> f64 {
        match self {
            TransformField::Position => 0.1,
            TransformField::Rotation => 1.0,
            TransformField::Scale => 0.1,
        }
    }
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Light intensity slider, light color and cube color pickers.
pub fn lighting_panel(ui: &mut Ui, settings: &mut LightingSettings) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label("Light Intensity:");
        changed |= ui
            .add(
                egui::Slider::new(&mut settings.intensity, 0.0..=MAX_LIGHT_INTENSITY)
                    .step_by(LIGHT_INTENSITY_STEP as f64),
            )
            .changed();
        ui.separator();
        ui.label("Light Color:");
        changed |= color_button(ui, &mut settings.light_color);
        ui.separator();
        ui.label("Cube Color:");
        changed |= color_button(ui, &mut settings.cube_color);
    });
    changed
}

fn color_button(ui: &mut Ui, color: &mut Color) -> bool {
    let mut rgb = color.to_array();
    let changed = ui.color_edit_button_rgb(&mut rgb).changed();
    if changed {
        *color = Color::from_array(rgb);
    }
    changed
}

/// Hint text, the Load button and the last import status.
pub fn import_panel(ui: &mut Ui, status: Option<&str>) -> egui::Response {
    ui.horizontal(|ui| {
        ui.label(RichText::new(IMPORT_HINT).weak());
        ui.separator();
        let load = ui.button(LOAD_MODEL_LABEL);
        if let Some(status) = status {
            ui.label(status);
        }
        load
    })
    .inner
}

/// Native file picker limited to glTF files. Blocks until the dialog closes.
pub fn pick_model_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Import glTF model")
        .add_filter("glTF", &SUPPORTED_EXTENSIONS)
        .pick_file()
}

pub fn gizmo_mode_panel(ui: &mut Ui, mode: GizmoMode) -> Option<GizmoMode> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for candidate in GizmoMode::ALL {
            let shortcut = &candidate.label()[..1];
            if ui
                .selectable_label(mode == candidate, format!("{} ({})", candidate.label(), shortcut))
                .clicked()
            {
                picked = Some(candidate);
            }
        }
    });
    picked
}

/// "Selected: <name>" and the three transform rows. Without a selection the
/// rows keep their last values and are disabled.
pub fn selection_panel(ui: &mut Ui, engine: &SelectionEngine) -> Vec<FieldEdit> {
    let mut edits = Vec::new();
    let has_selection = engine.selected().is_some();

    ui.heading(format!("Selected: {}", engine.selected_name()));
    let mirror = engine.mirror();
    ui.add_enabled_ui(has_selection, |ui| {
        for field in [TransformField::Position, TransformField::Rotation, TransformField::Scale] {
            ui.label(field.label());
            ui.horizontal(|ui| {
                for axis in Axis::ALL {
                    if let Some(edit) = field_editor(ui, mirror, field, axis) {
                        edits.push(edit);
                    }
                }
            });
        }
    });
    edits
}

fn field_editor(ui: &mut Ui, mirror: &TransformMirror, field: TransformField, axis: Axis) -> Option<FieldEdit> {
    let mut value = mirror.get(field, axis);
    ui.label(axis.label());
    let response = ui.add(DragValue::new(&mut value).speed(field.step()));
    response.changed().then_some(FieldEdit { field, axis, value })
}
