use crate::math::Color;
use crate::scene::{GeometryKind, LightKind, NodeKind, SceneGraph};
use crate::selection::SelectionEngine;

use super::default::DEFAULT_CUBE_COLOR;

pub const MAX_LIGHT_INTENSITY: f32 = 3.0;
pub const LIGHT_INTENSITY_STEP: f32 = 0.1;

/// Values behind the lighting controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingSettings {
    pub intensity: f32,
    pub light_color: Color,
    pub cube_color: Color,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            light_color: Color::WHITE,
            cube_color: Color::from_hex(DEFAULT_CUBE_COLOR),
        }
    }
}

/// Sets every directional light's intensity and color. Returns how many were updated.
pub fn apply_light_settings(scene: &mut SceneGraph, settings: &LightingSettings) -> usize {
    let intensity = settings.intensity.clamp(0.0, MAX_LIGHT_INTENSITY);
    let mut updated = 0;
    for (_, node) in scene.iter_mut() {
        if let NodeKind::Light(light) = &mut node.kind {
            if light.kind == LightKind::Directional {
                light.intensity = intensity;
                light.color = settings.light_color;
                updated += 1;
            }
        }
    }
    updated
}

/// Recolors every box mesh. A highlighted box keeps its highlight and the color
/// goes to the material it gets back on deselection.
pub fn apply_cube_color(scene: &mut SceneGraph, engine: &SelectionEngine, color: Color) -> usize {
    let targets: Vec<_> = scene
        .iter()
        .filter_map(|(id, node)| {
            let mesh = node.mesh()?;
            (mesh.geometry.kind == GeometryKind::Box)
                .then(|| engine.original_material(id).unwrap_or(mesh.material))
        })
        .collect();

    let mut updated = 0;
    for material in targets {
        if let Some(material) = scene.materials_mut().get_mut(material) {
            material.color = color;
            updated += 1;
        }
    }
    updated
}
