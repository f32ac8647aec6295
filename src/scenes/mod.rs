mod common;
mod default;
mod lighting;

pub use default::{create_default_scene, DEFAULT_CUBE_COLOR, GROUND_COLOR, POINT_LIGHT_COLOR, PYRAMID_COLOR, SPHERE_COLOR};
pub use lighting::{apply_cube_color, apply_light_settings, LightingSettings, LIGHT_INTENSITY_STEP, MAX_LIGHT_INTENSITY};
