use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::math::Color;
use crate::scene::{Geometry, Light, LightKind, SceneGraph, Transform};

use super::common::{add_shape, at};

pub const DEFAULT_CUBE_COLOR: u32 = 0x44aa88;
pub const PYRAMID_COLOR: u32 = 0xff8844;
pub const SPHERE_COLOR: u32 = 0x4488ff;
pub const GROUND_COLOR: u32 = 0xa0522d;
pub const POINT_LIGHT_COLOR: u32 = 0xff0000;

/// Ground, cube, pyramid and sphere lit by an ambient, a directional and a red
/// point light. Objects are left unnamed.
pub fn create_default_scene(config: &ViewerConfig) -> SceneGraph {
    let mut scene = SceneGraph::new();
    let root = scene.root();

    scene.add_light(
        root,
        "",
        Transform::IDENTITY,
        Light {
            kind: LightKind::Ambient,
            color: Color::WHITE,
            intensity: 0.3,
        },
    );
    scene.add_light(
        root,
        "",
        at(5.0, 5.0, 5.0),
        Light {
            kind: LightKind::Directional,
            color: config.light_color,
            intensity: config.light_intensity,
        },
    );
    scene.add_light(
        root,
        "",
        Transform::IDENTITY,
        Light {
            kind: LightKind::Point { range: 10.0 },
            color: Color::from_hex(POINT_LIGHT_COLOR),
            intensity: 1.0,
        },
    );

    add_shape(
        &mut scene,
        Geometry::plane(10.0, 10.0),
        Color::from_hex(GROUND_COLOR),
        Transform::IDENTITY.with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
    );
    add_shape(&mut scene, Geometry::cuboid(1.0, 1.0, 1.0), config.cube_color, at(0.0, 0.5, 0.0));
    add_shape(
        &mut scene,
        Geometry::cone(0.7, 1.5, 4),
        Color::from_hex(PYRAMID_COLOR),
        at(2.0, 0.75, 0.0),
    );
    add_shape(
        &mut scene,
        Geometry::uv_sphere(0.5, 32, 32),
        Color::from_hex(SPHERE_COLOR),
        at(-2.0, 0.5, 0.0),
    );

    log::info!(
        "default scene ready: {} nodes, {} materials",
        scene.iter().count(),
        scene.materials().len()
    );
    scene
}
