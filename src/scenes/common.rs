use std::sync::Arc;

use glam::Vec3;

use crate::math::Color;
use crate::scene::{Geometry, Material, NodeId, SceneGraph, Transform};

/// Adds an unnamed top-level mesh with its own standard material.
pub fn add_shape(scene: &mut SceneGraph, geometry: Geometry, color: Color, transform: Transform) -> NodeId {
    let material = scene.materials_mut().insert(Material::standard(color));
    scene.add_mesh(scene.root(), "", transform, Arc::new(geometry), material)
}

pub fn at(x: f32, y: f32, z: f32) -> Transform {
    Transform::from_position(Vec3::new(x, y, z))
}
