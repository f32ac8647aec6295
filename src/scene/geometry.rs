use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::math::AABB;

/// Shape family a geometry was built from. Lighting controls key off `Box`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Box,
    Plane,
    Cone,
    Sphere,
    Imported,
}

/// Indexed triangle list in local space.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    bounds: AABB,
}

impl Geometry {
    pub fn new(kind: GeometryKind, positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = AABB::from_points(positions.iter().copied());
        Self {
            kind,
            positions,
            indices,
            bounds,
        }
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned box centered on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            4, 5, 6, 4, 6, 7, // +z
            1, 0, 3, 1, 3, 2, // -z
            5, 1, 2, 5, 2, 6, // +x
            0, 4, 7, 0, 7, 3, // -x
            7, 6, 2, 7, 2, 3, // +y
            0, 1, 5, 0, 5, 4, // -y
        ];
        Self::new(GeometryKind::Box, positions, indices)
    }

    /// Rectangle in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (w, h) = (width * 0.5, height * 0.5);
        let positions = vec![
            Vec3::new(-w, -h, 0.0),
            Vec3::new(w, -h, 0.0),
            Vec3::new(w, h, 0.0),
            Vec3::new(-w, h, 0.0),
        ];
        Self::new(GeometryKind::Plane, positions, vec![0, 1, 2, 0, 2, 3])
    }

    /// Cone standing on the XZ plane, centered on the origin, apex up.
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half = height * 0.5;
        let mut positions = vec![Vec3::new(0.0, half, 0.0), Vec3::new(0.0, -half, 0.0)];
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * TAU;
            positions.push(Vec3::new(radius * theta.sin(), -half, radius * theta.cos()));
        }

        let mut indices = Vec::with_capacity(segments as usize * 6);
        for i in 0..segments {
            let a = 2 + i;
            let b = 2 + (i + 1) % segments;
            indices.extend_from_slice(&[0, a, b]);
            indices.extend_from_slice(&[1, b, a]);
        }
        Self::new(GeometryKind::Cone, positions, indices)
    }

    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut positions = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        for y in 0..=hs {
            let v = y as f32 / hs as f32;
            let phi = v * PI;
            for x in 0..=ws {
                let u = x as f32 / ws as f32;
                let theta = u * TAU;
                positions.push(Vec3::new(
                    -radius * theta.cos() * phi.sin(),
                    radius * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                ));
            }
        }

        let row = ws + 1;
        let mut indices = Vec::new();
        for y in 0..hs {
            for x in 0..ws {
                let a = y * row + x + 1;
                let b = y * row + x;
                let c = (y + 1) * row + x;
                let d = (y + 1) * row + x + 1;
                if y != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if y != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        Self::new(GeometryKind::Sphere, positions, indices)
    }
}
