use glam::{Mat4, Vec3};

use crate::math::Ray;

/// Möller-Trumbore ray-triangle intersection, double sided. Returns the
/// distance along `ray_dir` to the hit.
pub fn moller_trumbore_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection behind origin
    if t < EPSILON {
        return None;
    }

    Some(t)
}

/// Nearest hit distance of `ray` against an indexed triangle list placed in
/// the world by `world`. Distances are measured in world units.
pub fn nearest_triangle_hit(
    ray: &Ray,
    positions: &[Vec3],
    indices: &[u32],
    world: &Mat4,
) -> Option<f32> {
    let mut closest: Option<f32> = None;

    for tri in indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (
            positions.get(tri[0] as usize),
            positions.get(tri[1] as usize),
            positions.get(tri[2] as usize),
        ) else {
            continue;
        };
        let v0 = world.transform_point3(*a);
        let v1 = world.transform_point3(*b);
        let v2 = world.transform_point3(*c);

        if let Some(t) = moller_trumbore_intersect(ray.origin, ray.direction, v0, v1, v2) {
            if closest.map_or(true, |c| t < c) {
                closest = Some(t);
            }
        }
    }

    closest
}
