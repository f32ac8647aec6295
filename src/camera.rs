use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::math::Ray;

pub const DEFAULT_FOV_DEG: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;
pub const DEFAULT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);

/// Perspective camera looking at `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION)
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            fov_y_deg: DEFAULT_FOV_DEG,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: 1.0,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Zero-sized viewports keep the previous aspect.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Projects a world point into viewport pixels (origin top-left).
    /// `z` of the result is the view-space distance along the camera's forward
    /// axis. Points on or behind the near plane give `None`.
    pub fn project(&self, point: Vec3, viewport: Vec2) -> Option<Vec3> {
        let clip = self.view_proj() * point.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec3::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
            clip.w,
        ))
    }

    /// Ray from the eye through `pos`, given in viewport pixels.
    pub fn ray_from_screen(&self, pos: Vec2, viewport: Vec2) -> Ray {
        let ndc = Vec2::new(
            pos.x / viewport.x.max(1.0) * 2.0 - 1.0,
            1.0 - pos.y / viewport.y.max(1.0) * 2.0,
        );
        let inverse = self.view_proj().inverse();
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position, far - self.position)
    }

    /// World size of one pixel at `distance` in front of the camera.
    pub fn pixel_size_at(&self, distance: f32, viewport_height: f32) -> f32 {
        2.0 * distance * (self.fov_y_deg.to_radians() * 0.5).tan() / viewport_height.max(1.0)
    }
}
