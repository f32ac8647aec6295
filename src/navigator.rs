//! Orbit camera controller with damped inertia.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::traits::Navigator;

pub const DEFAULT_DAMPING: f32 = 0.05;

const MIN_POLAR: f32 = 1e-4;
const MIN_RADIUS: f32 = 0.5;
const MAX_RADIUS: f32 = 90.0;
const ZOOM_STEP: f32 = 0.95;
const SETTLE_EPSILON: f32 = 1e-5;

/// Orbits the camera around `target` on a sphere of `radius`.
///
/// Input accumulates into pending deltas; `update` feeds a fraction of them into
/// the orbit every frame so motion eases out after the pointer stops.
#[derive(Clone, Debug)]
pub struct OrbitNavigator {
    pub target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    damping: f32,
    enabled: bool,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_zoom: f32,
}

impl OrbitNavigator {
    pub fn new(camera: &Camera, damping: f32) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length().max(MIN_RADIUS);
        Self {
            target: camera.target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            damping: damping.clamp(0.0, 1.0),
            enabled: true,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_zoom: 1.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Current eye position.
    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    /// Pointer drag in pixels. A drag across the full viewport height turns a full circle.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if !self.enabled {
            return;
        }
        let height = viewport_height.max(1.0);
        self.pending_theta -= TAU * delta.x / height;
        self.pending_phi -= TAU * delta.y / height;
    }

    /// Pointer drag in pixels; the point under the cursor follows it.
    pub fn pan(&mut self, delta: Vec2, camera: &Camera, viewport_height: f32) {
        if !self.enabled {
            return;
        }
        let per_pixel = camera.pixel_size_at(self.radius, viewport_height);
        self.pending_pan += camera.right() * (-delta.x * per_pixel) + camera.up() * (delta.y * per_pixel);
    }

    /// Wheel notches, positive zooms in.
    pub fn zoom(&mut self, notches: f32) {
        if !self.enabled || !notches.is_finite() {
            return;
        }
        self.pending_zoom *= ZOOM_STEP.powf(notches);
    }

    /// Advances the orbit by `dt` seconds. Returns whether the eye moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let before = (self.target, self.radius, self.theta, self.phi);

        // Damping is tuned per 60 Hz frame.
        let factor = if self.damping >= 1.0 {
            1.0
        } else {
            1.0 - (1.0 - self.damping).powf((dt * 60.0).max(0.0))
        };

        self.theta = (self.theta + self.pending_theta * factor).rem_euclid(TAU);
        self.phi = (self.phi + self.pending_phi * factor).clamp(MIN_POLAR, PI - MIN_POLAR);
        self.target += self.pending_pan * factor;
        self.radius = (self.radius * self.pending_zoom).clamp(MIN_RADIUS, MAX_RADIUS);

        self.pending_theta *= 1.0 - factor;
        self.pending_phi *= 1.0 - factor;
        self.pending_pan *= 1.0 - factor;
        self.pending_zoom = 1.0;

        if self.pending_theta.abs() < SETTLE_EPSILON {
            self.pending_theta = 0.0;
        }
        if self.pending_phi.abs() < SETTLE_EPSILON {
            self.pending_phi = 0.0;
        }
        if self.pending_pan.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON {
            self.pending_pan = Vec3::ZERO;
        }

        before != (self.target, self.radius, self.theta, self.phi)
    }

    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = self.target;
    }
}

impl Navigator for OrbitNavigator {
    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::trace!("orbit navigation {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
