//! Cameras: a Z-up orbit camera for the 3D scene and a fixed orthographic
//! projection for the 2D overlay.

use glam::{Mat3, Mat4, Vec2, Vec3};

/// Turntable camera orbiting a center point, Z up.
///
/// Dragging yaws around the world Z axis and pitches toward the poles;
/// scrolling dollies the eye toward or away from the center by a constant
/// factor per step.
pub struct OrbitCamera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    speed: Vec2,
    fov_y_degrees: f32,
    near: f32,
    far: f32,
}

const DOLLY_FACTOR: f32 = 0.85;
const PITCH_MARGIN: f32 = 1e-3;

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            eye: Vec3::new(10.0, 0.0, 0.0),
            center: Vec3::ZERO,
            up: Vec3::Z,
            speed: Vec2::new(-0.01, 0.01),
            fov_y_degrees: 60.0,
            near: 0.01,
            far: 200.0,
        }
    }

    pub fn set_pose(&mut self, eye: Vec3) -> &mut Self {
        self.eye = eye;
        self
    }

    pub fn set_center(&mut self, center: Vec3) -> &mut Self {
        self.center = center;
        self
    }

    pub fn set_speed(&mut self, speed: Vec2) -> &mut Self {
        self.speed = speed;
        self
    }

    /// Orbits by a cursor delta in pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        let step = delta * self.speed;
        let offset = self.eye - self.center;
        let radius = offset.length();
        if radius < f32::EPSILON {
            return;
        }

        let mut theta = offset.y.atan2(offset.x);
        let mut phi = (offset.z / radius).acos();
        theta += step.x;
        phi = (phi + step.y).clamp(PITCH_MARGIN, std::f32::consts::PI - PITCH_MARGIN);

        self.eye = self.center
            + radius
                * Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                );
    }

    /// Moves the eye toward the center (positive scroll) or away from it by
    /// a fixed multiplicative factor.
    pub fn dolly(&mut self, amount: f32) {
        if amount == 0.0 {
            return;
        }
        let factor = if amount > 0.0 {
            DOLLY_FACTOR
        } else {
            1.0 / DOLLY_FACTOR
        };
        self.eye = self.center + (self.eye - self.center) * factor;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed 10x10 orthographic projection for colorbars and other overlay
/// geometry; the 2D scene has no interactive camera.
pub fn projection_2d() -> Mat3 {
    Mat3::from_scale(Vec2::splat(2.0 / 10.0))
}
