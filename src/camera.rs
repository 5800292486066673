use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::math::Ray;

/// Largest polar angle the orbit may reach; views must stay above the horizon
pub const POLAR_LIMIT: f32 = FRAC_PI_2 - 1e-3;

const MIN_POLAR: f32 = 1e-4;
const ZOOM_STEP: f32 = 0.95;
const SETTLE_EPSILON: f32 = 1e-5;

/// Initial camera placement and orbit limits for a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub target: Vec3,
    pub max_polar_angle: f32,
    /// 0.0 disables damping
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov_deg: f32, target: Vec3) -> Self {
        Self {
            position,
            fov_deg,
            target,
            max_polar_angle: POLAR_LIMIT,
            damping_factor: 0.0,
            min_distance: 1.0,
            max_distance: 80.0,
        }
    }

    /// Polar clamp, capped strictly below π/2
    pub fn with_max_polar_angle(mut self, angle: f32) -> Self {
        self.max_polar_angle = angle.clamp(MIN_POLAR, POLAR_LIMIT);
        self
    }

    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }
}

/// Resolved viewpoint used by a single render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_deg: f32,
}

impl CameraView {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            up: Vec3::Y,
            fov_deg: camera.fov_deg,
        }
    }

    /// (forward, right, up), orthonormal
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Ray through the centre of pixel (`x`, `y`) of a `width` x `height` buffer
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let (forward, right, up) = self.basis();
        let half_height = (self.fov_deg.to_radians() * 0.5).tan();
        let aspect = width as f32 / height as f32;

        let ndc_x = 2.0 * (x as f32 + 0.5) / width as f32 - 1.0;
        let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;

        let dir = forward + right * (ndc_x * aspect * half_height) + up * (ndc_y * half_height);
        Ray::new(self.eye, dir)
    }
}

/// Orbit camera around a fixed target, with optional damping
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    /// Azimuth about +Y, measured from +Z
    theta: f32,
    /// Polar angle from +Y
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    damping_factor: f32,
    max_polar: f32,
    min_distance: f32,
    max_distance: f32,
    fov_deg: f32,
}

impl OrbitControls {
    pub fn new(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length().max(f32::EPSILON);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let max_polar = camera.max_polar_angle.min(POLAR_LIMIT);

        Self {
            target: camera.target,
            radius: radius.clamp(camera.min_distance, camera.max_distance),
            theta,
            phi: phi.clamp(MIN_POLAR, max_polar),
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            damping_factor: camera.damping_factor,
            max_polar,
            min_distance: camera.min_distance,
            max_distance: camera.max_distance,
            fov_deg: camera.fov_deg,
        }
    }

    /// Queue a drag of (`dx`, `dy`) pixels on a viewport `viewport_height` pixels tall
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.pending_theta -= 2.0 * PI * dx / height;
        self.pending_phi -= 2.0 * PI * dy / height;
    }

    /// Positive steps move closer to the target
    pub fn zoom(&mut self, steps: f32) {
        self.pending_scale *= ZOOM_STEP.powf(steps);
    }

    /// Apply queued input. Returns whether the eye moved.
    pub fn update(&mut self) -> bool {
        let before = self.eye();

        if self.damping_factor > 0.0 {
            self.theta += self.pending_theta * self.damping_factor;
            self.phi += self.pending_phi * self.damping_factor;
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.theta += self.pending_theta;
            self.phi += self.pending_phi;
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }

        if self.pending_theta.abs() < SETTLE_EPSILON {
            self.pending_theta = 0.0;
        }
        if self.pending_phi.abs() < SETTLE_EPSILON {
            self.pending_phi = 0.0;
        }

        if self.theta.abs() > PI {
            self.theta = (self.theta + PI).rem_euclid(2.0 * PI) - PI;
        }
        self.phi = self.phi.clamp(MIN_POLAR, self.max_polar);
        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        (self.eye() - before).length_squared() > 1e-12
    }

    /// Whether damped motion is still pending
    pub fn is_settling(&self) -> bool {
        self.pending_theta != 0.0 || self.pending_phi != 0.0 || self.pending_scale != 1.0
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            fov_deg: self.fov_deg,
        }
    }
}
