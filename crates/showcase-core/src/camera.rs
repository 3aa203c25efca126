//! Camera description, pointer-follow smoothing and render surface sizing.

use crate::config::CameraConfig;
use crate::constants::MAX_PIXEL_RATIO;
use crate::interaction::PointerOffset;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn from_config(cfg: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, cfg.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: cfg.fov_deg.to_radians(),
            znear: cfg.near,
            zfar: cfg.far,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Ease the eye's X/Y toward the pointer-derived target.
    ///
    /// Equivalent to restarting a `follow_duration_sec` tween toward the
    /// latest target every frame: each frame covers the eased fraction of the
    /// remaining distance that one frame of such a tween would.
    pub fn follow_pointer(&mut self, pointer: PointerOffset, cfg: &CameraConfig, dt: f32) {
        let goal_x = pointer.x * cfg.parallax;
        let goal_y = pointer.y * cfg.parallax;
        let t = if cfg.follow_duration_sec > 0.0 {
            (dt.max(0.0) / cfg.follow_duration_sec).min(1.0)
        } else {
            1.0
        };
        let k = cfg.follow_ease.apply(t);
        self.eye.x += (goal_x - self.eye.x) * k;
        self.eye.y += (goal_y - self.eye.y) * k;
    }
}

/// CSS size of the render surface plus the backing-store pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            pixel_ratio: dpr.min(MAX_PIXEL_RATIO),
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.css_height > 0.0 {
            (self.css_width / self.css_height) as f32
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels, never zero.
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.css_width * self.pixel_ratio).round() as u32;
        let h = (self.css_height * self.pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}
