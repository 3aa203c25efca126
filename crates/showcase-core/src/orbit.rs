//! Damped orbit controls around the camera target. Disabled by default; the
//! frame loop still calls `update` every frame so damping settles smoothly
//! after the controls are switched off.

use crate::camera::Camera;
use crate::config::OrbitConfig;
use std::f32::consts::PI;

const PHI_EPS: f32 = 1e-4;

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    damping_factor: f32,
    rotate_speed: f32,
    delta_theta: f32,
    delta_phi: f32,
}

impl OrbitControls {
    pub fn new(cfg: &OrbitConfig) -> Self {
        Self {
            enabled: cfg.enabled,
            damping_factor: cfg.damping_factor.clamp(0.0, 1.0),
            rotate_speed: cfg.rotate_speed,
            delta_theta: 0.0,
            delta_phi: 0.0,
        }
    }

    /// Queue a rotation (radians around the vertical axis / from the pole).
    pub fn rotate(&mut self, d_theta: f32, d_phi: f32) {
        if !self.enabled {
            return;
        }
        self.delta_theta += d_theta * self.rotate_speed;
        self.delta_phi += d_phi * self.rotate_speed;
    }

    /// Apply the damped share of the pending rotation to the camera.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if self.delta_theta.abs() < 1e-6 && self.delta_phi.abs() < 1e-6 {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            return false;
        }
        let offset = camera.eye - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        theta += self.delta_theta * self.damping_factor;
        phi = (phi + self.delta_phi * self.damping_factor).clamp(PHI_EPS, PI - PHI_EPS);

        let sin_phi = phi.sin();
        camera.eye = camera.target
            + glam::Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );

        self.delta_theta *= 1.0 - self.damping_factor;
        self.delta_phi *= 1.0 - self.damping_factor;
        true
    }
}
