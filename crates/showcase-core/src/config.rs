//! Structured configuration for the showcase.
//!
//! `ShowcaseConfig::default()` describes the five-model page. Every record is
//! plain data; `validate` is the only place configuration can be rejected.

use crate::color::Rgb;
use crate::constants::*;
use crate::easing::Ease;
use crate::error::ConfigError;
use fnv::FnvHashSet;

/// Immutable description of one visual entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityConfig {
    pub name: String,
    pub source: String,
    pub colour1: Rgb,
    pub colour2: Rgb,
    pub background: Rgb,
    pub auto_show: bool,
}

impl EntityConfig {
    /// Build from the textual form used in page setup (hex or CSS color names).
    pub fn new(
        name: &str,
        source: &str,
        colour1: &str,
        colour2: &str,
        background: &str,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            name: name.to_string(),
            source: source.to_string(),
            colour1: Rgb::parse(colour1)?,
            colour2: Rgb::parse(colour2)?,
            background: Rgb::parse(background)?,
            auto_show: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn auto_show(mut self, on: bool) -> Self {
        self.auto_show = on;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let src = self.source.trim().to_ascii_lowercase();
        if src.is_empty() || !(src.ends_with(".glb") || src.ends_with(".gltf")) {
            return Err(ConfigError::InvalidSource {
                name: self.name.clone(),
                source_path: self.source.clone(),
            });
        }
        Ok(())
    }
}

/// What happens when a transition starts while another one on the same
/// entity is still running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// The new transition kills the entity's in-flight transitions.
    #[default]
    Supersede,
    /// All transitions keep running; the newest write to a property wins.
    Overlap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionConfig {
    pub duration_sec: f32,
    pub show_delay_sec: f32,
    pub ease: Ease,
    pub policy: TransitionPolicy,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_sec: TRANSITION_DURATION_SEC,
            show_delay_sec: SHOW_DELAY_SEC,
            ease: Ease::smooth(),
            policy: TransitionPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    /// Scale from pointer offset (each axis in [-0.5, 0.5]) to camera X/Y.
    pub parallax: f32,
    /// Time constant of the pointer-follow smoothing.
    pub follow_duration_sec: f32,
    pub follow_ease: Ease,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            distance: CAMERA_Z,
            parallax: POINTER_PARALLAX,
            follow_duration_sec: CAMERA_FOLLOW_DURATION_SEC,
            follow_ease: Ease::Power1Out,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitConfig {
    pub enabled: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            damping_factor: ORBIT_DAMPING_FACTOR,
            rotate_speed: ORBIT_ROTATE_SPEED,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShowcaseConfig {
    pub entities: Vec<EntityConfig>,
    pub particle_count: usize,
    pub camera: CameraConfig,
    pub transition: TransitionConfig,
    pub orbit: OrbitConfig,
    pub initial_background: Rgb,
}

impl ShowcaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = FnvHashSet::default();
        for e in &self.entities {
            e.validate()?;
            if !seen.insert(e.name.as_str()) {
                return Err(ConfigError::DuplicateName(e.name.clone()));
            }
        }
        if self.particle_count == 0 {
            return Err(ConfigError::NonPositive("particle_count"));
        }
        if self.transition.duration_sec <= 0.0 {
            return Err(ConfigError::NonPositive("transition.duration_sec"));
        }
        if self.camera.follow_duration_sec <= 0.0 {
            return Err(ConfigError::NonPositive("camera.follow_duration_sec"));
        }
        Ok(())
    }
}

fn showcase_entity(name: &str) -> EntityConfig {
    let gradient = Rgb::from_hex_u32(DEFAULT_GRADIENT_HEX);
    EntityConfig {
        name: name.to_string(),
        source: format!("./models/{name}.glb"),
        colour1: gradient,
        colour2: gradient,
        background: Rgb::from_hex_u32(DEFAULT_BACKGROUND_HEX),
        auto_show: false,
    }
}

/// Entity names in button order.
pub const SHOWCASE_MODELS: [&str; 5] = ["bitcoin", "ethereum", "platonicman", "cubeman", "sphereman"];

impl Default for ShowcaseConfig {
    fn default() -> Self {
        let entities = SHOWCASE_MODELS
            .iter()
            .enumerate()
            .map(|(i, name)| showcase_entity(name).auto_show(i == 0))
            .collect();
        Self {
            entities,
            particle_count: PARTICLE_COUNT,
            camera: CameraConfig::default(),
            transition: TransitionConfig::default(),
            orbit: OrbitConfig::default(),
            initial_background: Rgb::BLACK,
        }
    }
}
