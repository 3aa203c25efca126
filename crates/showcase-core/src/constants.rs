use std::f32::consts::{FRAC_PI_2, TAU};

// Shared visual and timing tuning constants used by the core and the web frontend.

// Particles
pub const PARTICLE_COUNT: usize = 20_000;
pub const INITIAL_ROTATION_X: f32 = FRAC_PI_2; // clouds are laid on their back
pub const FULL_TURN: f32 = TAU;

// Default shader uniforms
pub const DEFAULT_ALPHA: f32 = 1.0;
pub const DEFAULT_AMPLITUDE: f32 = 8.0;
pub const DEFAULT_FREQUENCY: f32 = 5.0;
pub const DEFAULT_TIME_FREQUENCY: f32 = 5.0;
pub const DEFAULT_RANDOM_FREQUENCY: f32 = 0.01;

// Transitions (seconds)
pub const TRANSITION_DURATION_SEC: f32 = 1.29; // 89 frames at 69 fps
pub const SHOW_DELAY_SEC: f32 = 0.3;
pub const SMOOTH_EASE_BEZIER: [f32; 4] = [0.33, 0.0, 0.0, 1.0];

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_Z: f32 = 3.0;
pub const POINTER_PARALLAX: f32 = TAU; // pointer offset in [-0.5, 0.5] maps to about ±π
pub const CAMERA_FOLLOW_DURATION_SEC: f32 = 0.5;

// Orbit controls
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;

// Render surface
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Buttons
pub const BUTTON_INTRO_OFFSET_PX: f32 = 89.0;
pub const BUTTON_INTRO_DELAY_SEC: f32 = 0.5;
pub const BUTTON_INTRO_STAGGER_SEC: f32 = 0.13;
pub const BUTTON_HOVER_DURATION_SEC: f32 = 0.8;
pub const BUTTON_HOVER_OPACITY: f32 = 0.3;
pub const BUTTON_HOVER_SCALE: f32 = 0.9;

// Debug panel
pub const PANEL_TITLE: &str = "Debug Panel";
pub const PANEL_WIDTH_PX: u32 = 377;

// Page palette
pub const DEFAULT_GRADIENT_HEX: u32 = 0xF3654F;
pub const DEFAULT_BACKGROUND_HEX: u32 = 0x0D1B2C;
