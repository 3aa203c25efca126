//! Page wiring constants. Tuning values live in the core crate; these name
//! the DOM surface the front-end binds to.

// Render surface
pub const CANVAS_SELECTOR: &str = ".webgl";

// Trigger buttons, bound to entities in document order
pub const BUTTON_SELECTOR: &str = ".button";

// Debug panel container, created on demand under <body>
pub const PANEL_ROOT_ID: &str = "debug-panel";

// Extra fetch attempts after a network failure; decode failures are final
pub const LOAD_RETRY_LIMIT: u32 = 2;

// Seed for point sampling; stable across reloads so a model always looks the same
pub const SAMPLING_SEED: u64 = 0x5eed_2024;

// Largest frame delta fed to the scene (tab switches, debugger pauses)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
