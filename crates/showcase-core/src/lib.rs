pub mod asset;
pub mod buttons;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod debug_panel;
pub mod draco;
pub mod easing;
pub mod entity;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod orbit;
pub mod sampler;
pub mod scene;
pub mod task;
pub mod transition;
pub mod tween;
pub mod uniforms;

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

pub use asset::{decode_gltf, LoadedNode, LoadedScene, MeshData};
pub use buttons::{ButtonFx, ButtonStyle};
pub use camera::{Camera, Viewport};
pub use color::Rgb;
pub use config::*;
pub use debug_panel::{DebugPanel, ParamSpec, PANEL_PARAMS};
pub use draco::{DracoLayout, DracoPrimitive, DRACO_EXTENSION};
pub use easing::{CubicBezier, Ease};
pub use entity::{EntityId, LoadState, VisualEntity};
pub use error::*;
pub use graph::SceneGraph;
pub use interaction::{PointerOffset, TriggerBindings};
pub use orbit::OrbitControls;
pub use sampler::{MeshSurfaceSampler, PointCloud, PointInstance};
pub use scene::Scene;
pub use task::{CancellationToken, LoadTicket};
pub use uniforms::{ParticleUniforms, UniformField};
