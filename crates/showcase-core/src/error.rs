//! Error types for configuration, asset loading and entity lifecycle.
//!
//! Every failure here is scoped to a single entity (or to start-up config);
//! callers log and carry on rather than tearing the page down.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("entity name must not be empty")]
    EmptyName,
    #[error("duplicate entity name `{0}`")]
    DuplicateName(String),
    #[error("entity `{name}` has an unusable asset source `{source_path}`")]
    InvalidSource { name: String, source_path: String },
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}

/// Fetching or decoding an asset failed. The entity stays unloaded and may be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetLoadError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("primitive uses unsupported compression extension `{0}`")]
    UnsupportedCompression(String),
}

impl AssetLoadError {
    /// Whether fetching again can succeed. The same bytes always decode the same way.
    pub fn is_transient(&self) -> bool {
        matches!(self, AssetLoadError::Fetch(_))
    }
}

/// The decoded asset has no usable top-level mesh. Fatal to that entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSceneGraphError {
    #[error("asset contains no scene")]
    NoScene,
    #[error("scene has no top-level node")]
    NoTopLevelNode,
    #[error("first top-level node `{0}` carries no mesh")]
    NodeHasNoMesh(String),
    #[error("mesh has no triangle geometry")]
    EmptyGeometry,
    #[error("mesh surface area is zero")]
    ZeroSurfaceArea,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("entity is not loaded")]
    NotLoaded,
    #[error("load completion is stale or was cancelled")]
    StaleLoad,
    #[error("entity has been disposed")]
    Disposed,
    #[error("entity cannot be retried after a fatal scene graph error")]
    NotRetryable,
    #[error(transparent)]
    AssetLoad(#[from] AssetLoadError),
    #[error(transparent)]
    InvalidSceneGraph(#[from] InvalidSceneGraphError),
}
