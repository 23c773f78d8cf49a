//! Error taxonomy of the configurator.
//!
//! None of these errors is fatal. Load failures are logged and surface as a
//! status message, missing parts degrade the matching feature, and a
//! degenerate render surface only skips hit testing for that frame.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfiguratorError {
    /// Fetching or decoding a model asset failed.
    #[error("failed to load model `{origin}`: {reason}")]
    LoadFailure { origin: String, reason: String },

    /// A configured part identifier has no matching node in the loaded graph.
    #[error("part `{part_id}` has no node named `{node_name}`")]
    PartNotFound { part_id: String, node_name: String },

    /// The render surface has zero (or non-finite) extent.
    #[error("render surface of size {width}x{height} cannot map pointer coordinates")]
    DegenerateSurface { width: f32, height: f32 },

    #[error("dimension `{axis}` must be a positive finite number, got {value}")]
    InvalidDimension { axis: String, value: f32 },

    #[error("`{0}` is not a #RRGGBB or #RGB colour")]
    InvalidColor(String),

    #[error("`{0}` is neither a .gltf nor a .glb file")]
    UnsupportedModelFormat(String),

    #[error("unknown {kind} `{name}`")]
    UnknownIdentifier { kind: &'static str, name: String },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The background runtime for model loading could not be started.
    #[error("cannot start the loader runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl ConfiguratorError {
    pub(crate) fn load_failure(origin: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::LoadFailure {
            origin: origin.into(),
            reason: format!("{:#}", err),
        }
    }
}
