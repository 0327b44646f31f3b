//! Error types shared across the viewer crate.

use thiserror::Error;

use crate::types::{CanvasId, DataStoreId, SceneId, TilingMethod, VisualId};

/// Errors that can occur while building models, slicing data or painting.
#[derive(Error, Debug)]
pub enum NdviewError {
    /// A buffer or shape description is inconsistent.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A per-axis argument does not match the dimensionality it applies to.
    #[error("expected {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Slicing only supports 2 or 3 displayed dimensions.
    #[error("cannot slice with {0} displayed dimensions, expected 2 or 3")]
    DisplayedDims(usize),

    /// A non-displayed axis must be pinned to a single index when slicing an array.
    #[error("non-displayed axis {axis} is not pinned to a single index")]
    NonDisplayedRange { axis: usize },

    /// The store cannot serve the requested tiling method.
    #[error("unsupported tiling method: {method:?}")]
    UnsupportedTiling { method: TilingMethod },

    /// The store does not implement the requested operation.
    #[error("unsupported store operation: {0}")]
    UnsupportedStore(String),

    /// Painting requires a single-scale labels image.
    #[error("cannot paint into a labels image with {n_levels} resolution levels")]
    MultiscalePaint { n_levels: usize },

    /// An index selection falls outside the stored array.
    #[error("index {index} on axis {axis} is out of bounds for extent {extent}")]
    SelectionOutOfBounds {
        axis: usize,
        index: i64,
        extent: usize,
    },

    /// Multiscale levels must be ordered from finest to coarsest.
    #[error("resolution levels out of order: {0}")]
    ScaleOrder(String),

    /// No scene registered under the given id.
    #[error("scene not found: {0}")]
    SceneNotFound(SceneId),

    /// No visual registered under the given id.
    #[error("visual not found: {0}")]
    VisualNotFound(VisualId),

    /// No data store registered under the given id.
    #[error("data store not found: {0}")]
    StoreNotFound(DataStoreId),

    /// No canvas registered under the given id.
    #[error("canvas not found: {0}")]
    CanvasNotFound(CanvasId),

    /// Wavefront OBJ source could not be parsed.
    #[error("failed to parse OBJ data: {0}")]
    ObjParse(String),

    /// Model (de)serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// File IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl NdviewError {
    /// Create an InvalidShape error.
    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    /// Create an UnsupportedStore error.
    pub fn unsupported_store(msg: impl Into<String>) -> Self {
        Self::UnsupportedStore(msg.into())
    }

    /// Create a ScaleOrder error.
    pub fn scale_order(msg: impl Into<String>) -> Self {
        Self::ScaleOrder(msg.into())
    }

    /// Create an ObjParse error.
    pub fn obj_parse(msg: impl Into<String>) -> Self {
        Self::ObjParse(msg.into())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NdviewError>;
