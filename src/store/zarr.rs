//! Multiscale Zarr-backed image store.
//!
//! Holds the level layout of an OME-Zarr style pyramid and exposes it
//! as chunked arrays for level selection and visibility queries. Chunk
//! IO is not wired up yet, so slicing requests are refused.

use serde::{Deserialize, Serialize};

use crate::chunk::multiscale::MultiScaleChunkedArray3D;
use crate::chunk::ChunkedArray3D;
use crate::error::{NdviewError, Result};
use crate::types::{DataRequest, DataResponse, DataStoreId, SceneId, SelectedRegion, VisualId};

fn unit_scale() -> [f64; 3] {
    [1.0; 3]
}

/// Geometry of one resolution level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZarrLevel {
    pub array_shape: [usize; 3],
    pub chunk_shape: [usize; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub translation: [f64; 3],
}

impl ZarrLevel {
    pub fn new(array_shape: [usize; 3], chunk_shape: [usize; 3], scale: [f64; 3]) -> Self {
        Self {
            array_shape,
            chunk_shape,
            scale,
            translation: [0.0; 3],
        }
    }
}

/// Image pyramid stored as Zarr, finest level first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiscaleZarrImageStore {
    id: DataStoreId,
    name: String,
    path: String,
    levels: Vec<ZarrLevel>,
}

impl MultiscaleZarrImageStore {
    pub fn new(name: impl Into<String>, path: impl Into<String>, levels: Vec<ZarrLevel>) -> Self {
        Self {
            id: DataStoreId::new(),
            name: name.into(),
            path: path.into(),
            levels,
        }
    }

    pub fn id(&self) -> DataStoreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[ZarrLevel] {
        &self.levels
    }

    /// Materialize the level layout as chunked arrays, validating the
    /// finest-to-coarsest ordering.
    pub fn to_chunked_arrays(&self) -> Result<MultiScaleChunkedArray3D> {
        let levels = self
            .levels
            .iter()
            .map(|level| {
                ChunkedArray3D::with_transform(
                    level.array_shape,
                    level.chunk_shape,
                    level.scale,
                    level.translation,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        MultiScaleChunkedArray3D::new(levels)
    }

    pub fn get_data_request(
        &self,
        _region: &SelectedRegion,
        _scene_id: SceneId,
        _visual_id: VisualId,
    ) -> Result<Vec<DataRequest>> {
        Err(NdviewError::unsupported_store(format!(
            "Zarr store '{}' does not serve slice requests yet",
            self.name
        )))
    }

    pub fn get_data(&self, _request: &DataRequest) -> Result<DataResponse> {
        Err(NdviewError::unsupported_store(format!(
            "Zarr store '{}' does not serve slice data yet",
            self.name
        )))
    }
}
