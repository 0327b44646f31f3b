//! Data stores and the dispatch over their kinds.

pub mod image;
pub mod mesh;
pub mod points;
pub mod zarr;

pub use image::ImageMemoryStore;
pub use mesh::MeshMemoryStore;
pub use points::PointsMemoryStore;
pub use zarr::{MultiscaleZarrImageStore, ZarrLevel};

use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::types::{DataRequest, DataResponse, DataStoreId, SceneId, SelectedRegion, VisualId};

/// Any data source a visual can render from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "store_type")]
pub enum DataStore {
    #[serde(rename = "image_memory")]
    Image(ImageMemoryStore),
    #[serde(rename = "points_memory")]
    Points(PointsMemoryStore),
    #[serde(rename = "mesh_memory")]
    Mesh(MeshMemoryStore),
    #[serde(rename = "multiscale_zarr_image")]
    MultiscaleZarr(MultiscaleZarrImageStore),
}

impl DataStore {
    pub fn id(&self) -> DataStoreId {
        match self {
            DataStore::Image(store) => store.id(),
            DataStore::Points(store) => store.id(),
            DataStore::Mesh(store) => store.id(),
            DataStore::MultiscaleZarr(store) => store.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DataStore::Image(store) => store.name(),
            DataStore::Points(store) => store.name(),
            DataStore::Mesh(store) => store.name(),
            DataStore::MultiscaleZarr(store) => store.name(),
        }
    }

    /// Turn a selected region into the requests this store serves.
    pub fn get_data_request(
        &self,
        region: &SelectedRegion,
        scene_id: SceneId,
        visual_id: VisualId,
    ) -> Result<Vec<DataRequest>> {
        match self {
            DataStore::Image(store) => store.get_data_request(region, scene_id, visual_id),
            DataStore::Points(store) => store.get_data_request(region, scene_id, visual_id),
            DataStore::Mesh(store) => store.get_data_request(region, scene_id, visual_id),
            DataStore::MultiscaleZarr(store) => {
                store.get_data_request(region, scene_id, visual_id)
            }
        }
    }

    /// Serve one request.
    pub fn get_data(&self, request: &DataRequest) -> Result<DataResponse> {
        match self {
            DataStore::Image(store) => store.get_data(request),
            DataStore::Points(store) => store.get_data(request),
            DataStore::Mesh(store) => store.get_data(request),
            DataStore::MultiscaleZarr(store) => store.get_data(request),
        }
    }

    /// Mutable image access, for painting into label stores.
    pub fn as_image_mut(&mut self) -> Result<&mut ImageMemoryStore> {
        match self {
            DataStore::Image(store) => Ok(store),
            other => Err(NdviewError::unsupported_store(format!(
                "store '{}' is not an in-memory image",
                other.name()
            ))),
        }
    }
}
