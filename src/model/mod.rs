//! The viewer model: data stores on one side, scenes on the other.

pub mod camera;
pub mod coords;
pub mod dims;
pub mod scene;
pub mod visuals;

pub use camera::{CameraController, PerspectiveCamera};
pub use coords::{CoordinateSystem, RangeTuple};
pub use dims::{AxisAlignedRegionSelector, DimsManager, RegionSelector};
pub use scene::{Canvas, Scene, SceneManager};
pub use visuals::{
    ImageMipMaterial, ImageVisual, LabelsMaterial, LabelsVisual, MeshPhongMaterial, MeshVisual,
    PointsUniformMaterial, PointsVisual, Visual,
};

use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::store::DataStore;
use crate::types::DataStoreId;

/// All data stores of a viewer, keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataManager {
    stores: FxHashMap<DataStoreId, DataStore>,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_store(&mut self, store: DataStore) -> DataStoreId {
        let id = store.id();
        self.stores.insert(id, store);
        id
    }

    pub fn store(&self, store_id: DataStoreId) -> Result<&DataStore> {
        self.stores
            .get(&store_id)
            .ok_or(NdviewError::StoreNotFound(store_id))
    }

    pub fn store_mut(&mut self, store_id: DataStoreId) -> Result<&mut DataStore> {
        self.stores
            .get_mut(&store_id)
            .ok_or(NdviewError::StoreNotFound(store_id))
    }

    pub fn n_stores(&self) -> usize {
        self.stores.len()
    }

    pub fn store_ids(&self) -> Vec<DataStoreId> {
        self.stores.keys().copied().collect()
    }
}

/// Full state of a viewer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewerModel {
    pub data: DataManager,
    pub scenes: SceneManager,
}

impl ViewerModel {
    pub fn new(data: DataManager, scenes: SceneManager) -> Self {
        Self { data, scenes }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_string(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_string(&json)
    }
}
