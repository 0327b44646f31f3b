//! Turning dims changes into data requests and slice responses.

pub mod async_pool;

pub use async_pool::{AsynchronousSlicer, LatestSliceTracker};

use std::sync::mpsc::Receiver;

use fxhash::FxHashMap;
use log::{debug, warn};

use crate::error::{NdviewError, Result};
use crate::event::{DimsUpdated, EventDispatcher};
use crate::model::dims::DimsManager;
use crate::model::{RegionSelector, ViewerModel};
use crate::types::{
    DataRequest, DataResponse, DataStoreId, SceneId, SelectedRegion, TilingMethod, VisualId,
};

/// Freeze a scene's dims into the region handed to data stores.
///
/// Slicing is defined for 2 or 3 displayed dimensions only.
pub fn selected_region_from_dims(dims: &DimsManager) -> Result<SelectedRegion> {
    match dims.selection() {
        RegionSelector::AxisAligned(selector) => match selector.n_displayed_dims {
            2 | 3 => Ok(SelectedRegion::AxisAligned(
                selector.to_sample(TilingMethod::None),
            )),
            n => Err(NdviewError::DisplayedDims(n)),
        },
    }
}

/// Build the stamped requests for one scene, in visual order.
///
/// Every request carries the next sequence number of its
/// (scene, visual) pair so consumers can drop stale responses.
pub(crate) fn build_scene_requests(
    model: &ViewerModel,
    scene_id: SceneId,
    sequences: &mut FxHashMap<(SceneId, VisualId), u64>,
) -> Result<Vec<(DataStoreId, DataRequest)>> {
    let scene = model.scenes.scene(scene_id)?;
    let region = selected_region_from_dims(scene.dims())?;
    let mut stamped = Vec::new();
    for visual in scene.visuals() {
        let store = model.data.store(visual.data_store_id())?;
        let requests = store.get_data_request(&region, scene_id, visual.id())?;
        for mut request in requests {
            let counter = sequences.entry((scene_id, visual.id())).or_insert(0);
            *counter += 1;
            request.set_sequence(*counter);
            stamped.push((visual.data_store_id(), request));
        }
    }
    Ok(stamped)
}

/// Slicer that serves every request on the calling thread.
///
/// Responses are emitted to subscribers in visual order before
/// `reslice_scene` returns.
pub struct SynchronousSlicer {
    attached: Vec<SceneId>,
    sequences: FxHashMap<(SceneId, VisualId), u64>,
    new_slice: EventDispatcher<DataResponse>,
}

impl SynchronousSlicer {
    pub fn new() -> Self {
        Self {
            attached: Vec::new(),
            sequences: FxHashMap::default(),
            new_slice: EventDispatcher::new(),
        }
    }

    /// Register a scene so its dims updates trigger reslicing.
    pub fn attach_scene(&mut self, scene_id: SceneId) {
        if self.attached.contains(&scene_id) {
            warn!("scene {scene_id} is already attached to the slicer");
            return;
        }
        self.attached.push(scene_id);
    }

    pub fn is_attached(&self, scene_id: SceneId) -> bool {
        self.attached.contains(&scene_id)
    }

    /// Subscribe to finished slices.
    pub fn subscribe_new_slice(&mut self) -> Receiver<DataResponse> {
        self.new_slice.subscribe()
    }

    /// React to a dims update. Updates for scenes that were never
    /// attached are ignored.
    pub fn on_dims_update(&mut self, model: &ViewerModel, event: &DimsUpdated) -> Result<()> {
        if !self.is_attached(event.scene_id) {
            warn!("ignoring dims update for unattached scene {}", event.scene_id);
            return Ok(());
        }
        self.reslice_scene(model, event.scene_id)
    }

    /// Slice every visual of one scene against its current dims.
    pub fn reslice_scene(&mut self, model: &ViewerModel, scene_id: SceneId) -> Result<()> {
        let requests = build_scene_requests(model, scene_id, &mut self.sequences)?;
        debug!("reslicing scene {scene_id}: {} requests", requests.len());
        for (store_id, request) in requests {
            let store = model.data.store(store_id)?;
            let response = store.get_data(&request)?;
            self.new_slice.emit(response);
        }
        Ok(())
    }

    /// Slice every attached scene.
    pub fn reslice_all(&mut self, model: &ViewerModel) -> Result<()> {
        for scene_id in model.scenes.scene_ids() {
            if self.is_attached(scene_id) {
                self.reslice_scene(model, scene_id)?;
            }
        }
        Ok(())
    }
}

impl Default for SynchronousSlicer {
    fn default() -> Self {
        Self::new()
    }
}
