//! Slicing on a worker pool.
//!
//! Requests are built and stamped on the calling thread, so one dims
//! update yields one consistent batch. Workers serve requests from a
//! shared queue and skip any request that has already been superseded
//! by a newer sequence for the same (scene, visual).

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};

use dashmap::DashMap;
use fxhash::FxHashMap;
use log::{debug, error, warn};

use crate::error::Result;
use crate::event::{DimsUpdated, EventDispatcher};
use crate::model::ViewerModel;
use crate::slicer::build_scene_requests;
use crate::types::{DataRequest, DataResponse, DataStoreId, SceneId, VisualId};

/// Worker count used by [`AsynchronousSlicer::new`], capped by the
/// machine's parallelism.
pub const DEFAULT_WORKERS: usize = 3;

struct SliceTask {
    store_id: DataStoreId,
    request: DataRequest,
}

/// Consumer-side filter that keeps only the newest response per
/// (scene, visual). Workers already skip superseded requests, but a
/// response that was in flight can still arrive late.
#[derive(Debug, Default)]
pub struct LatestSliceTracker {
    accepted: FxHashMap<(SceneId, VisualId), u64>,
}

impl LatestSliceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `response` is newer than anything accepted so far for
    /// its (scene, visual). Accepted responses advance the cutoff.
    pub fn accept(&mut self, response: &DataResponse) -> bool {
        let key = (response.scene_id(), response.visual_id());
        let newest = self.accepted.get(&key).copied().unwrap_or(0);
        if response.sequence() > newest {
            self.accepted.insert(key, response.sequence());
            true
        } else {
            false
        }
    }
}

/// Slicer that serves requests on a pool of worker threads.
///
/// The model lives behind a read-write lock; request building takes a
/// read lock briefly, workers take read locks while slicing.
pub struct AsynchronousSlicer {
    model: Arc<RwLock<ViewerModel>>,
    attached: Vec<SceneId>,
    sequences: FxHashMap<(SceneId, VisualId), u64>,
    newest: Arc<DashMap<(SceneId, VisualId), u64>>,
    dispatcher: Arc<Mutex<EventDispatcher<DataResponse>>>,
    task_sender: Option<Sender<SliceTask>>,
    workers: Vec<JoinHandle<()>>,
}

impl AsynchronousSlicer {
    pub fn new(model: Arc<RwLock<ViewerModel>>) -> Self {
        let workers = DEFAULT_WORKERS.min(num_cpus::get()).max(1);
        Self::with_workers(model, workers)
    }

    pub fn with_workers(model: Arc<RwLock<ViewerModel>>, n_workers: usize) -> Self {
        let (task_sender, task_receiver) = mpsc::channel::<SliceTask>();
        let task_receiver = Arc::new(Mutex::new(task_receiver));
        let newest: Arc<DashMap<(SceneId, VisualId), u64>> = Arc::new(DashMap::new());
        let dispatcher = Arc::new(Mutex::new(EventDispatcher::new()));

        let mut workers = Vec::with_capacity(n_workers.max(1));
        for _ in 0..n_workers.max(1) {
            let tasks = Arc::clone(&task_receiver);
            let model = Arc::clone(&model);
            let newest = Arc::clone(&newest);
            let dispatcher = Arc::clone(&dispatcher);
            workers.push(thread::spawn(move || loop {
                let task = { tasks.lock().unwrap().recv() };
                let Ok(task) = task else {
                    // Channel closed: the slicer is shutting down.
                    break;
                };
                let key = (task.request.scene_id(), task.request.visual_id());
                let cutoff = newest.get(&key).map(|entry| *entry).unwrap_or(0);
                if task.request.sequence() < cutoff {
                    debug!(
                        "skipping superseded request (sequence {} < {cutoff})",
                        task.request.sequence()
                    );
                    continue;
                }
                let served = {
                    let model = model.read().unwrap();
                    model
                        .data
                        .store(task.store_id)
                        .and_then(|store| store.get_data(&task.request))
                };
                match served {
                    Ok(response) => {
                        dispatcher.lock().unwrap().emit(response);
                    }
                    Err(error) => error!("slice request failed: {error}"),
                }
            }));
        }

        Self {
            model,
            attached: Vec::new(),
            sequences: FxHashMap::default(),
            newest,
            dispatcher,
            task_sender: Some(task_sender),
            workers,
        }
    }

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

    /// Subscribe to finished slices. Responses may arrive in any order
    /// across visuals; use a [`LatestSliceTracker`] to drop stale ones.
    pub fn subscribe_new_slice(&self) -> Receiver<DataResponse> {
        self.dispatcher.lock().unwrap().subscribe()
    }

    pub fn on_dims_update(&mut self, event: &DimsUpdated) -> Result<()> {
        if !self.is_attached(event.scene_id) {
            warn!("ignoring dims update for unattached scene {}", event.scene_id);
            return Ok(());
        }
        self.reslice_scene(event.scene_id)
    }

    /// Build this scene's requests under a read lock and queue them.
    pub fn reslice_scene(&mut self, scene_id: SceneId) -> Result<()> {
        let requests = {
            let model = self.model.read().unwrap();
            build_scene_requests(&model, scene_id, &mut self.sequences)?
        };
        debug!("queueing {} requests for scene {scene_id}", requests.len());
        let Some(sender) = &self.task_sender else {
            return Ok(());
        };
        for (store_id, request) in requests {
            self.newest.insert(
                (request.scene_id(), request.visual_id()),
                request.sequence(),
            );
            if sender.send(SliceTask { store_id, request }).is_err() {
                warn!("slicer workers are gone, dropping request");
                break;
            }
        }
        Ok(())
    }

    pub fn reslice_all(&mut self) -> Result<()> {
        let scene_ids = { self.model.read().unwrap().scenes.scene_ids() };
        for scene_id in scene_ids {
            if self.is_attached(scene_id) {
                self.reslice_scene(scene_id)?;
            }
        }
        Ok(())
    }
}

impl Drop for AsynchronousSlicer {
    fn drop(&mut self) {
        // Closing the task channel lets every worker run dry and exit.
        self.task_sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("slicer worker panicked during shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::tests::image_and_points_model;
    use crate::types::{ImageDataResponse, RequestId, VisualId};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(10);

    fn image_response(
        scene_id: SceneId,
        visual_id: VisualId,
        sequence: u64,
    ) -> DataResponse {
        DataResponse::Image(ImageDataResponse {
            id: RequestId::new(),
            scene_id,
            visual_id,
            resolution_level: 0,
            sequence,
            min_corner_rendered: vec![0, 0],
            shape: vec![1, 1],
            data: vec![0.0],
        })
    }

    #[test]
    fn tracker_keeps_only_newer_responses() {
        let scene_id = SceneId::new();
        let visual_id = VisualId::new();
        let mut tracker = LatestSliceTracker::new();

        assert!(tracker.accept(&image_response(scene_id, visual_id, 2)));
        assert!(!tracker.accept(&image_response(scene_id, visual_id, 1)));
        assert!(!tracker.accept(&image_response(scene_id, visual_id, 2)));
        assert!(tracker.accept(&image_response(scene_id, visual_id, 3)));
        // Other visuals track independently.
        assert!(tracker.accept(&image_response(scene_id, VisualId::new(), 1)));
    }

    #[test]
    fn every_visual_is_served() {
        let (model, scene_id) = image_and_points_model();
        let expected: Vec<VisualId> = model
            .scenes
            .scene(scene_id)
            .unwrap()
            .visuals()
            .iter()
            .map(|visual| visual.id())
            .collect();

        let model = Arc::new(RwLock::new(model));
        let mut slicer = AsynchronousSlicer::with_workers(model, 2);
        slicer.attach_scene(scene_id);
        let receiver = slicer.subscribe_new_slice();

        slicer.reslice_scene(scene_id).unwrap();
        let mut seen = Vec::new();
        for _ in 0..expected.len() {
            let response = receiver.recv_timeout(WAIT).unwrap();
            assert_eq!(response.sequence(), 1);
            seen.push(response.visual_id());
        }
        seen.sort_by_key(|id| id.to_string());
        let mut expected_sorted = expected;
        expected_sorted.sort_by_key(|id| id.to_string());
        assert_eq!(seen, expected_sorted);
    }

    #[test]
    fn rapid_updates_settle_on_the_newest_sequence() {
        let (model, scene_id) = image_and_points_model();
        let model = Arc::new(RwLock::new(model));
        let mut slicer = AsynchronousSlicer::with_workers(model, 2);
        slicer.attach_scene(scene_id);
        let receiver = slicer.subscribe_new_slice();

        slicer.reslice_scene(scene_id).unwrap();
        slicer.reslice_scene(scene_id).unwrap();

        // Workers may skip the first batch entirely, but the second
        // always lands. Stale arrivals fall to the tracker.
        let mut tracker = LatestSliceTracker::new();
        let mut newest_image = 0;
        let mut newest_points = 0;
        while newest_image < 2 || newest_points < 2 {
            let response = receiver.recv_timeout(WAIT).unwrap();
            let accepted = tracker.accept(&response);
            match &response {
                DataResponse::Image(image) => {
                    if accepted {
                        newest_image = image.sequence;
                    }
                }
                DataResponse::Points(points) => {
                    if accepted {
                        newest_points = points.sequence;
                    }
                }
                DataResponse::Mesh(_) => panic!("no mesh visual in this scene"),
            }
        }
        assert_eq!(newest_image, 2);
        assert_eq!(newest_points, 2);
    }

    #[test]
    fn dropping_the_slicer_stops_the_workers() {
        let (model, scene_id) = image_and_points_model();
        let model = Arc::new(RwLock::new(model));
        let mut slicer = AsynchronousSlicer::with_workers(model, 2);
        slicer.attach_scene(scene_id);
        let receiver = slicer.subscribe_new_slice();
        slicer.reslice_scene(scene_id).unwrap();
        drop(slicer);

        // Workers are joined; whatever they emitted is still readable,
        // then the channel reports disconnection.
        let drained = receiver.try_iter().count();
        assert!(drained <= 2);
        assert!(receiver.recv_timeout(WAIT).is_err());
    }
}
