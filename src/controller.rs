//! The controller owns the viewer state and the slicer, and turns
//! state changes into slice updates and redraw requests.

use log::debug;

use crate::error::Result;
use crate::event::{DimsUpdated, EventDispatcher, RedrawRequested};
use crate::model::dims::RegionSelector;
use crate::model::scene::Scene;
use crate::model::ViewerModel;
use crate::paint::LabelsPaintingManager;
use crate::slicer::SynchronousSlicer;
use crate::store::DataStore;
use crate::types::{DataResponse, DataStoreId, DimSelection, MouseEvent, SceneId};
use std::sync::mpsc::Receiver;

/// Front door for driving a viewer: dims changes go in, slice data
/// and redraw requests come out.
///
/// Construction attaches every scene to the slicer but does not slice;
/// subscribe first, then call [`reslice_all`] to seed the initial
/// slices.
///
/// [`reslice_all`]: ViewerController::reslice_all
pub struct ViewerController {
    model: ViewerModel,
    slicer: SynchronousSlicer,
    dims_events: EventDispatcher<DimsUpdated>,
    redraw_events: EventDispatcher<RedrawRequested>,
}

impl ViewerController {
    pub fn new(model: ViewerModel) -> Self {
        let mut slicer = SynchronousSlicer::new();
        for scene_id in model.scenes.scene_ids() {
            slicer.attach_scene(scene_id);
        }
        Self {
            model,
            slicer,
            dims_events: EventDispatcher::new(),
            redraw_events: EventDispatcher::new(),
        }
    }

    pub fn model(&self) -> &ViewerModel {
        &self.model
    }

    /// Add a data store at runtime so scenes can reference it.
    pub fn add_store(&mut self, store: DataStore) -> DataStoreId {
        self.model.data.add_store(store)
    }

    /// Add a scene at runtime and attach it to the slicer.
    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        let scene_id = self.model.scenes.add_scene(scene);
        self.slicer.attach_scene(scene_id);
        scene_id
    }

    pub fn subscribe_new_slice(&mut self) -> Receiver<DataResponse> {
        self.slicer.subscribe_new_slice()
    }

    pub fn subscribe_dims_updates(&mut self) -> Receiver<DimsUpdated> {
        self.dims_events.subscribe()
    }

    pub fn subscribe_redraws(&mut self) -> Receiver<RedrawRequested> {
        self.redraw_events.subscribe()
    }

    pub fn request_redraw(&mut self, scene_id: SceneId) {
        self.redraw_events.emit(RedrawRequested { scene_id });
    }

    /// Replace a scene's region selector and reslice it.
    pub fn set_dims_selection(
        &mut self,
        scene_id: SceneId,
        selection: RegionSelector,
    ) -> Result<()> {
        self.model
            .scenes
            .scene_mut(scene_id)?
            .dims_mut()
            .set_selection(selection)?;
        self.dims_updated(scene_id)
    }

    /// Replace a scene's per-axis selection and reslice it.
    pub fn set_dims_index_selection(
        &mut self,
        scene_id: SceneId,
        index_selection: Vec<DimSelection>,
    ) -> Result<()> {
        self.model
            .scenes
            .scene_mut(scene_id)?
            .dims_mut()
            .set_index_selection(index_selection)?;
        self.dims_updated(scene_id)
    }

    /// Move one axis of a scene to a new position and reslice it.
    pub fn set_dims_point(&mut self, scene_id: SceneId, axis: usize, value: i64) -> Result<()> {
        self.model
            .scenes
            .scene_mut(scene_id)?
            .dims_mut()
            .set_point(axis, value)?;
        self.dims_updated(scene_id)
    }

    fn dims_updated(&mut self, scene_id: SceneId) -> Result<()> {
        let event = DimsUpdated { scene_id };
        self.dims_events.emit(event);
        self.slicer.on_dims_update(&self.model, &event)
    }

    pub fn reslice_scene(&mut self, scene_id: SceneId) -> Result<()> {
        self.slicer.reslice_scene(&self.model, scene_id)
    }

    pub fn reslice_all(&mut self) -> Result<()> {
        self.slicer.reslice_all(&self.model)
    }

    /// Route a mouse event to a painting manager. Events for other
    /// visuals are ignored; strokes that changed data reslice the
    /// owning scene and request a redraw.
    pub fn apply_mouse_event(
        &mut self,
        painter: &mut LabelsPaintingManager,
        event: &MouseEvent,
    ) -> Result<usize> {
        if event.visual_id != painter.visual_id() {
            return Ok(0);
        }
        let store = self.model.data.store_mut(painter.store_id())?;
        let image = store.as_image_mut()?;
        let written = painter.on_mouse_event(image, event)?;
        if written > 0 {
            let (scene, _) = self.model.scenes.scene_with_visual(event.visual_id)?;
            let scene_id = scene.id();
            debug!("stroke wrote {written} samples, reslicing scene {scene_id}");
            self.slicer.reslice_scene(&self.model, scene_id)?;
            self.redraw_events.emit(RedrawRequested { scene_id });
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dims::DimsManager;
    use crate::model::scene::SceneManager;
    use crate::model::visuals::{ImageVisual, LabelsVisual, Visual};
    use crate::model::DataManager;
    use crate::paint::PaintingMode;
    use crate::slicer::tests::image_and_points_model;
    use crate::store::ImageMemoryStore;
    use crate::types::{MouseButton, MouseEventType, VisualId};

    #[test]
    fn reslice_all_serves_every_visual() {
        let (model, _) = image_and_points_model();
        let mut controller = ViewerController::new(model);
        let slices = controller.subscribe_new_slice();

        controller.reslice_all().unwrap();
        let responses: Vec<DataResponse> = slices.try_iter().collect();
        assert_eq!(responses.len(), 2);

        // The initial selection pins the scroll axis to zero.
        let DataResponse::Image(image) = &responses[0] else {
            panic!("expected the image response first");
        };
        assert_eq!(image.shape, vec![6, 6]);
        assert_eq!(image.data[0], 0.0);
    }

    #[test]
    fn moving_the_dims_point_reslices_the_scene() {
        let (model, scene_id) = image_and_points_model();
        let mut controller = ViewerController::new(model);
        let slices = controller.subscribe_new_slice();
        let dims_updates = controller.subscribe_dims_updates();

        controller.set_dims_point(scene_id, 0, 2).unwrap();

        let updates: Vec<DimsUpdated> = dims_updates.try_iter().collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].scene_id, scene_id);

        let responses: Vec<DataResponse> = slices.try_iter().collect();
        assert_eq!(responses.len(), 2);
        let DataResponse::Image(image) = &responses[0] else {
            panic!("expected the image response first");
        };
        // Plane two of the counting volume starts at 2 * 6 * 6.
        assert_eq!(image.data[0], 72.0);
        let DataResponse::Points(points) = &responses[1] else {
            panic!("expected the points response second");
        };
        // No point sits on plane two.
        assert_eq!(points.n_points, 0);
    }

    #[test]
    fn point_selection_filters_points_to_the_plane() {
        let (model, scene_id) = image_and_points_model();
        let mut controller = ViewerController::new(model);
        let slices = controller.subscribe_new_slice();

        controller.set_dims_point(scene_id, 0, 1).unwrap();
        let responses: Vec<DataResponse> = slices.try_iter().collect();
        let DataResponse::Points(points) = &responses[1] else {
            panic!("expected the points response second");
        };
        assert_eq!(points.n_points, 1);
        assert_eq!(points.data, vec![2.0, 3.0]);
    }

    #[test]
    fn pinning_a_far_plane_slices_a_points_only_scene() {
        let mut data = DataManager::new();
        let store_id = data.add_store(DataStore::Points(
            crate::store::PointsMemoryStore::from_rows(
                "spots",
                &[
                    vec![0.0, 0.0, 0.0],
                    vec![1.0, 2.0, 3.0],
                    vec![10.0, 11.0, 12.0],
                ],
            )
            .unwrap(),
        ));
        let dims = DimsManager::from_extents("spots", &[16, 16, 16], 2).unwrap();
        let scene = Scene::new(
            dims,
            vec![Visual::Points(crate::model::PointsVisual::new(
                "spots", store_id,
            ))],
            vec![],
        );
        let mut scenes = SceneManager::new();
        let scene_id = scenes.add_scene(scene);

        let mut controller = ViewerController::new(ViewerModel::new(data, scenes));
        let slices = controller.subscribe_new_slice();
        let dims_updates = controller.subscribe_dims_updates();

        controller.set_dims_point(scene_id, 0, 10).unwrap();
        assert_eq!(dims_updates.try_iter().count(), 1);

        let responses: Vec<DataResponse> = slices.try_iter().collect();
        assert_eq!(responses.len(), 1);
        let DataResponse::Points(points) = &responses[0] else {
            panic!("expected a points response");
        };
        assert_eq!(points.n_points, 1);
        assert_eq!(points.data, vec![11.0, 12.0]);
    }

    #[test]
    fn redraw_requests_reach_subscribers() {
        let (model, scene_id) = image_and_points_model();
        let mut controller = ViewerController::new(model);
        let redraws = controller.subscribe_redraws();

        controller.request_redraw(scene_id);
        let events: Vec<RedrawRequested> = redraws.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].scene_id, scene_id);
    }

    fn labels_model() -> (ViewerModel, SceneId, LabelsVisual) {
        let mut data = DataManager::new();
        let store_id = data.add_store(DataStore::Image(
            ImageMemoryStore::zeros("labels", vec![1, 5, 5]).unwrap(),
        ));
        let labels = LabelsVisual::new("labels", store_id, vec![1]);
        let dims = DimsManager::from_extents("labels", &[1, 5, 5], 2).unwrap();
        let scene = Scene::new(dims, vec![Visual::Labels(labels.clone())], vec![]);
        let mut scenes = SceneManager::new();
        let scene_id = scenes.add_scene(scene);
        (ViewerModel::new(data, scenes), scene_id, labels)
    }

    fn left_press(visual_id: VisualId, coordinate: Vec<f64>) -> MouseEvent {
        MouseEvent {
            visual_id,
            event_type: MouseEventType::Press,
            button: MouseButton::Left,
            modifiers: vec![],
            coordinate,
            pick_value: None,
        }
    }

    #[test]
    fn painting_updates_the_store_and_reslices() {
        let (model, scene_id, labels) = labels_model();
        let mut controller = ViewerController::new(model);
        let slices = controller.subscribe_new_slice();
        let redraws = controller.subscribe_redraws();

        let mut painter = LabelsPaintingManager::new(&labels, PaintingMode::Paint).unwrap();
        painter.set_brush_size(1.0);
        painter.update_dims(controller.model().scenes.scene(scene_id).unwrap().dims());

        let written = controller
            .apply_mouse_event(&mut painter, &left_press(labels.id, vec![0.0, 2.0, 2.0]))
            .unwrap();
        assert_eq!(written, 1);

        let responses: Vec<DataResponse> = slices.try_iter().collect();
        assert_eq!(responses.len(), 1);
        let DataResponse::Image(image) = &responses[0] else {
            panic!("expected an image response");
        };
        assert_eq!(image.data[2 * 5 + 2], 2.0);
        assert_eq!(redraws.try_iter().count(), 1);
    }

    #[test]
    fn strokes_on_other_visuals_are_ignored() {
        let (model, _, labels) = labels_model();
        let mut controller = ViewerController::new(model);
        let slices = controller.subscribe_new_slice();

        let mut painter = LabelsPaintingManager::new(&labels, PaintingMode::Paint).unwrap();
        let written = controller
            .apply_mouse_event(
                &mut painter,
                &left_press(VisualId::new(), vec![0.0, 2.0, 2.0]),
            )
            .unwrap();
        assert_eq!(written, 0);
        assert_eq!(slices.try_iter().count(), 0);
    }

    #[test]
    fn added_scenes_are_sliced_like_initial_ones() {
        let (model, _, _) = labels_model();
        let mut controller = ViewerController::new(model);
        let slices = controller.subscribe_new_slice();

        let store_id = controller.add_store(DataStore::Image(
            ImageMemoryStore::zeros("extra", vec![2, 3, 3]).unwrap(),
        ));
        let dims = DimsManager::from_extents("extra", &[2, 3, 3], 2).unwrap();
        let scene = Scene::new(
            dims,
            vec![Visual::Image(ImageVisual::new("extra", store_id))],
            vec![],
        );
        let extra_id = controller.add_scene(scene);

        controller.reslice_scene(extra_id).unwrap();
        assert_eq!(slices.try_iter().count(), 1);
    }
}
