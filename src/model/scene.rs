//! Scenes group dims state, visuals and canvases.

use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::model::camera::PerspectiveCamera;
use crate::model::dims::DimsManager;
use crate::model::visuals::Visual;
use crate::types::{CanvasId, SceneId, VisualId};

/// A render target holding one camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: CanvasId,
    pub camera: PerspectiveCamera,
}

impl Canvas {
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            id: CanvasId::new(),
            camera,
        }
    }
}

/// One independently navigable view of the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    id: SceneId,
    dims: DimsManager,
    visuals: Vec<Visual>,
    canvases: Vec<Canvas>,
}

impl Scene {
    pub fn new(dims: DimsManager, visuals: Vec<Visual>, canvases: Vec<Canvas>) -> Self {
        Self {
            id: SceneId::new(),
            dims,
            visuals,
            canvases,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn dims(&self) -> &DimsManager {
        &self.dims
    }

    pub fn dims_mut(&mut self) -> &mut DimsManager {
        &mut self.dims
    }

    /// Visuals in render order.
    pub fn visuals(&self) -> &[Visual] {
        &self.visuals
    }

    pub fn visual(&self, visual_id: VisualId) -> Result<&Visual> {
        self.visuals
            .iter()
            .find(|visual| visual.id() == visual_id)
            .ok_or(NdviewError::VisualNotFound(visual_id))
    }

    pub fn add_visual(&mut self, visual: Visual) -> VisualId {
        let id = visual.id();
        self.visuals.push(visual);
        id
    }

    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    pub fn canvas(&self, canvas_id: CanvasId) -> Result<&Canvas> {
        self.canvases
            .iter()
            .find(|canvas| canvas.id == canvas_id)
            .ok_or(NdviewError::CanvasNotFound(canvas_id))
    }

    pub fn canvas_mut(&mut self, canvas_id: CanvasId) -> Result<&mut Canvas> {
        self.canvases
            .iter_mut()
            .find(|canvas| canvas.id == canvas_id)
            .ok_or(NdviewError::CanvasNotFound(canvas_id))
    }
}

/// All scenes of a viewer, in creation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneManager {
    scenes: Vec<Scene>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        let id = scene.id();
        self.scenes.push(scene);
        id
    }

    pub fn scene(&self, scene_id: SceneId) -> Result<&Scene> {
        self.scenes
            .iter()
            .find(|scene| scene.id() == scene_id)
            .ok_or(NdviewError::SceneNotFound(scene_id))
    }

    pub fn scene_mut(&mut self, scene_id: SceneId) -> Result<&mut Scene> {
        self.scenes
            .iter_mut()
            .find(|scene| scene.id() == scene_id)
            .ok_or(NdviewError::SceneNotFound(scene_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    pub fn scene_ids(&self) -> Vec<SceneId> {
        self.scenes.iter().map(|scene| scene.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Find the scene containing a visual, with the visual itself.
    pub fn scene_with_visual(&self, visual_id: VisualId) -> Result<(&Scene, &Visual)> {
        for scene in &self.scenes {
            if let Ok(visual) = scene.visual(visual_id) {
                return Ok((scene, visual));
            }
        }
        Err(NdviewError::VisualNotFound(visual_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::visuals::ImageVisual;
    use crate::types::DataStoreId;

    fn demo_scene() -> Scene {
        let dims = DimsManager::from_extents("data", &[4, 8, 8], 2).unwrap();
        let visual = Visual::Image(ImageVisual::new("plane", DataStoreId::new()));
        let canvas = Canvas::new(PerspectiveCamera::default());
        Scene::new(dims, vec![visual], vec![canvas])
    }

    #[test]
    fn lookups_report_missing_ids() {
        let scene = demo_scene();
        assert!(scene.visual(scene.visuals()[0].id()).is_ok());
        assert!(matches!(
            scene.visual(VisualId::new()),
            Err(NdviewError::VisualNotFound(_))
        ));
        assert!(matches!(
            scene.canvas(CanvasId::new()),
            Err(NdviewError::CanvasNotFound(_))
        ));
    }

    #[test]
    fn manager_keeps_creation_order() {
        let mut manager = SceneManager::new();
        let first = manager.add_scene(demo_scene());
        let second = manager.add_scene(demo_scene());
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.scene_ids(), vec![first, second]);
        assert!(manager.scene(first).is_ok());
        assert!(matches!(
            manager.scene(SceneId::new()),
            Err(NdviewError::SceneNotFound(_))
        ));
    }

    #[test]
    fn visuals_are_found_across_scenes() {
        let mut manager = SceneManager::new();
        manager.add_scene(demo_scene());
        let target = demo_scene();
        let visual_id = target.visuals()[0].id();
        let scene_id = manager.add_scene(target);

        let (scene, visual) = manager.scene_with_visual(visual_id).unwrap();
        assert_eq!(scene.id(), scene_id);
        assert_eq!(visual.id(), visual_id);
    }
}
