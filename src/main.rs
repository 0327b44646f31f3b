#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Context;
use log::info;

use ndview::model::{
    Canvas, DimsManager, ImageVisual, PerspectiveCamera, PointsVisual, Scene, Visual,
};
use ndview::store::{DataStore, ImageMemoryStore, PointsMemoryStore};
use ndview::types::DataResponse;
use ndview::{DataManager, SceneManager, ViewerController, ViewerModel};

/// A small volume with a handful of points, enough to watch slices move.
fn synthetic_model() -> anyhow::Result<ViewerModel> {
    let mut data = DataManager::new();
    let image_id = data.add_store(DataStore::Image(ImageMemoryStore::new(
        "volume",
        vec![8, 16, 16],
        (0..8 * 16 * 16).map(|i| i as f32).collect(),
    )?));
    let points_id = data.add_store(DataStore::Points(PointsMemoryStore::from_rows(
        "spots",
        &[
            vec![0.0, 2.0, 2.0],
            vec![3.0, 8.0, 8.0],
            vec![7.0, 15.0, 1.0],
        ],
    )?));

    let dims = DimsManager::from_extents("volume", &[8, 16, 16], 2)?;
    let visuals = vec![
        Visual::Image(ImageVisual::new("volume", image_id)),
        Visual::Points(PointsVisual::new("spots", points_id)),
    ];
    let scene = Scene::new(dims, visuals, vec![Canvas::new(PerspectiveCamera::default())]);

    let mut scenes = SceneManager::new();
    scenes.add_scene(scene);
    Ok(ViewerModel::new(data, scenes))
}

fn log_response(controller: &ViewerController, response: &DataResponse) {
    let name = controller
        .model()
        .scenes
        .scene_with_visual(response.visual_id())
        .map(|(_, visual)| visual.name().to_string())
        .unwrap_or_else(|_| response.visual_id().to_string());
    match response {
        DataResponse::Image(image) => {
            info!(
                "slice of '{name}': shape {:?}, min corner {:?}",
                image.shape, image.min_corner_rendered
            );
        }
        DataResponse::Points(points) => {
            info!(
                "slice of '{name}': {} points in {} displayed dims",
                points.n_points, points.n_displayed_dims
            );
        }
        DataResponse::Mesh(mesh) => {
            info!(
                "mesh '{name}': {} vertices, {} faces",
                mesh.vertices.len(),
                mesh.faces.len()
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let model = match std::env::args().nth(1) {
        Some(path) => ViewerModel::load_json_file(&path)
            .with_context(|| format!("failed to load viewer model from {path}"))?,
        None => synthetic_model()?,
    };

    let mut controller = ViewerController::new(model);
    let slices = controller.subscribe_new_slice();

    controller.reslice_all()?;
    for response in slices.try_iter() {
        log_response(&controller, &response);
    }

    // Step every scene's first axis to its midpoint and slice again.
    for scene_id in controller.model().scenes.scene_ids() {
        let midpoint = {
            let scene = controller.model().scenes.scene(scene_id)?;
            match scene.dims().range().first() {
                Some(range) => ((range.stop - range.start) / 2.0) as i64,
                None => continue,
            }
        };
        controller.set_dims_point(scene_id, 0, midpoint)?;
    }
    for response in slices.try_iter() {
        log_response(&controller, &response);
    }

    Ok(())
}
