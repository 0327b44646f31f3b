//! Camera and camera-controller state.

use serde::{Deserialize, Serialize};

/// Interaction style that drives a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "controller_type", rename_all = "snake_case")]
pub enum CameraController {
    PanZoom { enabled: bool },
    Trackball { enabled: bool },
    Orbit { enabled: bool },
}

impl CameraController {
    pub fn enabled(&self) -> bool {
        match self {
            CameraController::PanZoom { enabled }
            | CameraController::Trackball { enabled }
            | CameraController::Orbit { enabled } => *enabled,
        }
    }

    pub fn set_enabled(&mut self, value: bool) {
        match self {
            CameraController::PanZoom { enabled }
            | CameraController::Trackball { enabled }
            | CameraController::Orbit { enabled } => *enabled = value,
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        CameraController::PanZoom { enabled: true }
    }
}

/// Perspective camera with a symmetric view volume.
///
/// `width` and `height` describe the viewport extent in world units at
/// unit zoom; clipping planes are offsets along the view direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveCamera {
    pub fov: f64,
    pub width: f64,
    pub height: f64,
    pub zoom: f64,
    pub near_clipping_plane: f64,
    pub far_clipping_plane: f64,
    pub controller: CameraController,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov: 50.0,
            width: 10.0,
            height: 10.0,
            zoom: 1.0,
            near_clipping_plane: -500.0,
            far_clipping_plane: 500.0,
            controller: CameraController::default(),
        }
    }
}

impl PerspectiveCamera {
    pub fn with_controller(controller: CameraController) -> Self {
        Self {
            controller,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let camera: PerspectiveCamera =
            serde_json::from_str(r#"{"fov": 60.0, "zoom": 2.0}"#).unwrap();
        assert_eq!(camera.fov, 60.0);
        assert_eq!(camera.zoom, 2.0);
        assert_eq!(camera.width, 10.0);
        assert_eq!(camera.near_clipping_plane, -500.0);
        assert!(camera.controller.enabled());
    }

    #[test]
    fn controller_serializes_with_a_type_tag() {
        let camera = PerspectiveCamera::with_controller(CameraController::Orbit { enabled: true });
        let text = serde_json::to_string(&camera).unwrap();
        assert!(text.contains(r#""controller_type":"orbit""#));
        let back: PerspectiveCamera = serde_json::from_str(&text).unwrap();
        assert_eq!(back, camera);
    }

    #[test]
    fn controllers_toggle_in_place() {
        let mut controller = CameraController::Trackball { enabled: true };
        controller.set_enabled(false);
        assert!(!controller.enabled());
    }
}
