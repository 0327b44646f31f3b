//! Identifiers, selection descriptors and the request/response value
//! types exchanged between scenes, slicers and data stores.

use derive_more::Debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.simple())
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a scene.
    SceneId
);
uuid_id!(
    /// Unique identifier for a visual.
    VisualId
);
uuid_id!(
    /// Unique identifier for a canvas.
    CanvasId
);
uuid_id!(
    /// Unique identifier for a data store.
    DataStoreId
);
uuid_id!(
    /// Unique identifier for a single data request.
    RequestId
);

/// Coordinate space a selection is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    World,
    Data,
}

/// How a store should cut the selected region into requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingMethod {
    /// The whole region is served as a single request.
    None,
    /// The region is tiled into chunks sized for the output texture.
    LogicalPixel,
}

/// Selection applied to a single axis.
///
/// `Index` pins the axis to one coordinate and drops it from sliced
/// array output. `Range` keeps the axis; `None` bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimSelection {
    Index(i64),
    Range {
        start: Option<i64>,
        stop: Option<i64>,
    },
}

impl DimSelection {
    /// Range covering the whole axis.
    pub fn full() -> Self {
        DimSelection::Range {
            start: None,
            stop: None,
        }
    }

    /// Half-open range `start..stop`.
    pub fn range(start: i64, stop: i64) -> Self {
        DimSelection::Range {
            start: Some(start),
            stop: Some(stop),
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            DimSelection::Index(value) => Some(*value),
            DimSelection::Range { .. } => None,
        }
    }

    /// First coordinate covered by the selection, clamped to zero.
    pub fn start(&self) -> usize {
        let raw = match self {
            DimSelection::Index(value) => *value,
            DimSelection::Range { start, .. } => start.unwrap_or(0),
        };
        raw.max(0) as usize
    }

    /// Resolve against an axis extent, returning clamped half-open bounds.
    pub fn bounds(&self, extent: usize) -> (usize, usize) {
        match self {
            DimSelection::Index(value) => {
                let lo = (*value).clamp(0, extent as i64) as usize;
                (lo, (lo + 1).min(extent))
            }
            DimSelection::Range { start, stop } => {
                let lo = start.unwrap_or(0).clamp(0, extent as i64) as usize;
                let hi = stop.unwrap_or(extent as i64).clamp(lo as i64, extent as i64) as usize;
                (lo, hi)
            }
        }
    }

    /// Closed interval covered by the selection, for filtering scattered
    /// coordinates. Unbounded sides extend to infinity.
    pub fn interval(&self) -> (f64, f64) {
        match self {
            DimSelection::Index(value) => (*value as f64, *value as f64),
            DimSelection::Range { start, stop } => (
                start.map_or(f64::NEG_INFINITY, |v| v as f64),
                stop.map_or(f64::INFINITY, |v| v as f64),
            ),
        }
    }
}

/// Frozen axis-aligned sample of a dims selection, handed to data stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisAlignedSample {
    pub space_type: CoordinateSpace,
    /// Axis permutation; the last `n_displayed_dims` entries are displayed.
    pub ordered_dims: Vec<usize>,
    pub n_displayed_dims: usize,
    /// Per-axis selection, indexed by array axis.
    pub index_selection: Vec<DimSelection>,
    pub tiling_method: TilingMethod,
}

impl AxisAlignedSample {
    /// Displayed axes, in display order.
    pub fn displayed_dims(&self) -> &[usize] {
        let split = self.ordered_dims.len() - self.n_displayed_dims;
        &self.ordered_dims[split..]
    }
}

/// Region of the data selected for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "region_type", rename_all = "snake_case")]
pub enum SelectedRegion {
    AxisAligned(AxisAlignedSample),
}

/// Request for an axis-aligned sample of one visual's data.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisAlignedDataRequest {
    pub id: RequestId,
    pub scene_id: SceneId,
    pub visual_id: VisualId,
    /// Minimum rendered corner per displayed axis, in array axis order.
    pub min_corner_rendered: Vec<usize>,
    pub ordered_dims: Vec<usize>,
    pub n_displayed_dims: usize,
    pub resolution_level: usize,
    pub index_selection: Vec<DimSelection>,
    /// Monotonic per (scene, visual) counter stamped by the slicer.
    pub sequence: u64,
}

impl AxisAlignedDataRequest {
    pub fn displayed_dims(&self) -> &[usize] {
        let split = self.ordered_dims.len() - self.n_displayed_dims;
        &self.ordered_dims[split..]
    }
}

/// Request for data from one store.
#[derive(Debug, Clone, PartialEq)]
pub enum DataRequest {
    AxisAligned(AxisAlignedDataRequest),
}

impl DataRequest {
    pub fn id(&self) -> RequestId {
        match self {
            DataRequest::AxisAligned(request) => request.id,
        }
    }

    pub fn scene_id(&self) -> SceneId {
        match self {
            DataRequest::AxisAligned(request) => request.scene_id,
        }
    }

    pub fn visual_id(&self) -> VisualId {
        match self {
            DataRequest::AxisAligned(request) => request.visual_id,
        }
    }

    pub fn sequence(&self) -> u64 {
        match self {
            DataRequest::AxisAligned(request) => request.sequence,
        }
    }

    pub fn set_sequence(&mut self, sequence: u64) {
        match self {
            DataRequest::AxisAligned(request) => request.sequence = sequence,
        }
    }
}

/// Sliced image data, row-major with the request's displayed axes kept
/// in array axis order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataResponse {
    pub id: RequestId,
    pub scene_id: SceneId,
    pub visual_id: VisualId,
    pub resolution_level: usize,
    pub sequence: u64,
    pub min_corner_rendered: Vec<usize>,
    pub shape: Vec<usize>,
    #[debug(skip)]
    pub data: Vec<f32>,
}

/// Projected point coordinates, `n_points` rows of `n_displayed_dims`
/// columns in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsDataResponse {
    pub id: RequestId,
    pub scene_id: SceneId,
    pub visual_id: VisualId,
    pub resolution_level: usize,
    pub sequence: u64,
    pub n_points: usize,
    pub n_displayed_dims: usize,
    #[debug(skip)]
    pub data: Vec<f32>,
}

/// Full mesh geometry; meshes are never cut by the dims selection.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDataResponse {
    pub id: RequestId,
    pub scene_id: SceneId,
    pub visual_id: VisualId,
    pub resolution_level: usize,
    pub sequence: u64,
    #[debug(skip)]
    pub vertices: Vec<[f32; 3]>,
    #[debug(skip)]
    pub faces: Vec<[i32; 3]>,
}

/// Data produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum DataResponse {
    Image(ImageDataResponse),
    Points(PointsDataResponse),
    Mesh(MeshDataResponse),
}

impl DataResponse {
    pub fn request_id(&self) -> RequestId {
        match self {
            DataResponse::Image(response) => response.id,
            DataResponse::Points(response) => response.id,
            DataResponse::Mesh(response) => response.id,
        }
    }

    pub fn scene_id(&self) -> SceneId {
        match self {
            DataResponse::Image(response) => response.scene_id,
            DataResponse::Points(response) => response.scene_id,
            DataResponse::Mesh(response) => response.scene_id,
        }
    }

    pub fn visual_id(&self) -> VisualId {
        match self {
            DataResponse::Image(response) => response.visual_id,
            DataResponse::Points(response) => response.visual_id,
            DataResponse::Mesh(response) => response.visual_id,
        }
    }

    pub fn sequence(&self) -> u64 {
        match self {
            DataResponse::Image(response) => response.sequence,
            DataResponse::Points(response) => response.sequence,
            DataResponse::Mesh(response) => response.sequence,
        }
    }
}

/// Mouse button involved in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
}

/// Keyboard modifiers held during a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseModifier {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseEventType {
    Press,
    Release,
    Move,
}

/// Mouse interaction routed to a visual, with the cursor position
/// already mapped into the visual's data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub visual_id: VisualId,
    pub event_type: MouseEventType,
    pub button: MouseButton,
    pub modifiers: Vec<MouseModifier>,
    pub coordinate: Vec<f64>,
    /// Sample value under the cursor, when the renderer picked one.
    pub pick_value: Option<f32>,
}

impl MouseEvent {
    pub fn has_modifier(&self, modifier: MouseModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}
