//! Chunked 3D arrays and visibility queries against a view frustum.

pub mod multiscale;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::geometry::{
    compute_chunk_corners_3d, frustum_planes_from_corners, point_in_frustum, BoxCorners,
    FrustumCorners, Plane,
};

/// How chunk visibility is decided from its corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkMode {
    /// Visible when any corner is inside the frustum.
    Any,
    /// Visible only when all eight corners are inside.
    All,
}

/// A 3D array cut into regular chunks, with an affine placement in
/// world coordinates: `world = local * scale + translation`.
///
/// Chunk corners are precomputed once at construction since visibility
/// tests walk all of them per query.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedArray3D {
    array_shape: [usize; 3],
    chunk_shape: [usize; 3],
    scale: [f64; 3],
    translation: [f64; 3],
    chunk_corners: Vec<BoxCorners>,
}

impl ChunkedArray3D {
    /// Chunked array in its own coordinate system (unit scale, zero
    /// translation).
    pub fn new(array_shape: [usize; 3], chunk_shape: [usize; 3]) -> Result<Self> {
        Self::with_transform(array_shape, chunk_shape, [1.0; 3], [0.0; 3])
    }

    /// Chunked array placed into world coordinates.
    pub fn with_transform(
        array_shape: [usize; 3],
        chunk_shape: [usize; 3],
        scale: [f64; 3],
        translation: [f64; 3],
    ) -> Result<Self> {
        for axis in 0..3 {
            if array_shape[axis] == 0 {
                return Err(NdviewError::invalid_shape(format!(
                    "array extent on axis {axis} must be positive"
                )));
            }
            if chunk_shape[axis] == 0 {
                return Err(NdviewError::invalid_shape(format!(
                    "chunk extent on axis {axis} must be positive"
                )));
            }
            if chunk_shape[axis] > array_shape[axis] {
                return Err(NdviewError::invalid_shape(format!(
                    "chunk extent {} on axis {axis} exceeds the array extent {}",
                    chunk_shape[axis], array_shape[axis]
                )));
            }
            if !(scale[axis].is_finite() && scale[axis] > 0.0) {
                return Err(NdviewError::invalid_shape(format!(
                    "scale on axis {axis} must be a positive number, got {}",
                    scale[axis]
                )));
            }
        }
        let chunk_corners = compute_chunk_corners_3d(array_shape, chunk_shape);
        Ok(Self {
            array_shape,
            chunk_shape,
            scale,
            translation,
            chunk_corners,
        })
    }

    pub fn array_shape(&self) -> [usize; 3] {
        self.array_shape
    }

    pub fn chunk_shape(&self) -> [usize; 3] {
        self.chunk_shape
    }

    pub fn scale(&self) -> [f64; 3] {
        self.scale
    }

    pub fn translation(&self) -> [f64; 3] {
        self.translation
    }

    pub fn n_chunks(&self) -> usize {
        self.chunk_corners.len()
    }

    /// Corners of every chunk in row-major chunk order, local coordinates.
    pub fn chunk_corners(&self) -> &[BoxCorners] {
        &self.chunk_corners
    }

    /// Center of every chunk in local coordinates.
    pub fn chunk_centers(&self) -> Vec<[f64; 3]> {
        self.chunk_corners
            .iter()
            .map(|corners| {
                let min = corners[0];
                let max = corners[7];
                [
                    (min[0] + max[0]) as f64 / 2.0,
                    (min[1] + max[1]) as f64 / 2.0,
                    (min[2] + max[2]) as f64 / 2.0,
                ]
            })
            .collect()
    }

    /// Smallest voxel extent across the three axes, in world units.
    pub fn min_voxel_size(&self) -> f64 {
        self.scale.iter().fold(f64::INFINITY, |acc, s| acc.min(*s))
    }

    /// Map world-space frustum corners into this array's local
    /// coordinates.
    pub fn local_frustum_corners(&self, corners: &FrustumCorners) -> FrustumCorners {
        let mut local = *corners;
        for quad in local.iter_mut() {
            for corner in quad.iter_mut() {
                for axis in 0..3 {
                    corner[axis] = (corner[axis] - self.translation[axis]) / self.scale[axis];
                }
            }
        }
        local
    }

    /// Visibility mask over all chunks, in chunk order. `planes` must
    /// be in the same local coordinates as the chunk corners.
    pub fn chunks_in_frustum(&self, planes: &[Plane; 6], mode: ChunkMode) -> Vec<bool> {
        self.chunk_corners
            .par_iter()
            .map(|corners| {
                let mut inside = corners.iter().map(|corner| {
                    point_in_frustum(
                        [corner[0] as f64, corner[1] as f64, corner[2] as f64],
                        planes,
                    )
                });
                match mode {
                    ChunkMode::Any => inside.any(|visible| visible),
                    ChunkMode::All => inside.all(|visible| visible),
                }
            })
            .collect()
    }

    /// Corners of the chunks visible in the frustum, in chunk order.
    pub fn visible_chunks(&self, planes: &[Plane; 6], mode: ChunkMode) -> Vec<BoxCorners> {
        self.chunks_in_frustum(planes, mode)
            .into_iter()
            .zip(self.chunk_corners.iter())
            .filter_map(|(visible, corners)| visible.then_some(*corners))
            .collect()
    }

    /// Frustum visibility starting from world-space corners.
    pub fn visible_chunks_for_world_frustum(
        &self,
        corners: &FrustumCorners,
        mode: ChunkMode,
    ) -> Vec<BoxCorners> {
        let local = self.local_frustum_corners(corners);
        let planes = frustum_planes_from_corners(&local);
        self.visible_chunks(&planes, mode)
    }
}
