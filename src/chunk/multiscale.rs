//! Resolution-level selection and texture updates for a multiscale
//! chunked array.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkMode, ChunkedArray3D};
use crate::error::{NdviewError, Result};
use crate::geometry::{
    frustum_planes_from_corners, frustum_size_from_corners, frustum_width_from_corners,
    FrustumCorners,
};

/// Default margin applied to the frustum width when picking a level.
pub const DEFAULT_WIDTH_FACTOR: f64 = 1.5;

/// Heuristic used to pick a resolution level for a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ScaleSelectionMethod {
    /// Finest level whose texture footprint covers the frustum width.
    Width,
    /// Finest level whose visible chunks fit into the texture.
    FullTextureSize,
    /// Finest level whose voxels are no smaller than a screen pixel.
    LogicalPixelSize { viewport_size: [f64; 2] },
}

/// One chunk copy within a texture update: `array_*` index the level's
/// array, `texture_*` index the target texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlacement {
    pub array_min: [usize; 3],
    pub array_max: [usize; 3],
    pub texture_min: [usize; 3],
    pub texture_max: [usize; 3],
}

/// Everything needed to refill a texture for one view: the chosen
/// level, where the texture sits in world coordinates and which chunk
/// regions to copy.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureUpdate {
    pub resolution_level: usize,
    pub origin_world: [f64; 3],
    pub chunks: Vec<ChunkPlacement>,
}

/// A stack of chunked arrays of the same data at decreasing
/// resolution, ordered finest to coarsest.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiScaleChunkedArray3D {
    levels: Vec<ChunkedArray3D>,
    min_voxel_sizes: Vec<f64>,
}

impl MultiScaleChunkedArray3D {
    pub fn new(levels: Vec<ChunkedArray3D>) -> Result<Self> {
        if levels.is_empty() {
            return Err(NdviewError::invalid_shape(
                "a multiscale array needs at least one level",
            ));
        }
        let min_voxel_sizes: Vec<f64> = levels.iter().map(|l| l.min_voxel_size()).collect();
        for (index, pair) in min_voxel_sizes.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(NdviewError::scale_order(format!(
                    "level {} has voxel size {} but level {} has {}",
                    index,
                    pair[0],
                    index + 1,
                    pair[1]
                )));
            }
        }
        Ok(Self {
            levels,
            min_voxel_sizes,
        })
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[ChunkedArray3D] {
        &self.levels
    }

    /// Smallest world-space voxel extent per level, finest first.
    pub fn min_voxel_sizes(&self) -> &[f64] {
        &self.min_voxel_sizes
    }

    /// Pick the resolution level to render for a world-space frustum.
    ///
    /// `texture_shape` is the extent of the texture the level will be
    /// copied into and bounds how much data a level may place.
    pub fn scale_from_frustum(
        &self,
        corners: &FrustumCorners,
        texture_shape: [usize; 3],
        width_factor: f64,
        method: &ScaleSelectionMethod,
    ) -> usize {
        let coarsest = self.levels.len() - 1;
        match method {
            ScaleSelectionMethod::Width => {
                let target = frustum_width_from_corners(corners) * width_factor;
                for (index, level) in self.levels.iter().enumerate() {
                    let scale = level.scale();
                    let coverage = (0..3)
                        .map(|axis| texture_shape[axis] as f64 * scale[axis])
                        .fold(f64::INFINITY, f64::min);
                    if coverage >= target {
                        return index;
                    }
                }
                coarsest
            }
            ScaleSelectionMethod::FullTextureSize => {
                // Walk coarse to fine; the first level whose visible
                // chunks overflow the texture ends the search one step
                // coarser.
                for index in (0..self.levels.len()).rev() {
                    let level = &self.levels[index];
                    let visible = level.visible_chunks_for_world_frustum(corners, ChunkMode::Any);
                    if visible.is_empty() {
                        continue;
                    }
                    let mut min = [usize::MAX; 3];
                    let mut max = [0usize; 3];
                    for chunk in &visible {
                        for axis in 0..3 {
                            min[axis] = min[axis].min(chunk[0][axis]);
                            max[axis] = max[axis].max(chunk[7][axis]);
                        }
                    }
                    let fits = (0..3).all(|axis| max[axis] - min[axis] <= texture_shape[axis]);
                    if !fits {
                        return (index + 1).min(coarsest);
                    }
                }
                0
            }
            ScaleSelectionMethod::LogicalPixelSize { viewport_size } => {
                let (frustum_w, frustum_h) = frustum_size_from_corners(corners);
                let pixel_size =
                    (frustum_w / viewport_size[0]).min(frustum_h / viewport_size[1]);
                for index in (0..self.levels.len()).rev() {
                    if self.min_voxel_sizes[index] < pixel_size {
                        return (index + 1).min(coarsest);
                    }
                }
                0
            }
        }
    }

    /// Select a level for the frustum and lay its visible chunks out in
    /// a texture of `texture_shape`. Chunks that would extend past the
    /// texture are dropped from the update.
    pub fn texture_update_for_frustum(
        &self,
        corners: &FrustumCorners,
        texture_shape: [usize; 3],
        width_factor: f64,
        method: &ScaleSelectionMethod,
    ) -> TextureUpdate {
        let resolution_level = self.scale_from_frustum(corners, texture_shape, width_factor, method);
        let level = &self.levels[resolution_level];
        let local = level.local_frustum_corners(corners);
        let planes = frustum_planes_from_corners(&local);
        let visible = level.visible_chunks(&planes, ChunkMode::Any);
        debug!(
            "texture update: level {resolution_level}, {} of {} chunks visible",
            visible.len(),
            level.n_chunks()
        );
        if visible.is_empty() {
            return TextureUpdate {
                resolution_level,
                origin_world: level.translation(),
                chunks: Vec::new(),
            };
        }

        let mut texture_origin = [usize::MAX; 3];
        for chunk in &visible {
            for axis in 0..3 {
                texture_origin[axis] = texture_origin[axis].min(chunk[0][axis]);
            }
        }
        let scale = level.scale();
        let translation = level.translation();
        let mut origin_world = [0.0; 3];
        for axis in 0..3 {
            origin_world[axis] = texture_origin[axis] as f64 * scale[axis] + translation[axis];
        }

        let mut chunks = Vec::with_capacity(visible.len());
        for chunk in &visible {
            let array_min = chunk[0];
            let array_max = chunk[7];
            let mut texture_min = [0usize; 3];
            let mut texture_max = [0usize; 3];
            for axis in 0..3 {
                texture_min[axis] = array_min[axis] - texture_origin[axis];
                texture_max[axis] = array_max[axis] - texture_origin[axis];
            }
            if (0..3).any(|axis| texture_max[axis] > texture_shape[axis]) {
                continue;
            }
            chunks.push(ChunkPlacement {
                array_min,
                array_max,
                texture_min,
                texture_max,
            });
        }
        TextureUpdate {
            resolution_level,
            origin_world,
            chunks,
        }
    }
}
