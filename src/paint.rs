//! Painting labels into an in-memory image store.
//!
//! Brush strokes run in the displayed plane (or volume): the brush
//! mask spans the displayed axes while every other axis is pinned to
//! the cursor's slice position.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use itertools::Itertools;
use log::trace;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::model::dims::DimsManager;
use crate::model::visuals::LabelsVisual;
use crate::store::ImageMemoryStore;
use crate::types::{
    DataStoreId, MouseButton, MouseEvent, MouseEventType, MouseModifier, VisualId,
};

const BRUSH_MASK_CACHE_SIZE: usize = 64;

/// What a mouse stroke does to the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintingMode {
    /// Strokes are ignored.
    None,
    /// Strokes write the current label value.
    Paint,
    /// Strokes write the background value.
    Erase,
    /// Strokes flood-fill the connected region under the cursor.
    Fill,
}

/// Relative sample offsets of a spherical brush.
///
/// `scale` is the voxel size per painted axis; anisotropic voxels
/// shrink the mask along their coarse axes so the painted region stays
/// round in world units. The mask always contains the center sample.
/// Brush sizes below one sample are treated as a single sample.
pub fn sphere_indices(radius: f64, scale: &[f64]) -> Vec<Vec<i64>> {
    if scale.is_empty() {
        return Vec::new();
    }
    let abs_scale: Vec<f64> = scale.iter().map(|s| s.abs().max(1e-9)).collect();
    let min_scale = abs_scale.iter().fold(f64::INFINITY, |acc, s| acc.min(*s));
    let scale_normalized: Vec<f64> = abs_scale.iter().map(|s| s / min_scale).collect();

    let ranges: Vec<Vec<i64>> = scale_normalized
        .iter()
        .map(|normalized| {
            let reach = radius / normalized + 0.5;
            (-(reach.ceil() as i64)..=(reach.floor() as i64)).collect()
        })
        .collect();

    let radius_squared = radius * radius;
    ranges
        .into_iter()
        .multi_cartesian_product()
        .filter(|offsets| {
            offsets
                .iter()
                .zip(scale_normalized.iter())
                .map(|(offset, normalized)| {
                    let distance = *offset as f64 * normalized;
                    distance * distance
                })
                .sum::<f64>()
                <= radius_squared
        })
        .collect()
}

/// Sample positions along a cursor move, roughly four per brush width.
///
/// The segment start is excluded (the previous stroke painted it)
/// unless the move is too short to add samples.
pub fn interpolate_coordinates(old: &[f64], new: &[f64], brush_size: f64) -> Vec<Vec<f64>> {
    let max_delta = old
        .iter()
        .zip(new.iter())
        .map(|(a, b)| (b - a).abs())
        .fold(0.0, f64::max);
    let num_step = (max_delta / brush_size.max(1.0) * 4.0).round() as usize;
    let n_samples = num_step + 1;
    let mut samples = Vec::with_capacity(n_samples);
    for step in 0..n_samples {
        let t = if n_samples == 1 {
            0.0
        } else {
            step as f64 / (n_samples - 1) as f64
        };
        samples.push(
            old.iter()
                .zip(new.iter())
                .map(|(a, b)| a + (b - a) * t)
                .collect(),
        );
    }
    if samples.len() > 1 {
        samples.remove(0);
    }
    samples
}

#[derive(PartialEq, Eq, Hash)]
struct BrushKey {
    radius_bits: u64,
    scale_bits: Vec<u64>,
}

/// LRU cache of brush masks keyed by radius and voxel scale.
pub struct BrushMaskCache {
    cache: LruCache<BrushKey, Arc<Vec<Vec<i64>>>>,
}

impl BrushMaskCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
        }
    }

    pub fn get_or_compute(&mut self, radius: f64, scale: &[f64]) -> Arc<Vec<Vec<i64>>> {
        let key = BrushKey {
            radius_bits: radius.to_bits(),
            scale_bits: scale.iter().map(|s| s.to_bits()).collect(),
        };
        if let Some(mask) = self.cache.get(&key) {
            return Arc::clone(mask);
        }
        let mask = Arc::new(sphere_indices(radius, scale));
        self.cache.put(key, Arc::clone(&mask));
        mask
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

struct DragState {
    last_cursor: Vec<f64>,
}

/// Paints mouse strokes into the label image behind a labels visual.
///
/// Painting is only defined for single-scale labels; callers pull the
/// axis ordering from the scene's dims via [`update_dims`] whenever it
/// changes.
///
/// [`update_dims`]: LabelsPaintingManager::update_dims
pub struct LabelsPaintingManager {
    visual_id: VisualId,
    store_id: DataStoreId,
    mode: PaintingMode,
    brush_size: f64,
    value_to_paint: f32,
    background_value: f32,
    ordered_dims: Vec<usize>,
    n_displayed_dims: usize,
    scale: Vec<f64>,
    drag: Option<DragState>,
    masks: BrushMaskCache,
}

impl LabelsPaintingManager {
    pub fn new(visual: &LabelsVisual, mode: PaintingMode) -> Result<Self> {
        if visual.downscale_factors.len() != 1 {
            return Err(NdviewError::MultiscalePaint {
                n_levels: visual.downscale_factors.len(),
            });
        }
        Ok(Self {
            visual_id: visual.id,
            store_id: visual.data_store_id,
            mode,
            brush_size: 10.0,
            value_to_paint: 2.0,
            background_value: 0.0,
            ordered_dims: Vec::new(),
            n_displayed_dims: 2,
            scale: Vec::new(),
            drag: None,
            masks: BrushMaskCache::new(BRUSH_MASK_CACHE_SIZE),
        })
    }

    pub fn visual_id(&self) -> VisualId {
        self.visual_id
    }

    pub fn store_id(&self) -> DataStoreId {
        self.store_id
    }

    pub fn mode(&self) -> PaintingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PaintingMode) {
        self.mode = mode;
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Brush diameter in samples, at least one.
    pub fn set_brush_size(&mut self, brush_size: f64) {
        self.brush_size = brush_size.max(1.0);
    }

    pub fn value_to_paint(&self) -> f32 {
        self.value_to_paint
    }

    pub fn set_value_to_paint(&mut self, value: f32) {
        self.value_to_paint = value;
    }

    /// Per-axis voxel size, used to keep brushes round on anisotropic
    /// data. Missing axes default to one.
    pub fn set_scale(&mut self, scale: Vec<f64>) {
        self.scale = scale;
    }

    /// Pull axis ordering and displayed count from a scene's dims.
    pub fn update_dims(&mut self, dims: &DimsManager) {
        let selector = dims.selection().as_axis_aligned();
        self.ordered_dims = selector.ordered_dims.clone();
        self.n_displayed_dims = selector.n_displayed_dims;
    }

    /// Painted axes in array-axis order: the displayed tail of the
    /// ordering, or the trailing axes until dims state arrives.
    fn dims_to_paint(&self, ndim: usize) -> Result<Vec<usize>> {
        if self.ordered_dims.is_empty() {
            let n = self.n_displayed_dims.min(ndim);
            return Ok(((ndim - n)..ndim).collect());
        }
        if self.ordered_dims.len() != ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: self.ordered_dims.len(),
            });
        }
        let split = ndim - self.n_displayed_dims.min(ndim);
        let mut dims = self.ordered_dims[split..].to_vec();
        dims.sort_unstable();
        Ok(dims)
    }

    /// Stamp the brush at `coordinate`, returning how many samples
    /// were written. Mask samples outside the array are clipped.
    pub fn paint(
        &mut self,
        store: &mut ImageMemoryStore,
        coordinate: &[f64],
        label: f32,
    ) -> Result<usize> {
        let ndim = store.ndim();
        if coordinate.len() != ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: coordinate.len(),
            });
        }
        let dims_to_paint = self.dims_to_paint(ndim)?;
        let paint_scale: Vec<f64> = dims_to_paint
            .iter()
            .map(|&axis| self.scale.get(axis).copied().unwrap_or(1.0))
            .collect();
        let radius = (self.brush_size / 2.0).floor() + 0.5;
        let mask = self.masks.get_or_compute(radius, &paint_scale);

        // Non-painted axes are pinned to the cursor's slice position.
        let mut base = vec![0usize; ndim];
        for axis in 0..ndim {
            if dims_to_paint.contains(&axis) {
                continue;
            }
            let slice_position = coordinate[axis].round() as i64;
            if slice_position < 0 || slice_position as usize >= store.shape()[axis] {
                return Ok(0);
            }
            base[axis] = slice_position as usize;
        }
        let center: Vec<i64> = dims_to_paint
            .iter()
            .map(|&axis| coordinate[axis].round() as i64)
            .collect();

        let mut written = 0;
        'sample: for offsets in mask.iter() {
            let mut index = base.clone();
            for (position, &axis) in dims_to_paint.iter().enumerate() {
                let target = center[position] + offsets[position];
                if target < 0 {
                    continue 'sample;
                }
                index[axis] = target as usize;
            }
            if store.set(&index, label) {
                written += 1;
            }
        }
        trace!("painted {written} samples at {coordinate:?}");
        Ok(written)
    }

    /// Flood-fill the connected region under the cursor within the
    /// displayed plane or volume, returning how many samples changed.
    pub fn fill(
        &mut self,
        store: &mut ImageMemoryStore,
        coordinate: &[f64],
        new_label: f32,
    ) -> Result<usize> {
        let ndim = store.ndim();
        if coordinate.len() != ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: coordinate.len(),
            });
        }
        let dims_to_paint = self.dims_to_paint(ndim)?;

        let mut start = vec![0usize; ndim];
        for axis in 0..ndim {
            let position = coordinate[axis].round() as i64;
            if position < 0 || position as usize >= store.shape()[axis] {
                return Ok(0);
            }
            start[axis] = position as usize;
        }
        let target = match store.get(&start) {
            Some(value) => value,
            None => return Ok(0),
        };
        if target == new_label {
            return Ok(0);
        }

        // Writing the new label doubles as the visited mark.
        store.set(&start, new_label);
        let mut written = 1;
        let mut queue = VecDeque::from([start]);
        while let Some(index) = queue.pop_front() {
            for &axis in &dims_to_paint {
                for step in [-1i64, 1] {
                    let neighbor_position = index[axis] as i64 + step;
                    if neighbor_position < 0
                        || neighbor_position as usize >= store.shape()[axis]
                    {
                        continue;
                    }
                    let mut neighbor = index.clone();
                    neighbor[axis] = neighbor_position as usize;
                    if store.get(&neighbor) == Some(target) {
                        store.set(&neighbor, new_label);
                        written += 1;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        trace!("filled {written} samples from {coordinate:?}");
        Ok(written)
    }

    /// Route a mouse event into paint actions. Only unmodified
    /// left-button strokes paint; anything else ends the stroke.
    pub fn on_mouse_event(
        &mut self,
        store: &mut ImageMemoryStore,
        event: &MouseEvent,
    ) -> Result<usize> {
        match event.event_type {
            MouseEventType::Press => {
                if event.button != MouseButton::Left
                    || event.has_modifier(MouseModifier::Shift)
                    || self.mode == PaintingMode::None
                {
                    return Ok(0);
                }
                let written =
                    self.apply_stroke(store, &event.coordinate.clone(), &event.coordinate)?;
                self.drag = Some(DragState {
                    last_cursor: event.coordinate.clone(),
                });
                Ok(written)
            }
            MouseEventType::Move => {
                if self.drag.is_none() {
                    return Ok(0);
                }
                if event.button != MouseButton::Left {
                    self.drag = None;
                    return Ok(0);
                }
                let last = match &self.drag {
                    Some(drag) => drag.last_cursor.clone(),
                    None => return Ok(0),
                };
                let written = self.apply_stroke(store, &last, &event.coordinate)?;
                self.drag = Some(DragState {
                    last_cursor: event.coordinate.clone(),
                });
                Ok(written)
            }
            MouseEventType::Release => {
                self.drag = None;
                Ok(0)
            }
        }
    }

    fn apply_stroke(
        &mut self,
        store: &mut ImageMemoryStore,
        last: &[f64],
        current: &[f64],
    ) -> Result<usize> {
        let label = match self.mode {
            PaintingMode::Erase => self.background_value,
            _ => self.value_to_paint,
        };
        let samples = interpolate_coordinates(last, current, self.brush_size);
        let mut written = 0;
        for sample in &samples {
            // Volume strokes only land on existing labels; empty air
            // between the camera and the data is passed through.
            if self.n_displayed_dims == 3 && self.is_background(store, sample) {
                continue;
            }
            written += match self.mode {
                PaintingMode::Paint | PaintingMode::Erase => self.paint(store, sample, label)?,
                PaintingMode::Fill => self.fill(store, sample, label)?,
                PaintingMode::None => 0,
            };
        }
        Ok(written)
    }

    fn is_background(&self, store: &ImageMemoryStore, coordinate: &[f64]) -> bool {
        let index: Option<Vec<usize>> = coordinate
            .iter()
            .map(|c| {
                let position = c.round() as i64;
                (position >= 0).then_some(position as usize)
            })
            .collect();
        match index {
            Some(index) => store
                .get(&index)
                .map_or(true, |value| value == self.background_value),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_2d() -> LabelsPaintingManager {
        let visual = LabelsVisual::new("labels", DataStoreId::new(), vec![1]);
        let mut manager = LabelsPaintingManager::new(&visual, PaintingMode::Paint).unwrap();
        manager.set_brush_size(1.0);
        manager
    }

    #[test]
    fn multiscale_labels_cannot_be_painted() {
        let visual = LabelsVisual::new("pyramid", DataStoreId::new(), vec![1, 2, 4]);
        assert!(matches!(
            LabelsPaintingManager::new(&visual, PaintingMode::Paint),
            Err(NdviewError::MultiscalePaint { n_levels: 3 })
        ));
    }

    #[test]
    fn point_brush_covers_one_sample() {
        assert_eq!(sphere_indices(0.5, &[1.0, 1.0]), vec![vec![0, 0]]);
    }

    #[test]
    fn isotropic_brush_grows_into_a_disk() {
        let mask = sphere_indices(1.5, &[1.0, 1.0]);
        assert_eq!(mask.len(), 9);
        assert!(mask.contains(&vec![0, 0]));
        assert!(mask.contains(&vec![-1, -1]));
        assert!(mask.contains(&vec![1, 1]));
        assert!(!mask.contains(&vec![2, 0]));
    }

    #[test]
    fn anisotropic_scale_shrinks_the_coarse_axis() {
        let mask = sphere_indices(1.5, &[1.0, 2.0]);
        assert_eq!(mask, vec![vec![-1, 0], vec![0, 0], vec![1, 0]]);
    }

    #[test]
    fn stroke_interpolation_spaces_by_brush_size() {
        let samples = interpolate_coordinates(&[0.0, 0.0], &[4.0, 0.0], 2.0);
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0], vec![0.5, 0.0]);
        assert_eq!(samples[7], vec![4.0, 0.0]);

        // A stationary cursor keeps its single sample.
        let samples = interpolate_coordinates(&[1.0, 1.0], &[1.0, 1.0], 2.0);
        assert_eq!(samples, vec![vec![1.0, 1.0]]);
    }

    #[test]
    fn masks_are_cached_by_radius_and_scale() {
        let mut cache = BrushMaskCache::new(4);
        let first = cache.get_or_compute(1.5, &[1.0, 1.0]);
        let again = cache.get_or_compute(1.5, &[1.0, 1.0]);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 1);
        cache.get_or_compute(1.5, &[1.0, 2.0]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn mask_cache_evicts_the_least_recently_used_entry() {
        let mut cache = BrushMaskCache::new(2);
        let small = cache.get_or_compute(0.5, &[1.0, 1.0]);
        let medium = cache.get_or_compute(1.5, &[1.0, 1.0]);
        assert_eq!(cache.len(), 2);

        // Touching the older entry makes the other one the eviction
        // candidate for the next insert.
        assert!(Arc::ptr_eq(&small, &cache.get_or_compute(0.5, &[1.0, 1.0])));
        cache.get_or_compute(2.5, &[1.0, 1.0]);
        assert_eq!(cache.len(), 2);

        assert!(Arc::ptr_eq(&small, &cache.get_or_compute(0.5, &[1.0, 1.0])));
        assert!(!Arc::ptr_eq(
            &medium,
            &cache.get_or_compute(1.5, &[1.0, 1.0])
        ));
    }

    #[test]
    fn mask_cache_never_grows_past_its_capacity() {
        let mut cache = BrushMaskCache::new(BRUSH_MASK_CACHE_SIZE);
        for step in 0..BRUSH_MASK_CACHE_SIZE + 8 {
            cache.get_or_compute(0.5, &[1.0 + step as f64, 1.0]);
            assert!(cache.len() <= BRUSH_MASK_CACHE_SIZE);
        }
        assert_eq!(cache.len(), BRUSH_MASK_CACHE_SIZE);
    }

    #[test]
    fn painting_stamps_a_disk() {
        let mut store = ImageMemoryStore::zeros("labels", vec![5, 5]).unwrap();
        let mut manager = manager_2d();
        manager.set_brush_size(3.0);

        let written = manager.paint(&mut store, &[2.0, 2.0], 7.0).unwrap();
        assert_eq!(written, 9);
        assert_eq!(store.get(&[2, 2]), Some(7.0));
        assert_eq!(store.get(&[1, 1]), Some(7.0));
        assert_eq!(store.get(&[3, 3]), Some(7.0));
        assert_eq!(store.get(&[0, 0]), Some(0.0));
    }

    #[test]
    fn painting_clips_at_the_array_edge() {
        let mut store = ImageMemoryStore::zeros("labels", vec![5, 5]).unwrap();
        let mut manager = manager_2d();
        manager.set_brush_size(3.0);

        let written = manager.paint(&mut store, &[0.0, 0.0], 7.0).unwrap();
        assert_eq!(written, 4);
        assert_eq!(store.get(&[0, 0]), Some(7.0));
        assert_eq!(store.get(&[1, 1]), Some(7.0));
    }

    #[test]
    fn planar_painting_pins_the_slice_axis() {
        let mut store = ImageMemoryStore::zeros("labels", vec![3, 5, 5]).unwrap();
        let mut manager = manager_2d();

        let written = manager.paint(&mut store, &[1.0, 2.0, 2.0], 5.0).unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.get(&[1, 2, 2]), Some(5.0));
        assert_eq!(store.get(&[0, 2, 2]), Some(0.0));
        assert_eq!(store.get(&[2, 2, 2]), Some(0.0));

        // Slice position outside the array paints nothing.
        assert_eq!(manager.paint(&mut store, &[9.0, 2.0, 2.0], 5.0).unwrap(), 0);
    }

    #[test]
    fn fill_replaces_the_connected_region() {
        // Left half zeros, right half ones.
        let mut data = vec![0.0; 16];
        for row in 0..4 {
            data[row * 4 + 2] = 1.0;
            data[row * 4 + 3] = 1.0;
        }
        let mut store = ImageMemoryStore::new("labels", vec![4, 4], data).unwrap();
        let mut manager = manager_2d();
        manager.set_mode(PaintingMode::Fill);

        let written = manager.fill(&mut store, &[0.0, 0.0], 5.0).unwrap();
        assert_eq!(written, 8);
        assert_eq!(store.get(&[3, 1]), Some(5.0));
        assert_eq!(store.get(&[0, 2]), Some(1.0));

        // Filling with the value already present is a no-op.
        assert_eq!(manager.fill(&mut store, &[0.0, 2.0], 1.0).unwrap(), 0);
    }

    #[test]
    fn fill_stays_in_the_displayed_plane() {
        let mut store = ImageMemoryStore::zeros("labels", vec![2, 3, 3]).unwrap();
        let mut manager = manager_2d();
        manager.set_mode(PaintingMode::Fill);

        let written = manager.fill(&mut store, &[0.0, 1.0, 1.0], 7.0).unwrap();
        assert_eq!(written, 9);
        assert_eq!(store.get(&[0, 0, 0]), Some(7.0));
        assert_eq!(store.get(&[1, 1, 1]), Some(0.0));
    }

    fn press(coordinate: Vec<f64>, visual_id: VisualId) -> MouseEvent {
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
    fn only_plain_left_presses_paint() {
        let mut store = ImageMemoryStore::zeros("labels", vec![5, 5]).unwrap();
        let mut manager = manager_2d();
        let visual_id = manager.visual_id();

        let mut event = press(vec![2.0, 2.0], visual_id);
        event.button = MouseButton::Right;
        assert_eq!(manager.on_mouse_event(&mut store, &event).unwrap(), 0);

        let mut event = press(vec![2.0, 2.0], visual_id);
        event.modifiers = vec![MouseModifier::Shift];
        assert_eq!(manager.on_mouse_event(&mut store, &event).unwrap(), 0);

        manager.set_mode(PaintingMode::None);
        let event = press(vec![2.0, 2.0], visual_id);
        assert_eq!(manager.on_mouse_event(&mut store, &event).unwrap(), 0);

        manager.set_mode(PaintingMode::Paint);
        let event = press(vec![2.0, 2.0], visual_id);
        assert_eq!(manager.on_mouse_event(&mut store, &event).unwrap(), 1);
        assert_eq!(store.get(&[2, 2]), Some(2.0));
    }

    #[test]
    fn drags_paint_interpolated_strokes() {
        let mut store = ImageMemoryStore::zeros("labels", vec![8, 3]).unwrap();
        let mut manager = manager_2d();
        manager.set_brush_size(2.0);
        let visual_id = manager.visual_id();

        manager
            .on_mouse_event(&mut store, &press(vec![0.0, 1.0], visual_id))
            .unwrap();
        let drag = MouseEvent {
            visual_id,
            event_type: MouseEventType::Move,
            button: MouseButton::Left,
            modifiers: vec![],
            coordinate: vec![6.0, 1.0],
            pick_value: None,
        };
        manager.on_mouse_event(&mut store, &drag).unwrap();

        // The whole path between press and drag position is labelled.
        for row in 0..7 {
            assert_eq!(store.get(&[row, 1]), Some(2.0), "row {row}");
        }

        // Releasing ends the stroke; further moves are ignored.
        let release = MouseEvent {
            visual_id,
            event_type: MouseEventType::Release,
            button: MouseButton::None,
            modifiers: vec![],
            coordinate: vec![6.0, 1.0],
            pick_value: None,
        };
        manager.on_mouse_event(&mut store, &release).unwrap();
        let mut stray = drag.clone();
        stray.coordinate = vec![7.0, 1.0];
        let written = manager.on_mouse_event(&mut store, &stray).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn volume_strokes_pass_through_background() {
        let mut store = ImageMemoryStore::zeros("labels", vec![3, 3, 3]).unwrap();
        let visual = LabelsVisual::new("labels", DataStoreId::new(), vec![1]);
        let mut manager = LabelsPaintingManager::new(&visual, PaintingMode::Paint).unwrap();
        manager.set_brush_size(1.0);
        let dims = DimsManager::from_extents("labels", &[3, 3, 3], 3).unwrap();
        manager.update_dims(&dims);

        let visual_id = manager.visual_id();
        let on_air = manager
            .on_mouse_event(&mut store, &press(vec![1.0, 1.0, 1.0], visual_id))
            .unwrap();
        assert_eq!(on_air, 0);

        store.set(&[1, 1, 1], 3.0);
        let on_label = manager
            .on_mouse_event(&mut store, &press(vec![1.0, 1.0, 1.0], visual_id))
            .unwrap();
        assert_eq!(on_label, 1);
        assert_eq!(store.get(&[1, 1, 1]), Some(2.0));
    }

    #[test]
    fn dims_updates_change_the_painted_axes() {
        let mut manager = manager_2d();
        let dims = DimsManager::from_extents("labels", &[4, 4, 4], 3).unwrap();
        manager.update_dims(&dims);
        assert_eq!(manager.dims_to_paint(3).unwrap(), vec![0, 1, 2]);
        assert!(manager.dims_to_paint(4).is_err());
    }
}
