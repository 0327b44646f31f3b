//! In-memory nD image store backed by a flat buffer.

use derive_more::Debug;
use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::types::{
    AxisAlignedDataRequest, DataRequest, DataResponse, DataStoreId, DimSelection,
    ImageDataResponse, RequestId, SceneId, SelectedRegion, TilingMethod, VisualId,
};

/// Dense nD image held in memory, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMemoryStore {
    id: DataStoreId,
    name: String,
    shape: Vec<usize>,
    #[debug(skip)]
    data: Vec<f32>,
}

impl ImageMemoryStore {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        if shape.is_empty() || shape.iter().any(|extent| *extent == 0) {
            return Err(NdviewError::invalid_shape(format!(
                "image shape {shape:?} has a zero extent"
            )));
        }
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(NdviewError::invalid_shape(format!(
                "shape {shape:?} needs {expected} samples, buffer holds {}",
                data.len()
            )));
        }
        Ok(Self {
            id: DataStoreId::new(),
            name: name.into(),
            shape,
            data,
        })
    }

    /// Zero-filled image, handy as a fresh label canvas.
    pub fn zeros(name: impl Into<String>, shape: Vec<usize>) -> Result<Self> {
        let len = shape.iter().product();
        Self::new(name, shape, vec![0.0; len])
    }

    /// Build from double-precision samples; storage is always f32.
    pub fn from_f64(name: impl Into<String>, shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        Self::new(name, shape, data.into_iter().map(|v| v as f32).collect())
    }

    pub fn id(&self) -> DataStoreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Row-major strides, innermost axis last.
    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.shape.len()];
        for axis in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.shape[axis + 1];
        }
        strides
    }

    fn offset_of(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let strides = self.strides();
        let mut offset = 0;
        for ((&i, &extent), &stride) in index.iter().zip(self.shape.iter()).zip(strides.iter()) {
            if i >= extent {
                return None;
            }
            offset += i * stride;
        }
        Some(offset)
    }

    /// Sample at `index`, or `None` outside the array.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.offset_of(index).map(|offset| self.data[offset])
    }

    /// Write a sample, reporting whether `index` was inside the array.
    pub fn set(&mut self, index: &[usize], value: f32) -> bool {
        match self.offset_of(index) {
            Some(offset) => {
                self.data[offset] = value;
                true
            }
            None => false,
        }
    }

    pub fn get_data_request(
        &self,
        region: &SelectedRegion,
        scene_id: SceneId,
        visual_id: VisualId,
    ) -> Result<Vec<DataRequest>> {
        let SelectedRegion::AxisAligned(sample) = region;
        if sample.tiling_method != TilingMethod::None {
            return Err(NdviewError::UnsupportedTiling {
                method: sample.tiling_method,
            });
        }
        if sample.index_selection.len() != self.ndim() {
            return Err(NdviewError::DimensionMismatch {
                expected: self.ndim(),
                actual: sample.index_selection.len(),
            });
        }
        let displayed = sample.displayed_dims();
        let min_corner_rendered = (0..self.ndim())
            .filter(|axis| displayed.contains(axis))
            .map(|axis| sample.index_selection[axis].start())
            .collect();
        Ok(vec![DataRequest::AxisAligned(AxisAlignedDataRequest {
            id: RequestId::new(),
            scene_id,
            visual_id,
            min_corner_rendered,
            ordered_dims: sample.ordered_dims.clone(),
            n_displayed_dims: sample.n_displayed_dims,
            resolution_level: 0,
            index_selection: sample.index_selection.clone(),
            sequence: 0,
        })])
    }

    pub fn get_data(&self, request: &DataRequest) -> Result<DataResponse> {
        let DataRequest::AxisAligned(request) = request;
        if request.index_selection.len() != self.ndim() {
            return Err(NdviewError::DimensionMismatch {
                expected: self.ndim(),
                actual: request.index_selection.len(),
            });
        }
        let displayed = request.displayed_dims();

        // Per-axis half-open spans; `Index` axes collapse out of the
        // output shape, out-of-bounds indices fail the whole request.
        let mut spans = Vec::with_capacity(self.ndim());
        let mut shape = Vec::new();
        for (axis, selection) in request.index_selection.iter().enumerate() {
            let extent = self.shape[axis];
            match selection {
                DimSelection::Index(value) => {
                    if *value < 0 || *value as usize >= extent {
                        return Err(NdviewError::SelectionOutOfBounds {
                            axis,
                            index: *value,
                            extent,
                        });
                    }
                    let at = *value as usize;
                    spans.push((at, at + 1));
                }
                DimSelection::Range { .. } => {
                    if !displayed.contains(&axis) {
                        return Err(NdviewError::NonDisplayedRange { axis });
                    }
                    let (lo, hi) = selection.bounds(extent);
                    spans.push((lo, hi));
                    shape.push(hi - lo);
                }
            }
        }

        let data = self.extract(&spans);
        Ok(DataResponse::Image(ImageDataResponse {
            id: request.id,
            scene_id: request.scene_id,
            visual_id: request.visual_id,
            resolution_level: request.resolution_level,
            sequence: request.sequence,
            min_corner_rendered: request.min_corner_rendered.clone(),
            shape,
            data,
        }))
    }

    /// Copy the samples covered by per-axis half-open spans, row-major.
    fn extract(&self, spans: &[(usize, usize)]) -> Vec<f32> {
        let total: usize = spans.iter().map(|(lo, hi)| hi - lo).product();
        let mut out = Vec::with_capacity(total);
        if total == 0 {
            return out;
        }
        let strides = self.strides();
        let mut index: Vec<usize> = spans.iter().map(|(lo, _)| *lo).collect();
        'sample: loop {
            let offset: usize = index
                .iter()
                .zip(strides.iter())
                .map(|(i, stride)| i * stride)
                .sum();
            out.push(self.data[offset]);
            for axis in (0..index.len()).rev() {
                index[axis] += 1;
                if index[axis] < spans[axis].1 {
                    continue 'sample;
                }
                index[axis] = spans[axis].0;
            }
            break;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxisAlignedSample, CoordinateSpace};

    fn counting_store(shape: Vec<usize>) -> ImageMemoryStore {
        let len: usize = shape.iter().product();
        let data = (0..len).map(|i| i as f32).collect();
        ImageMemoryStore::new("counting", shape, data).unwrap()
    }

    fn sample(
        ordered_dims: Vec<usize>,
        n_displayed_dims: usize,
        index_selection: Vec<DimSelection>,
    ) -> SelectedRegion {
        SelectedRegion::AxisAligned(AxisAlignedSample {
            space_type: CoordinateSpace::World,
            ordered_dims,
            n_displayed_dims,
            index_selection,
            tiling_method: TilingMethod::None,
        })
    }

    fn single_request(store: &ImageMemoryStore, region: &SelectedRegion) -> DataRequest {
        let mut requests = store
            .get_data_request(region, SceneId::new(), VisualId::new())
            .unwrap();
        assert_eq!(requests.len(), 1);
        requests.remove(0)
    }

    #[test]
    fn shape_and_buffer_must_agree() {
        assert!(ImageMemoryStore::new("bad", vec![2, 3], vec![0.0; 5]).is_err());
        assert!(ImageMemoryStore::new("bad", vec![2, 0], vec![]).is_err());
        assert!(ImageMemoryStore::zeros("ok", vec![2, 3]).is_ok());
    }

    #[test]
    fn double_precision_input_narrows_to_f32() {
        let store = ImageMemoryStore::from_f64("narrow", vec![2], vec![0.25, f64::MAX]).unwrap();
        assert_eq!(store.data()[0], 0.25);
        assert_eq!(store.data()[1], f32::INFINITY);
    }

    #[test]
    fn plane_extraction_collapses_the_indexed_axis() {
        let store = counting_store(vec![8, 6, 4]);
        let region = sample(
            vec![0, 1, 2],
            2,
            vec![
                DimSelection::Index(5),
                DimSelection::full(),
                DimSelection::full(),
            ],
        );
        let request = single_request(&store, &region);
        let DataResponse::Image(response) = store.get_data(&request).unwrap() else {
            panic!("image store must produce an image response");
        };
        assert_eq!(response.shape, vec![6, 4]);
        assert_eq!(response.min_corner_rendered, vec![0, 0]);
        let plane_start = 5.0 * 24.0;
        assert_eq!(response.data[0], plane_start);
        assert_eq!(response.data[23], plane_start + 23.0);
        assert_eq!(response.data.len(), 24);
    }

    #[test]
    fn sub_volume_crop_reports_its_min_corner() {
        let store = ImageMemoryStore::new("ones", vec![10, 10, 10], vec![1.0; 1000]).unwrap();
        let region = sample(
            vec![0, 1, 2],
            3,
            vec![
                DimSelection::range(5, 8),
                DimSelection::range(6, 9),
                DimSelection::range(7, 10),
            ],
        );
        let request = single_request(&store, &region);
        assert_eq!(request.sequence(), 0);
        let DataResponse::Image(response) = store.get_data(&request).unwrap() else {
            panic!("image store must produce an image response");
        };
        assert_eq!(response.shape, vec![3, 3, 3]);
        assert_eq!(response.min_corner_rendered, vec![5, 6, 7]);
        assert_eq!(response.data, vec![1.0; 27]);
    }

    #[test]
    fn crops_follow_row_major_order() {
        let store = counting_store(vec![4, 5]);
        let region = sample(
            vec![0, 1],
            2,
            vec![DimSelection::range(1, 3), DimSelection::range(2, 4)],
        );
        let request = single_request(&store, &region);
        let DataResponse::Image(response) = store.get_data(&request).unwrap() else {
            panic!("image store must produce an image response");
        };
        assert_eq!(response.shape, vec![2, 2]);
        // Rows 1..3, columns 2..4 of a 4x5 counting grid.
        assert_eq!(response.data, vec![7.0, 8.0, 12.0, 13.0]);
    }

    #[test]
    fn out_of_bounds_index_fails_the_request() {
        let store = counting_store(vec![8, 6, 4]);
        let region = sample(
            vec![0, 1, 2],
            2,
            vec![
                DimSelection::Index(12),
                DimSelection::full(),
                DimSelection::full(),
            ],
        );
        let request = single_request(&store, &region);
        assert!(matches!(
            store.get_data(&request),
            Err(NdviewError::SelectionOutOfBounds {
                axis: 0,
                index: 12,
                extent: 8
            })
        ));
    }

    #[test]
    fn ranges_clamp_and_may_come_back_empty() {
        let store = counting_store(vec![10, 10]);
        let region = sample(
            vec![0, 1],
            2,
            vec![DimSelection::range(8, 14), DimSelection::range(12, 20)],
        );
        let request = single_request(&store, &region);
        let DataResponse::Image(response) = store.get_data(&request).unwrap() else {
            panic!("image store must produce an image response");
        };
        assert_eq!(response.shape, vec![2, 0]);
        assert!(response.data.is_empty());
    }

    #[test]
    fn non_displayed_axes_must_be_pinned() {
        let store = counting_store(vec![8, 6, 4]);
        let region = sample(
            vec![0, 1, 2],
            2,
            vec![
                DimSelection::range(0, 2),
                DimSelection::full(),
                DimSelection::full(),
            ],
        );
        let request = single_request(&store, &region);
        assert!(matches!(
            store.get_data(&request),
            Err(NdviewError::NonDisplayedRange { axis: 0 })
        ));
    }

    #[test]
    fn tiled_requests_are_rejected() {
        let store = counting_store(vec![8, 8]);
        let SelectedRegion::AxisAligned(mut inner) = sample(
            vec![0, 1],
            2,
            vec![DimSelection::full(), DimSelection::full()],
        );
        inner.tiling_method = TilingMethod::LogicalPixel;
        let region = SelectedRegion::AxisAligned(inner);
        assert!(matches!(
            store.get_data_request(&region, SceneId::new(), VisualId::new()),
            Err(NdviewError::UnsupportedTiling {
                method: TilingMethod::LogicalPixel
            })
        ));
    }

    #[test]
    fn point_access_bounds_checks() {
        let mut store = counting_store(vec![3, 3]);
        assert_eq!(store.get(&[1, 2]), Some(5.0));
        assert!(store.set(&[1, 2], 99.0));
        assert_eq!(store.get(&[1, 2]), Some(99.0));
        assert_eq!(store.get(&[3, 0]), None);
        assert!(!store.set(&[0, 3], 1.0));
        assert_eq!(store.get(&[0]), None);
    }
}
