//! In-memory point-cloud store.

use derive_more::Debug;
use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::types::{
    AxisAlignedDataRequest, DataRequest, DataResponse, DataStoreId, PointsDataResponse, RequestId,
    SceneId, SelectedRegion, TilingMethod, VisualId,
};

/// Scattered nD coordinates held in memory as flat rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsMemoryStore {
    id: DataStoreId,
    name: String,
    dimensionality: usize,
    #[debug(skip)]
    coordinates: Vec<f32>,
}

impl PointsMemoryStore {
    pub fn new(
        name: impl Into<String>,
        dimensionality: usize,
        coordinates: Vec<f32>,
    ) -> Result<Self> {
        if dimensionality == 0 {
            return Err(NdviewError::invalid_shape(
                "points need at least one dimension",
            ));
        }
        if coordinates.len() % dimensionality != 0 {
            return Err(NdviewError::invalid_shape(format!(
                "{} coordinates do not divide into rows of {dimensionality}",
                coordinates.len()
            )));
        }
        Ok(Self {
            id: DataStoreId::new(),
            name: name.into(),
            dimensionality,
            coordinates,
        })
    }

    /// Build from one row per point.
    pub fn from_rows(name: impl Into<String>, rows: &[Vec<f32>]) -> Result<Self> {
        let dimensionality = rows.first().map_or(0, |row| row.len());
        for row in rows {
            if row.len() != dimensionality {
                return Err(NdviewError::invalid_shape(format!(
                    "point rows mix {dimensionality} and {} columns",
                    row.len()
                )));
            }
        }
        let coordinates = rows.iter().flatten().copied().collect();
        Self::new(name, dimensionality, coordinates)
    }

    /// Build from double-precision coordinates; storage is always f32.
    pub fn from_f64(
        name: impl Into<String>,
        dimensionality: usize,
        coordinates: Vec<f64>,
    ) -> Result<Self> {
        Self::new(
            name,
            dimensionality,
            coordinates.into_iter().map(|v| v as f32).collect(),
        )
    }

    pub fn id(&self) -> DataStoreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    pub fn n_points(&self) -> usize {
        self.coordinates.len() / self.dimensionality
    }

    fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dimensionality;
        &self.coordinates[start..start + self.dimensionality]
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
        if sample.index_selection.len() != self.dimensionality {
            return Err(NdviewError::DimensionMismatch {
                expected: self.dimensionality,
                actual: sample.index_selection.len(),
            });
        }
        let displayed = sample.displayed_dims();
        let min_corner_rendered = (0..self.dimensionality)
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

    /// Keep the points whose non-displayed coordinates fall inside the
    /// selection intervals, then project onto the displayed axes.
    pub fn get_data(&self, request: &DataRequest) -> Result<DataResponse> {
        let DataRequest::AxisAligned(request) = request;
        if request.index_selection.len() != self.dimensionality {
            return Err(NdviewError::DimensionMismatch {
                expected: self.dimensionality,
                actual: request.index_selection.len(),
            });
        }
        let displayed = request.displayed_dims();
        // Closed intervals; an Index selection keeps the coordinate
        // plane it names, a Range keeps everything inside its margins.
        let filters: Vec<(usize, f64, f64)> = (0..self.dimensionality)
            .filter(|axis| !displayed.contains(axis))
            .map(|axis| {
                let (low, high) = request.index_selection[axis].interval();
                (axis, low, high)
            })
            .collect();

        let mut data = Vec::new();
        let mut n_points = 0;
        for index in 0..self.n_points() {
            let row = self.row(index);
            let keep = filters.iter().all(|(axis, low, high)| {
                let value = row[*axis] as f64;
                *low <= value && value <= *high
            });
            if !keep {
                continue;
            }
            n_points += 1;
            for &axis in displayed {
                data.push(row[axis]);
            }
        }

        Ok(DataResponse::Points(PointsDataResponse {
            id: request.id,
            scene_id: request.scene_id,
            visual_id: request.visual_id,
            resolution_level: request.resolution_level,
            sequence: request.sequence,
            n_points,
            n_displayed_dims: displayed.len(),
            data,
        }))
    }
}
