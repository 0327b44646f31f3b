//! In-memory triangle-mesh store.

use std::path::Path;

use derive_more::Debug;
use log::debug;
use serde::{Deserialize, Serialize};
use wavefront_obj::obj::{self, Primitive};

use crate::error::{NdviewError, Result};
use crate::types::{
    AxisAlignedDataRequest, DataRequest, DataResponse, DataStoreId, MeshDataResponse, RequestId,
    SceneId, SelectedRegion, VisualId,
};

/// Triangle mesh held in memory. Meshes are always served whole; the
/// dims selection never cuts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshMemoryStore {
    id: DataStoreId,
    name: String,
    #[debug(skip)]
    vertices: Vec<[f32; 3]>,
    #[debug(skip)]
    faces: Vec<[i32; 3]>,
}

impl MeshMemoryStore {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<[f32; 3]>,
        faces: Vec<[i32; 3]>,
    ) -> Result<Self> {
        let n_vertices = vertices.len() as i64;
        for (index, face) in faces.iter().enumerate() {
            for &corner in face {
                if corner < 0 || corner as i64 >= n_vertices {
                    return Err(NdviewError::invalid_shape(format!(
                        "face {index} references vertex {corner} of {n_vertices}"
                    )));
                }
            }
        }
        Ok(Self {
            id: DataStoreId::new(),
            name: name.into(),
            vertices,
            faces,
        })
    }

    /// Parse OBJ text into a mesh. Multiple objects are merged; only
    /// triangle primitives are kept.
    pub fn from_obj_source(name: impl Into<String>, source: &str) -> Result<Self> {
        let obj_set = obj::parse(source.to_string())
            .map_err(|error| NdviewError::obj_parse(format!("{error:?}")))?;
        let mut vertices: Vec<[f32; 3]> = Vec::new();
        let mut faces: Vec<[i32; 3]> = Vec::new();
        for object in &obj_set.objects {
            let base = vertices.len() as i32;
            vertices.extend(
                object
                    .vertices
                    .iter()
                    .map(|v| [v.x as f32, v.y as f32, v.z as f32]),
            );
            for geometry in &object.geometry {
                for shape in &geometry.shapes {
                    match shape.primitive {
                        Primitive::Triangle(a, b, c) => {
                            faces.push([base + a.0 as i32, base + b.0 as i32, base + c.0 as i32]);
                        }
                        Primitive::Line(..) | Primitive::Point(..) => {
                            debug!("skipping non-triangle primitive in OBJ object {}", object.name);
                        }
                    }
                }
            }
        }
        if vertices.is_empty() {
            return Err(NdviewError::obj_parse("OBJ data contains no vertices"));
        }
        Self::new(name, vertices, faces)
    }

    /// Read and parse an OBJ file.
    pub fn from_obj_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_obj_source(name, &source)
    }

    pub fn id(&self) -> DataStoreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[i32; 3]] {
        &self.faces
    }

    pub fn get_data_request(
        &self,
        region: &SelectedRegion,
        scene_id: SceneId,
        visual_id: VisualId,
    ) -> Result<Vec<DataRequest>> {
        let SelectedRegion::AxisAligned(sample) = region;
        Ok(vec![DataRequest::AxisAligned(AxisAlignedDataRequest {
            id: RequestId::new(),
            scene_id,
            visual_id,
            min_corner_rendered: vec![0; sample.n_displayed_dims],
            ordered_dims: sample.ordered_dims.clone(),
            n_displayed_dims: sample.n_displayed_dims,
            resolution_level: 0,
            index_selection: sample.index_selection.clone(),
            sequence: 0,
        })])
    }

    pub fn get_data(&self, request: &DataRequest) -> Result<DataResponse> {
        let DataRequest::AxisAligned(request) = request;
        Ok(DataResponse::Mesh(MeshDataResponse {
            id: request.id,
            scene_id: request.scene_id,
            visual_id: request.visual_id,
            resolution_level: request.resolution_level,
            sequence: request.sequence,
            vertices: self.vertices.clone(),
            faces: self.faces.clone(),
        }))
    }
}
