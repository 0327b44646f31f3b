//! Visuals bind a data store to an appearance.

use serde::{Deserialize, Serialize};

use crate::types::{DataStoreId, VisualId};

/// Maximum-intensity-projection appearance for image data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMipMaterial {
    /// Contrast limits mapped to the ends of the colormap.
    pub clim: (f32, f32),
}

impl Default for ImageMipMaterial {
    fn default() -> Self {
        Self { clim: (0.0, 1.0) }
    }
}

/// Single-color appearance for point data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsUniformMaterial {
    pub color: [f32; 4],
    pub size: f32,
}

impl Default for PointsUniformMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            size: 1.0,
        }
    }
}

/// Phong-shaded appearance for mesh data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshPhongMaterial {
    pub shininess: u32,
    pub emissive: [f32; 3],
    pub specular: [f32; 3],
}

impl Default for MeshPhongMaterial {
    fn default() -> Self {
        Self {
            shininess: 30,
            emissive: [0.0, 0.0, 0.0],
            specular: [0.28, 0.28, 0.28],
        }
    }
}

/// Color-mapped appearance for label data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsMaterial {
    pub color_map: String,
}

impl Default for LabelsMaterial {
    fn default() -> Self {
        Self {
            color_map: "glasbey".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVisual {
    pub id: VisualId,
    pub name: String,
    pub data_store_id: DataStoreId,
    #[serde(default)]
    pub material: ImageMipMaterial,
}

impl ImageVisual {
    pub fn new(name: impl Into<String>, data_store_id: DataStoreId) -> Self {
        Self {
            id: VisualId::new(),
            name: name.into(),
            data_store_id,
            material: ImageMipMaterial::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsVisual {
    pub id: VisualId,
    pub name: String,
    pub data_store_id: DataStoreId,
    #[serde(default)]
    pub material: PointsUniformMaterial,
}

impl PointsVisual {
    pub fn new(name: impl Into<String>, data_store_id: DataStoreId) -> Self {
        Self {
            id: VisualId::new(),
            name: name.into(),
            data_store_id,
            material: PointsUniformMaterial::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshVisual {
    pub id: VisualId,
    pub name: String,
    pub data_store_id: DataStoreId,
    #[serde(default)]
    pub material: MeshPhongMaterial,
}

impl MeshVisual {
    pub fn new(name: impl Into<String>, data_store_id: DataStoreId) -> Self {
        Self {
            id: VisualId::new(),
            name: name.into(),
            data_store_id,
            material: MeshPhongMaterial::default(),
        }
    }
}

/// Labels rendered from an image store of integer-valued labels.
///
/// `downscale_factors` lists the factor of each stored resolution
/// level relative to the finest one; a single-scale labels image has
/// `[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelsVisual {
    pub id: VisualId,
    pub name: String,
    pub data_store_id: DataStoreId,
    #[serde(default)]
    pub material: LabelsMaterial,
    pub downscale_factors: Vec<u32>,
}

impl LabelsVisual {
    pub fn new(
        name: impl Into<String>,
        data_store_id: DataStoreId,
        downscale_factors: Vec<u32>,
    ) -> Self {
        Self {
            id: VisualId::new(),
            name: name.into(),
            data_store_id,
            material: LabelsMaterial::default(),
            downscale_factors,
        }
    }
}

/// Any renderable element of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "visual_type", rename_all = "snake_case")]
pub enum Visual {
    Image(ImageVisual),
    Points(PointsVisual),
    Mesh(MeshVisual),
    Labels(LabelsVisual),
}

impl Visual {
    pub fn id(&self) -> VisualId {
        match self {
            Visual::Image(visual) => visual.id,
            Visual::Points(visual) => visual.id,
            Visual::Mesh(visual) => visual.id,
            Visual::Labels(visual) => visual.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Visual::Image(visual) => &visual.name,
            Visual::Points(visual) => &visual.name,
            Visual::Mesh(visual) => &visual.name,
            Visual::Labels(visual) => &visual.name,
        }
    }

    pub fn data_store_id(&self) -> DataStoreId {
        match self {
            Visual::Image(visual) => visual.data_store_id,
            Visual::Points(visual) => visual.data_store_id,
            Visual::Mesh(visual) => visual.data_store_id,
            Visual::Labels(visual) => visual.data_store_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_defaults_match_the_renderer() {
        let mesh = MeshPhongMaterial::default();
        assert_eq!(mesh.shininess, 30);
        assert_eq!(mesh.specular, [0.28, 0.28, 0.28]);
        assert_eq!(ImageMipMaterial::default().clim, (0.0, 1.0));
    }

    #[test]
    fn visuals_tag_their_type_in_json() {
        let visual = Visual::Labels(LabelsVisual::new("cells", DataStoreId::new(), vec![1]));
        let text = serde_json::to_string(&visual).unwrap();
        assert!(text.contains(r#""visual_type":"labels""#));
        assert!(text.contains(r#""downscale_factors":[1]"#));
        let back: Visual = serde_json::from_str(&text).unwrap();
        assert_eq!(back, visual);
    }

    #[test]
    fn materials_deserialize_from_empty_objects() {
        let material: MeshPhongMaterial = serde_json::from_str("{}").unwrap();
        assert_eq!(material, MeshPhongMaterial::default());
    }
}
