//! Dims state of a scene: which axes exist, which are displayed and
//! where the current selection sits.

use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};
use crate::model::coords::{CoordinateSystem, RangeTuple};
use crate::types::{AxisAlignedSample, CoordinateSpace, DimSelection, TilingMethod};

/// Axis-aligned selection over all axes of a coordinate system.
///
/// `ordered_dims` is a permutation of the axes; the last
/// `n_displayed_dims` of it are rendered, every other axis is reduced
/// by its entry in `index_selection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisAlignedRegionSelector {
    pub space_type: CoordinateSpace,
    pub ordered_dims: Vec<usize>,
    pub n_displayed_dims: usize,
    pub index_selection: Vec<DimSelection>,
}

impl AxisAlignedRegionSelector {
    /// Selector displaying the last `n_displayed_dims` axes in their
    /// natural order, with every non-displayed axis pinned to 0.
    pub fn tail_view(ndim: usize, n_displayed_dims: usize) -> Self {
        let index_selection = (0..ndim)
            .map(|axis| {
                if axis + n_displayed_dims >= ndim {
                    DimSelection::full()
                } else {
                    DimSelection::Index(0)
                }
            })
            .collect();
        Self {
            space_type: CoordinateSpace::World,
            ordered_dims: (0..ndim).collect(),
            n_displayed_dims,
            index_selection,
        }
    }

    pub fn ndim(&self) -> usize {
        self.ordered_dims.len()
    }

    /// Displayed axes in display order.
    pub fn displayed_dims(&self) -> &[usize] {
        let split = self.ordered_dims.len() - self.n_displayed_dims;
        &self.ordered_dims[split..]
    }

    fn validate(&self, ndim: usize) -> Result<()> {
        if self.ordered_dims.len() != ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: self.ordered_dims.len(),
            });
        }
        if self.index_selection.len() != ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: self.index_selection.len(),
            });
        }
        if self.n_displayed_dims > ndim {
            return Err(NdviewError::DisplayedDims(self.n_displayed_dims));
        }
        let mut seen = vec![false; ndim];
        for &axis in &self.ordered_dims {
            if axis >= ndim || seen[axis] {
                return Err(NdviewError::invalid_shape(format!(
                    "ordered_dims {:?} is not a permutation of 0..{ndim}",
                    self.ordered_dims
                )));
            }
            seen[axis] = true;
        }
        Ok(())
    }

    /// Freeze the selector into the value handed to data stores.
    pub fn to_sample(&self, tiling_method: TilingMethod) -> AxisAlignedSample {
        AxisAlignedSample {
            space_type: self.space_type,
            ordered_dims: self.ordered_dims.clone(),
            n_displayed_dims: self.n_displayed_dims,
            index_selection: self.index_selection.clone(),
            tiling_method,
        }
    }
}

/// Region selection strategies a scene can use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "selector_type", rename_all = "snake_case")]
pub enum RegionSelector {
    AxisAligned(AxisAlignedRegionSelector),
}

impl RegionSelector {
    pub fn as_axis_aligned(&self) -> &AxisAlignedRegionSelector {
        match self {
            RegionSelector::AxisAligned(selector) => selector,
        }
    }

    fn validate(&self, ndim: usize) -> Result<()> {
        match self {
            RegionSelector::AxisAligned(selector) => selector.validate(ndim),
        }
    }
}

/// Dims state of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimsManager {
    coordinate_system: CoordinateSystem,
    range: Vec<RangeTuple>,
    selection: RegionSelector,
}

impl DimsManager {
    pub fn new(
        coordinate_system: CoordinateSystem,
        range: Vec<RangeTuple>,
        selection: RegionSelector,
    ) -> Result<Self> {
        let ndim = coordinate_system.ndim();
        if range.len() != ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: range.len(),
            });
        }
        for axis_range in &range {
            axis_range.validate()?;
        }
        selection.validate(ndim)?;
        Ok(Self {
            coordinate_system,
            range,
            selection,
        })
    }

    /// Dims over `0..extent` per axis, displaying the trailing axes.
    pub fn from_extents(name: &str, extents: &[usize], n_displayed_dims: usize) -> Result<Self> {
        let coordinate_system = CoordinateSystem::with_default_labels(name, extents.len());
        let range = extents
            .iter()
            .map(|extent| RangeTuple::from_extent(*extent))
            .collect();
        let selection = RegionSelector::AxisAligned(AxisAlignedRegionSelector::tail_view(
            extents.len(),
            n_displayed_dims,
        ));
        Self::new(coordinate_system, range, selection)
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn ndim(&self) -> usize {
        self.coordinate_system.ndim()
    }

    pub fn range(&self) -> &[RangeTuple] {
        &self.range
    }

    pub fn selection(&self) -> &RegionSelector {
        &self.selection
    }

    pub fn n_displayed_dims(&self) -> usize {
        match &self.selection {
            RegionSelector::AxisAligned(selector) => selector.n_displayed_dims,
        }
    }

    /// Displayed axes in display order.
    pub fn displayed_dims(&self) -> &[usize] {
        match &self.selection {
            RegionSelector::AxisAligned(selector) => selector.displayed_dims(),
        }
    }

    /// Current position along every axis. Range selections report
    /// their start (or the range minimum when unbounded).
    pub fn point(&self) -> Vec<i64> {
        let selector = self.selection.as_axis_aligned();
        selector
            .index_selection
            .iter()
            .zip(self.range.iter())
            .map(|(selection, range)| match selection {
                DimSelection::Index(value) => *value,
                DimSelection::Range { start, .. } => {
                    start.unwrap_or(range.start.floor() as i64)
                }
            })
            .collect()
    }

    /// Replace the whole selection after validating it.
    pub fn set_selection(&mut self, selection: RegionSelector) -> Result<()> {
        selection.validate(self.ndim())?;
        self.selection = selection;
        Ok(())
    }

    /// Replace the per-axis selections, keeping axis order and
    /// displayed count.
    pub fn set_index_selection(&mut self, index_selection: Vec<DimSelection>) -> Result<()> {
        if index_selection.len() != self.ndim() {
            return Err(NdviewError::DimensionMismatch {
                expected: self.ndim(),
                actual: index_selection.len(),
            });
        }
        match &mut self.selection {
            RegionSelector::AxisAligned(selector) => selector.index_selection = index_selection,
        }
        Ok(())
    }

    /// Move the selection point of one axis, clamped to the axis range.
    pub fn set_point(&mut self, axis: usize, value: i64) -> Result<()> {
        let ndim = self.ndim();
        if axis >= ndim {
            return Err(NdviewError::DimensionMismatch {
                expected: ndim,
                actual: axis + 1,
            });
        }
        let clamped = self.range[axis].clamp(value as f64).round() as i64;
        match &mut self.selection {
            RegionSelector::AxisAligned(selector) => {
                selector.index_selection[axis] = DimSelection::Index(clamped);
            }
        }
        Ok(())
    }
}
