//! Named coordinate systems and per-axis navigation ranges.

use serde::{Deserialize, Serialize};

use crate::error::{NdviewError, Result};

/// An ordered set of named axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    name: String,
    axis_labels: Vec<String>,
}

impl CoordinateSystem {
    pub fn new(name: impl Into<String>, axis_labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            axis_labels,
        }
    }

    /// Coordinate system with axes labelled `dim_0 .. dim_{n-1}`.
    pub fn with_default_labels(name: impl Into<String>, ndim: usize) -> Self {
        let axis_labels = (0..ndim).map(|axis| format!("dim_{axis}")).collect();
        Self::new(name, axis_labels)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axis_labels(&self) -> &[String] {
        &self.axis_labels
    }

    pub fn ndim(&self) -> usize {
        self.axis_labels.len()
    }
}

/// Navigable extent of one axis as a half-open `[start, stop)` range
/// with a step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTuple {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl RangeTuple {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Unit-step range over `0..extent`.
    pub fn from_extent(extent: usize) -> Self {
        Self::new(0.0, extent as f64, 1.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(NdviewError::invalid_shape(format!(
                "range step must be positive, got {}",
                self.step
            )));
        }
        if self.stop < self.start {
            return Err(NdviewError::invalid_shape(format!(
                "range stop {} lies before start {}",
                self.stop, self.start
            )));
        }
        Ok(())
    }

    /// Clamp a coordinate into the navigable extent.
    pub fn clamp(&self, value: f64) -> f64 {
        let last = (self.stop - self.step).max(self.start);
        value.clamp(self.start, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels_are_numbered() {
        let system = CoordinateSystem::with_default_labels("data", 4);
        assert_eq!(system.ndim(), 4);
        assert_eq!(system.axis_labels()[0], "dim_0");
        assert_eq!(system.axis_labels()[3], "dim_3");
    }

    #[test]
    fn range_validation_rejects_bad_steps() {
        assert!(RangeTuple::new(0.0, 10.0, 1.0).validate().is_ok());
        assert!(RangeTuple::new(0.0, 10.0, 0.0).validate().is_err());
        assert!(RangeTuple::new(0.0, 10.0, -1.0).validate().is_err());
        assert!(RangeTuple::new(10.0, 0.0, 1.0).validate().is_err());
    }

    #[test]
    fn clamp_keeps_values_inside_the_range() {
        let range = RangeTuple::from_extent(11);
        assert_eq!(range.clamp(-3.0), 0.0);
        assert_eq!(range.clamp(5.0), 5.0);
        assert_eq!(range.clamp(99.0), 10.0);
    }
}
