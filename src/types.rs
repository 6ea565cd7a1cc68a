use serde::{Deserialize, Serialize};

use crate::error::{AnchorageError, Result};

/// Shape of one multi-channel 2D input sample, laid out channel-major when
/// flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl InputShape {
    /// Flattened length of one sample.
    pub fn volume(&self) -> usize {
        self.channels * self.height * self.width
    }
}

/// Row and column step of the sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stride {
    pub row: usize,
    pub col: usize,
}

/// Height and width of the sliding window. The window always spans the full
/// channel depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterShape {
    pub height: usize,
    pub width: usize,
}

/// Sliding-window geometry for patch extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub input_shape: InputShape,
    pub stride: Stride,
    pub filter_shape: FilterShape,
}

impl Geometry {
    /// Number of window positions along (rows, cols). Zero when the window
    /// does not fit the input.
    pub fn patch_grid(&self) -> (usize, usize) {
        if self.stride.row == 0 || self.stride.col == 0 {
            return (0, 0);
        }
        let InputShape { height, width, .. } = self.input_shape;
        if self.filter_shape.height > height || self.filter_shape.width > width {
            return (0, 0);
        }
        let rows = (height - self.filter_shape.height) / self.stride.row + 1;
        let cols = (width - self.filter_shape.width) / self.stride.col + 1;
        (rows, cols)
    }

    /// Length of one flattened patch vector.
    pub fn patch_len(&self) -> usize {
        self.input_shape.channels * self.filter_shape.height * self.filter_shape.width
    }

    /// Reject degenerate geometry before any extraction work.
    pub fn validate(&self) -> Result<()> {
        if self.input_shape.channels == 0
            || self.input_shape.height == 0
            || self.input_shape.width == 0
        {
            return Err(AnchorageError::Configuration(format!(
                "input shape has a zero dimension: {:?}",
                self.input_shape
            )));
        }
        if self.stride.row == 0 || self.stride.col == 0 {
            return Err(AnchorageError::Configuration(format!(
                "stride must be nonzero in both directions: {:?}",
                self.stride
            )));
        }
        if self.filter_shape.height == 0 || self.filter_shape.width == 0 {
            return Err(AnchorageError::Configuration(format!(
                "window has a zero dimension: {:?}",
                self.filter_shape
            )));
        }
        Ok(())
    }
}

/// Clustering backend selector.
///
/// A closed enum rather than a free-form tag: an unknown name fails to
/// deserialize instead of silently routing to a fallback backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Exact k-means with restarts, Euclidean distance.
    #[serde(alias = "km")]
    Exact,
    /// Mini-batch k-means, Euclidean distance.
    #[default]
    #[serde(alias = "mbk")]
    MiniBatch,
    /// Cosine-similarity k-means; numerical stability is best-effort.
    #[serde(alias = "cosine")]
    CosineCustom,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Exact => write!(f, "exact"),
            Metric::MiniBatch => write!(f, "mini_batch"),
            Metric::CosineCustom => write!(f, "cosine_custom"),
        }
    }
}
