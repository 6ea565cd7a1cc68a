//! Patch extraction and sample-pool construction.
//!
//! A patch is a flattened sliding-window extract from a multi-channel 2D
//! sample, standing in for a convolution receptive field. Traversal is
//! row-major: every column position of a row is visited before the row
//! advances.

use tracing::debug;

use crate::error::{AnchorageError, Result};
use crate::progress::ProgressObserver;
use crate::types::Geometry;

/// Extract flattened window patches from one flattened sample.
///
/// The sample is laid out channel-major (`channels * height * width`) and
/// its length must equal `geometry.input_shape.volume()`; each patch
/// concatenates the window from every channel in channel order. Trailing
/// pixels that do not fit a full window are dropped, never padded. A window
/// larger than the input yields an empty vec; callers that require patches
/// must check for emptiness.
pub fn extract_patches(sample: &[f32], geometry: &Geometry) -> Vec<Vec<f32>> {
    debug_assert_eq!(sample.len(), geometry.input_shape.volume());
    let shape = geometry.input_shape;
    let window_h = geometry.filter_shape.height;
    let window_w = geometry.filter_shape.width;
    let (grid_rows, grid_cols) = geometry.patch_grid();

    let mut patches = Vec::with_capacity(grid_rows * grid_cols);
    if grid_rows == 0 || grid_cols == 0 {
        return patches;
    }

    let mut row_offset = 0;
    while row_offset + window_h <= shape.height {
        let mut col_offset = 0;
        while col_offset + window_w <= shape.width {
            let mut patch = Vec::with_capacity(geometry.patch_len());
            for channel in 0..shape.channels {
                let base = channel * shape.height * shape.width;
                for row in row_offset..row_offset + window_h {
                    let start = base + row * shape.width + col_offset;
                    patch.extend_from_slice(&sample[start..start + window_w]);
                }
            }
            patches.push(patch);
            col_offset += geometry.stride.col;
        }
        row_offset += geometry.stride.row;
    }

    patches
}

/// Build the clustering sample pool from a dataset.
///
/// With `use_patches` every element contributes all of its window patches,
/// concatenated into one flat pool; patches from different source samples
/// are indistinguishable afterward. Without it each element is used whole.
///
/// Progress is reported to `observer` roughly every 10% of elements.
pub fn build_samples(
    dataset: &[Vec<f32>],
    geometry: &Geometry,
    use_patches: bool,
    observer: &dyn ProgressObserver,
) -> Result<Vec<Vec<f32>>> {
    geometry.validate()?;

    let volume = geometry.input_shape.volume();
    let step = (dataset.len() / 10).max(1);

    if use_patches {
        debug!(
            filter_shape = ?geometry.filter_shape,
            stride = ?geometry.stride,
            elements = dataset.len(),
            "building patch vectors"
        );

        let mut pool = Vec::new();
        for (i, sample) in dataset.iter().enumerate() {
            if sample.len() != volume {
                return Err(AnchorageError::InvalidShape {
                    expected: volume,
                    actual: sample.len(),
                });
            }
            if i % step == 0 {
                observer.on_progress("patch extraction", i, dataset.len());
            }

            let patches = extract_patches(sample, geometry);
            if i == 0 {
                debug!(
                    patches_per_sample = patches.len(),
                    patch_len = patches.first().map(Vec::len).unwrap_or(0),
                    "extracted first sample"
                );
            }
            pool.extend(patches);
        }

        if pool.is_empty() && !dataset.is_empty() {
            return Err(AnchorageError::Configuration(format!(
                "window {:?} at stride {:?} produces no patches for input {:?}",
                geometry.filter_shape, geometry.stride, geometry.input_shape
            )));
        }
        Ok(pool)
    } else {
        let mut pool = Vec::with_capacity(dataset.len());
        for (i, sample) in dataset.iter().enumerate() {
            if sample.len() != volume {
                return Err(AnchorageError::InvalidShape {
                    expected: volume,
                    actual: sample.len(),
                });
            }
            if i % step == 0 {
                observer.on_progress("flattening", i, dataset.len());
            }
            pool.push(sample.clone());
        }
        Ok(pool)
    }
}
