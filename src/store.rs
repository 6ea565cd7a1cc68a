use std::path::Path;

use tracing::{debug, info};

use crate::error::{AnchorageError, Result};

/// Write centroids as comma-delimited rows, one centroid per row, no header.
/// Values use the shortest round-trip decimal form, so a reload reconstructs
/// every row exactly.
pub fn save_centroids(path: &Path, centroids: &[Vec<f32>]) -> Result<()> {
    write_rows(path, centroids)?;
    info!(rows = centroids.len(), path = %path.display(), "saved centroids");
    Ok(())
}

/// Load a centroid table. A missing file is `NotFound`, which the pipeline
/// treats as a recompute signal rather than a failure.
pub fn load_centroids(path: &Path) -> Result<Vec<Vec<f32>>> {
    if !path.exists() {
        return Err(AnchorageError::NotFound {
            path: path.display().to_string(),
        });
    }
    let centroids = read_rows(path)?;
    debug!(rows = centroids.len(), path = %path.display(), "loaded centroids");
    Ok(centroids)
}

/// Diagnostic dump of the raw sample pool, same row-per-vector format as the
/// centroid cache.
pub fn dump_samples(path: &Path, pool: &[Vec<f32>]) -> Result<()> {
    write_rows(path, pool)?;
    debug!(rows = pool.len(), path = %path.display(), "dumped raw samples");
    Ok(())
}

/// Read a dataset of flattened samples, one per row.
pub fn load_samples(path: &Path) -> Result<Vec<Vec<f32>>> {
    if !path.exists() {
        return Err(AnchorageError::NotFound {
            path: path.display().to_string(),
        });
    }
    read_rows(path)
}

fn write_rows(path: &Path, rows: &[Vec<f32>]) -> Result<()> {
    // Row widths are enforced upstream, not by the table format.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<Vec<f32>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(str::parse::<f32>)
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| {
                AnchorageError::InvalidData(format!("{}: {e}", path.display()))
            })?;
        rows.push(row);
    }
    Ok(rows)
}
