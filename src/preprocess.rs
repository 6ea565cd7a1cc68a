//! Row and column preprocessing applied around clustering.

/// Scalar mean of a slice. Empty slices yield zero.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population variance of a slice.
pub fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32
}

/// Per-feature standardization: zero mean, unit variance per column.
/// Zero-variance columns are centered but not scaled.
pub fn standardize_columns(pool: &mut [Vec<f32>]) {
    if pool.is_empty() {
        return;
    }
    let dim = pool[0].len();
    let n = pool.len() as f32;
    for col in 0..dim {
        let col_mean = pool.iter().map(|row| row[col]).sum::<f32>() / n;
        let col_var = pool
            .iter()
            .map(|row| {
                let d = row[col] - col_mean;
                d * d
            })
            .sum::<f32>()
            / n;
        let col_std = col_var.sqrt();
        for row in pool.iter_mut() {
            row[col] -= col_mean;
            if col_std > 0.0 {
                row[col] /= col_std;
            }
        }
    }
}

/// L2-normalize each row in place. Zero rows are left untouched.
pub fn normalize_rows(rows: &mut [Vec<f32>]) {
    for row in rows.iter_mut() {
        let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in row.iter_mut() {
                *v /= norm;
            }
        }
    }
}

/// Subtract the scalar mean of all values across all rows.
pub fn center_global_mean(rows: &mut [Vec<f32>]) {
    let count: usize = rows.iter().map(Vec::len).sum();
    if count == 0 {
        return;
    }
    let total: f32 = rows.iter().flat_map(|r| r.iter()).sum();
    let grand_mean = total / count as f32;
    for row in rows.iter_mut() {
        for v in row.iter_mut() {
            *v -= grand_mean;
        }
    }
}

/// Subtract each row's own scalar mean.
pub fn center_rows(rows: &mut [Vec<f32>]) {
    for row in rows.iter_mut() {
        let m = mean(row);
        for v in row.iter_mut() {
            *v -= m;
        }
    }
}

/// Rescale a vector to unit length. Zero vectors come back unchanged.
pub fn unit_vector(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// Angle in radians between two vectors.
pub fn angle_between(a: &[f32], b: &[f32]) -> f32 {
    let a_unit = unit_vector(a);
    let b_unit = unit_vector(b);
    let dot: f32 = a_unit.iter().zip(&b_unit).map(|(x, y)| x * y).sum();
    dot.clamp(-1.0, 1.0).acos()
}

/// Standard deviation of the angles between each row and the first basis
/// vector. A quick diagnostic for how directionally spread a centroid set is.
pub fn angle_spread(rows: &[Vec<f32>]) -> f32 {
    let Some(first) = rows.first() else {
        return 0.0;
    };
    let mut basis = vec![0.0f32; first.len()];
    if let Some(head) = basis.first_mut() {
        *head = 1.0;
    }
    let angles: Vec<f32> = rows.iter().map(|row| angle_between(&basis, row)).collect();
    variance(&angles).sqrt()
}
