use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `n` random sample rows of dimension `dims` with uniform f32
/// values in [-1, 1].
pub fn random_samples(n: usize, dims: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| (0..dims).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

/// Generate samples grouped around `n_clusters` known centroids.
/// Returns (samples, centroids) — centroids are the ground truth.
///
/// Each centroid is a random unit vector. Samples in each cluster are the
/// centroid plus small uniform noise.
pub fn clustered_samples(
    n_clusters: usize,
    n_per_cluster: usize,
    dims: usize,
    noise: f32,
) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
    let mut rng = StdRng::seed_from_u64(123);

    let centroids: Vec<Vec<f32>> = (0..n_clusters)
        .map(|_| {
            let v: Vec<f32> = (0..dims).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            v.iter().map(|x| x / norm).collect()
        })
        .collect();

    let mut samples = Vec::with_capacity(n_clusters * n_per_cluster);
    for centroid in &centroids {
        for _ in 0..n_per_cluster {
            samples.push(
                centroid
                    .iter()
                    .map(|&c| c + rng.gen_range(-noise..noise))
                    .collect(),
            );
        }
    }

    (samples, centroids)
}

/// A flattened channel-major image whose value at (channel, row, col) is
/// `channel * 10_000 + row * 100 + col`, so patch contents are predictable.
pub fn indexed_image(channels: usize, height: usize, width: usize) -> Vec<f32> {
    let mut image = Vec::with_capacity(channels * height * width);
    for c in 0..channels {
        for r in 0..height {
            for col in 0..width {
                image.push((c * 10_000 + r * 100 + col) as f32);
            }
        }
    }
    image
}
