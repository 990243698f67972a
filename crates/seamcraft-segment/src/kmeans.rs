//! Centroid clustering of triangles by position and orientation.

use rayon::prelude::*;
use seamcraft_math::{Point3, Vec3};
use seamcraft_mesh::{CancelSignal, Mesh};
use tracing::{debug, warn};

use crate::error::{Result, SegmentError};
use crate::settings::SegmentationSettings;

/// Per-triangle inputs to clustering.
#[derive(Debug, Clone)]
pub(crate) struct TriangleFeatures {
    pub centroids: Vec<Point3>,
    /// Unit normals; zero for degenerate triangles.
    pub normals: Vec<Vec3>,
    pub areas: Vec<f64>,
    /// Bounding-box diagonal used to normalize spatial distances.
    pub scale: f64,
}

impl TriangleFeatures {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let n = mesh.triangle_count();
        let centroids = (0..n).map(|t| mesh.triangle_centroid(t)).collect();
        let normals = (0..n)
            .map(|t| mesh.triangle_normal(t).unwrap_or_else(Vec3::zeros))
            .collect();
        let areas = (0..n).map(|t| mesh.triangle_area(t)).collect();
        let scale = mesh
            .bounds()
            .map(|b| b.diagonal())
            .filter(|d| *d > f64::EPSILON)
            .unwrap_or(1.0);
        Self {
            centroids,
            normals,
            areas,
            scale,
        }
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    /// Area-weighted mean of all triangle centroids.
    fn weighted_centroid(&self) -> Point3 {
        weighted_mean(
            (0..self.len()).map(|t| (self.centroids[t], self.areas[t])),
        )
        .unwrap_or_else(Point3::origin)
    }
}

/// A cluster center: mean position and mean orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Center {
    pub position: Point3,
    pub normal: Vec3,
}

/// Output of [`cluster`].
#[derive(Debug, Clone)]
pub(crate) struct Clustering {
    /// Cluster index per triangle.
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

struct Metric {
    spatial_weight: f64,
    normal_weight: f64,
    scale: f64,
}

impl Metric {
    fn distance(&self, position: &Point3, normal: &Vec3, center: &Center) -> f64 {
        self.spatial_weight * (position - center.position).norm() / self.scale
            + self.normal_weight * (1.0 - normal.dot(&center.normal))
    }
}

/// Mean of weighted points; falls back to the plain mean when all weights
/// vanish, `None` for an empty input.
fn weighted_mean<I: Iterator<Item = (Point3, f64)>>(items: I) -> Option<Point3> {
    let mut weighted = Vec3::zeros();
    let mut plain = Vec3::zeros();
    let mut total = 0.0;
    let mut count = 0usize;
    for (p, w) in items {
        weighted += p.coords * w;
        plain += p.coords;
        total += w;
        count += 1;
    }
    if count == 0 {
        None
    } else if total > f64::EPSILON {
        Some(Point3::from(weighted / total))
    } else {
        Some(Point3::from(plain / count as f64))
    }
}

/// Deterministic farthest-point seeding.
///
/// The first seed is the triangle farthest from the area-weighted mesh
/// centroid; every further seed maximizes its distance to the nearest seed
/// already chosen. Ties go to the lowest triangle index.
fn seed(features: &TriangleFeatures, k: usize, metric: &Metric) -> Vec<Center> {
    let origin = features.weighted_centroid();
    let first = argmax((0..features.len()).map(|t| (features.centroids[t] - origin).norm()));

    let mut centers = Vec::with_capacity(k);
    let mut nearest = vec![f64::INFINITY; features.len()];
    let mut next = first;
    while centers.len() < k {
        let center = Center {
            position: features.centroids[next],
            normal: features.normals[next],
        };
        centers.push(center);
        for (t, d) in nearest.iter_mut().enumerate() {
            let dist = metric.distance(&features.centroids[t], &features.normals[t], &center);
            if dist < *d {
                *d = dist;
            }
        }
        next = argmax(nearest.iter().copied());
    }
    centers
}

/// Index of the largest value, lowest index on ties.
fn argmax<I: Iterator<Item = f64>>(values: I) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Cluster triangles into at most `k` groups.
///
/// `k` is capped at the triangle count. Hitting `max_iterations` without
/// converging is not an error; the last assignment is returned.
pub(crate) fn cluster(
    features: &TriangleFeatures,
    k: usize,
    max_iterations: usize,
    settings: &SegmentationSettings,
    cancel: &dyn CancelSignal,
) -> Result<Clustering> {
    let n = features.len();
    let k = k.min(n);
    if k == 0 {
        return Ok(Clustering {
            assignments: Vec::new(),
            iterations: 0,
            converged: true,
        });
    }

    let metric = Metric {
        spatial_weight: settings.spatial_weight,
        normal_weight: settings.normal_weight,
        scale: features.scale,
    };
    let mut centers = seed(features, k, &metric);
    let mut assignments = vec![0usize; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        if cancel.is_cancelled() {
            return Err(SegmentError::Cancelled);
        }
        iterations += 1;

        assignments = (0..n)
            .into_par_iter()
            .map(|t| {
                let (pos, normal) = (&features.centroids[t], &features.normals[t]);
                let dists = centers.iter().map(|c| -metric.distance(pos, normal, c));
                argmax(dists)
            })
            .collect();

        let updated = update_centers(features, &assignments, &centers);
        let movement: f64 = centers
            .iter()
            .zip(&updated)
            .map(|(old, new)| metric.distance(&old.position, &old.normal, new).abs())
            .sum();
        centers = updated;

        debug!("Clustering iteration {}: movement {:.3e}", iterations, movement);
        if movement < settings.convergence_threshold {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            "Clustering did not converge in {} iterations, using best partition",
            max_iterations
        );
    }

    Ok(Clustering {
        assignments,
        iterations,
        converged,
    })
}

/// Recompute centers as area-weighted means. Empty clusters keep their
/// previous center.
fn update_centers(
    features: &TriangleFeatures,
    assignments: &[usize],
    previous: &[Center],
) -> Vec<Center> {
    let k = previous.len();
    let mut position_sum = vec![Vec3::zeros(); k];
    let mut plain_sum = vec![Vec3::zeros(); k];
    let mut normal_sum = vec![Vec3::zeros(); k];
    let mut area = vec![0.0; k];
    let mut count = vec![0usize; k];

    for (t, &c) in assignments.iter().enumerate() {
        let w = features.areas[t];
        position_sum[c] += features.centroids[t].coords * w;
        plain_sum[c] += features.centroids[t].coords;
        normal_sum[c] += features.normals[t] * w;
        area[c] += w;
        count[c] += 1;
    }

    (0..k)
        .map(|c| {
            if count[c] == 0 {
                return previous[c];
            }
            let position = if area[c] > f64::EPSILON {
                Point3::from(position_sum[c] / area[c])
            } else {
                Point3::from(plain_sum[c] / count[c] as f64)
            };
            let normal = normal_sum[c]
                .try_normalize(f64::EPSILON)
                .unwrap_or(previous[c].normal);
            Center { position, normal }
        })
        .collect()
}
