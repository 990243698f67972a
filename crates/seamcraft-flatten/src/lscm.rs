//! Least-squares conformal mapping.
//!
//! Every triangle contributes the complex residual
//! `sum_j W_j * U_j / sqrt(2A)`, where `W_j = z_{j+2} - z_{j+1}` are the edge
//! vectors of the triangle in its own orthonormal frame and `U_j` are the
//! unknown 2D positions. The residual vanishes exactly when the triangle is
//! mapped by a rotation, uniform scale and translation. Two pinned vertices
//! remove that freedom; the rest are found by solving the normal equations
//! with Jacobi-preconditioned conjugate gradients, without forming the
//! matrix.

use nalgebra::DVector;
use seamcraft_math::{Point2, Vec3};
use seamcraft_mesh::{CancelSignal, Mesh};
use tracing::{debug, warn};

/// A vertex held at a fixed 2D position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pin {
    pub vertex: u32,
    pub position: Point2,
}

/// How the solve ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SolveStats {
    pub iterations: usize,
    pub relative_residual: f64,
    pub converged: bool,
}

/// Failures the caller turns into panel errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SolveError {
    NonFinite(&'static str),
    Cancelled,
}

/// Sparse least-squares system over the free coordinates.
struct System {
    row_start: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
    rhs: Vec<f64>,
    unknowns: usize,
}

impl System {
    /// `y = A^T A x`
    fn apply_normal(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut y = DVector::zeros(self.unknowns);
        for row in 0..self.rhs.len() {
            let range = self.row_start[row]..self.row_start[row + 1];
            let r: f64 = range
                .clone()
                .map(|k| self.vals[k] * x[self.cols[k]])
                .sum();
            for k in range {
                y[self.cols[k]] += self.vals[k] * r;
            }
        }
        y
    }

    /// `A^T b`
    fn normal_rhs(&self) -> DVector<f64> {
        let mut y = DVector::zeros(self.unknowns);
        for row in 0..self.rhs.len() {
            for k in self.row_start[row]..self.row_start[row + 1] {
                y[self.cols[k]] += self.vals[k] * self.rhs[row];
            }
        }
        y
    }

    /// Diagonal of `A^T A`.
    fn diagonal(&self) -> DVector<f64> {
        let mut d = DVector::zeros(self.unknowns);
        for k in 0..self.vals.len() {
            d[self.cols[k]] += self.vals[k] * self.vals[k];
        }
        d
    }
}

/// Edge vectors of triangle `t` in its local frame, or `None` when the
/// triangle has no area.
fn local_edges(mesh: &Mesh, t: usize) -> Option<([(f64, f64); 3], f64)> {
    let [p0, p1, p2] = mesh.triangle_positions(t);
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let normal: Vec3 = e1.cross(&e2);
    let double_area = normal.norm();
    let x_axis = e1.try_normalize(f64::EPSILON)?;
    let n = normal.try_normalize(f64::EPSILON)?;
    let y_axis = n.cross(&x_axis);

    let z = [
        (0.0, 0.0),
        (e1.norm(), 0.0),
        (e2.dot(&x_axis), e2.dot(&y_axis)),
    ];
    let w = |j: usize| {
        let (a, b) = (z[(j + 2) % 3], z[(j + 1) % 3]);
        (a.0 - b.0, a.1 - b.1)
    };
    Some(([w(0), w(1), w(2)], double_area))
}

fn build_system(mesh: &Mesh, pins: &[Pin]) -> (System, Vec<Option<usize>>) {
    let mut free_index: Vec<Option<usize>> = vec![None; mesh.vertex_count()];
    let mut pinned: Vec<Option<Point2>> = vec![None; mesh.vertex_count()];
    for pin in pins {
        pinned[pin.vertex as usize] = Some(pin.position);
    }
    let mut unknowns = 0;
    for (v, slot) in free_index.iter_mut().enumerate() {
        if pinned[v].is_none() {
            *slot = Some(unknowns);
            unknowns += 2;
        }
    }

    let mut system = System {
        row_start: vec![0],
        cols: Vec::with_capacity(mesh.triangle_count() * 12),
        vals: Vec::with_capacity(mesh.triangle_count() * 12),
        rhs: Vec::with_capacity(mesh.triangle_count() * 2),
        unknowns,
    };

    for t in 0..mesh.triangle_count() {
        let Some((w, double_area)) = local_edges(mesh, t) else {
            continue;
        };
        let scale = 1.0 / double_area.sqrt();
        let tri = mesh.triangle(t);

        // Real part: Wr*s - Wi*t; imaginary part: Wi*s + Wr*t
        for part in 0..2 {
            let mut rhs = 0.0;
            for (j, &v) in tri.iter().enumerate() {
                let (wr, wi) = w[j];
                let (cs, ct) = if part == 0 { (wr, -wi) } else { (wi, wr) };
                let (cs, ct) = (cs * scale, ct * scale);
                match (free_index[v as usize], pinned[v as usize]) {
                    (Some(col), _) => {
                        system.cols.extend_from_slice(&[col, col + 1]);
                        system.vals.extend_from_slice(&[cs, ct]);
                    }
                    (None, Some(p)) => rhs -= cs * p.x + ct * p.y,
                    (None, None) => {}
                }
            }
            system.rhs.push(rhs);
            system.row_start.push(system.cols.len());
        }
    }

    (system, free_index)
}

/// Solve for 2D positions of every vertex of `mesh`.
///
/// `mesh` must be edge-connected with no zero-area triangles, and `pins`
/// must hold two distinct vertices.
pub(crate) fn solve(
    mesh: &Mesh,
    pins: &[Pin],
    max_iterations: usize,
    tolerance: f64,
    cancel: &dyn CancelSignal,
) -> Result<(Vec<Point2>, SolveStats), SolveError> {
    let (system, free_index) = build_system(mesh, pins);
    let b = system.normal_rhs();
    let b_norm = b.norm();
    if !b_norm.is_finite() {
        return Err(SolveError::NonFinite("system assembly"));
    }

    let mut x = DVector::zeros(system.unknowns);
    let mut stats = SolveStats {
        iterations: 0,
        relative_residual: 0.0,
        converged: true,
    };

    if system.unknowns > 0 && b_norm > 0.0 {
        let inv_diag = system
            .diagonal()
            .map(|d| if d > f64::EPSILON { 1.0 / d } else { 1.0 });
        let mut r = b.clone();
        let mut z = r.component_mul(&inv_diag);
        let mut p = z.clone();
        let mut rz = r.dot(&z);
        stats.converged = false;

        while stats.iterations < max_iterations {
            if cancel.is_cancelled() {
                return Err(SolveError::Cancelled);
            }
            stats.relative_residual = r.norm() / b_norm;
            if !stats.relative_residual.is_finite() {
                return Err(SolveError::NonFinite("conformal solve"));
            }
            if stats.relative_residual < tolerance {
                stats.converged = true;
                break;
            }

            let ap = system.apply_normal(&p);
            let p_ap = p.dot(&ap);
            if !p_ap.is_finite() {
                return Err(SolveError::NonFinite("conformal solve"));
            }
            if p_ap <= 0.0 {
                stats.converged = true;
                break;
            }
            let alpha = rz / p_ap;
            x.axpy(alpha, &p, 1.0);
            r.axpy(-alpha, &ap, 1.0);
            z = r.component_mul(&inv_diag);
            let rz_new = r.dot(&z);
            let beta = rz_new / rz.max(1e-300);
            p = &z + beta * &p;
            rz = rz_new;
            stats.iterations += 1;
        }

        if !stats.converged {
            stats.relative_residual = r.norm() / b_norm;
            if stats.relative_residual < tolerance {
                stats.converged = true;
            } else {
                warn!(
                    "Conformal solve stopped after {} iterations, relative residual {:.3e}",
                    stats.iterations, stats.relative_residual
                );
            }
        }
    }

    let mut positions = Vec::with_capacity(mesh.vertex_count());
    for (v, slot) in free_index.iter().enumerate() {
        let p = match slot {
            Some(col) => Point2::new(x[*col], x[*col + 1]),
            None => pins
                .iter()
                .find(|pin| pin.vertex as usize == v)
                .map(|pin| pin.position)
                .unwrap_or_else(Point2::origin),
        };
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(SolveError::NonFinite("conformal solve"));
        }
        positions.push(p);
    }

    debug!(
        "Conformal solve: {} unknowns, {} iterations, residual {:.3e}",
        system.unknowns, stats.iterations, stats.relative_residual
    );
    Ok((positions, stats))
}
