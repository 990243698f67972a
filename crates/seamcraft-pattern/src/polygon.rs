//! Closed 2D outlines and the planar predicates the flattener and
//! validator share.

use nalgebra::{Matrix2, SymmetricEigen};
use seamcraft_math::{Aabb2, Point2, Vec2};

/// A 2D polygon (closed path).
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices of the polygon in order.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Create a new polygon from points.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Check if the polygon is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Signed area of the polygon.
    /// Positive for counter-clockwise, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    /// Unsigned area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Is the polygon counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Perimeter length.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut length = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            length += (self.points[j] - self.points[i]).norm();
        }
        length
    }

    /// Vertex average of the polygon.
    pub fn centroid(&self) -> Point2 {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let sum = self
            .points
            .iter()
            .fold(Vec2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / self.points.len() as f64)
    }

    /// Axis-aligned bounds.
    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_points(self.points.iter().copied())
    }

    /// Edge `i` as `(start, end)`; the last edge closes the loop.
    pub fn edge(&self, i: usize) -> (Point2, Point2) {
        let n = self.points.len();
        (self.points[i % n], self.points[(i + 1) % n])
    }

    /// True when every point lies within `epsilon` of the line through the
    /// two points farthest apart. Also true for fewer than three points.
    ///
    /// `epsilon` is relative to that farthest distance.
    pub fn is_collinear(&self, epsilon: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return true;
        }
        let mut best = (0, 0, 0.0);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = (self.points[j] - self.points[i]).norm_squared();
                if d > best.2 {
                    best = (i, j, d);
                }
            }
        }
        let span = best.2.sqrt();
        if span <= f64::EPSILON {
            return true;
        }
        let a = self.points[best.0];
        let dir = (self.points[best.1] - a) / span;
        self.points.iter().all(|p| {
            let v = p - a;
            (dir.x * v.y - dir.y * v.x).abs() <= epsilon * span
        })
    }

    /// Ratio of the long to the short extent along the principal axes.
    ///
    /// Returns `f64::INFINITY` when the polygon has no width at all.
    pub fn aspect_ratio(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 1.0;
        }
        let c = self.centroid();
        let mut cov = Matrix2::zeros();
        for p in &self.points {
            let d = p - c;
            cov += d * d.transpose();
        }
        let eigen = SymmetricEigen::new(cov / n as f64);
        let mut extents = [0.0f64; 2];
        for (k, extent) in extents.iter_mut().enumerate() {
            let axis = eigen.eigenvectors.column(k);
            let (mut lo, mut hi) = (f64::MAX, f64::MIN);
            for p in &self.points {
                let t = (p - c).dot(&axis);
                lo = lo.min(t);
                hi = hi.max(t);
            }
            *extent = hi - lo;
        }
        let long = extents[0].max(extents[1]);
        let short = extents[0].min(extents[1]);
        if short <= f64::EPSILON * long.max(1.0) {
            f64::INFINITY
        } else {
            long / short
        }
    }

    /// Point-in-polygon test using ray casting.
    pub fn contains_point(&self, p: &Point2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;

        let mut j = n - 1;
        for i in 0..n {
            let vi = &self.points[i];
            let vj = &self.points[j];

            if ((vi.y > p.y) != (vj.y > p.y))
                && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }

            j = i;
        }

        inside
    }

    /// Pairs of non-adjacent edges that touch or cross, with a contact point.
    pub fn self_intersections(&self) -> Vec<(usize, usize, Point2)> {
        let n = self.points.len();
        let mut hits = Vec::new();
        if n < 4 {
            return hits;
        }
        for i in 0..n {
            for j in (i + 2)..n {
                // First and last edge share vertex 0
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (a0, a1) = self.edge(i);
                let (b0, b1) = self.edge(j);
                if let Some(p) = segment_intersection(&a0, &a1, &b0, &b1) {
                    hits.push((i, j, p));
                }
            }
        }
        hits
    }

    /// Does any pair of non-adjacent edges touch or cross?
    pub fn is_self_intersecting(&self) -> bool {
        !self.self_intersections().is_empty()
    }

    /// Do two polygons share interior area?
    ///
    /// Polygons that merely touch along an edge or at a vertex do not
    /// overlap.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        if self.len() < 3 || other.len() < 3 {
            return false;
        }
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) if a.intersects(&b) => {}
            _ => return false,
        }
        for i in 0..self.len() {
            let (a0, a1) = self.edge(i);
            for j in 0..other.len() {
                let (b0, b1) = other.edge(j);
                if segments_cross(&a0, &a1, &b0, &b1) {
                    return true;
                }
            }
        }
        // Shared boundaries leave no proper crossing, so probe just inside
        // each corner as well as the corners themselves
        self.interior_probes()
            .iter()
            .any(|p| other.contains_point(p))
            || other
                .interior_probes()
                .iter()
                .any(|p| self.contains_point(p))
    }

    fn interior_probes(&self) -> Vec<Point2> {
        let diag = self
            .bounds()
            .map(|b| (b.max - b.min).norm())
            .unwrap_or(0.0);
        let mut probes = self.points.clone();
        if let Some(inset) = self.offset(diag * 1e-6) {
            probes.extend(inset.points);
        }
        probes
    }

    /// Offset the polygon inward (shrink) or outward (expand) by distance.
    /// Positive distance = inward.
    ///
    /// Each vertex moves along the bisector of its two edge normals, so
    /// corners stay mitred. The miter is clamped at twice the distance.
    pub fn offset(&self, distance: f64) -> Option<Self> {
        if self.points.len() < 3 {
            return None;
        }

        let n = self.points.len();
        let sign = if self.is_ccw() { 1.0 } else { -1.0 };
        let max_offset = distance.abs() * 2.0;
        let mut offset_points = Vec::with_capacity(n);

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;

            let p0 = self.points[prev];
            let p1 = self.points[i];
            let p2 = self.points[next];

            let e1 = (p1 - p0).try_normalize(f64::EPSILON)?;
            let e2 = (p2 - p1).try_normalize(f64::EPSILON)?;

            // Inward normals
            let n1 = Vec2::new(-e1.y * sign, e1.x * sign);
            let n2 = Vec2::new(-e2.y * sign, e2.x * sign);

            // A full reversal has no bisector; fall back to the first normal
            let bisector = (n1 + n2).try_normalize(1e-9).unwrap_or(n1);

            let dot = n1.dot(&bisector);
            let offset_dist = if dot.abs() > 0.001 {
                distance / dot
            } else {
                distance
            };
            let clamped_offset = offset_dist.clamp(-max_offset, max_offset);

            offset_points.push(p1 + bisector * clamped_offset);
        }

        let result = Polygon::new(offset_points);
        if result.signed_area().abs() < 1e-10 {
            return None;
        }

        Some(result)
    }
}

fn orient(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: &Point2, b: &Point2, p: &Point2, eps: f64) -> bool {
    p.x >= a.x.min(b.x) - eps
        && p.x <= a.x.max(b.x) + eps
        && p.y >= a.y.min(b.y) - eps
        && p.y <= a.y.max(b.y) + eps
}

/// Do the segments cross at a single interior point of both?
///
/// Touching endpoints and collinear overlaps do not count.
pub fn segments_cross(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let scale = (a1 - a0).norm().max((b1 - b0).norm()).max(1.0);
    let eps = 1e-12 * scale * scale;
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);
    ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
}

/// Contact point of two segments, including touching and collinear overlap.
pub fn segment_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Point2> {
    let scale = (a1 - a0).norm().max((b1 - b0).norm()).max(1.0);
    let eps = 1e-12 * scale * scale;
    let lin_eps = 1e-9 * scale;
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);

    if ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
    {
        let t = d1 / (d1 - d2);
        return Some(a0 + (a1 - a0) * t);
    }

    if d1.abs() <= eps && on_segment(b0, b1, a0, lin_eps) {
        return Some(*a0);
    }
    if d2.abs() <= eps && on_segment(b0, b1, a1, lin_eps) {
        return Some(*a1);
    }
    if d3.abs() <= eps && on_segment(a0, a1, b0, lin_eps) {
        return Some(*b0);
    }
    if d4.abs() <= eps && on_segment(a0, a1, b1, lin_eps) {
        return Some(*b1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ])
    }

    #[test]
    fn test_polygon_area() {
        let sq = square(0.0, 0.0, 1.0);
        assert!((sq.signed_area() - 1.0).abs() < 1e-10);
        assert!(sq.is_ccw());
        assert!((sq.perimeter() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_polygon_offset_inward() {
        let sq = square(0.0, 0.0, 10.0);
        let offset = sq.offset(1.0).unwrap();
        // Should be 8x8 after 1mm inward offset
        assert!((offset.area() - 64.0).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_offset_outward_is_mitred() {
        let sq = square(0.0, 0.0, 10.0);
        let offset = sq.offset(-1.0).unwrap();
        assert!((offset.area() - 144.0).abs() < 1e-6);
        assert!((offset.points[0] - Point2::new(-1.0, -1.0)).norm() < 1e-9);
    }

    #[test]
    fn test_offset_clockwise_outward() {
        let mut sq = square(0.0, 0.0, 10.0);
        sq.reverse();
        let offset = sq.offset(-1.0).unwrap();
        assert!((offset.area() - 144.0).abs() < 1e-6);
    }

    #[test]
    fn test_collinear() {
        let line = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ]);
        assert!(line.is_collinear(1e-9));
        assert!(!square(0.0, 0.0, 1.0).is_collinear(1e-9));
    }

    #[test]
    fn test_aspect_ratio() {
        let rect = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(30.0, 0.0),
            Point2::new(30.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);
        assert!((rect.aspect_ratio() - 30.0).abs() < 1e-6);
        assert!((square(0.0, 0.0, 5.0).aspect_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bowtie_self_intersects() {
        let bowtie = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ]);
        let hits = bowtie.self_intersections();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].2 - Point2::new(5.0, 5.0)).norm() < 1e-9);
        assert!(!square(0.0, 0.0, 1.0).is_self_intersecting());
    }

    #[test]
    fn test_overlaps() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0);
        let c = square(10.0, 0.0, 10.0);
        let inner = square(2.0, 2.0, 2.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&inner));
        assert!(inner.overlaps(&a));
        assert!(a.overlaps(&a.clone()));
    }

    #[test]
    fn test_segments_touching_do_not_cross() {
        let a0 = Point2::new(0.0, 0.0);
        let a1 = Point2::new(1.0, 0.0);
        let b0 = Point2::new(1.0, 0.0);
        let b1 = Point2::new(1.0, 1.0);
        assert!(!segments_cross(&a0, &a1, &b0, &b1));
        assert!(segment_intersection(&a0, &a1, &b0, &b1).is_some());
    }
}
