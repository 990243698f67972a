#![warn(missing_docs)]

//! Math types for the seamcraft pattern pipeline.
//!
//! Thin wrappers around nalgebra providing the point, vector and
//! bounding-box types shared by every stage, plus tolerance constants.
//! Mesh coordinates are in meters once calibrated; pattern coordinates
//! are in pattern units (millimeters at the default scale).

use nalgebra::{Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point on the pattern plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector on the pattern plane.
pub type Vec2 = Vector2<f64>;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Bounding box of a set of points, `None` if the set is empty.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Some(Self { min, max })
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Axis-aligned bounding box on the pattern plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Aabb2 {
    /// Bounding box of a set of points, `None` if the set is empty.
    pub fn from_points<I: IntoIterator<Item = Point2>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = min.inf(&p);
            max = max.sup(&p);
        }
        Some(Self { min, max })
    }

    /// Width (extent along X).
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height (extent along Y).
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb2) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Do the two boxes share interior area?
    ///
    /// Boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Area shared by the two boxes (zero when disjoint).
    pub fn overlap_area(&self, other: &Aabb2) -> f64 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance.
    pub linear: f64,
    /// Area tolerance.
    pub area: f64,
}

impl Tolerance {
    /// Default tolerances (1e-9 linear, 1e-12 area).
    pub const DEFAULT: Self = Self {
        linear: 1e-9,
        area: 1e-12,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if an area is effectively zero.
    pub fn is_zero_area(&self, a: f64) -> bool {
        a.abs() < self.area
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb3_from_points() {
        let bb = Aabb3::from_points([
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(bb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bb.max, Point3::new(1.0, 4.0, 5.0));
        assert!((bb.size().y - 6.0).abs() < 1e-12);
        assert!((bb.center().z - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_aabb3_empty() {
        assert!(Aabb3::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_aabb2_intersects() {
        let a = Aabb2::from_points([Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)]).unwrap();
        let b = Aabb2::from_points([Point2::new(5.0, 0.0), Point2::new(15.0, 10.0)]).unwrap();
        let c = Aabb2::from_points([Point2::new(10.0, 0.0), Point2::new(20.0, 10.0)]).unwrap();
        assert!(a.intersects(&b));
        assert!((a.overlap_area(&b) - 50.0).abs() < 1e-12);
        // Touching along an edge is not an overlap
        assert!(!a.intersects(&c));
        assert_eq!(a.overlap_area(&c), 0.0);
    }

    #[test]
    fn test_aabb2_union() {
        let a = Aabb2::from_points([Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]).unwrap();
        let b = Aabb2::from_points([Point2::new(2.0, -1.0), Point2::new(3.0, 0.5)]).unwrap();
        let u = a.union(&b);
        assert!((u.width() - 3.0).abs() < 1e-12);
        assert!((u.height() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-10, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
        assert!(tol.is_zero_area(1e-13));
    }
}
