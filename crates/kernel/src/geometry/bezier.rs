//! Cubic Bézier profiles in (radius, height) space.
//!
//! Side walls are lofted by sampling one of these curves per angular slice.
//! The x coordinate of each point is a radius from the stack axis and the y
//! coordinate is a height along it.

use super::Point2;

/// A cubic Bézier curve defined by 4 control points in (radius, height) space.
///
/// ```text
/// B(t) = (1-t)³P₀ + 3(1-t)²tP₁ + 3(1-t)t²P₂ + t³P₃
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileCurve {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl ProfileCurve {
    pub const fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// An S-shaped taper from `start_radius` at `start_y` to `end_radius` at
    /// `end_y`.
    ///
    /// Both inner control points sit at the mid height, so the wall leaves the
    /// start and arrives at the end travelling straight along the axis.
    pub fn taper(start_radius: f64, end_radius: f64, start_y: f64, end_y: f64) -> Self {
        let mid_y = (start_y + end_y) * 0.5;
        Self::new(
            Point2::new(start_radius, start_y),
            Point2::new(start_radius, mid_y),
            Point2::new(end_radius, mid_y),
            Point2::new(end_radius, end_y),
        )
    }

    /// Evaluate the curve, returning `(radius, height)` as a point.
    pub fn point_at(&self, t: f64) -> Point2 {
        let t = t.clamp(0.0, 1.0);
        let s = 1.0 - t;
        let s2 = s * s;
        let t2 = t * t;

        Point2::from(
            self.p0.coords * (s2 * s)
                + self.p1.coords * (3.0 * s2 * t)
                + self.p2.coords * (3.0 * s * t2)
                + self.p3.coords * (t2 * t),
        )
    }

    /// Sample `count` evenly spaced parameters in [0, 1], endpoints included.
    pub fn sample(&self, count: usize) -> Vec<Point2> {
        match count {
            0 => Vec::new(),
            1 => vec![self.p0],
            _ => (0..count)
                .map(|k| self.point_at(k as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_taper_endpoints() {
        let curve = ProfileCurve::taper(0.625, 1.25, 0.0, -0.5);
        let start = curve.point_at(0.0);
        let end = curve.point_at(1.0);
        assert_relative_eq!(start.x, 0.625);
        assert_relative_eq!(start.y, 0.0);
        assert_relative_eq!(end.x, 1.25);
        assert_relative_eq!(end.y, -0.5);
    }

    #[test]
    fn test_taper_midpoint_is_symmetric() {
        let curve = ProfileCurve::taper(1.0, 2.0, 0.0, -1.0);
        let mid = curve.point_at(0.5);
        assert_relative_eq!(mid.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(mid.y, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_includes_endpoints() {
        let curve = ProfileCurve::taper(1.0, 3.0, 0.0, -2.0);
        let pts = curve.sample(5);
        assert_eq!(pts.len(), 5);
        assert_relative_eq!(pts[0].x, 1.0);
        assert_relative_eq!(pts[4].x, 3.0);
        // Radius never decreases along a widening taper.
        for pair in pts.windows(2) {
            assert!(pair[1].x >= pair[0].x - 1e-12);
            assert!(pair[1].y <= pair[0].y + 1e-12);
        }
    }
}
