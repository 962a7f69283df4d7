// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line segments and the line queries built on them.

use nalgebra::{Point2, Vector2};

/// Epsilon for orientation tests on segment endpoints
const ORIENTATION_EPSILON: f64 = 1e-12;

/// Directed line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2D {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment2D {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn vector(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Unit direction, or `None` for a zero-length segment.
    pub fn direction(&self) -> Option<Vector2<f64>> {
        let v = self.vector();
        let len = v.norm();
        if len < ORIENTATION_EPSILON {
            None
        } else {
            Some(v / len)
        }
    }

    /// Absolute value of the normalized dot product with another segment.
    ///
    /// 1.0 means parallel (in either direction), 0.0 perpendicular. Zero-length
    /// segments report 0.0.
    pub fn abs_dot(&self, other: &Segment2D) -> f64 {
        match (self.direction(), other.direction()) {
            (Some(a), Some(b)) => a.dot(&b).abs().min(1.0),
            _ => 0.0,
        }
    }

    /// Signed angle (radians, in `(-pi/2, pi/2]`) that rotates this segment's
    /// line onto the other's line by the smallest amount.
    pub fn line_angle_to(&self, other: &Segment2D) -> f64 {
        let a = self.vector();
        let b = other.vector();
        let mut angle = b.y.atan2(b.x) - a.y.atan2(a.x);
        while angle > std::f64::consts::FRAC_PI_2 {
            angle -= std::f64::consts::PI;
        }
        while angle <= -std::f64::consts::FRAC_PI_2 {
            angle += std::f64::consts::PI;
        }
        angle
    }

    /// Orthogonal projection of `p` onto the infinite line through this segment.
    pub fn closest_point_on_line(&self, p: &Point2<f64>) -> Point2<f64> {
        let v = self.vector();
        let len_sq = v.norm_squared();
        if len_sq < ORIENTATION_EPSILON {
            return self.start;
        }
        let t = (p - self.start).dot(&v) / len_sq;
        self.start + v * t
    }

    /// Distance from `p` to the infinite line through this segment.
    pub fn distance_to_line(&self, p: &Point2<f64>) -> f64 {
        (self.closest_point_on_line(p) - p).norm()
    }

    /// Closest point on the segment itself (clamped to the endpoints).
    pub fn closest_point(&self, p: &Point2<f64>) -> Point2<f64> {
        let v = self.vector();
        let len_sq = v.norm_squared();
        if len_sq < ORIENTATION_EPSILON {
            return self.start;
        }
        let t = ((p - self.start).dot(&v) / len_sq).clamp(0.0, 1.0);
        self.start + v * t
    }

    pub fn distance_to_point(&self, p: &Point2<f64>) -> f64 {
        (self.closest_point(p) - p).norm()
    }

    /// Whether the two closed segments share at least one point.
    ///
    /// Touching endpoints and collinear overlaps both count.
    pub fn intersects(&self, other: &Segment2D) -> bool {
        let (p1, p2, p3, p4) = (self.start, self.end, other.start, other.end);
        let d1 = orientation(&p3, &p4, &p1);
        let d2 = orientation(&p3, &p4, &p2);
        let d3 = orientation(&p1, &p2, &p3);
        let d4 = orientation(&p1, &p2, &p4);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && on_segment(&p3, &p4, &p1))
            || (d2 == 0.0 && on_segment(&p3, &p4, &p2))
            || (d3 == 0.0 && on_segment(&p1, &p2, &p3))
            || (d4 == 0.0 && on_segment(&p1, &p2, &p4))
    }

    /// Whether the segments cross at a point interior to both.
    ///
    /// Shared endpoints and touching do not count; collinear overlap does.
    pub fn crosses(&self, other: &Segment2D) -> bool {
        let (p1, p2, p3, p4) = (self.start, self.end, other.start, other.end);
        let d1 = orientation(&p3, &p4, &p1);
        let d2 = orientation(&p3, &p4, &p2);
        let d3 = orientation(&p1, &p2, &p3);
        let d4 = orientation(&p1, &p2, &p4);

        if d1 == 0.0 && d2 == 0.0 {
            // Collinear: overlapping by more than a point is a crossing
            let v = self.vector();
            let len_sq = v.norm_squared();
            if len_sq < ORIENTATION_EPSILON {
                return false;
            }
            let t3 = (p3 - p1).dot(&v) / len_sq;
            let t4 = (p4 - p1).dot(&v) / len_sq;
            let (lo, hi) = if t3 < t4 { (t3, t4) } else { (t4, t3) };
            return lo.max(0.0) < hi.min(1.0) - 1e-9;
        }

        d1 * d2 < 0.0 && d3 * d4 < 0.0
    }
}

/// Cross product sign of (b - a) x (c - a), snapped to zero near collinearity.
pub fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let scale = (b - a).norm() * (c - a).norm();
    if cross.abs() <= ORIENTATION_EPSILON * scale.max(1.0) {
        0.0
    } else {
        cross
    }
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - ORIENTATION_EPSILON
        && p.x <= a.x.max(b.x) + ORIENTATION_EPSILON
        && p.y >= a.y.min(b.y) - ORIENTATION_EPSILON
        && p.y <= a.y.max(b.y) + ORIENTATION_EPSILON
}
