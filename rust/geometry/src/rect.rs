// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Convex hull and minimum-area rotated rectangle.

use nalgebra::{Point2, Vector2};

use crate::polygon::{Polygon2D, COINCIDENT_EPSILON};
use crate::segment::Segment2D;

/// Oriented rectangle enclosing a footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    /// Rectangle centre
    pub center: Point2<f64>,
    /// Longer side
    pub length: f64,
    /// Shorter side
    pub width: f64,
    /// Direction of the longer side in degrees, in `[0, 180)`
    pub angle: f64,
    /// Corners in counter-clockwise order
    pub corners: [Point2<f64>; 4],
}

impl RotatedRect {
    pub fn to_polygon(&self) -> Polygon2D {
        Polygon2D::new(self.corners.to_vec())
    }

    /// The four sides; side `i` runs from corner `i` to corner `i + 1`
    pub fn edges(&self) -> [Segment2D; 4] {
        let c = &self.corners;
        [
            Segment2D::new(c[0], c[1]),
            Segment2D::new(c[1], c[2]),
            Segment2D::new(c[2], c[3]),
            Segment2D::new(c[3], c[0]),
        ]
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Compute convex hull of 2D points using Graham scan
///
/// Returns the hull counter-clockwise without collinear points.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Find bottom-most point (lowest Y, then leftmost X)
    let mut start_idx = 0;
    for (i, p) in points.iter().enumerate() {
        if p.y < points[start_idx].y || (p.y == points[start_idx].y && p.x < points[start_idx].x) {
            start_idx = i;
        }
    }

    let start = points[start_idx];

    // Sort points by polar angle with respect to start, nearer first on ties
    let mut sorted: Vec<Point2<f64>> = points
        .iter()
        .filter(|p| (**p - start).norm() > COINCIDENT_EPSILON)
        .cloned()
        .collect();

    sorted.sort_by(|a, b| {
        let angle_a = (a.y - start.y).atan2(a.x - start.x);
        let angle_b = (b.y - start.y).atan2(b.x - start.x);
        angle_a
            .total_cmp(&angle_b)
            .then_with(|| (a - start).norm().total_cmp(&(b - start).norm()))
    });

    // Graham scan
    let mut hull = vec![start];

    for p in sorted {
        while hull.len() > 1 {
            let top = hull[hull.len() - 1];
            let second = hull[hull.len() - 2];

            // Cross product to check turn direction
            let cross = (top.x - second.x) * (p.y - second.y) - (top.y - second.y) * (p.x - second.x);

            if cross <= 0.0 {
                hull.pop();
            } else {
                break;
            }
        }
        hull.push(p);
    }

    hull
}

/// Minimum-area rectangle enclosing the polygon's outer ring.
///
/// Rotating calipers over the convex hull: the optimal rectangle has one side
/// collinear with a hull edge. Returns `None` for degenerate input (fewer than
/// three non-collinear vertices).
pub fn minimum_rotated_rectangle(polygon: &Polygon2D) -> Option<RotatedRect> {
    let hull = convex_hull(&polygon.outer);
    if hull.len() < 3 {
        return None;
    }

    let mut best: Option<(f64, [Point2<f64>; 4])> = None;

    for i in 0..hull.len() {
        let edge = hull[(i + 1) % hull.len()] - hull[i];
        let Some(u) = edge.try_normalize(COINCIDENT_EPSILON) else {
            continue;
        };
        let v = Vector2::new(-u.y, u.x);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &hull {
            let d = p - hull[i];
            let pu = d.dot(&u);
            let pv = d.dot(&v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.as_ref().map_or(true, |(best_area, _)| area < *best_area - 1e-12) {
            let origin = hull[i];
            best = Some((
                area,
                [
                    origin + u * min_u + v * min_v,
                    origin + u * max_u + v * min_v,
                    origin + u * max_u + v * max_v,
                    origin + u * min_u + v * max_v,
                ],
            ));
        }
    }

    let (_, corners) = best?;
    Some(from_corners(corners))
}

/// Build the rectangle record from counter-clockwise corners
fn from_corners(corners: [Point2<f64>; 4]) -> RotatedRect {
    let side_a = corners[1] - corners[0];
    let side_b = corners[2] - corners[1];
    let (long, length, width) = if side_a.norm() >= side_b.norm() {
        (side_a, side_a.norm(), side_b.norm())
    } else {
        (side_b, side_b.norm(), side_a.norm())
    };

    let mut angle = long.y.atan2(long.x).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }
    if angle >= 180.0 - 1e-9 {
        angle -= 180.0;
    }

    let center = nalgebra::center(&corners[0], &corners[2]);

    RotatedRect {
        center,
        length,
        width,
        angle,
        corners,
    }
}
