// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Douglas-Peucker simplification of polygon rings.

use nalgebra::Point2;

use crate::bool2d::is_valid_contour;
use crate::polygon::Polygon2D;

/// Simplify every ring of a polygon.
///
/// Holes that collapse below three vertices or lose their area are dropped.
/// If the outer ring collapses the result is empty (zero area). The output
/// can self-intersect; callers that need a valid polygon repair it afterwards.
pub fn simplify_polygon(polygon: &Polygon2D, tolerance: f64) -> Polygon2D {
    let outer = simplify_ring(&polygon.outer, tolerance);
    if !is_valid_contour(&outer) {
        return Polygon2D::default();
    }

    let holes = polygon
        .holes
        .iter()
        .map(|h| simplify_ring(h, tolerance))
        .filter(|h| is_valid_contour(h))
        .collect();

    Polygon2D::with_holes(outer, holes)
}

/// Simplify a closed ring.
///
/// The ring is split at vertex 0 and the vertex farthest from it, both halves
/// are simplified as open polylines, and the halves are rejoined.
pub fn simplify_ring(ring: &[Point2<f64>], tolerance: f64) -> Vec<Point2<f64>> {
    if ring.len() <= 3 || tolerance <= 0.0 {
        return ring.to_vec();
    }

    let first = ring[0];
    let split = ring
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(_, a), (_, b)| (*a - first).norm().total_cmp(&(*b - first).norm()))
        .map(|(i, _)| i)
        .unwrap_or(ring.len() / 2);

    let mut closed: Vec<Point2<f64>> = ring.to_vec();
    closed.push(first);

    let left = douglas_peucker(&closed[..=split], tolerance);
    let right = douglas_peucker(&closed[split..], tolerance);

    // Combine results (excluding duplicate point at split and the closing point)
    let mut result = left;
    result.extend_from_slice(&right[1..right.len() - 1]);
    result
}

/// Douglas-Peucker line simplification algorithm
pub fn douglas_peucker(points: &[Point2<f64>], epsilon: f64) -> Vec<Point2<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Find the point with maximum distance from line between first and last
    let first = &points[0];
    let last = &points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    // If max distance is greater than epsilon, recursively simplify
    if max_dist > epsilon {
        let left = douglas_peucker(&points[..=max_idx], epsilon);
        let right = douglas_peucker(&points[max_idx..], epsilon);

        // Combine results (excluding duplicate point at max_idx)
        let mut result = left;
        result.extend_from_slice(&right[1..]);
        result
    } else {
        // All points between first and last can be removed
        vec![*first, *last]
    }
}

/// Calculate perpendicular distance from point to line
fn perpendicular_distance(point: &Point2<f64>, line_start: &Point2<f64>, line_end: &Point2<f64>) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-10 {
        return (point - line_start).norm();
    }

    let length = length_sq.sqrt();
    ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs() / length
}
