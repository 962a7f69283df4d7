// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pole of inaccessibility ("visual centre") of a polygon.
//!
//! Quadtree search over the bounding box: each cell is ranked by the best
//! distance any point inside it could reach (distance of its centre plus its
//! half-diagonal), and only cells that could still beat the current best by
//! more than `precision` are subdivided.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use nalgebra::Point2;

use crate::polygon::{Polygon2D, MIN_AREA_THRESHOLD};

/// Interior point of `polygon` farthest from its boundary, within `precision`.
///
/// Returns `None` for polygons without area.
pub fn pole_of_inaccessibility(polygon: &Polygon2D, precision: f64) -> Option<Point2<f64>> {
    if polygon.area() < MIN_AREA_THRESHOLD {
        return None;
    }
    let (min, max) = polygon.bounds()?;
    let width = max.x - min.x;
    let height = max.y - min.y;
    let cell_size = width.min(height);
    if cell_size <= 0.0 {
        return Some(min);
    }
    let precision = precision.max(cell_size * 1e-9);

    let mut queue = BinaryHeap::new();
    let half = cell_size / 2.0;
    let mut x = min.x;
    while x < max.x {
        let mut y = min.y;
        while y < max.y {
            queue.push(Cell::new(Point2::new(x + half, y + half), half, polygon));
            y += cell_size;
        }
        x += cell_size;
    }

    // Seed with the centroid and the bounding box centre
    let mut best = polygon
        .centroid()
        .map(|c| Cell::new(c, 0.0, polygon))
        .unwrap_or_else(|| Cell::new(min, 0.0, polygon));
    let bbox_cell = Cell::new(Point2::new(min.x + width / 2.0, min.y + height / 2.0), 0.0, polygon);
    if bbox_cell.distance > best.distance {
        best = bbox_cell;
    }

    while let Some(cell) = queue.pop() {
        if cell.distance > best.distance {
            best = cell;
        }

        if cell.max_distance - best.distance <= precision {
            continue;
        }

        let h = cell.half / 2.0;
        for (dx, dy) in [(-h, -h), (h, -h), (-h, h), (h, h)] {
            queue.push(Cell::new(
                Point2::new(cell.center.x + dx, cell.center.y + dy),
                h,
                polygon,
            ));
        }
    }

    Some(best.center)
}

/// Candidate square in the quadtree search
#[derive(Debug, Clone, Copy)]
struct Cell {
    center: Point2<f64>,
    half: f64,
    /// Signed distance from centre to boundary (negative outside)
    distance: f64,
    /// Upper bound for any point in the cell
    max_distance: f64,
}

impl Cell {
    fn new(center: Point2<f64>, half: f64, polygon: &Polygon2D) -> Self {
        let distance = signed_distance(&center, polygon);
        Self {
            center,
            half,
            distance,
            max_distance: distance + half * std::f64::consts::SQRT_2,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.max_distance == other.max_distance
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on the achievable distance
        self.max_distance
            .partial_cmp(&other.max_distance)
            .unwrap_or(Ordering::Equal)
    }
}

fn signed_distance(point: &Point2<f64>, polygon: &Polygon2D) -> f64 {
    let distance = polygon.boundary_distance(point);
    if polygon.contains_point(point) {
        distance
    } else {
        -distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_square_centre() {
        let square = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
        let p = pole_of_inaccessibility(&square, 0.01).unwrap();
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 0.05);
        assert_abs_diff_eq!(p.y, 5.0, epsilon = 0.05);
    }

    #[test]
    fn test_l_shape_point_is_inside_and_away_from_notch() {
        let l_shape = Polygon2D::from_coords(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 2.0),
            (2.0, 2.0),
            (2.0, 10.0),
            (0.0, 10.0),
        ]);
        let p = pole_of_inaccessibility(&l_shape, 0.001).unwrap();

        assert!(l_shape.contains_point(&p));
        // Best clearance sits on the diagonal of the corner square:
        // t = sqrt(2) * (2 - t), i.e. about 1.1716
        assert_abs_diff_eq!(l_shape.boundary_distance(&p), 1.1716, epsilon = 0.01);
    }

    #[test]
    fn test_hole_pushes_point_off_centre() {
        let mut ring = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
        ring.add_hole(vec![
            Point2::new(3.0, 3.0),
            Point2::new(7.0, 3.0),
            Point2::new(7.0, 7.0),
            Point2::new(3.0, 7.0),
        ]);
        let p = pole_of_inaccessibility(&ring, 0.01).unwrap();
        assert!(ring.contains_point(&p));
    }

    #[test]
    fn test_empty_polygon() {
        assert!(pole_of_inaccessibility(&Polygon2D::default(), 0.01).is_none());
    }
}
