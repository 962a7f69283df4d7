// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D polygon with holes, the value type behind every footprint.
//!
//! Rings are stored implicitly closed: the closing vertex is never repeated.
//! Orientation is not enforced on construction; [`Polygon2D::oriented`]
//! returns the canonical form (outer counter-clockwise, holes clockwise) that
//! the boolean and buffer operations expect.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::bool2d::{compute_signed_area, ensure_ccw, ensure_cw, point_in_contour};
use crate::error::{Error, Result};
use crate::segment::Segment2D;

/// Two vertices closer than this are treated as the same vertex
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// Rings with less area than this are degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Polygon with one outer boundary and zero or more holes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon2D {
    /// Outer boundary
    pub outer: Vec<Point2<f64>>,
    /// Interior rings
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Polygon2D {
    /// Create a polygon without holes
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer: open_ring(outer),
            holes: Vec::new(),
        }
    }

    /// Create a polygon with holes
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self {
            outer: open_ring(outer),
            holes: holes.into_iter().map(open_ring).collect(),
        }
    }

    /// Create a polygon from explicitly closed rings (first vertex repeated last).
    ///
    /// Ring 0 is the outer boundary, ring `i > 0` is hole `i - 1`.
    pub fn from_closed_rings(
        outer: Vec<Point2<f64>>,
        holes: Vec<Vec<Point2<f64>>>,
    ) -> Result<Self> {
        check_closed(0, &outer)?;
        for (i, hole) in holes.iter().enumerate() {
            check_closed(i + 1, hole)?;
        }
        Ok(Self::with_holes(outer, holes))
    }

    /// Axis-aligned rectangle
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(vec![
            Point2::new(min_x, min_y),
            Point2::new(max_x, min_y),
            Point2::new(max_x, max_y),
            Point2::new(min_x, max_y),
        ])
    }

    /// Convenience constructor from coordinate tuples
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Add a hole
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(open_ring(hole));
    }

    pub fn is_empty(&self) -> bool {
        self.outer.len() < 3
    }

    /// Number of rings (outer + holes)
    pub fn ring_count(&self) -> usize {
        if self.outer.is_empty() {
            0
        } else {
            1 + self.holes.len()
        }
    }

    /// All rings, outer first
    pub fn rings(&self) -> impl Iterator<Item = &[Point2<f64>]> + '_ {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(|h| h.as_slice()))
    }

    /// Area enclosed by the outer ring minus the holes
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let outer = compute_signed_area(&self.outer).abs();
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        (outer - holes).max(0.0)
    }

    /// Canonical orientation: outer counter-clockwise, holes clockwise
    pub fn oriented(&self) -> Self {
        Self {
            outer: ensure_ccw(&self.outer),
            holes: self.holes.iter().map(|h| ensure_cw(h)).collect(),
        }
    }

    /// Area-weighted centroid, accounting for holes
    ///
    /// Falls back to the vertex mean of the outer ring for degenerate input.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        let oriented = self.oriented();
        let mut area_sum = 0.0;
        let mut moment = Vector2::new(0.0, 0.0);

        for ring in oriented.rings() {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            // Triangle fan from the first vertex; hole rings are clockwise
            // and contribute negative area
            let origin = ring[0];
            for i in 1..n - 1 {
                let a = ring[i] - origin;
                let b = ring[i + 1] - origin;
                let tri = 0.5 * (a.x * b.y - b.x * a.y);
                area_sum += tri;
                moment += (origin.coords + (a + b) / 3.0) * tri;
            }
        }

        if area_sum.abs() < MIN_AREA_THRESHOLD {
            return self.vertex_mean();
        }
        Some(Point2::from(moment / area_sum))
    }

    fn vertex_mean(&self) -> Option<Point2<f64>> {
        if self.outer.is_empty() {
            return None;
        }
        let sum = self
            .outer
            .iter()
            .fold(Vector2::new(0.0, 0.0), |acc, p| acc + p.coords);
        Some(Point2::from(sum / self.outer.len() as f64))
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        crate::bool2d::contour_bounds(&self.outer)
    }

    /// Whether `point` lies strictly inside the outer ring and outside every hole
    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        if !point_in_contour(point, &self.outer) {
            return false;
        }
        !self.holes.iter().any(|h| point_in_contour(point, h))
    }

    /// Distance from `point` to the nearest ring edge
    pub fn boundary_distance(&self, point: &Point2<f64>) -> f64 {
        self.segments()
            .map(|s| s.distance_to_point(point))
            .fold(f64::INFINITY, f64::min)
    }

    /// Edges of every ring, outer first
    pub fn segments(&self) -> impl Iterator<Item = Segment2D> + '_ {
        self.rings().flat_map(ring_segments)
    }

    /// Edges of the hole rings only
    pub fn hole_segments(&self) -> impl Iterator<Item = Segment2D> + '_ {
        self.holes.iter().flat_map(|h| ring_segments(h))
    }

    /// Whether a closed segment touches or enters the polygon
    pub fn intersects_segment(&self, segment: &Segment2D) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.contains_point(&segment.start) || self.contains_point(&segment.end) {
            return true;
        }
        self.segments().any(|edge| edge.intersects(segment))
    }

    /// Translated copy
    pub fn translate(&self, offset: &Vector2<f64>) -> Self {
        Self {
            outer: self.outer.iter().map(|p| p + offset).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(|p| p + offset).collect())
                .collect(),
        }
    }

    /// Copy rotated by `angle` radians (counter-clockwise) about `pivot`
    pub fn rotate_about(&self, pivot: &Point2<f64>, angle: f64) -> Self {
        let rotation = Rotation2::new(angle);
        let rotate = |p: &Point2<f64>| pivot + rotation * (p - pivot);
        Self {
            outer: self.outer.iter().map(rotate).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(rotate).collect())
                .collect(),
        }
    }

    /// Whether the polygon is a valid simple polygon.
    ///
    /// Every ring has at least three distinct vertices and non-zero area, no
    /// two edges cross, and every hole lies inside the outer ring.
    pub fn is_valid(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        for ring in self.rings() {
            if ring.len() < 3 || compute_signed_area(ring).abs() < MIN_AREA_THRESHOLD {
                return false;
            }
            let n = ring.len();
            for i in 0..n {
                if (ring[(i + 1) % n] - ring[i]).norm() < COINCIDENT_EPSILON {
                    return false;
                }
            }
        }

        let edges: Vec<(usize, usize, Segment2D)> = self
            .rings()
            .enumerate()
            .flat_map(|(r, ring)| {
                ring_segments(ring)
                    .enumerate()
                    .map(move |(i, s)| (r, i, s))
            })
            .collect();

        for (a, &(ring_a, idx_a, seg_a)) in edges.iter().enumerate() {
            for &(ring_b, idx_b, seg_b) in edges.iter().skip(a + 1) {
                if ring_a == ring_b {
                    let n = self.ring_len(ring_a);
                    let adjacent = idx_b == idx_a + 1 || (idx_a == 0 && idx_b == n - 1);
                    if adjacent {
                        if seg_a.crosses(&seg_b) {
                            return false;
                        }
                        continue;
                    }
                    if seg_a.intersects(&seg_b) {
                        return false;
                    }
                } else if seg_a.crosses(&seg_b) {
                    return false;
                }
            }
        }

        self.holes.iter().all(|hole| {
            hole.iter()
                .all(|p| point_in_contour(p, &self.outer) || self.on_outer(p))
        })
    }

    fn ring_len(&self, ring: usize) -> usize {
        if ring == 0 {
            self.outer.len()
        } else {
            self.holes[ring - 1].len()
        }
    }

    fn on_outer(&self, p: &Point2<f64>) -> bool {
        ring_segments(&self.outer).any(|s| s.distance_to_point(p) < COINCIDENT_EPSILON)
    }
}

/// Segments of a ring, including the closing edge
pub fn ring_segments(ring: &[Point2<f64>]) -> impl Iterator<Item = Segment2D> + '_ {
    let n = ring.len();
    (0..if n < 2 { 0 } else { n }).map(move |i| Segment2D::new(ring[i], ring[(i + 1) % n]))
}

/// Drop an explicit closing vertex, if present
fn open_ring(mut ring: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    if ring.len() > 1 {
        let first = ring[0];
        let last = ring[ring.len() - 1];
        if (first - last).norm() < COINCIDENT_EPSILON {
            ring.pop();
        }
    }
    ring
}

fn check_closed(index: usize, ring: &[Point2<f64>]) -> Result<()> {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && (first - last).norm() < COINCIDENT_EPSILON => {
            Ok(())
        }
        (Some(first), Some(last)) => Err(Error::UnclosedRing {
            ring: index,
            first: (first.x, first.y),
            last: (last.x, last.y),
        }),
        _ => Err(Error::DegeneratePolygon(format!("ring {} is empty", index))),
    }
}
