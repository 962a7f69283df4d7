// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations on footprints
//!
//! Union, difference and intersection of [`Polygon2D`] values using the
//! i_overlay crate, plus validity repair and overlap measurement. Results are
//! always returned as a list of polygons because any of these operations can
//! split its input into several pieces.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::polygon::{Polygon2D, MIN_AREA_THRESHOLD};

/// Relative tolerance under which two piece areas count as equal
const AREA_TIE_TOLERANCE: f64 = 1e-9;

/// Union of any number of polygons
pub fn union(polygons: &[Polygon2D]) -> Result<Vec<Polygon2D>> {
    let subject: Vec<Vec<[f64; 2]>> = polygons
        .iter()
        .filter(|p| !p.is_empty())
        .flat_map(|p| polygon_to_paths(p))
        .collect();

    if subject.is_empty() {
        return Ok(Vec::new());
    }

    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    // NonZero keeps overlapping pieces filled; holes are clockwise and cancel
    // only their own outer ring
    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
    Ok(shapes_to_polygons(&result))
}

/// Boolean difference: `subject` minus the union of `clips`
pub fn difference(subject: &Polygon2D, clips: &[Polygon2D]) -> Result<Vec<Polygon2D>> {
    if subject.is_empty() {
        return Err(Error::DegeneratePolygon(
            "difference subject must have at least 3 vertices".to_string(),
        ));
    }

    let clip: Vec<Vec<[f64; 2]>> = clips
        .iter()
        .filter(|c| !c.is_empty())
        .flat_map(|c| polygon_to_paths(c))
        .collect();

    if clip.is_empty() {
        return Ok(vec![subject.oriented()]);
    }

    let result = polygon_to_paths(subject).overlay(&clip, OverlayRule::Difference, FillRule::NonZero);
    Ok(shapes_to_polygons(&result))
}

/// Boolean intersection of two polygons
pub fn intersection(a: &Polygon2D, b: &Polygon2D) -> Result<Vec<Polygon2D>> {
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }

    let result = polygon_to_paths(a).overlay(
        &polygon_to_paths(b),
        OverlayRule::Intersect,
        FillRule::NonZero,
    );
    Ok(shapes_to_polygons(&result))
}

/// Area shared by two polygons.
///
/// Bounding boxes are checked first so disjoint footprints never reach the
/// overlay engine. Degenerate input overlaps nothing.
pub fn overlap_area(a: &Polygon2D, b: &Polygon2D) -> f64 {
    let (Some((a_min, a_max)), Some((b_min, b_max))) = (a.bounds(), b.bounds()) else {
        return 0.0;
    };
    if !bounds_overlap(&a_min, &a_max, &b_min, &b_max) {
        return 0.0;
    }

    intersection(a, b)
        .map(|pieces| total_area(&pieces))
        .unwrap_or(0.0)
}

/// Repair an invalid polygon.
///
/// Rings are re-noded and re-classified with the even-odd rule, so a
/// self-intersecting outer ring splits into its lobes and misoriented holes
/// are recognised regardless of winding. Valid input comes back unchanged up
/// to vertex order.
pub fn make_valid(polygon: &Polygon2D) -> Result<Vec<Polygon2D>> {
    if polygon.is_empty() {
        return Err(Error::DegeneratePolygon(
            "cannot repair a polygon with fewer than 3 vertices".to_string(),
        ));
    }

    let subject: Vec<Vec<[f64; 2]>> = polygon.rings().map(contour_to_path).collect();
    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::EvenOdd);
    Ok(shapes_to_polygons(&result))
}

/// Sum of areas of a set of pieces
pub fn total_area(pieces: &[Polygon2D]) -> f64 {
    pieces.iter().map(|p| p.area()).sum()
}

/// Pick the largest piece.
///
/// Pieces whose areas agree within a relative tolerance are ordered by
/// centroid, smallest `x` then smallest `y`, so the choice never depends on
/// the order the overlay engine emitted them in.
pub fn largest_piece(pieces: Vec<Polygon2D>) -> Option<Polygon2D> {
    let mut best: Option<(f64, Point2<f64>, Polygon2D)> = None;

    for piece in pieces {
        let area = piece.area();
        if area < MIN_AREA_THRESHOLD {
            continue;
        }
        let Some(centroid) = piece.centroid() else {
            continue;
        };

        let replace = match &best {
            None => true,
            Some((best_area, best_centroid, _)) => {
                let tolerance = AREA_TIE_TOLERANCE * area.max(*best_area);
                if (area - best_area).abs() <= tolerance {
                    (centroid.x, centroid.y) < (best_centroid.x, best_centroid.y)
                } else {
                    area > *best_area
                }
            }
        };

        if replace {
            best = Some((area, centroid, piece));
        }
    }

    best.map(|(_, _, piece)| piece)
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        // Clockwise - reverse to make counter-clockwise
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area > 0.0 {
        // Counter-clockwise - reverse to make clockwise
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if contour.is_empty() {
        return None;
    }

    let mut min = contour[0];
    let mut max = contour[0];

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Check if two bounding boxes overlap
pub fn bounds_overlap(
    a_min: &Point2<f64>,
    a_max: &Point2<f64>,
    b_min: &Point2<f64>,
    b_max: &Point2<f64>,
) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert a polygon to i_overlay path format (outer CCW, holes CW)
pub(crate) fn polygon_to_paths(polygon: &Polygon2D) -> Vec<Vec<[f64; 2]>> {
    let oriented = polygon.oriented();
    let mut paths = Vec::with_capacity(oriented.ring_count());
    paths.push(contour_to_path(&oriented.outer));
    for hole in &oriented.holes {
        if hole.len() >= 3 {
            paths.push(contour_to_path(hole));
        }
    }
    paths
}

/// Convert a Point2 contour to i_overlay path format
pub(crate) fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Convert i_overlay result shapes back to polygons
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
pub(crate) fn shapes_to_polygons(shapes: &[Vec<Vec<[f64; 2]>>]) -> Vec<Polygon2D> {
    let mut polygons = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some(first) = shape.first() else {
            continue;
        };

        let outer: Vec<Point2<f64>> = first.iter().map(|p| Point2::new(p[0], p[1])).collect();
        if !is_valid_contour(&outer) {
            continue;
        }

        let holes: Vec<Vec<Point2<f64>>> = shape
            .iter()
            .skip(1)
            .map(|contour| contour.iter().map(|p| Point2::new(p[0], p[1])).collect::<Vec<_>>())
            .filter(|hole| is_valid_contour(hole))
            .collect();

        polygons.push(Polygon2D::with_holes(outer, holes).oriented());
    }

    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Epsilon for floating point comparisons in 2D operations
    const EPSILON_2D: f64 = 1e-9;

    #[test]
    fn test_compute_signed_area_ccw() {
        // Counter-clockwise square
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let area = compute_signed_area(&contour);
        assert!((area - 1.0).abs() < EPSILON_2D);
    }

    #[test]
    fn test_ensure_ccw() {
        // Clockwise square
        let cw = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let ccw = ensure_ccw(&cw);
        assert!(compute_signed_area(&ccw) > 0.0);
    }

    #[test]
    fn test_difference_creates_hole() {
        let subject = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
        let clip = Polygon2D::rectangle(4.0, 4.0, 6.0, 6.0);

        let result = difference(&subject, &[clip]).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes.len(), 1);
        assert_relative_eq!(result[0].area(), 96.0, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_splits_into_pieces() {
        let subject = Polygon2D::rectangle(0.0, 0.0, 10.0, 2.0);
        let clip = Polygon2D::rectangle(4.0, -1.0, 5.0, 3.0);

        let result = difference(&subject, &[clip]).unwrap();

        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 18.0, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_fully_covered_is_empty() {
        let subject = Polygon2D::rectangle(1.0, 1.0, 2.0, 2.0);
        let clip = Polygon2D::rectangle(0.0, 0.0, 3.0, 3.0);

        let result = difference(&subject, &[clip]).unwrap();
        assert!(total_area(&result) < EPSILON_2D);
    }

    #[test]
    fn test_union_overlapping_squares() {
        let polygons = vec![
            Polygon2D::rectangle(0.0, 0.0, 2.0, 2.0),
            Polygon2D::rectangle(1.0, 1.0, 3.0, 3.0),
        ];

        let result = union(&polygons).unwrap();

        // Should produce a single L-shaped contour
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0].area(), 7.0, epsilon = 1e-6);
    }

    #[test]
    fn test_overlap_area() {
        let a = Polygon2D::rectangle(0.0, 0.0, 2.0, 2.0);
        let b = Polygon2D::rectangle(1.0, 1.0, 3.0, 3.0);
        let far = Polygon2D::rectangle(10.0, 10.0, 11.0, 11.0);
        let touching = Polygon2D::rectangle(2.0, 0.0, 3.0, 2.0);

        assert_relative_eq!(overlap_area(&a, &b), 1.0, epsilon = 1e-6);
        assert_eq!(overlap_area(&a, &far), 0.0);
        assert!(overlap_area(&a, &touching) < 1e-9);
    }

    #[test]
    fn test_make_valid_splits_bowtie() {
        let bowtie = Polygon2D::from_coords(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        assert!(!bowtie.is_valid());

        let repaired = make_valid(&bowtie).unwrap();

        assert!(!repaired.is_empty());
        assert_relative_eq!(total_area(&repaired), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_largest_piece_breaks_ties_by_centroid() {
        let right = Polygon2D::rectangle(5.0, 0.0, 6.0, 1.0);
        let left = Polygon2D::rectangle(0.0, 0.0, 1.0, 1.0);
        let small = Polygon2D::rectangle(-5.0, 0.0, -4.5, 0.5);

        let picked = largest_piece(vec![right.clone(), left.clone(), small.clone()]).unwrap();
        assert_eq!(picked, left);

        let picked = largest_piece(vec![left.clone(), right, small]).unwrap();
        assert_eq!(picked, left);

        assert!(largest_piece(Vec::new()).is_none());
    }

    #[test]
    fn test_point_in_contour() {
        let contour = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];

        assert!(point_in_contour(&Point2::new(5.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(15.0, 5.0), &contour));
    }

    #[test]
    fn test_bounds_overlap() {
        let a_min = Point2::new(0.0, 0.0);
        let a_max = Point2::new(10.0, 10.0);
        let b_min = Point2::new(5.0, 5.0);
        let b_max = Point2::new(15.0, 15.0);
        let c_min = Point2::new(20.0, 20.0);
        let c_max = Point2::new(30.0, 30.0);

        assert!(bounds_overlap(&a_min, &a_max, &b_min, &b_max));
        assert!(!bounds_overlap(&a_min, &a_max, &c_min, &c_max));
    }
}
