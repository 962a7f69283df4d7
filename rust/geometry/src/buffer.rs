// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outward polygon buffer with mitre joins.
//!
//! The buffer is built as a union: the polygon itself, one band per ring edge
//! swept along the edge's outward normal, and one join piece per convex
//! vertex. Reflex vertices need no join piece because the two neighbouring
//! bands already overlap up to the mitre point. Hole rings are treated
//! exactly like the outer ring (interior on the left), so holes shrink by the
//! same distance.
//!
//! Join pieces are mitred up to `mitre_limit` (ratio of mitre length to buffer
//! distance) and bevelled beyond it. A vertex where the boundary doubles back
//! on itself gets a square end cap.

use nalgebra::{Point2, Vector2};

use crate::bool2d::{contour_to_path, ensure_ccw, polygon_to_paths, shapes_to_polygons};
use crate::error::{Error, Result};
use crate::polygon::{Polygon2D, COINCIDENT_EPSILON};

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

/// Default mitre limit, matching common GIS tooling
pub const DEFAULT_MITRE_LIMIT: f64 = 5.0;

/// Grow `polygon` outward by `distance` using mitre joins.
///
/// `distance` must be finite and non-negative; zero returns the polygon in
/// canonical orientation. The result may contain several polygons only when
/// the input itself was not a single valid polygon.
pub fn buffer_mitre(polygon: &Polygon2D, distance: f64, mitre_limit: f64) -> Result<Vec<Polygon2D>> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(Error::InvalidDistance(distance));
    }
    if polygon.is_empty() {
        return Err(Error::DegeneratePolygon(
            "cannot buffer a polygon with fewer than 3 vertices".to_string(),
        ));
    }
    if distance == 0.0 {
        return Ok(vec![polygon.oriented()]);
    }

    let oriented = polygon.oriented();
    let mut pieces: Vec<Vec<[f64; 2]>> = Vec::new();

    for ring in oriented.rings() {
        ring_pieces(ring, distance, mitre_limit.max(1.0), &mut pieces);
    }

    let subject = polygon_to_paths(&oriented);
    let result = subject.overlay(&pieces, OverlayRule::Union, FillRule::NonZero);
    Ok(shapes_to_polygons(&result))
}

/// Edge bands and join pieces for one ring whose interior lies to the left
fn ring_pieces(ring: &[Point2<f64>], distance: f64, mitre_limit: f64, out: &mut Vec<Vec<[f64; 2]>>) {
    // Skip zero-length edges so every remaining edge has a normal
    let mut vertices: Vec<Point2<f64>> = Vec::with_capacity(ring.len());
    for p in ring {
        if vertices
            .last()
            .map_or(true, |last: &Point2<f64>| (p - last).norm() >= COINCIDENT_EPSILON)
        {
            vertices.push(*p);
        }
    }
    if vertices.len() > 1 && (vertices[0] - vertices[vertices.len() - 1]).norm() < COINCIDENT_EPSILON {
        vertices.pop();
    }
    let n = vertices.len();
    if n < 3 {
        return;
    }

    let normals: Vec<Vector2<f64>> = (0..n)
        .map(|i| outward_normal(&vertices[i], &vertices[(i + 1) % n]))
        .collect();

    for i in 0..n {
        let p = vertices[i];
        let q = vertices[(i + 1) % n];
        let offset = normals[i] * distance;
        out.push(contour_to_path(&ensure_ccw(&[p, q, q + offset, p + offset])));
    }

    for i in 0..n {
        let v = vertices[i];
        let n_in = normals[(i + n - 1) % n];
        let n_out = normals[i];
        let incoming = v - vertices[(i + n - 1) % n];
        let outgoing = vertices[(i + 1) % n] - v;
        let cross = incoming.x * outgoing.y - incoming.y * outgoing.x;
        let cos = n_in.dot(&n_out).clamp(-1.0, 1.0);

        let a = v + n_in * distance;
        let b = v + n_out * distance;

        if cos <= -1.0 + 1e-12 {
            // Boundary doubles back: square cap beyond the vertex
            let Some(forward) = incoming.try_normalize(COINCIDENT_EPSILON) else {
                continue;
            };
            let extend = forward * distance;
            out.push(contour_to_path(&ensure_ccw(&[a, a + extend, b + extend, b])));
            continue;
        }

        let scale = incoming.norm() * outgoing.norm();
        if cross <= 1e-12 * scale {
            // Reflex or straight: neighbouring bands already meet
            continue;
        }

        let ratio = (2.0 / (1.0 + cos)).sqrt();
        if ratio <= mitre_limit {
            let mitre = v + (n_in + n_out) * (distance / (1.0 + cos));
            out.push(contour_to_path(&ensure_ccw(&[v, a, mitre, b])));
        } else {
            out.push(contour_to_path(&ensure_ccw(&[v, a, b])));
        }
    }
}

/// Unit normal pointing to the right of `p -> q`, away from the interior
fn outward_normal(p: &Point2<f64>, q: &Point2<f64>) -> Vector2<f64> {
    let d = q - p;
    let len = d.norm();
    Vector2::new(d.y / len, -d.x / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bool2d::total_area;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_mitre_keeps_corners() {
        let square = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
        let result = buffer_mitre(&square, 0.5, DEFAULT_MITRE_LIMIT).unwrap();

        assert_eq!(result.len(), 1);
        // Mitred corners: exactly an 11x11 square
        assert_relative_eq!(result[0].area(), 121.0, epsilon = 1e-6);
        let (min, max) = result[0].bounds().unwrap();
        assert_relative_eq!(min.x, -0.5, epsilon = 1e-9);
        assert_relative_eq!(max.y, 10.5, epsilon = 1e-9);
    }

    #[test]
    fn test_clockwise_input_grows_outward() {
        let cw = Polygon2D::from_coords(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let result = buffer_mitre(&cw, 1.0, DEFAULT_MITRE_LIMIT).unwrap();
        assert_relative_eq!(total_area(&result), 16.0, epsilon = 1e-6);
    }

    #[test]
    fn test_l_shape_reflex_corner() {
        let l_shape = Polygon2D::from_coords(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);
        let d = 0.1;
        let result = buffer_mitre(&l_shape, d, DEFAULT_MITRE_LIMIT).unwrap();

        assert_eq!(result.len(), 1);
        // Mitred L grows into a larger L: 2.2 x 2.2 minus the 1.0 x 1.0 notch
        let expected = 2.2 * 2.2 - 1.0 * 1.0;
        assert_relative_eq!(result[0].area(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_holes_shrink() {
        let mut ring = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
        ring.add_hole(vec![
            Point2::new(2.0, 2.0),
            Point2::new(8.0, 2.0),
            Point2::new(8.0, 8.0),
            Point2::new(2.0, 8.0),
        ]);
        let result = buffer_mitre(&ring, 0.5, DEFAULT_MITRE_LIMIT).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes.len(), 1);
        assert_relative_eq!(result[0].area(), 121.0 - 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sharp_spike_is_bevelled() {
        // Very acute tip at (10, 0.5): mitre ratio far above the limit
        let sliver = Polygon2D::from_coords(&[(0.0, 0.0), (10.0, 0.5), (0.0, 1.0)]);
        let result = buffer_mitre(&sliver, 0.1, DEFAULT_MITRE_LIMIT).unwrap();
        let (_, max) = result[0].bounds().unwrap();
        // A full mitre would reach ~2 units beyond the tip
        assert!(max.x < 10.0 + 0.1 * DEFAULT_MITRE_LIMIT);
        assert!(max.x > 10.0);
    }

    #[test]
    fn test_rejects_negative_distance() {
        let square = Polygon2D::rectangle(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            buffer_mitre(&square, -1.0, DEFAULT_MITRE_LIMIT).unwrap_err(),
            Error::InvalidDistance(-1.0)
        );
    }
}
