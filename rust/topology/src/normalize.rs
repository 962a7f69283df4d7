// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closes the authoring gap between area polygons and their walls.
//!
//! Areas are drawn a little inside the wall faces. Normalizing repairs the
//! footprint if needed and grows it by `area_buffer` with mitre joins, so
//! rectangular corners stay rectangular. The operation is not idempotent:
//! every application grows the area again, so run it once per pass.
//!
//! Growing can change the hole count of a footprint. A hole narrower than
//! twice the buffer closes, and a notch with a narrow mouth seals into a new
//! hole. Both are undone after buffering: sealed pockets are filled and the
//! original ring of a closed hole is cut back out.

use plan_lite_geometry::bool2d::point_in_contour;
use plan_lite_geometry::{
    buffer_mitre, difference, largest_piece, make_valid, pole_of_inaccessibility, Point2,
    Polygon2D, MIN_AREA_THRESHOLD,
};

use crate::config::GeometryConfig;

/// Grows area footprints by the configured buffer.
#[derive(Debug, Clone, Copy)]
pub struct AreaBoundaryNormalizer<'a> {
    config: &'a GeometryConfig,
}

impl<'a> AreaBoundaryNormalizer<'a> {
    pub fn new(config: &'a GeometryConfig) -> Self {
        Self { config }
    }

    /// Normalized copy of `footprint`.
    ///
    /// A self-intersecting footprint is repaired first; if repair splits it,
    /// the largest buffered piece is returned. Footprints without area come
    /// back unchanged.
    pub fn normalize(&self, footprint: &Polygon2D) -> Polygon2D {
        let pieces = if footprint.is_valid() {
            vec![footprint.clone()]
        } else {
            match make_valid(footprint) {
                Ok(pieces) => {
                    tracing::debug!(pieces = pieces.len(), "repaired invalid area footprint");
                    pieces
                }
                Err(e) => {
                    tracing::debug!(error = %e, "area footprint cannot be repaired");
                    return footprint.clone();
                }
            }
        };

        let mut grown = Vec::with_capacity(pieces.len());
        for piece in pieces.iter().filter(|p| p.area() >= MIN_AREA_THRESHOLD) {
            match buffer_mitre(piece, self.config.area_buffer, self.config.mitre_limit) {
                Ok(buffered) => {
                    if let Some(outer) = largest_piece(buffered) {
                        grown.push(self.restore_holes(piece, outer));
                    }
                }
                Err(e) => tracing::debug!(error = %e, "area buffer failed for one piece"),
            }
        }

        largest_piece(grown).unwrap_or_else(|| footprint.clone())
    }

    /// Give `grown` the same holes as `piece`.
    ///
    /// A hole of `grown` survives only if it contains the interior point of
    /// one of the holes of `piece`. Holes of `piece` left without a survivor
    /// are subtracted again at their original size. The result still covers
    /// `piece`.
    fn restore_holes(&self, piece: &Polygon2D, grown: Polygon2D) -> Polygon2D {
        let precision = self.config.area_buffer * 0.25;
        let anchors: Vec<(&Vec<Point2<f64>>, Point2<f64>)> = piece
            .holes
            .iter()
            .filter_map(|hole| {
                pole_of_inaccessibility(&Polygon2D::new(hole.clone()), precision).map(|p| (hole, p))
            })
            .collect();

        let before = grown.holes.len();
        let kept: Vec<Vec<Point2<f64>>> = grown
            .holes
            .into_iter()
            .filter(|ring| anchors.iter().any(|(_, a)| point_in_contour(a, ring)))
            .collect();
        if kept.len() < before {
            tracing::debug!(filled = before - kept.len(), "filled pockets sealed by the area buffer");
        }
        let mut result = Polygon2D::with_holes(grown.outer, kept);

        for (hole, anchor) in &anchors {
            if result.holes.iter().any(|ring| point_in_contour(anchor, ring)) {
                continue;
            }
            let cut = difference(&result, &[Polygon2D::new((*hole).clone())]).map(largest_piece);
            match cut {
                Ok(Some(cut)) => {
                    tracing::debug!("cut back a hole closed by the area buffer");
                    result = cut;
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "closed hole could not be cut back"),
            }
        }
        result
    }
}
