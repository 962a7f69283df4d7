// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Label anchor points for rooms.
//!
//! The label goes at the visual centre of the part of the area not covered
//! by furniture: obstacles are subtracted, the largest remaining piece is
//! kept, cleaned up, and its pole of inaccessibility becomes the anchor.

use nalgebra::Point2;
use plan_lite_geometry::{
    difference, largest_piece, make_valid, pole_of_inaccessibility, simplify_polygon, Polygon2D,
    MIN_AREA_THRESHOLD,
};

use crate::classification::ClassificationScheme;
use crate::config::GeometryConfig;
use crate::entities::Feature;

/// Where and how to draw a room label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub position: Point2<f64>,
    pub text: String,
    /// Rotation in degrees
    pub angle: f64,
}

/// Finds label anchors for areas.
#[derive(Debug, Clone, Copy)]
pub struct LabelAnchorResolver<'a> {
    config: &'a GeometryConfig,
    scheme: &'a ClassificationScheme,
}

impl<'a> LabelAnchorResolver<'a> {
    pub fn new(config: &'a GeometryConfig, scheme: &'a ClassificationScheme) -> Self {
        Self { config, scheme }
    }

    /// Anchor for an area, or `None` when nothing of it is left uncovered.
    pub fn resolve(
        &self,
        footprint: &Polygon2D,
        features: &[&Feature],
        text: impl Into<String>,
        angle: f64,
    ) -> Option<LabelAnchor> {
        let region = self.free_region(footprint, features)?;
        let position = pole_of_inaccessibility(&region, self.config.label_precision)?;
        Some(LabelAnchor {
            position,
            text: text.into(),
            angle,
        })
    }

    /// Largest part of `footprint` not covered by label-blocking features,
    /// repaired and simplified.
    pub fn free_region(&self, footprint: &Polygon2D, features: &[&Feature]) -> Option<Polygon2D> {
        let obstacles: Vec<Polygon2D> = features
            .iter()
            .filter(|f| self.scheme.blocks_label(f.feature_type))
            .filter(|f| !f.footprint.is_empty())
            .map(|f| f.footprint.clone())
            .collect();

        let remaining = match difference(footprint, &obstacles) {
            Ok(pieces) => pieces,
            Err(e) => {
                tracing::debug!(error = %e, "no label, footprint is degenerate");
                return None;
            }
        };

        let region = largest_piece(remaining).and_then(repair)?;
        let simplified = repair(simplify_polygon(&region, self.config.label_simplify_tolerance))?;

        if simplified.area() < MIN_AREA_THRESHOLD {
            tracing::debug!("no label, area fully covered");
            return None;
        }
        Some(simplified)
    }
}

/// Valid polygon for `polygon`: itself, or the largest repaired piece
fn repair(polygon: Polygon2D) -> Option<Polygon2D> {
    if polygon.is_valid() {
        return Some(polygon);
    }
    make_valid(&polygon).ok().and_then(largest_piece)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::FeatureType;
    use crate::keys::AreaKey;
    use approx::assert_abs_diff_eq;

    fn feature(footprint: Polygon2D, feature_type: FeatureType) -> Feature {
        Feature {
            footprint,
            feature_type,
            area: AreaKey::default(),
        }
    }

    #[test]
    fn empty_room_labels_its_centre() {
        let config = GeometryConfig::default();
        let scheme = ClassificationScheme::default();
        let resolver = LabelAnchorResolver::new(&config, &scheme);
        let room = Polygon2D::rectangle(0.0, 0.0, 6.0, 4.0);

        let anchor = resolver.resolve(&room, &[], "Bedroom", 0.0).unwrap();
        assert_abs_diff_eq!(anchor.position.y, 2.0, epsilon = 0.02);
        assert!(anchor.position.x > 1.9 && anchor.position.x < 4.1);
        assert_eq!(anchor.text, "Bedroom");
    }

    #[test]
    fn fully_covered_room_has_no_label() {
        let config = GeometryConfig::default();
        let scheme = ClassificationScheme::default();
        let resolver = LabelAnchorResolver::new(&config, &scheme);
        let room = Polygon2D::rectangle(0.0, 0.0, 3.0, 3.0);
        let left = feature(Polygon2D::rectangle(-0.1, -0.1, 1.6, 3.1), FeatureType::Bed);
        let right = feature(Polygon2D::rectangle(1.5, -0.1, 3.1, 3.1), FeatureType::Wardrobe);

        assert!(resolver.resolve(&room, &[&left, &right], "Store", 0.0).is_none());
    }

    #[test]
    fn elevators_do_not_block_labels() {
        let config = GeometryConfig::default();
        let scheme = ClassificationScheme::default();
        let resolver = LabelAnchorResolver::new(&config, &scheme);
        let room = Polygon2D::rectangle(0.0, 0.0, 3.0, 3.0);
        let elevator = feature(Polygon2D::rectangle(0.0, 0.0, 3.0, 3.0), FeatureType::Elevator);

        let anchor = resolver.resolve(&room, &[&elevator], "Lift", 0.0).unwrap();
        assert_abs_diff_eq!(anchor.position.x, 1.5, epsilon = 0.02);
        assert_abs_diff_eq!(anchor.position.y, 1.5, epsilon = 0.02);
    }

    #[test]
    fn label_goes_to_largest_free_piece() {
        let config = GeometryConfig::default();
        let scheme = ClassificationScheme::default();
        let resolver = LabelAnchorResolver::new(&config, &scheme);
        let room = Polygon2D::rectangle(0.0, 0.0, 10.0, 4.0);
        // Full-height counter splits the room 3 : 6
        let counter = feature(Polygon2D::rectangle(3.0, -0.1, 4.0, 4.1), FeatureType::KitchenCounter);

        let anchor = resolver.resolve(&room, &[&counter], "Kitchen", 90.0).unwrap();
        assert!(anchor.position.x > 4.0);
        assert_abs_diff_eq!(anchor.position.y, 2.0, epsilon = 0.02);
        assert_eq!(anchor.angle, 90.0);
    }

    #[test]
    fn equal_pieces_prefer_smallest_centroid() {
        let config = GeometryConfig::default();
        let scheme = ClassificationScheme::default();
        let resolver = LabelAnchorResolver::new(&config, &scheme);
        let room = Polygon2D::rectangle(0.0, 0.0, 9.0, 4.0);
        let counter = feature(Polygon2D::rectangle(4.0, -0.1, 5.0, 4.1), FeatureType::Table);

        let region = resolver.free_region(&room, &[&counter]).unwrap();
        assert!(region.centroid().unwrap().x < 4.0);
    }
}
