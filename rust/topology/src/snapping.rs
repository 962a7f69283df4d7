// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall snapping for freely placed items.
//!
//! An item's minimum rotated rectangle gives two pairs of opposite edges.
//! For each pair the nearest room-facing wall segment (an edge of a
//! separator's interior ring) that is parallel, long enough and close enough
//! is chosen, and the item is moved so that edge lies on the wall line. An
//! edge that is only slightly off-parallel is first rotated into alignment
//! about the item's centroid. A move that would make the item overlap a
//! separator is rolled back.

use nalgebra::{Point2, Rotation2};
use plan_lite_geometry::{minimum_rotated_rectangle, overlap_area, Polygon2D, RotatedRect, Segment2D};

use crate::classification::Placement;
use crate::config::GeometryConfig;
use crate::entities::{Feature, Separator};

/// Edge pairs of a rectangle, in processing order
const EDGE_PAIRS: [(usize, usize); 2] = [(0, 2), (1, 3)];

/// Footprint after snapping.
#[derive(Debug, Clone, PartialEq)]
pub struct SnappedFootprint {
    pub footprint: Polygon2D,
    /// Minimum rotated rectangle of `footprint` (x, y, length, width, angle)
    pub rectangle: Option<RotatedRect>,
    /// Whether any snap was applied
    pub moved: bool,
}

impl SnappedFootprint {
    fn unchanged(footprint: &Polygon2D) -> Self {
        Self {
            footprint: footprint.clone(),
            rectangle: minimum_rotated_rectangle(footprint),
            moved: false,
        }
    }
}

/// Wall segment accepted for one edge pair
#[derive(Debug, Clone, Copy)]
struct Candidate {
    edge: Segment2D,
    wall: Segment2D,
    distance: f64,
    /// Rotation that makes `edge` parallel to `wall`, zero when not aligning
    rotation: f64,
}

/// Moves free items flush against nearby walls.
#[derive(Debug, Clone, Copy)]
pub struct WallSnappingEngine<'a> {
    config: &'a GeometryConfig,
}

impl<'a> WallSnappingEngine<'a> {
    pub fn new(config: &'a GeometryConfig) -> Self {
        Self { config }
    }

    /// Snaps a feature. Area-derived features (shafts) are returned unchanged.
    pub fn snap(&self, feature: &Feature, separators: &[&Separator]) -> SnappedFootprint {
        match feature.feature_type.placement() {
            Placement::AreaDerived => SnappedFootprint::unchanged(&feature.footprint),
            Placement::Free => self.snap_footprint(&feature.footprint, separators),
        }
    }

    /// Snaps a bare footprint against the interior faces of `separators`.
    pub fn snap_footprint(&self, footprint: &Polygon2D, separators: &[&Separator]) -> SnappedFootprint {
        let faces: Vec<Segment2D> = separators
            .iter()
            .flat_map(|s| s.footprint.hole_segments())
            .filter(|s| s.direction().is_some())
            .collect();
        let Some(rect) = minimum_rotated_rectangle(footprint) else {
            return SnappedFootprint::unchanged(footprint);
        };
        if faces.is_empty() {
            return SnappedFootprint::unchanged(footprint);
        }

        let mut current = footprint.clone();
        let mut corners = rect.corners;
        let mut moved = false;

        for (i, j) in EDGE_PAIRS {
            let edges = [
                Segment2D::new(corners[i], corners[(i + 1) % 4]),
                Segment2D::new(corners[j], corners[(j + 1) % 4]),
            ];
            let Some(candidate) = self.nearest_candidate(&edges, &faces) else {
                continue;
            };

            let pivot = current.centroid().unwrap_or(rect.center);
            let rotation = Rotation2::new(candidate.rotation);
            let rotate = |p: &Point2<f64>| pivot + rotation * (p - pivot);

            let edge_mid = rotate(&candidate.edge.midpoint());
            let offset = candidate.wall.closest_point_on_line(&edge_mid) - edge_mid;
            let snapped = current.rotate_about(&pivot, candidate.rotation).translate(&offset);

            if let Some(overlap) = self.overlaps(&snapped, separators) {
                tracing::debug!(
                    overlap,
                    distance = candidate.distance,
                    "snap rejected, item would overlap a separator"
                );
                continue;
            }

            tracing::trace!(
                distance = candidate.distance,
                rotation_deg = candidate.rotation.to_degrees(),
                "item snapped to wall"
            );
            for corner in corners.iter_mut() {
                *corner = rotate(corner) + offset;
            }
            current = snapped;
            moved = true;
        }

        if !moved {
            return SnappedFootprint::unchanged(footprint);
        }
        SnappedFootprint {
            rectangle: minimum_rotated_rectangle(&current),
            footprint: current,
            moved,
        }
    }

    /// Nearest wall segment passing the parallel, length and distance filters.
    fn nearest_candidate(&self, edges: &[Segment2D], faces: &[Segment2D]) -> Option<Candidate> {
        let alignment = self.config.snap_alignment_tolerance();
        let mut best: Option<Candidate> = None;

        for edge in edges {
            let mid = edge.midpoint();
            for wall in faces {
                let angle = edge.line_angle_to(wall);
                let aligned = angle.abs() <= alignment;
                let parallel = edge.abs_dot(wall) >= 1.0 - self.config.snap_parallel_tolerance;
                if !aligned && !parallel {
                    continue;
                }
                if edge.length() >= wall.length() * self.config.snap_length_ratio {
                    continue;
                }
                let distance = wall.distance_to_line(&mid);
                if distance > self.config.snap_distance {
                    continue;
                }
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(Candidate {
                        edge: *edge,
                        wall: *wall,
                        distance,
                        rotation: if aligned { angle } else { 0.0 },
                    });
                }
            }
        }

        best
    }

    /// Largest overlap with any separator, if above the epsilon
    fn overlaps(&self, footprint: &Polygon2D, separators: &[&Separator]) -> Option<f64> {
        separators
            .iter()
            .map(|s| overlap_area(footprint, &s.footprint))
            .filter(|&a| a > self.config.overlap_epsilon)
            .reduce(f64::max)
    }
}
