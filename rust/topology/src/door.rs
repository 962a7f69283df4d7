// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door swing direction.
//!
//! A door's footprint is reduced to its minimum rotated rectangle with
//! corners `A, B, C, D` in canonical order: counter-clockwise, `AB` a long
//! side, and of the two long sides the one starting at the lowest corner.
//! `UP` opens toward the `CD` face and `DOWN` toward the `AB` face.
//!
//! The governing area decides: a probe as long as the door is cast from the
//! middle of each face along its outward normal, and the first direction
//! (UP, then DOWN) whose probe touches the governing area wins. Without a
//! governing area, or when neither probe touches it, the door opens UP.

use nalgebra::{Point2, Vector2};
use plan_lite_geometry::{minimum_rotated_rectangle, Polygon2D, RotatedRect, Segment2D};
use rustc_hash::FxHashMap;

use crate::classification::ClassificationScheme;
use crate::connectivity::ConnectivityGraph;
use crate::entities::{Area, Opening};
use crate::keys::{AreaKey, OpeningKey};
use crate::layout::Layout;

/// Grid used to compare corner coordinates when picking the canonical start
const CORNER_ROUNDING: f64 = 1e-9;

/// Canonical swing direction of a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DoorOpeningDirection {
    /// Toward the `CD` face.
    #[default]
    Up,
    /// Toward the `AB` face.
    Down,
}

impl DoorOpeningDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoorOpeningDirection::Up => "UP",
            DoorOpeningDirection::Down => "DOWN",
        }
    }
}

/// Door rectangle in canonical corner order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorRectangle {
    /// `A, B, C, D`, counter-clockwise
    pub corners: [Point2<f64>; 4],
    /// `|AB|`
    pub opening_length: f64,
    /// `|BC|`
    pub opening_width: f64,
}

impl DoorRectangle {
    /// Canonical rectangle of a footprint, or `None` if it has no area.
    pub fn from_footprint(footprint: &Polygon2D) -> Option<Self> {
        minimum_rotated_rectangle(footprint).and_then(|r| Self::from_rotated_rect(&r))
    }

    pub fn from_rotated_rect(rect: &RotatedRect) -> Option<Self> {
        let mut corners = rect.corners;
        if plan_lite_geometry::bool2d::compute_signed_area(&corners) < 0.0 {
            corners.reverse();
        }

        let side = |i: usize| (corners[(i + 1) % 4] - corners[i]).norm();
        let longest = (0..4).map(side).fold(0.0, f64::max);
        if longest <= 0.0 {
            return None;
        }

        let start = (0..4)
            .filter(|&i| side(i) >= longest * (1.0 - 1e-9))
            .min_by_key(|&i| rounded(&corners[i]))?;
        corners.rotate_left(start);

        let opening_length = (corners[1] - corners[0]).norm();
        let opening_width = (corners[2] - corners[1]).norm();
        if opening_width <= 0.0 {
            return None;
        }

        Some(Self {
            corners,
            opening_length,
            opening_width,
        })
    }

    pub fn a(&self) -> Point2<f64> {
        self.corners[0]
    }

    pub fn b(&self) -> Point2<f64> {
        self.corners[1]
    }

    pub fn c(&self) -> Point2<f64> {
        self.corners[2]
    }

    pub fn d(&self) -> Point2<f64> {
        self.corners[3]
    }

    /// Corners of the face the door opens toward: `{C, D}` or `{A, B}`.
    pub fn directed_points(&self, direction: DoorOpeningDirection) -> [Point2<f64>; 2] {
        match direction {
            DoorOpeningDirection::Up => [self.c(), self.d()],
            DoorOpeningDirection::Down => [self.a(), self.b()],
        }
    }

    /// Unit normal pointing out of the door through the directed face.
    pub fn outward_normal(&self, direction: DoorOpeningDirection) -> Vector2<f64> {
        let up = (self.c() - self.b()) / self.opening_width;
        match direction {
            DoorOpeningDirection::Up => up,
            DoorOpeningDirection::Down => -up,
        }
    }

    /// Probe from the middle of the directed face, one door length long.
    pub fn probe(&self, direction: DoorOpeningDirection) -> Segment2D {
        let [p, q] = self.directed_points(direction);
        let start = nalgebra::center(&p, &q);
        Segment2D::new(start, start + self.outward_normal(direction) * self.opening_length)
    }
}

fn rounded(p: &Point2<f64>) -> (i64, i64) {
    (
        (p.y / CORNER_ROUNDING).round() as i64,
        (p.x / CORNER_ROUNDING).round() as i64,
    )
}

/// Swing arc of a hinged door, for rendering and clearance checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSweep {
    /// Hinge corner
    pub hinge: Point2<f64>,
    /// Direction of the fully open leaf, degrees counter-clockwise from +x
    pub angle: f64,
    /// Closed leaf tip, mid-arc point, open leaf tip
    pub arc: [Point2<f64>; 3],
}

/// Result of resolving one door.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorOrientation {
    pub direction: DoorOpeningDirection,
    /// Area the decision was made against
    pub governing_area: Option<AreaKey>,
    /// Canonical rectangle; `None` for degenerate footprints
    pub rectangle: Option<DoorRectangle>,
    /// Swing arc; `None` for sliding doors and degenerate footprints
    pub sweep: Option<DoorSweep>,
}

/// Decides which way each door opens.
#[derive(Debug, Clone, Copy)]
pub struct DoorOrientationResolver<'a> {
    scheme: &'a ClassificationScheme,
}

impl<'a> DoorOrientationResolver<'a> {
    pub fn new(scheme: &'a ClassificationScheme) -> Self {
        Self { scheme }
    }

    /// The area a door is judged against.
    ///
    /// A single connected area governs. Otherwise the unit-private area with
    /// the smallest `db_area_id` governs; without one there is no governing
    /// area.
    pub fn governing_area<'b>(&self, connected: &[(AreaKey, &'b Area)]) -> Option<(AreaKey, &'b Area)> {
        if let [single] = connected {
            return Some(*single);
        }
        connected
            .iter()
            .filter(|(_, area)| self.scheme.is_private(area.area_type))
            .min_by_key(|(_, area)| area.db_area_id)
            .copied()
    }

    /// First direction whose probe touches `governing`, UP when none does.
    pub fn direction(&self, rectangle: &DoorRectangle, governing: Option<&Polygon2D>) -> DoorOpeningDirection {
        let Some(footprint) = governing else {
            return DoorOpeningDirection::Up;
        };
        [DoorOpeningDirection::Up, DoorOpeningDirection::Down]
            .into_iter()
            .find(|&dir| footprint.intersects_segment(&rectangle.probe(dir)))
            .unwrap_or(DoorOpeningDirection::Up)
    }

    /// Resolves a door against the areas it connects.
    pub fn resolve(&self, opening: &Opening, connected: &[(AreaKey, &Area)]) -> DoorOrientation {
        self.resolve_with_footprints(opening, connected, None)
    }

    /// Like [`resolve`](Self::resolve), but the governing area is judged by
    /// its entry in `footprints` when it has one (for example its normalized
    /// footprint).
    pub fn resolve_with_footprints(
        &self,
        opening: &Opening,
        connected: &[(AreaKey, &Area)],
        footprints: Option<&FxHashMap<AreaKey, Polygon2D>>,
    ) -> DoorOrientation {
        let governing = self.governing_area(connected);
        let Some(rectangle) = DoorRectangle::from_footprint(opening.effective_footprint()) else {
            tracing::debug!("door footprint has no rectangle, defaulting to UP");
            return DoorOrientation {
                direction: DoorOpeningDirection::Up,
                governing_area: governing.map(|(k, _)| k),
                rectangle: None,
                sweep: None,
            };
        };

        let target = governing.map(|(k, a)| footprints.and_then(|f| f.get(&k)).unwrap_or(&a.footprint));
        let direction = self.direction(&rectangle, target);
        let sweep = opening.swings().then(|| swing_arc(&rectangle, direction, opening.sweep_hint));

        tracing::trace!(
            direction = direction.as_str(),
            governing = ?governing.map(|(k, _)| k),
            connected = connected.len(),
            "door resolved"
        );

        DoorOrientation {
            direction,
            governing_area: governing.map(|(k, _)| k),
            rectangle: Some(rectangle),
            sweep,
        }
    }

    /// Resolves a door of `layout` using the area connections in `graph`.
    ///
    /// `footprints` should be the footprints `graph` was built from; areas
    /// missing from it are judged by their drawn footprint. Returns
    /// `None` if the key is not a door of the layout.
    pub fn resolve_in_layout(
        &self,
        layout: &Layout,
        graph: &ConnectivityGraph,
        footprints: Option<&FxHashMap<AreaKey, Polygon2D>>,
        door: OpeningKey,
    ) -> Option<DoorOrientation> {
        let opening = layout.opening(door).filter(|o| o.is_door())?;
        let connected: Vec<(AreaKey, &Area)> = graph
            .connections(door)
            .iter()
            .filter_map(|k| k.as_area())
            .filter_map(|k| layout.area(k).map(|a| (k, a)))
            .collect();
        Some(self.resolve_with_footprints(opening, &connected, footprints))
    }
}

/// Leaf hinged at the directed face, closed along it and open along the normal.
fn swing_arc(rectangle: &DoorRectangle, direction: DoorOpeningDirection, hint: Option<[Point2<f64>; 3]>) -> DoorSweep {
    let [closed_tip, hinge] = rectangle.directed_points(direction);
    let normal = rectangle.outward_normal(direction);
    let leaf = rectangle.opening_length;
    let open_tip = hinge + normal * leaf;

    let arc = hint.unwrap_or_else(|| {
        let closed = (closed_tip - hinge) / leaf;
        let mid = (closed + normal).normalize() * leaf;
        [closed_tip, hinge + mid, open_tip]
    });

    DoorSweep {
        hinge,
        angle: normal.y.atan2(normal.x).to_degrees(),
        arc,
    }
}
