// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-Lite Geometry
//!
//! Planar polygon kernel for floor plans: polygons with holes, boolean
//! operations via i_overlay, mitre buffering, Douglas-Peucker simplification,
//! minimum rotated rectangles and pole-of-inaccessibility label points, with
//! nalgebra for points and vectors.

pub mod bool2d;
pub mod buffer;
pub mod error;
pub mod polygon;
pub mod polylabel;
pub mod rect;
pub mod segment;
pub mod simplify;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use bool2d::{difference, intersection, largest_piece, make_valid, overlap_area, total_area, union};
pub use buffer::{buffer_mitre, DEFAULT_MITRE_LIMIT};
pub use error::{Error, Result};
pub use polygon::{Polygon2D, COINCIDENT_EPSILON, MIN_AREA_THRESHOLD};
pub use polylabel::pole_of_inaccessibility;
pub use rect::{convex_hull, minimum_rotated_rectangle, RotatedRect};
pub use segment::Segment2D;
pub use simplify::{simplify_polygon, simplify_ring};
