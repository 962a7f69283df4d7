// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Plan-Lite Topology
//!
//! Geometry normalization and topology extraction for floor plans.
//!
//! Raw annotations (spaces, areas, walls, doors, windows and furniture, each
//! drawn independently and imprecisely) are collected into an immutable
//! [`Layout`]. From it this crate derives:
//!
//! - the door-mediated adjacency graph between spaces and areas
//!   ([`ConnectivityGraph`]),
//! - the swing direction of every door ([`DoorOrientationResolver`]),
//! - wall-aligned footprints for placed items ([`WallSnappingEngine`]),
//! - area boundaries grown to meet their walls ([`AreaBoundaryNormalizer`]),
//! - one label anchor per room ([`LabelAnchorResolver`]).
//!
//! [`LayoutProcessor`] runs all of them in pipeline order. Every pass is pure:
//! it reads the layout and returns new values.

pub mod classification;
pub mod config;
pub mod connectivity;
pub mod door;
pub mod entities;
pub mod error;
pub mod keys;
pub mod label;
pub mod layout;
pub mod normalize;
pub mod processor;
pub mod snapping;

pub use plan_lite_geometry::{Point2, Polygon2D, RotatedRect, Segment2D, Vector2};

pub use classification::{
    AreaType, ClassificationScheme, FeatureType, OpeningSubtype, OpeningType, Placement,
    SeparatorType,
};
pub use config::{GeometryConfig, LengthUnit};
pub use connectivity::{adjacency, per_door_connections, ConnectedSet, ConnectivityGraph};
pub use door::{DoorOpeningDirection, DoorOrientation, DoorOrientationResolver, DoorRectangle, DoorSweep};
pub use entities::{Area, Feature, Opening, Separator, Space};
pub use error::{Error, Result};
pub use keys::{AreaKey, EntityKey, FeatureKey, OpeningKey, SeparatorKey, SpaceKey};
pub use label::{LabelAnchor, LabelAnchorResolver};
pub use layout::{Layout, LayoutBuilder};
pub use normalize::AreaBoundaryNormalizer;
pub use processor::{LayoutGeometry, LayoutProcessor};
pub use snapping::{SnappedFootprint, WallSnappingEngine};
