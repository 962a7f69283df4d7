// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout entities.
//!
//! Entities are plain values owned by a [`Layout`](crate::Layout). Footprints
//! are kept exactly as authored; validity is a query on the polygon, never a
//! construction failure, so an invalid footprint is flagged rather than
//! rejected.

use nalgebra::Point2;
use plan_lite_geometry::Polygon2D;

use crate::classification::{AreaType, FeatureType, OpeningSubtype, OpeningType, SeparatorType};
use crate::keys::{AreaKey, FeatureKey, SpaceKey};

/// Connected indoor region made of areas.
#[derive(Debug, Clone)]
pub struct Space {
    pub footprint: Polygon2D,
    pub areas: Vec<AreaKey>,
}

impl Space {
    /// A space without areas takes no part in topology.
    pub fn is_degenerate(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Classified region inside a space.
#[derive(Debug, Clone)]
pub struct Area {
    pub footprint: Polygon2D,
    pub area_type: AreaType,
    /// Join key owned by the persistence layer
    pub db_area_id: u64,
    pub space: SpaceKey,
    pub features: Vec<FeatureKey>,
}

/// Wall, railing or column.
#[derive(Debug, Clone)]
pub struct Separator {
    /// Outer ring plus interior rings (the room-facing faces)
    pub footprint: Polygon2D,
    pub separator_type: SeparatorType,
}

/// Door or window cut into a separator.
#[derive(Debug, Clone)]
pub struct Opening {
    pub footprint: Polygon2D,
    pub opening_type: OpeningType,
    pub subtype: Option<OpeningSubtype>,
    pub is_entrance: bool,
    /// Exact geometry that supersedes `footprint` when present
    pub precise_geometry: Option<Polygon2D>,
    /// Authored swing arc: closed tip, mid-arc point, open tip
    pub sweep_hint: Option<[Point2<f64>; 3]>,
}

impl Opening {
    fn new(footprint: Polygon2D, opening_type: OpeningType) -> Self {
        Self {
            footprint,
            opening_type,
            subtype: None,
            is_entrance: false,
            precise_geometry: None,
            sweep_hint: None,
        }
    }

    pub fn door(footprint: Polygon2D) -> Self {
        Self::new(footprint, OpeningType::Door)
    }

    pub fn window(footprint: Polygon2D) -> Self {
        Self::new(footprint, OpeningType::Window)
    }

    pub fn with_subtype(mut self, subtype: OpeningSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn entrance(mut self) -> Self {
        self.is_entrance = true;
        self
    }

    pub fn with_precise_geometry(mut self, geometry: Polygon2D) -> Self {
        self.precise_geometry = Some(geometry);
        self
    }

    pub fn with_sweep_hint(mut self, hint: [Point2<f64>; 3]) -> Self {
        self.sweep_hint = Some(hint);
        self
    }

    pub fn is_door(&self) -> bool {
        match self.opening_type {
            OpeningType::Door => true,
            OpeningType::Window => false,
        }
    }

    /// Whether the leaf sweeps an arc; openings without a subtype swing.
    pub fn swings(&self) -> bool {
        self.subtype.map_or(true, |s| s.swings())
    }

    /// Geometry used for rectangle extraction: the precise override if any.
    pub fn effective_footprint(&self) -> &Polygon2D {
        self.precise_geometry.as_ref().unwrap_or(&self.footprint)
    }
}

/// Placed item or fixture inside an area.
#[derive(Debug, Clone)]
pub struct Feature {
    pub footprint: Polygon2D,
    pub feature_type: FeatureType,
    pub area: AreaKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precise_geometry_overrides_footprint() {
        let rough = Polygon2D::rectangle(0.0, 0.0, 1.0, 0.3);
        let precise = Polygon2D::rectangle(0.05, 0.0, 0.95, 0.25);
        let door = Opening::door(rough.clone());
        assert_eq!(door.effective_footprint(), &rough);

        let door = door.with_precise_geometry(precise.clone());
        assert_eq!(door.effective_footprint(), &precise);
    }

    #[test]
    fn opening_kinds() {
        let door = Opening::door(Polygon2D::rectangle(0.0, 0.0, 1.0, 0.2)).entrance();
        assert!(door.is_door());
        assert!(door.is_entrance);
        assert!(door.swings());
        assert!(!door.with_subtype(OpeningSubtype::Sliding).swings());

        let window = Opening::window(Polygon2D::rectangle(0.0, 0.0, 1.0, 0.2));
        assert!(!window.is_door());
    }
}
