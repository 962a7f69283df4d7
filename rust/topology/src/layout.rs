// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for one floor-plan layout.
//!
//! The [`Layout`] owns every entity in slot maps with stable, generational
//! keys, plus two derived indices:
//!
//! - `areas_separators`: separators touching each area,
//! - `spaces_openings`: openings touching each space.
//!
//! A layout is built once through [`LayoutBuilder`] and is immutable
//! afterwards. Any edit means building a new layout.

use nalgebra::Point2;
use plan_lite_geometry::{buffer_mitre, overlap_area, Polygon2D};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::classification::{AreaType, FeatureType, SeparatorType};
use crate::config::GeometryConfig;
use crate::entities::{Area, Feature, Opening, Separator, Space};
use crate::error::{Error, Result};
use crate::keys::*;

/// Immutable collection of layout entities with derived indices.
#[derive(Debug)]
pub struct Layout {
    pub(crate) spaces: SlotMap<SpaceKey, Space>,
    pub(crate) areas: SlotMap<AreaKey, Area>,
    pub(crate) separators: SlotMap<SeparatorKey, Separator>,
    pub(crate) openings: SlotMap<OpeningKey, Opening>,
    pub(crate) features: SlotMap<FeatureKey, Feature>,

    // Derived indices
    pub(crate) areas_separators: FxHashMap<AreaKey, FxHashSet<SeparatorKey>>,
    pub(crate) spaces_openings: FxHashMap<SpaceKey, FxHashSet<OpeningKey>>,
}

impl Layout {
    // =========================================================================
    // Entity lookup
    // =========================================================================

    pub fn space(&self, key: SpaceKey) -> Option<&Space> {
        self.spaces.get(key)
    }

    pub fn area(&self, key: AreaKey) -> Option<&Area> {
        self.areas.get(key)
    }

    pub fn separator(&self, key: SeparatorKey) -> Option<&Separator> {
        self.separators.get(key)
    }

    pub fn opening(&self, key: OpeningKey) -> Option<&Opening> {
        self.openings.get(key)
    }

    pub fn feature(&self, key: FeatureKey) -> Option<&Feature> {
        self.features.get(key)
    }

    /// Footprint of a space or area
    pub fn entity_footprint(&self, key: EntityKey) -> Option<&Polygon2D> {
        match key {
            EntityKey::Space(k) => self.space(k).map(|s| &s.footprint),
            EntityKey::Area(k) => self.area(k).map(|a| &a.footprint),
        }
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    pub fn spaces(&self) -> impl Iterator<Item = (SpaceKey, &Space)> {
        self.spaces.iter()
    }

    pub fn areas(&self) -> impl Iterator<Item = (AreaKey, &Area)> {
        self.areas.iter()
    }

    pub fn separators(&self) -> impl Iterator<Item = (SeparatorKey, &Separator)> {
        self.separators.iter()
    }

    pub fn openings(&self) -> impl Iterator<Item = (OpeningKey, &Opening)> {
        self.openings.iter()
    }

    /// Openings of type DOOR
    pub fn doors(&self) -> impl Iterator<Item = (OpeningKey, &Opening)> {
        self.openings.iter().filter(|(_, o)| o.is_door())
    }

    pub fn features(&self) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.features.iter()
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Areas owned by a space.
    pub fn areas_of_space(&self, space: SpaceKey) -> impl Iterator<Item = (AreaKey, &Area)> {
        self.space(space)
            .into_iter()
            .flat_map(|s| s.areas.iter())
            .filter_map(move |&k| self.area(k).map(|a| (k, a)))
    }

    /// Features placed in an area.
    pub fn features_of_area(&self, area: AreaKey) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.area(area)
            .into_iter()
            .flat_map(|a| a.features.iter())
            .filter_map(move |&k| self.feature(k).map(|f| (k, f)))
    }

    /// Separators touching an area (`areas_separators` index).
    pub fn separators_of_area(&self, area: AreaKey) -> Vec<SeparatorKey> {
        sorted(self.areas_separators.get(&area))
    }

    /// Openings touching a space (`spaces_openings` index).
    pub fn openings_of_space(&self, space: SpaceKey) -> Vec<OpeningKey> {
        sorted(self.spaces_openings.get(&space))
    }

    pub fn areas_separators(&self) -> &FxHashMap<AreaKey, FxHashSet<SeparatorKey>> {
        &self.areas_separators
    }

    pub fn spaces_openings(&self) -> &FxHashMap<SpaceKey, FxHashSet<OpeningKey>> {
        &self.spaces_openings
    }
}

fn sorted<K: Copy + Ord>(set: Option<&FxHashSet<K>>) -> Vec<K> {
    let mut keys: Vec<K> = set.map(|s| s.iter().copied().collect()).unwrap_or_default();
    keys.sort_unstable();
    keys
}

/// Builder for a [`Layout`].
///
/// # Example
///
/// ```
/// use plan_lite_topology::{AreaType, GeometryConfig, LayoutBuilder, Polygon2D};
///
/// let mut builder = LayoutBuilder::new();
/// let space = builder.add_space(Polygon2D::rectangle(0.0, 0.0, 4.0, 3.0));
/// builder
///     .add_area(space, Polygon2D::rectangle(0.0, 0.0, 4.0, 3.0), AreaType::Bedroom, 17)
///     .unwrap();
/// let layout = builder.build(&GeometryConfig::default());
///
/// assert_eq!(layout.area_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    spaces: SlotMap<SpaceKey, Space>,
    areas: SlotMap<AreaKey, Area>,
    separators: SlotMap<SeparatorKey, Separator>,
    openings: SlotMap<OpeningKey, Opening>,
    features: SlotMap<FeatureKey, Feature>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_space(&mut self, footprint: Polygon2D) -> SpaceKey {
        self.spaces.insert(Space {
            footprint,
            areas: Vec::new(),
        })
    }

    /// Adds an area to an existing space.
    pub fn add_area(
        &mut self,
        space: SpaceKey,
        footprint: Polygon2D,
        area_type: AreaType,
        db_area_id: u64,
    ) -> Result<AreaKey> {
        if !self.spaces.contains_key(space) {
            return Err(Error::SpaceNotFound(space));
        }
        let key = self.areas.insert(Area {
            footprint,
            area_type,
            db_area_id,
            space,
            features: Vec::new(),
        });
        if let Some(s) = self.spaces.get_mut(space) {
            s.areas.push(key);
        }
        Ok(key)
    }

    pub fn add_separator(&mut self, footprint: Polygon2D, separator_type: SeparatorType) -> SeparatorKey {
        self.separators.insert(Separator {
            footprint,
            separator_type,
        })
    }

    /// Adds a separator from explicitly closed rings (first vertex repeated last).
    ///
    /// Fails if any ring is not closed.
    pub fn add_separator_rings(
        &mut self,
        outer: Vec<Point2<f64>>,
        holes: Vec<Vec<Point2<f64>>>,
        separator_type: SeparatorType,
    ) -> Result<SeparatorKey> {
        let footprint = Polygon2D::from_closed_rings(outer, holes)?;
        Ok(self.add_separator(footprint, separator_type))
    }

    pub fn add_opening(&mut self, opening: Opening) -> OpeningKey {
        self.openings.insert(opening)
    }

    /// Adds a feature to an existing area.
    pub fn add_feature(
        &mut self,
        area: AreaKey,
        footprint: Polygon2D,
        feature_type: FeatureType,
    ) -> Result<FeatureKey> {
        if !self.areas.contains_key(area) {
            return Err(Error::AreaNotFound(area));
        }
        let key = self.features.insert(Feature {
            footprint,
            feature_type,
            area,
        });
        if let Some(a) = self.areas.get_mut(area) {
            a.features.push(key);
        }
        Ok(key)
    }

    /// Derives the indices and freezes the layout.
    pub fn build(self, config: &GeometryConfig) -> Layout {
        let mut areas_separators: FxHashMap<AreaKey, FxHashSet<SeparatorKey>> = FxHashMap::default();
        for (ak, area) in &self.areas {
            let reach = grown(&area.footprint, config);
            let touching: FxHashSet<SeparatorKey> = self
                .separators
                .iter()
                .filter(|(_, s)| overlap_area(&reach, &s.footprint) > config.overlap_epsilon)
                .map(|(k, _)| k)
                .collect();
            areas_separators.insert(ak, touching);
        }

        let mut spaces_openings: FxHashMap<SpaceKey, FxHashSet<OpeningKey>> = FxHashMap::default();
        for (sk, space) in &self.spaces {
            let reach = grown(&space.footprint, config);
            let touching: FxHashSet<OpeningKey> = self
                .openings
                .iter()
                .filter(|(_, o)| overlap_area(&reach, &o.footprint) > config.overlap_epsilon)
                .map(|(k, _)| k)
                .collect();
            spaces_openings.insert(sk, touching);
        }

        tracing::debug!(
            spaces = self.spaces.len(),
            areas = self.areas.len(),
            separators = self.separators.len(),
            openings = self.openings.len(),
            features = self.features.len(),
            "layout built"
        );

        Layout {
            spaces: self.spaces,
            areas: self.areas,
            separators: self.separators,
            openings: self.openings,
            features: self.features,
            areas_separators,
            spaces_openings,
        }
    }
}

/// Footprint grown by the adjacency tolerance, or the footprint itself when
/// it cannot be buffered.
fn grown(footprint: &Polygon2D, config: &GeometryConfig) -> Polygon2D {
    if config.adjacency_tolerance <= 0.0 || footprint.is_empty() {
        return footprint.clone();
    }
    match buffer_mitre(footprint, config.adjacency_tolerance, config.mitre_limit) {
        Ok(pieces) => plan_lite_geometry::largest_piece(pieces).unwrap_or_else(|| footprint.clone()),
        Err(e) => {
            tracing::debug!(error = %e, "adjacency buffer failed, using raw footprint");
            footprint.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn area_requires_existing_space() {
        let mut builder = LayoutBuilder::new();
        let removed = builder.add_space(Polygon2D::rectangle(0.0, 0.0, 1.0, 1.0));
        builder.spaces.remove(removed);

        let result = builder.add_area(
            removed,
            Polygon2D::rectangle(0.0, 0.0, 1.0, 1.0),
            AreaType::Room,
            1,
        );
        assert!(matches!(result, Err(Error::SpaceNotFound(_))));
    }

    #[test]
    fn unclosed_separator_ring_is_rejected() {
        let mut builder = LayoutBuilder::new();
        let open = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let result = builder.add_separator_rings(open, Vec::new(), SeparatorType::Wall);
        assert!(matches!(result, Err(Error::Geometry(_))));

        let closed = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(builder
            .add_separator_rings(closed, Vec::new(), SeparatorType::Wall)
            .is_ok());
    }

    #[test]
    fn indices_use_adjacency_tolerance() {
        let config = GeometryConfig::default();
        let mut builder = LayoutBuilder::new();
        let space = builder.add_space(Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0));
        let area = builder
            .add_area(space, Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0), AreaType::Room, 1)
            .unwrap();

        // Flush against the area, within tolerance, and far away
        let flush = builder.add_separator(Polygon2D::rectangle(4.0, 0.0, 4.2, 4.0), SeparatorType::Wall);
        let gap = builder.add_separator(Polygon2D::rectangle(-0.22, 0.0, -0.02, 4.0), SeparatorType::Wall);
        let far = builder.add_separator(Polygon2D::rectangle(10.0, 0.0, 10.2, 4.0), SeparatorType::Wall);
        let door = builder.add_opening(Opening::door(Polygon2D::rectangle(1.0, -0.2, 2.0, 0.0)));
        let remote = builder.add_opening(Opening::door(Polygon2D::rectangle(1.0, 8.0, 2.0, 8.2)));

        let layout = builder.build(&config);
        let separators = layout.separators_of_area(area);
        assert!(separators.contains(&flush));
        assert!(separators.contains(&gap));
        assert!(!separators.contains(&far));

        let openings = layout.openings_of_space(space);
        assert_eq!(openings, vec![door]);
        assert!(!openings.contains(&remote));
    }

    #[test]
    fn relationships_follow_ownership() {
        let mut builder = LayoutBuilder::new();
        let space = builder.add_space(Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0));
        let a = builder
            .add_area(space, Polygon2D::rectangle(0.0, 0.0, 2.0, 4.0), AreaType::Kitchen, 1)
            .unwrap();
        let b = builder
            .add_area(space, Polygon2D::rectangle(2.0, 0.0, 4.0, 4.0), AreaType::Dining, 2)
            .unwrap();
        let f = builder
            .add_feature(a, Polygon2D::rectangle(0.1, 0.1, 1.0, 0.7), FeatureType::KitchenCounter)
            .unwrap();
        builder.add_opening(Opening::window(Polygon2D::rectangle(1.0, -0.2, 2.0, 0.0)));

        let layout = builder.build(&GeometryConfig::default());
        let owned: Vec<AreaKey> = layout.areas_of_space(space).map(|(k, _)| k).collect();
        assert_eq!(owned, vec![a, b]);
        let placed: Vec<FeatureKey> = layout.features_of_area(a).map(|(k, _)| k).collect();
        assert_eq!(placed, vec![f]);
        assert_eq!(layout.features_of_area(b).count(), 0);
        assert_eq!(layout.doors().count(), 0);
        assert_eq!(layout.openings().count(), 1);
    }
}
