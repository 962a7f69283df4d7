// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full geometry pass over a layout.
//!
//! Order matters: area footprints are normalized exactly once, connectivity
//! is derived from the normalized footprints (so areas drawn short of the
//! wall still reach their doors), and door directions are judged against the
//! same normalized footprints. Features are snapped against the walls, which
//! are never normalized. Labels are anchored in the drawn area footprint so
//! the anchor never lands in the buffer strip under a wall. Layouts are
//! independent, so many of them are processed in parallel without shared
//! state.

use plan_lite_geometry::Polygon2D;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::classification::ClassificationScheme;
use crate::config::GeometryConfig;
use crate::connectivity::ConnectivityGraph;
use crate::door::{DoorOrientation, DoorOrientationResolver};
use crate::entities::{Feature, Separator};
use crate::keys::*;
use crate::label::{LabelAnchor, LabelAnchorResolver};
use crate::layout::Layout;
use crate::normalize::AreaBoundaryNormalizer;
use crate::snapping::{SnappedFootprint, WallSnappingEngine};

/// Everything derived from one layout.
#[derive(Debug, Clone)]
pub struct LayoutGeometry {
    /// Area footprints after normalization
    pub normalized_areas: FxHashMap<AreaKey, Polygon2D>,
    /// Area-level door graph built on the normalized footprints
    pub connectivity: ConnectivityGraph,
    pub doors: FxHashMap<OpeningKey, DoorOrientation>,
    /// Snapped footprint of every feature (shafts unchanged)
    pub features: FxHashMap<FeatureKey, SnappedFootprint>,
    /// Areas with a free region get exactly one anchor
    pub labels: FxHashMap<AreaKey, LabelAnchor>,
}

/// Runs every geometry pass with one configuration and scheme.
#[derive(Debug, Clone, Default)]
pub struct LayoutProcessor {
    config: GeometryConfig,
    scheme: ClassificationScheme,
}

impl LayoutProcessor {
    pub fn new(config: GeometryConfig, scheme: ClassificationScheme) -> Self {
        Self { config, scheme }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn scheme(&self) -> &ClassificationScheme {
        &self.scheme
    }

    /// Processes one layout.
    pub fn process(&self, layout: &Layout) -> LayoutGeometry {
        let normalizer = AreaBoundaryNormalizer::new(&self.config);
        let normalized_areas: FxHashMap<AreaKey, Polygon2D> = layout
            .areas()
            .map(|(k, a)| (k, normalizer.normalize(&a.footprint)))
            .collect();

        let connectivity = ConnectivityGraph::build(
            layout.doors().map(|(k, o)| (k, &o.footprint)),
            layout
                .areas()
                .filter_map(|(k, _)| normalized_areas.get(&k).map(|f| (EntityKey::Area(k), f))),
            self.config.overlap_epsilon,
        );

        let resolver = DoorOrientationResolver::new(&self.scheme);
        let doors: FxHashMap<OpeningKey, DoorOrientation> = layout
            .doors()
            .filter_map(|(k, _)| {
                resolver
                    .resolve_in_layout(layout, &connectivity, Some(&normalized_areas), k)
                    .map(|o| (k, o))
            })
            .collect();

        let engine = WallSnappingEngine::new(&self.config);
        let features: FxHashMap<FeatureKey, SnappedFootprint> = layout
            .features()
            .map(|(k, f)| (k, engine.snap(f, &area_separators(layout, f.area))))
            .collect();

        let labeller = LabelAnchorResolver::new(&self.config, &self.scheme);
        let labels: FxHashMap<AreaKey, LabelAnchor> = layout
            .areas()
            .filter_map(|(k, area)| {
                let placed: Vec<&Feature> = layout.features_of_area(k).map(|(_, f)| f).collect();
                labeller
                    .resolve(&area.footprint, &placed, area.area_type.as_str(), 0.0)
                    .map(|anchor| (k, anchor))
            })
            .collect();

        tracing::debug!(
            areas = normalized_areas.len(),
            doors = doors.len(),
            entrances = connectivity.entrances().len(),
            dangling = connectivity.dangling_doors().len(),
            features = features.len(),
            moved = features.values().filter(|f| f.moved).count(),
            labels = labels.len(),
            "layout processed"
        );

        LayoutGeometry {
            normalized_areas,
            connectivity,
            doors,
            features,
            labels,
        }
    }

    /// Processes independent layouts in parallel; results keep input order.
    pub fn process_many(&self, layouts: &[Layout]) -> Vec<LayoutGeometry> {
        layouts.par_iter().map(|layout| self.process(layout)).collect()
    }
}

/// Separators touching an area, per the layout index
fn area_separators(layout: &Layout, area: AreaKey) -> Vec<&Separator> {
    layout
        .separators_of_area(area)
        .into_iter()
        .filter_map(|k| layout.separator(k))
        .collect()
}
