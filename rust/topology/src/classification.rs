// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed classification enums and the scheme that groups them.
//!
//! Which area types count as public or private, and which features
//! never block a room label, is product policy rather than geometry. It lives
//! in a [`ClassificationScheme`] value handed to each component, so two
//! schemes can be used side by side in one process.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Classification of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaType {
    Room,
    LivingRoom,
    Bedroom,
    Kitchen,
    Dining,
    Bathroom,
    Toilet,
    Storeroom,
    Corridor,
    Lobby,
    Staircase,
    Elevator,
    Shaft,
    Balcony,
    Loggia,
    Terrace,
    Garden,
}

impl AreaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::Room => "ROOM",
            AreaType::LivingRoom => "LIVING_ROOM",
            AreaType::Bedroom => "BEDROOM",
            AreaType::Kitchen => "KITCHEN",
            AreaType::Dining => "DINING",
            AreaType::Bathroom => "BATHROOM",
            AreaType::Toilet => "TOILET",
            AreaType::Storeroom => "STOREROOM",
            AreaType::Corridor => "CORRIDOR",
            AreaType::Lobby => "LOBBY",
            AreaType::Staircase => "STAIRCASE",
            AreaType::Elevator => "ELEVATOR",
            AreaType::Shaft => "SHAFT",
            AreaType::Balcony => "BALCONY",
            AreaType::Loggia => "LOGGIA",
            AreaType::Terrace => "TERRACE",
            AreaType::Garden => "GARDEN",
        }
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    // Furniture
    Bed,
    Sofa,
    Table,
    Chair,
    Wardrobe,
    Shelf,
    // Fixtures
    KitchenCounter,
    Sink,
    Toilet,
    Shower,
    Bathtub,
    WashingMachine,
    Stairs,
    Elevator,
    // Building core
    Shaft,
}

/// How a feature's footprint is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Freely placed by the author; eligible for wall snapping.
    Free,
    /// Derived from the enclosing area; never moved.
    AreaDerived,
}

impl FeatureType {
    pub fn placement(&self) -> Placement {
        match self {
            FeatureType::Shaft => Placement::AreaDerived,
            FeatureType::Bed
            | FeatureType::Sofa
            | FeatureType::Table
            | FeatureType::Chair
            | FeatureType::Wardrobe
            | FeatureType::Shelf
            | FeatureType::KitchenCounter
            | FeatureType::Sink
            | FeatureType::Toilet
            | FeatureType::Shower
            | FeatureType::Bathtub
            | FeatureType::WashingMachine
            | FeatureType::Stairs
            | FeatureType::Elevator => Placement::Free,
        }
    }
}

/// Kind of separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeparatorType {
    Wall,
    Railing,
    Column,
}

/// Kind of opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpeningType {
    Door,
    Window,
}

/// Mechanism of an opening, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpeningSubtype {
    Hinged,
    DoubleHinged,
    Sliding,
}

impl OpeningSubtype {
    /// Whether the leaf sweeps an arc when it opens.
    pub fn swings(&self) -> bool {
        match self {
            OpeningSubtype::Hinged | OpeningSubtype::DoubleHinged => true,
            OpeningSubtype::Sliding => false,
        }
    }
}

/// Groups of area and feature types that drive topology and labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationScheme {
    /// Shared circulation reachable by every unit.
    pub public_area_types: FxHashSet<AreaType>,
    /// Areas belonging to a single unit; they govern door swing.
    pub private_area_types: FxHashSet<AreaType>,
    /// Features that never block a room label.
    pub label_exempt_features: FxHashSet<FeatureType>,
}

impl Default for ClassificationScheme {
    /// Residential scheme.
    fn default() -> Self {
        Self {
            public_area_types: [
                AreaType::Corridor,
                AreaType::Lobby,
                AreaType::Staircase,
                AreaType::Elevator,
            ]
            .into_iter()
            .collect(),
            private_area_types: [
                AreaType::Room,
                AreaType::LivingRoom,
                AreaType::Bedroom,
                AreaType::Kitchen,
                AreaType::Dining,
                AreaType::Bathroom,
                AreaType::Toilet,
                AreaType::Storeroom,
            ]
            .into_iter()
            .collect(),
            label_exempt_features: [FeatureType::Elevator].into_iter().collect(),
        }
    }
}

impl ClassificationScheme {
    /// Parse a scheme from JSON; omitted groups keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn is_public(&self, area_type: AreaType) -> bool {
        self.public_area_types.contains(&area_type)
    }

    pub fn is_private(&self, area_type: AreaType) -> bool {
        self.private_area_types.contains(&area_type)
    }

    /// Whether a feature of this type is subtracted before label placement.
    pub fn blocks_label(&self, feature_type: FeatureType) -> bool {
        !self.label_exempt_features.contains(&feature_type)
    }
}
