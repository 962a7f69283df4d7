// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity key types for arena-based storage.
//!
//! Every layout entity gets a unique, type-safe key from its
//! `slotmap::SlotMap`. Keys are the only identity used in maps and sets;
//! footprints are never compared or hashed.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a space (connected indoor region).
    pub struct SpaceKey;

    /// Key for an area (classified region inside a space).
    pub struct AreaKey;

    /// Key for a separator (wall, railing or column).
    pub struct SeparatorKey;

    /// Key for an opening (door or window).
    pub struct OpeningKey;

    /// Key for a feature (furniture, fixture or shaft).
    pub struct FeatureKey;
}

/// A node of the connectivity graph: either a whole space or one of its areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    Space(SpaceKey),
    Area(AreaKey),
}

impl EntityKey {
    /// Returns the area key if this entity is an area.
    pub fn as_area(&self) -> Option<AreaKey> {
        match self {
            EntityKey::Area(k) => Some(*k),
            EntityKey::Space(_) => None,
        }
    }

    /// Returns the space key if this entity is a space.
    pub fn as_space(&self) -> Option<SpaceKey> {
        match self {
            EntityKey::Space(k) => Some(*k),
            EntityKey::Area(_) => None,
        }
    }
}

impl From<SpaceKey> for EntityKey {
    fn from(k: SpaceKey) -> Self {
        EntityKey::Space(k)
    }
}

impl From<AreaKey> for EntityKey {
    fn from(k: AreaKey) -> Self {
        EntityKey::Area(k)
    }
}
