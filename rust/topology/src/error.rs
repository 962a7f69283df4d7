// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout construction and configuration loading.
//!
//! Geometry passes never fail: they absorb kernel errors into documented
//! defaults. Only building a [`Layout`](crate::Layout) and parsing JSON
//! configuration return these errors.

use crate::keys::{AreaKey, SpaceKey};

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a layout or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An area was attached to a space that is not in the layout.
    #[error("space not found: {0:?}")]
    SpaceNotFound(SpaceKey),

    /// A feature was attached to an area that is not in the layout.
    #[error("area not found: {0:?}")]
    AreaNotFound(AreaKey),

    /// A polygon kernel operation rejected its input.
    #[error("geometry error: {0}")]
    Geometry(#[from] plan_lite_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
