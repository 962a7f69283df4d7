// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for polygon kernel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during polygon processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Ring {ring} is not closed: first vertex {first:?} differs from last vertex {last:?}")]
    UnclosedRing {
        ring: usize,
        first: (f64, f64),
        last: (f64, f64),
    },

    #[error("Degenerate polygon: {0}")]
    DegeneratePolygon(String),

    #[error("Invalid buffer distance: {0}")]
    InvalidDistance(f64),
}
