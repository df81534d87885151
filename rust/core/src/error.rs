// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the gesture engine.
//!
//! The per-frame path never fails; these errors come from construction
//! paths only (parsing landmark buffers, validating configuration, talking
//! to a persistence slot).

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A landmark buffer did not describe exactly one 21-point hand.
    #[error("expected {expected} landmark values, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    /// A landmark coordinate was NaN or infinite.
    #[error("landmark {0} has a non-finite coordinate")]
    NonFiniteLandmark(usize),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Stored block data could not be decoded.
    #[error("corrupt block data: {0}")]
    CorruptData(#[from] serde_json::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The persistence slot rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),
}
