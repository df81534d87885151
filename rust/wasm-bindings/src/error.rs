// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Errors surfaced to JavaScript. Each converts into a thrown `Error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid landmarks: {0}")]
    Landmarks(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Engine(#[from] blockhand_core::Error),
}

impl From<serde_wasm_bindgen::Error> for BindingError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
