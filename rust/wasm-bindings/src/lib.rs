// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blockhand WebAssembly Bindings
//!
//! JavaScript/TypeScript API for the Blockhand engine built with
//! wasm-bindgen. The page runs hand tracking and rendering; this module turns
//! each frame's landmarks into scene events and overlay instructions.

use wasm_bindgen::prelude::*;

mod api;
mod error;
mod storage;
mod utils;

pub use api::BlockBuilder;
pub use error::BindingError;
pub use storage::{BrowserStore, LocalStorageStore};
pub use utils::set_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
    utils::init_logging();
}

/// Get the version of Blockhand
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
