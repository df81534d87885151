// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for Blockhand
//!
//! One [`BlockBuilder`] per page. Call `processFrame` from the tracking
//! callback and apply the returned object to the scene and overlay.

use blockhand_core::{
    persistence, CameraFacing, EngineConfig, HandLandmarks, Rgb, Session, Viewport, SWATCHES,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::BindingError;
use crate::storage::BrowserStore;
use crate::utils::now_ms;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, BindingError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

/// Main Blockhand API
#[wasm_bindgen]
pub struct BlockBuilder {
    session: Session<BrowserStore>,
}

#[wasm_bindgen]
impl BlockBuilder {
    /// Create a builder. `config` is an optional partial `EngineConfig`
    /// object; missing fields take their defaults. Saved blocks are restored
    /// from `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<BlockBuilder, JsError> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| BindingError::Config(e.to_string()))?
        };

        let session = Session::new(config, BrowserStore::detect()).map_err(BindingError::from)?;
        Ok(Self { session })
    }

    /// Process one video frame.
    ///
    /// `landmarks` is the first hand's keypoints as a flat array of 21 `x, y`
    /// pairs or `x, y, z` triples (normalized video coordinates), or
    /// `undefined` when no hand is visible. `timestamp` defaults to
    /// `performance.now()`.
    #[wasm_bindgen(js_name = processFrame)]
    pub fn process_frame(
        &mut self,
        landmarks: Option<Vec<f64>>,
        timestamp: Option<f64>,
    ) -> Result<JsValue, JsError> {
        let hand = landmarks
            .map(|flat| HandLandmarks::from_flat(&flat))
            .transpose()
            .map_err(|e| BindingError::Landmarks(e.to_string()))?;
        let now = timestamp.unwrap_or_else(now_ms);

        let frame = self.session.process_frame(hand.as_ref(), now);
        Ok(to_js(&frame)?)
    }

    /// Color for new blocks, as `0xRRGGBB`.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, color: u32) {
        self.session.set_color(Rgb::new(color));
    }

    #[wasm_bindgen(getter)]
    pub fn color(&self) -> u32 {
        self.session.controls().color.value()
    }

    #[wasm_bindgen(js_name = setEraserMode)]
    pub fn set_eraser_mode(&mut self, enabled: bool) {
        self.session.set_eraser(enabled);
    }

    #[wasm_bindgen(getter, js_name = eraserMode)]
    pub fn eraser_mode(&self) -> bool {
        self.session.controls().eraser
    }

    /// Switch between front and rear cameras. Returns `"front"` or `"rear"`.
    #[wasm_bindgen(js_name = toggleCamera)]
    pub fn toggle_camera(&mut self) -> String {
        facing_name(self.session.toggle_camera()).to_string()
    }

    #[wasm_bindgen(js_name = setRearCamera)]
    pub fn set_rear_camera(&mut self, rear: bool) {
        let facing = if rear {
            CameraFacing::Rear
        } else {
            CameraFacing::Front
        };
        self.session.set_facing(facing);
    }

    #[wasm_bindgen(getter, js_name = cameraFacing)]
    pub fn camera_facing(&self) -> String {
        facing_name(self.session.controls().facing).to_string()
    }

    /// Overlay canvas size in pixels; also sets the render aspect ratio.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.session.set_viewport(Viewport::new(width, height));
    }

    /// Remove every block and the saved copy. Returns the scene events.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> Result<JsValue, JsError> {
        let events = self.session.clear_all();
        Ok(to_js(&events)?)
    }

    /// Current blocks as `{x, y, z, color}` records in group-local units.
    pub fn blocks(&self) -> Result<JsValue, JsError> {
        let cell_size = self.session.config().cell_size;
        let records: Vec<_> = self
            .session
            .blocks()
            .iter()
            .map(|(_, block)| persistence::BlockRecord::from_block(block, cell_size))
            .collect();
        Ok(to_js(&records)?)
    }

    #[wasm_bindgen(getter, js_name = blockCount)]
    pub fn block_count(&self) -> usize {
        self.session.blocks().len()
    }

    /// Whether blocks survive a reload.
    #[wasm_bindgen(getter)]
    pub fn persistent(&self) -> bool {
        self.session.store().is_persistent()
    }

    /// Palette colors as `0xRRGGBB`.
    pub fn swatches() -> Vec<u32> {
        SWATCHES.iter().map(Rgb::value).collect()
    }
}

fn facing_name(facing: CameraFacing) -> &'static str {
    match facing {
        CameraFacing::Front => "front",
        CameraFacing::Rear => "rear",
    }
}
