// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes engine warnings (unreadable or corrupt stored blocks, failed
/// saves) to the browser console. Safe to call more than once.
pub(crate) fn init_logging() {
    console_log::init_with_level(log::Level::Warn).ok();
}

/// Writes a warning to the browser console.
pub(crate) fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// High-resolution page clock in milliseconds, or 0 outside a window.
pub(crate) fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
