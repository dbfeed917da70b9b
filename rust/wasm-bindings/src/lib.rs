// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoPlace WebAssembly Bindings
//!
//! Runs the position ledger and animator inside the browser viewer. The
//! viewer hands over its renderer as three callbacks; see [`PositionCore`].

use wasm_bindgen::prelude::*;

mod api;
mod host;
mod utils;

pub use api::{BasePointJs, PositionCore};
pub use host::JsRenderHost;
pub use utils::set_panic_hook as init_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of GeoPlace
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
