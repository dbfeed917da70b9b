// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render host backed by JavaScript callbacks.
//!
//! The renderer object must provide:
//!
//! ```javascript
//! {
//!   resolveParts(element) { return [partId, ...]; },   // numbers
//!   setTransform(partId, x, y, z) { ... },
//!   requestRender() { ... },
//! }
//! ```

use crate::utils::{js_error, warn};
use geoplace_core::{ElementData, PartHandle, PartList, RenderHost, Vector3};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct JsRenderHost {
    resolve_parts: Function,
    set_transform: Function,
    request_render: Function,
}

impl JsRenderHost {
    /// Read the three callbacks from a renderer object
    pub fn from_renderer(renderer: &JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            resolve_parts: callback(renderer, "resolveParts")?,
            set_transform: callback(renderer, "setTransform")?,
            request_render: callback(renderer, "requestRender")?,
        })
    }
}

fn callback(renderer: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(renderer, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| js_error(format!("renderer.{name} is not a function")))
}

/// Part handles from the numbers returned by `resolveParts`; anything that
/// is not a non-negative integer is dropped.
pub(crate) fn parts_from_numbers(values: impl IntoIterator<Item = f64>) -> PartList {
    values
        .into_iter()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| PartHandle(v as u32))
        .collect()
}

impl RenderHost for JsRenderHost {
    fn resolve_parts(&self, element: &ElementData) -> PartList {
        let arg = match serde_wasm_bindgen::to_value(element) {
            Ok(v) => v,
            Err(e) => {
                warn(&format!("resolveParts: cannot pass element {}: {e}", element.element_id));
                return PartList::new();
            }
        };
        match self.resolve_parts.call1(&JsValue::NULL, &arg) {
            Ok(result) if Array::is_array(&result) => {
                parts_from_numbers(Array::from(&result).iter().filter_map(|v| v.as_f64()))
            }
            Ok(_) => PartList::new(),
            Err(e) => {
                warn(&format!("resolveParts failed for {}: {e:?}", element.element_id));
                PartList::new()
            }
        }
    }

    fn set_translation(&mut self, part: PartHandle, translation: &Vector3<f64>) {
        let args = Array::of4(
            &JsValue::from_f64(part.0 as f64),
            &JsValue::from_f64(translation.x),
            &JsValue::from_f64(translation.y),
            &JsValue::from_f64(translation.z),
        );
        if let Err(e) = self.set_transform.apply(&JsValue::NULL, &args) {
            warn(&format!("setTransform failed for part {}: {e:?}", part.0));
        }
    }

    fn request_render(&mut self) {
        if let Err(e) = self.request_render.call0(&JsValue::NULL) {
            warn(&format!("requestRender failed: {e:?}"));
        }
    }
}
