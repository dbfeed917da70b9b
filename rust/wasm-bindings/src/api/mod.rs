// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for GeoPlace

mod georef;
mod session;

pub use georef::BasePointJs;

use crate::host::JsRenderHost;
use crate::utils::js_error;
use geoplace_core::{ElementCatalog, Point3, Session, DEFAULT_TIME_SCALE};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Position tracking for one loaded model
///
/// Example:
/// ```javascript
/// const core = new PositionCore(modelJson, renderer);
/// core.select("556473");
/// core.applyCorrection("556473", 13.225, -35.146, null, true);
/// // from the frame loop
/// core.advance(deltaSeconds);
/// ```
#[wasm_bindgen]
pub struct PositionCore {
    session: Session<JsRenderHost>,
}

#[wasm_bindgen]
impl PositionCore {
    /// Build from the model's element JSON and a renderer object.
    /// `timeScale` defaults to 0.25 (four-second animations).
    #[wasm_bindgen(constructor)]
    pub fn new(
        model_json: &str,
        renderer: JsValue,
        time_scale: Option<f64>,
    ) -> Result<PositionCore, JsValue> {
        crate::utils::set_panic_hook();

        let catalog = ElementCatalog::from_json(model_json).map_err(js_error)?;
        let host = JsRenderHost::from_renderer(&renderer)?;
        let session = Session::new(catalog, host, time_scale.unwrap_or(DEFAULT_TIME_SCALE));
        Ok(Self { session })
    }

    /// Replace the model; selection, animations and follow are reset
    pub fn reload(&mut self, model_json: &str) -> Result<(), JsValue> {
        let catalog = ElementCatalog::from_json(model_json).map_err(js_error)?;
        self.session.reload(catalog);
        Ok(())
    }

    /// Number of elements in the model
    #[wasm_bindgen(getter, js_name = elementCount)]
    pub fn element_count(&self) -> usize {
        self.session.catalog().len()
    }

    /// Ids of the tracked elements, in model order
    #[wasm_bindgen(js_name = trackedIds)]
    pub fn tracked_ids(&self) -> Vec<String> {
        self.session
            .ledger()
            .iter()
            .map(|e| e.element_id.clone())
            .collect()
    }

    /// Ledger entry of a tracked element, or `undefined`
    pub fn lookup(&self, element_id: &str) -> JsValue {
        match self.session.ledger().lookup(element_id) {
            Some(entry) => to_js(entry),
            None => JsValue::UNDEFINED,
        }
    }

    /// Number of running animation tasks
    #[wasm_bindgen(getter, js_name = pendingAnimations)]
    pub fn pending_animations(&self) -> usize {
        self.session.animator().tasks().len()
    }
}

/// Serialize for JavaScript; plain objects rather than `Map`s
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

/// Point from optional JS numbers; missing axes become NaN (unknown)
fn point_from_js(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Point3<f64> {
    Point3::new(
        x.unwrap_or(f64::NAN),
        y.unwrap_or(f64::NAN),
        z.unwrap_or(f64::NAN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_js_missing_axes() {
        let p = point_from_js(Some(1.0), None, Some(3.0));
        assert_eq!(p.x, 1.0);
        assert!(p.y.is_nan());
        assert_eq!(p.z, 3.0);
    }
}
