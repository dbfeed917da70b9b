// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Selection, correction and support methods for the viewer

use super::{point_from_js, to_js, PositionCore};
use crate::utils::js_error;
use geoplace_core::{Category, Error, MoveMode, RefreshInterval, SupportEntry, SupportList};
use wasm_bindgen::prelude::*;

fn mode(animate: bool) -> MoveMode {
    if animate {
        MoveMode::Animated
    } else {
        MoveMode::Immediate
    }
}

#[wasm_bindgen]
impl PositionCore {
    /// Select an element; returns `{ element_id, coordinates, tracked, document_url }`
    /// or `null` for ids not in the model
    pub fn select(&mut self, element_id: &str) -> JsValue {
        match self.session.select(element_id) {
            Some(info) => to_js(&info),
            None => JsValue::NULL,
        }
    }

    /// Select a panorama anchor (generic model); returns `{ element_id, object_id, panorama_url }`
    #[wasm_bindgen(js_name = selectView)]
    pub fn select_view(&mut self, element_id: &str) -> JsValue {
        match self.session.select_view(element_id) {
            Some(view) => to_js(&view),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// Current readout as `[x, y, z]`
    pub fn readout(&self) -> Vec<f64> {
        let p = self.session.readout();
        vec![p.x, p.y, p.z]
    }

    /// Edit the readout (the coordinate inputs)
    #[wasm_bindgen(js_name = setTruePosition)]
    pub fn set_true_position(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) {
        self.session.set_true_position(point_from_js(x, y, z));
    }

    /// Move the selected element to the readout
    #[wasm_bindgen(js_name = moveSelected)]
    pub fn move_selected(&mut self, animate: bool) -> JsValue {
        match self.session.move_selected(mode(animate)) {
            Some(c) => to_js(&c),
            None => JsValue::NULL,
        }
    }

    /// Move a tracked element to its true position. `null` axes are unknown
    /// and keep their current value. Returns the correction, or `null` for
    /// untracked ids.
    #[wasm_bindgen(js_name = applyCorrection)]
    pub fn apply_correction(
        &mut self,
        element_id: &str,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        animate: bool,
    ) -> JsValue {
        match self.session.correct(element_id, point_from_js(x, y, z), mode(animate)) {
            Some(c) => to_js(&c),
            None => JsValue::NULL,
        }
    }

    /// Frame hook; returns the number of animations advanced
    pub fn advance(&mut self, delta_seconds: f64) -> usize {
        self.session.tick(delta_seconds)
    }

    /// Replace the support list with `[{ key, comment, image_url }, ...]`.
    /// Returns true when the followed support is gone and the host must stop
    /// polling it.
    #[wasm_bindgen(js_name = setSupports)]
    pub fn set_supports(&mut self, entries: JsValue) -> Result<bool, JsValue> {
        let entries: Vec<SupportEntry> = serde_wasm_bindgen::from_value(entries)?;
        Ok(self.session.set_supports(SupportList::from_entries(entries)))
    }

    /// Support list, placeholder first
    pub fn supports(&self) -> JsValue {
        to_js(self.session.supports().entries())
    }

    /// Choose a support by key; the placeholder key clears the selection
    #[wasm_bindgen(js_name = chooseSupport)]
    pub fn choose_support(&mut self, key: &str) -> JsValue {
        match self.session.choose_support(key) {
            Some(info) => to_js(&info),
            None => JsValue::NULL,
        }
    }

    /// Turn GPS follow on; returns the element id to poll
    #[wasm_bindgen(js_name = enableFollow)]
    pub fn enable_follow(&mut self) -> Result<String, JsValue> {
        let (element_id, _) = self.session.enable_follow().map_err(js_error)?;
        Ok(element_id.to_string())
    }

    #[wasm_bindgen(js_name = disableFollow)]
    pub fn disable_follow(&mut self) {
        self.session.disable_follow();
    }

    /// Set the follow period (3000, 5000 or 10000 ms); returns true when a
    /// running follow loop must be restarted
    #[wasm_bindgen(js_name = setRefreshInterval)]
    pub fn set_refresh_interval(&mut self, millis: u32) -> Result<bool, JsValue> {
        let interval = RefreshInterval::from_millis(millis as u64).map_err(js_error)?;
        Ok(self.session.set_refresh_interval(interval))
    }

    /// Follow state as `{ enabled, interval }`
    pub fn follow(&self) -> JsValue {
        to_js(&self.session.follow())
    }

    /// Object ids of a category (`specialty-equipment` or `generic-models`)
    #[wasm_bindgen(js_name = objectIds)]
    pub fn object_ids(&self, category: &str) -> Result<Vec<String>, JsValue> {
        let category = Category::from_slug(category)
            .ok_or_else(|| js_error(Error::UnknownCategory(category.to_string())))?;
        Ok(self
            .session
            .catalog()
            .object_ids(category)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode() {
        assert_eq!(mode(true), MoveMode::Animated);
        assert_eq!(mode(false), MoveMode::Immediate);
    }
}
