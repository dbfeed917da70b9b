// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `PositionCore` driven through a JavaScript renderer object.
//!
//! Run with `wasm-pack test --node rust/wasm-bindings`.

#![cfg(target_arch = "wasm32")]

use geoplace_wasm::PositionCore;
use js_sys::{Array, Function, Object, Reflect, JSON};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const MODEL: &str = r#"[
    { "id": "root", "atomic": false },
    {
        "id": "obj-a",
        "elementId": 556473,
        "category": "Specialty Equipment",
        "transform": { "matrix": [1, 0, 0, 5, 0, 1, 0, 5, 0, 0, 1, 5, 0, 0, 0, 1] }
    },
    { "id": "obj-b", "elementId": "9001", "category": "Generic Models" }
]"#;

/// Renderer whose part id is the numeric element id. Every `setTransform`
/// and `requestRender` call is pushed to `renderer.log`.
fn recording_renderer() -> JsValue {
    Function::new_no_args(
        "const log = [];
         return {
             log,
             resolveParts: (element) => [Number(element.elementId)],
             setTransform: (part, x, y, z) => { log.push([part, x, y, z]); },
             requestRender: () => { log.push('render'); },
         };",
    )
    .call0(&JsValue::NULL)
    .unwrap()
}

fn log_of(renderer: &JsValue) -> String {
    let log = Reflect::get(renderer, &JsValue::from_str("log")).unwrap();
    JSON::stringify(&log).unwrap().into()
}

#[wasm_bindgen_test]
fn renderer_without_callbacks_is_rejected() {
    let renderer = Object::new();
    Reflect::set(
        &renderer,
        &JsValue::from_str("resolveParts"),
        &Function::new_with_args("element", "return [];"),
    )
    .unwrap();
    assert!(PositionCore::new(MODEL, renderer.into(), None).is_err());
}

#[wasm_bindgen_test]
fn model_containers_are_not_elements() {
    let core = PositionCore::new(MODEL, recording_renderer(), None).unwrap();
    assert_eq!(core.element_count(), 2);
    assert_eq!(core.tracked_ids(), vec!["556473".to_string()]);
    assert_eq!(core.object_ids("generic-models").unwrap(), vec!["obj-b".to_string()]);
    assert!(core.object_ids("walls").is_err());
}

#[wasm_bindgen_test]
fn immediate_correction_with_unknown_axis() {
    let renderer = recording_renderer();
    let mut core = PositionCore::new(MODEL, renderer.clone(), None).unwrap();

    let correction = core.apply_correction("556473", Some(7.0), None, Some(2.0), false);
    assert!(!correction.is_null());
    assert_eq!(log_of(&renderer), r#"[[556473,2,0,-3],"render"]"#);

    assert!(!core.select("556473").is_null());
    assert_eq!(core.readout(), vec![7.0, 5.0, 2.0]);

    assert!(core.apply_correction("9001", Some(1.0), Some(1.0), Some(1.0), false).is_null());
}

#[wasm_bindgen_test]
fn animated_correction_runs_from_the_frame_hook() {
    let renderer = recording_renderer();
    let mut core = PositionCore::new(MODEL, renderer.clone(), Some(1.0)).unwrap();

    core.apply_correction("556473", Some(9.0), Some(5.0), Some(5.0), true);
    assert_eq!(core.pending_animations(), 1);
    assert_eq!(log_of(&renderer), "[]");

    assert_eq!(core.advance(1.0), 1);
    assert_eq!(core.pending_animations(), 0);
    assert_eq!(log_of(&renderer), r#"[[556473,4,0,0],"render"]"#);
    assert_eq!(core.advance(1.0), 0);
}

#[wasm_bindgen_test]
fn supports_and_follow() {
    let mut core = PositionCore::new(MODEL, recording_renderer(), None).unwrap();
    let supports = JSON::parse(r#"[{ "key": "556473", "comment": "Mât 1", "image_url": "" }]"#).unwrap();
    assert!(!core.set_supports(supports).unwrap());
    assert_eq!(Array::from(&core.supports()).length(), 2);

    assert!(core.enable_follow().is_err());
    assert!(!core.choose_support("556473").is_null());
    assert_eq!(core.enable_follow().unwrap(), "556473");
    assert!(core.set_refresh_interval(10000).unwrap());
    assert!(core.set_refresh_interval(4000).is_err());

    // the followed support left the store
    assert!(core.set_supports(Array::new().into()).unwrap());
    assert!(core.enable_follow().is_err());

    assert!(core.set_supports(JsValue::from_f64(3.0)).is_err());
}
