// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project base point exposed to JavaScript

use geoplace_core::{BasePoint, ProjectedPosition};
use wasm_bindgen::prelude::*;

/// Base point of the project CRS
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct BasePointJs {
    inner: BasePoint,
}

#[wasm_bindgen]
impl BasePointJs {
    /// Base point at the given map offset, no rotation
    #[wasm_bindgen(constructor)]
    pub fn new(eastings: f64, northings: f64, orthogonal_height: f64) -> Self {
        Self {
            inner: BasePoint::new(eastings, northings, orthogonal_height),
        }
    }

    /// Base point of the reference project (RGF93 / CC47)
    #[wasm_bindgen(js_name = projectDefault)]
    pub fn project_default() -> Self {
        Self {
            inner: BasePoint::default(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn eastings(&self) -> f64 {
        self.inner.eastings
    }

    #[wasm_bindgen(getter)]
    pub fn northings(&self) -> f64 {
        self.inner.northings
    }

    #[wasm_bindgen(getter, js_name = orthogonalHeight)]
    pub fn orthogonal_height(&self) -> f64 {
        self.inner.orthogonal_height
    }

    /// Rotation angle in radians
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation()
    }

    /// Transform model coordinates to map coordinates
    #[wasm_bindgen(js_name = localToMap)]
    pub fn local_to_map(&self, x: f64, y: f64, z: f64) -> Vec<f64> {
        let (e, n, h) = self.inner.local_to_map(x, y, z);
        vec![e, n, h]
    }

    /// Transform map coordinates to model coordinates
    #[wasm_bindgen(js_name = mapToLocal)]
    pub fn map_to_local(&self, e: f64, n: f64, h: f64) -> Vec<f64> {
        let (x, y, z) = self.inner.map_to_local(e, n, h);
        vec![x, y, z]
    }

    /// Model position of a projected GPS fix, rounded to millimetres.
    /// Without `height` the fix sits at the base point height.
    #[wasm_bindgen(js_name = toLocalPosition)]
    pub fn to_local_position(&self, x: f64, y: f64, height: Option<f64>) -> Vec<f64> {
        let p = self.inner.to_local_position(ProjectedPosition { x, y }, height);
        vec![p.x, p.y, p.z]
    }
}

impl From<BasePoint> for BasePointJs {
    fn from(inner: BasePoint) -> Self {
        Self { inner }
    }
}
