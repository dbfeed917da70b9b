// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Headless render host.
//!
//! Stands in for the browser renderer: every element gets one drawable per
//! display mesh (at least one), and translations are kept in a table that
//! clients read through `GET /api/v1/scene`.

use geoplace_core::{ElementCatalog, ElementData, PartHandle, PartList, RenderHost, Vector3};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Default)]
pub struct SceneState {
    parts_by_element: FxHashMap<String, PartList>,
    owner: Vec<String>,
    translations: FxHashMap<PartHandle, Vector3<f64>>,
    generation: u64,
}

/// One drawable as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartTransform {
    pub part: PartHandle,
    pub element_id: String,
    pub translation: [f64; 3],
}

/// Scene contents at one render generation.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    /// Incremented on every render request.
    pub generation: u64,
    pub part_count: usize,
    /// Drawables that have been moved, by handle.
    pub transforms: Vec<PartTransform>,
}

impl SceneState {
    /// Allocate drawable handles for every element of the catalog.
    pub fn from_catalog(catalog: &ElementCatalog) -> Self {
        let mut scene = Self::default();
        for element in catalog.iter() {
            if scene.parts_by_element.contains_key(&element.element_id) {
                continue;
            }
            let count = element.display_value_count.max(1);
            let parts: PartList = (0..count)
                .map(|_| {
                    let handle = PartHandle(scene.owner.len() as u32);
                    scene.owner.push(element.element_id.clone());
                    handle
                })
                .collect();
            scene.parts_by_element.insert(element.element_id.clone(), parts);
        }
        tracing::debug!(
            elements = scene.parts_by_element.len(),
            parts = scene.owner.len(),
            "Built scene"
        );
        scene
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn translation(&self, part: PartHandle) -> Option<Vector3<f64>> {
        self.translations.get(&part).copied()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let mut transforms: Vec<PartTransform> = self
            .translations
            .iter()
            .map(|(&part, t)| PartTransform {
                part,
                element_id: self.owner.get(part.0 as usize).cloned().unwrap_or_default(),
                translation: [t.x, t.y, t.z],
            })
            .collect();
        transforms.sort_by_key(|t| t.part);
        SceneSnapshot {
            generation: self.generation,
            part_count: self.owner.len(),
            transforms,
        }
    }
}

impl RenderHost for SceneState {
    fn resolve_parts(&self, element: &ElementData) -> PartList {
        self.parts_by_element
            .get(&element.element_id)
            .cloned()
            .unwrap_or_default()
    }

    fn set_translation(&mut self, part: PartHandle, translation: &Vector3<f64>) {
        self.translations.insert(part, *translation);
    }

    fn request_render(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> ElementCatalog {
        let raw = json!([
            { "id": "a", "elementId": 556473, "category": "Specialty Equipment", "displayValue": [{}, {}, {}] },
            { "id": "b", "elementId": "557614", "category": "Specialty Equipment" },
            { "id": "c", "elementId": "9001", "category": "Generic Models", "displayValue": [] }
        ]);
        ElementCatalog::from_json(&raw.to_string()).unwrap()
    }

    #[test]
    fn test_parts_per_display_mesh() {
        let scene = SceneState::from_catalog(&catalog());
        let a = scene.resolve_parts(&ElementData::new("556473"));
        assert_eq!(a.as_slice(), &[PartHandle(0), PartHandle(1), PartHandle(2)]);
        assert_eq!(scene.resolve_parts(&ElementData::new("557614")).len(), 1);
        assert_eq!(scene.resolve_parts(&ElementData::new("9001")).len(), 1);
        assert!(scene.resolve_parts(&ElementData::new("missing")).is_empty());
        assert_eq!(scene.snapshot().part_count, 5);
    }

    #[test]
    fn test_snapshot_lists_moved_parts() {
        let mut scene = SceneState::from_catalog(&catalog());
        scene.set_translation(PartHandle(3), &Vector3::new(1.0, 2.0, 3.0));
        scene.set_translation(PartHandle(1), &Vector3::new(-1.0, 0.0, 0.5));
        scene.request_render();

        let snap = scene.snapshot();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.transforms.len(), 2);
        assert_eq!(snap.transforms[0].part, PartHandle(1));
        assert_eq!(snap.transforms[0].element_id, "556473");
        assert_eq!(snap.transforms[1].element_id, "557614");
        assert_eq!(snap.transforms[1].translation, [1.0, 2.0, 3.0]);
    }
}
