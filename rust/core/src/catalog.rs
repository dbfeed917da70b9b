// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element catalog: the loaded model's elements indexed by element id

use crate::element::{Category, ElementData};
use crate::error::Result;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;

/// One object of the exported model. Container, root and level nodes carry
/// no usable `elementId` and are not indexed.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModelNode {
    Element(ElementData),
    Other(Value),
}

/// All model elements, in model order
#[derive(Debug, Clone, Default)]
pub struct ElementCatalog {
    elements: Vec<ElementData>,
    by_id: FxHashMap<String, usize>,
}

impl ElementCatalog {
    /// Parse a JSON array of raw element objects.
    ///
    /// Objects without an `elementId` are skipped; only a document that is
    /// not an array of objects is an error.
    pub fn from_json(content: &str) -> Result<Self> {
        let nodes: Vec<ModelNode> = serde_json::from_str(content)?;
        let elements = nodes
            .into_iter()
            .filter_map(|node| match node {
                ModelNode::Element(element) => Some(element),
                ModelNode::Other(value) => {
                    tracing::debug!(
                        id = %value.get("id").and_then(serde_json::Value::as_str).unwrap_or("?"),
                        "Skipping model object without elementId"
                    );
                    None
                }
            })
            .collect();
        Ok(Self::from_elements(elements))
    }

    pub fn from_elements(elements: Vec<ElementData>) -> Self {
        let mut by_id = FxHashMap::default();
        for (i, e) in elements.iter().enumerate() {
            by_id.entry(e.element_id.clone()).or_insert(i);
        }
        tracing::info!(elements = elements.len(), "Element catalog loaded");
        Self { elements, by_id }
    }

    pub fn by_element_id(&self, element_id: &str) -> Option<&ElementData> {
        self.by_id.get(element_id).map(|&i| &self.elements[i])
    }

    /// Atomic elements of a category, in model order
    pub fn in_category(&self, category: Category) -> Vec<&ElementData> {
        self.elements
            .iter()
            .filter(|e| e.category_kind() == Some(category))
            .collect()
    }

    /// Viewer object ids of a category, for the host's isolate filter
    pub fn object_ids(&self, category: Category) -> Vec<&str> {
        self.in_category(category)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementData> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
