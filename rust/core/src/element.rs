// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed element schema
//!
//! Model elements arrive as the viewer's raw object JSON. Instead of
//! scanning loosely-typed property bags by name at runtime, the fields the
//! core needs are deserialized once into [`ElementData`]:
//!
//! - `elementId` (string or number, normalised to a string)
//! - `category` and the atomic flag, mapped to [`Category`]
//! - `transform`, read leniently into a [`Matrix4Data`]
//! - `parameters`, exposed through the [`ParameterName`] accessor
//!
//! Malformed optional fields degrade to `None` instead of failing the
//! whole element.

use nalgebra::Point3;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Row-major 4x4 transform as exported by the authoring tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix4Data(pub [f64; 16]);

impl Matrix4Data {
    /// Translation column (elements 3, 7 and 11 of the row-major matrix)
    #[inline]
    pub fn translation(&self) -> Point3<f64> {
        Point3::new(self.0[3], self.0[7], self.0[11])
    }

    /// Read a 16-number array; any other shape yields `None`
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 16 {
            return None;
        }
        let mut m = [0.0; 16];
        for (slot, item) in m.iter_mut().zip(items) {
            *slot = item.as_f64()?;
        }
        Some(Self(m))
    }

    /// Locate the matrix inside a raw `transform` field.
    ///
    /// Accepts a bare array, or an object whose first array-valued member
    /// holds the matrix (`{ "matrix": [...], "units": "m" }`).
    pub fn locate(transform: &Value) -> Option<Self> {
        match transform {
            Value::Array(_) => Self::from_value(transform),
            Value::Object(members) => {
                if let Some(m) = members.get("matrix").and_then(Self::from_value) {
                    return Some(m);
                }
                members.values().find_map(Self::from_value)
            }
            _ => None,
        }
    }
}

/// Object categories the viewer works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Site supports whose position is tracked and corrected
    SpecialtyEquipment,
    /// Panorama anchors for the 360° views
    GenericModels,
}

impl Category {
    /// Category name as written by the authoring tool
    pub fn raw_name(self) -> &'static str {
        match self {
            Category::SpecialtyEquipment => "Specialty Equipment",
            Category::GenericModels => "Generic Models",
        }
    }

    /// Classify a raw category string (substring match)
    pub fn classify(raw: &str) -> Option<Self> {
        [Category::SpecialtyEquipment, Category::GenericModels]
            .into_iter()
            .find(|c| raw.contains(c.raw_name()))
    }

    /// Parse the kebab-case slug used in URLs
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "specialty-equipment" => Some(Category::SpecialtyEquipment),
            "generic-models" => Some(Category::GenericModels),
            _ => None,
        }
    }
}

/// Known instance parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterName {
    /// Link to the support's documentation
    DocumentUrl,
    /// Link to the 360° panorama taken at a view anchor
    PanoramaUrl,
}

impl ParameterName {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterName::DocumentUrl => "URL_DOC",
            ParameterName::PanoramaUrl => "URL_PANO",
        }
    }
}

/// One instance parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub units: Value,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub speckle_type: String,
}

impl Parameter {
    /// Value as text, if it is a string
    pub fn text(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// A model element as seen by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    /// Viewer object id (content hash)
    #[serde(default)]
    pub id: String,
    /// Stable identifier shared with the authoring tool and the record store
    #[serde(rename = "elementId", deserialize_with = "string_or_number")]
    pub element_id: String,
    /// Raw category name
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the object is a leaf (not a container)
    #[serde(default = "default_atomic")]
    pub atomic: bool,
    #[serde(default, deserialize_with = "lenient_transform", skip_serializing)]
    pub transform: Option<Matrix4Data>,
    #[serde(default, deserialize_with = "lenient_parameters")]
    pub parameters: Vec<Parameter>,
    /// Number of display meshes attached to the element
    #[serde(
        default,
        rename = "displayValue",
        deserialize_with = "count_items",
        skip_serializing
    )]
    pub display_value_count: usize,
}

fn default_atomic() -> bool {
    true
}

impl ElementData {
    /// Minimal element, mostly useful for hosts and tests
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            element_id: element_id.into(),
            category: None,
            atomic: true,
            transform: None,
            parameters: Vec::new(),
            display_value_count: 0,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category.raw_name().to_string());
        self
    }

    pub fn with_transform(mut self, matrix: [f64; 16]) -> Self {
        self.transform = Some(Matrix4Data(matrix));
        self
    }

    pub fn with_parameter(mut self, name: ParameterName, value: &str) -> Self {
        self.parameters.push(Parameter {
            id: String::new(),
            name: name.as_str().to_string(),
            units: Value::Null,
            value: Value::String(value.to_string()),
            speckle_type: String::new(),
        });
        self
    }

    /// Category of an atomic element, if it is one the viewer knows
    pub fn category_kind(&self) -> Option<Category> {
        if !self.atomic {
            return None;
        }
        self.category.as_deref().and_then(Category::classify)
    }

    /// Typed parameter accessor
    pub fn parameter(&self, name: ParameterName) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name.as_str())
    }

    /// Non-blank URL held by a link parameter
    pub fn link(&self, name: ParameterName) -> Option<&str> {
        self.parameter(name)
            .and_then(Parameter::text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Position from the embedded transform; `None` without a usable matrix
    pub fn embedded_position(&self) -> Option<Point3<f64>> {
        self.transform.as_ref().map(Matrix4Data::translation)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "elementId must be a string or a number, got {}",
            other
        ))),
    }
}

fn lenient_transform<'de, D>(deserializer: D) -> Result<Option<Matrix4Data>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Matrix4Data::locate))
}

fn lenient_parameters<'de, D>(deserializer: D) -> Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let members: Vec<Value> = match value {
        Some(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(members
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Parameter>(v).ok())
        .collect())
}

fn count_items<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Null) | None => 0,
        Some(_) => 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity_with_translation(x: f64, y: f64, z: f64) -> Vec<f64> {
        vec![
            1.0, 0.0, 0.0, x, //
            0.0, 1.0, 0.0, y, //
            0.0, 0.0, 1.0, z, //
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    #[test]
    fn test_element_id_accepts_numbers() {
        let e: ElementData = serde_json::from_value(json!({ "elementId": 556473 })).unwrap();
        assert_eq!(e.element_id, "556473");
        assert!(e.transform.is_none());
        assert!(e.atomic);
    }

    #[test]
    fn test_transform_object_with_matrix() {
        let e: ElementData = serde_json::from_value(json!({
            "elementId": "E1",
            "transform": {
                "units": "m",
                "matrix": identity_with_translation(12.5, -3.0, 0.25),
            }
        }))
        .unwrap();
        assert_eq!(e.embedded_position(), Some(Point3::new(12.5, -3.0, 0.25)));
    }

    #[test]
    fn test_transform_first_array_member() {
        let e: ElementData = serde_json::from_value(json!({
            "elementId": "E1",
            "transform": { "value": identity_with_translation(1.0, 2.0, 3.0) }
        }))
        .unwrap();
        assert_eq!(e.embedded_position(), Some(Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_malformed_transform_degrades() {
        let e: ElementData = serde_json::from_value(json!({
            "elementId": "E1",
            "transform": { "matrix": [1.0, "two", 3.0] }
        }))
        .unwrap();
        assert!(e.transform.is_none());

        let e: ElementData =
            serde_json::from_value(json!({ "elementId": "E2", "transform": "identity" })).unwrap();
        assert!(e.transform.is_none());
    }

    #[test]
    fn test_parameters_typed_accessor() {
        let e: ElementData = serde_json::from_value(json!({
            "elementId": "E1",
            "parameters": {
                "a1b2": { "name": "URL_DOC", "value": "https://docs.example/E1", "speckle_type": "Objects.BuiltElements.Revit.Parameter" },
                "c3d4": { "name": "Mark", "value": 7 },
                "noise": "not a parameter"
            }
        }))
        .unwrap();
        assert_eq!(e.parameters.len(), 2);
        assert_eq!(e.link(ParameterName::DocumentUrl), Some("https://docs.example/E1"));
        assert_eq!(e.link(ParameterName::PanoramaUrl), None);
    }

    #[test]
    fn test_blank_link_is_none() {
        let e = ElementData::new("E1").with_parameter(ParameterName::PanoramaUrl, "   ");
        assert!(e.parameter(ParameterName::PanoramaUrl).is_some());
        assert_eq!(e.link(ParameterName::PanoramaUrl), None);
    }

    #[test]
    fn test_category_requires_atomic() {
        let e: ElementData = serde_json::from_value(json!({
            "elementId": "E1",
            "category": "Revit Specialty Equipment",
            "atomic": false
        }))
        .unwrap();
        assert_eq!(e.category_kind(), None);

        let e = ElementData::new("E2").with_category(Category::GenericModels);
        assert_eq!(e.category_kind(), Some(Category::GenericModels));
    }

    #[test]
    fn test_display_value_count() {
        let e: ElementData = serde_json::from_value(json!({
            "elementId": "E1",
            "displayValue": [{ "id": "m1" }, { "id": "m2" }]
        }))
        .unwrap();
        assert_eq!(e.display_value_count, 2);
    }
}
