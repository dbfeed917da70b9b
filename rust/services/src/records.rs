// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Realtime database client for per-support GPS records.
//!
//! The store keeps an `elements` array (with `null` holes) of
//! `{ elementid, latitude, longitude, commentaire, image_url }` and is read
//! through its REST endpoint (`GET {root}/elements.json`).

use std::future::Future;

use crate::error::{fetch_json, ServiceResult};
use geoplace_core::{GeoPosition, SupportEntry, SupportList};
use serde::Deserialize;
use serde_json::Value;

const SERVICE: &str = "record store";

/// Source of support records
pub trait RecordSource: Send + Sync {
    /// GPS position recorded for an element; `None` when the store has no record
    fn fetch_element_record(
        &self,
        element_id: &str,
    ) -> impl Future<Output = ServiceResult<Option<GeoPosition>>> + Send;

    /// Supports listed in the store, placeholder first
    fn fetch_supports(&self) -> impl Future<Output = ServiceResult<SupportList>> + Send;
}

/// One row of the `elements` array
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRecord {
    #[serde(default)]
    pub elementid: Value,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub commentaire: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl StoreRecord {
    /// Element id as text; `None` for empty, zero or missing ids
    pub fn key(&self) -> Option<String> {
        match &self.elementid {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Whether this record belongs to `element_id` (numeric comparison when both parse)
    pub fn matches(&self, element_id: &str) -> bool {
        let Some(key) = self.key() else {
            return false;
        };
        match (key.trim().parse::<f64>(), element_id.trim().parse::<f64>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => key == element_id,
        }
    }

    pub fn position(&self) -> Option<GeoPosition> {
        Some(GeoPosition {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// Decode the `elements` payload. Arrays may contain `null`s and the store
/// may return an object keyed by index instead of an array.
pub fn parse_records(payload: Value) -> Vec<StoreRecord> {
    let items: Vec<Value> = match payload {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter(|v| !v.is_null())
        .filter_map(|v| match serde_json::from_value::<StoreRecord>(v) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed store record");
                None
            }
        })
        .collect()
}

/// Support list from store records, in store order
pub fn supports_from_records(records: &[StoreRecord]) -> SupportList {
    SupportList::from_entries(records.iter().filter_map(|r| {
        Some(SupportEntry {
            key: r.key()?,
            comment: r.commentaire.clone().unwrap_or_default(),
            image_url: r.image_url.clone().unwrap_or_default(),
        })
    }))
}

/// REST client for a Firebase-style realtime database
#[derive(Debug, Clone)]
pub struct RealtimeDbClient {
    root_url: String,
    auth: Option<String>,
    http: reqwest::Client,
}

impl RealtimeDbClient {
    /// `root_url` is the database root, e.g. `https://my-db.firebasedatabase.app`
    pub fn new(root_url: &str, auth: Option<String>, http: reqwest::Client) -> Self {
        Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            auth,
            http,
        }
    }

    /// Read the whole `elements` array
    pub async fn fetch_records(&self) -> ServiceResult<Vec<StoreRecord>> {
        let mut request = self.http.get(format!("{}/elements.json", self.root_url));
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth)]);
        }
        let payload: Value = fetch_json(SERVICE, request).await?;
        if payload.is_null() {
            tracing::info!("Record store has no elements");
        }
        Ok(parse_records(payload))
    }
}

impl RecordSource for RealtimeDbClient {
    async fn fetch_element_record(&self, element_id: &str) -> ServiceResult<Option<GeoPosition>> {
        let records = self.fetch_records().await?;
        let found = records.iter().find(|r| r.matches(element_id));
        match found {
            Some(record) => {
                let position = record.position();
                if position.is_none() {
                    tracing::warn!(element_id = %element_id, "Record has no latitude/longitude");
                }
                Ok(position)
            }
            None => {
                tracing::info!(element_id = %element_id, "No record for element");
                Ok(None)
            }
        }
    }

    async fn fetch_supports(&self) -> ServiceResult<SupportList> {
        let records = self.fetch_records().await?;
        let supports = supports_from_records(&records);
        tracing::debug!(supports = supports.support_count(), "Fetched support list");
        Ok(supports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_records_skips_holes() {
        let records = parse_records(json!([
            null,
            { "elementid": 556473, "latitude": 47.212662998, "longitude": -1.546229996, "commentaire": "Rond point" },
            { "elementid": "557614", "latitude": 47.212354093 },
            "garbage"
        ]));
        assert_eq!(records.len(), 2);
        assert!(records[0].matches("556473"));
        assert!(records[0].matches(" 556473.0"));
        assert!(!records[0].matches("557614"));
        assert!(records[1].position().is_none());
    }

    #[test]
    fn test_parse_records_object_form() {
        let records = parse_records(json!({ "3": { "elementid": "A1" } }));
        assert_eq!(records.len(), 1);
        assert!(records[0].matches("A1"));
        assert!(parse_records(Value::Null).is_empty());
    }

    #[test]
    fn test_supports_from_records() {
        let records = parse_records(json!([
            { "elementid": 12, "commentaire": "Mât A", "image_url": "https://img.example/12.jpg" },
            { "elementid": 0, "commentaire": "ignored" },
            { "elementid": "", "commentaire": "ignored" },
            { "elementid": 13 }
        ]));
        let supports = supports_from_records(&records);
        assert_eq!(supports.support_count(), 2);
        assert!(supports.entries()[0].is_placeholder());
        assert_eq!(supports.get("12").unwrap().image_url, "https://img.example/12.jpg");
        assert_eq!(supports.get("13").unwrap().comment, "");
    }
}
