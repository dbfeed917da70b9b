// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground elevation lookups.
//!
//! Two public services are supported: Open-Elevation and the IGN Géoportail
//! altimetry API. Both answer `Ok(None)` when they have no value for a point.

use std::future::Future;

use crate::error::{fetch_json, ServiceResult};
use geoplace_core::GeoPosition;
use serde::Deserialize;

/// Géoportail's "no data" marker
const NO_DATA: f64 = -99999.0;

pub trait ElevationSource: Send + Sync {
    /// Ground height at `position`, in metres
    fn elevation(&self, position: GeoPosition) -> impl Future<Output = ServiceResult<Option<f64>>> + Send;
}

/// Elevation source that never answers, used when heights come from the base point
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElevation;

impl ElevationSource for NoElevation {
    async fn elevation(&self, _position: GeoPosition) -> ServiceResult<Option<f64>> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct OpenElevationResponse {
    #[serde(default)]
    results: Vec<OpenElevationResult>,
}

#[derive(Debug, Deserialize)]
struct OpenElevationResult {
    elevation: Option<f64>,
}

/// `GET {base}/api/v1/lookup?locations=lat,lng`
#[derive(Debug, Clone)]
pub struct OpenElevationClient {
    base_url: String,
    http: reqwest::Client,
}

impl OpenElevationClient {
    pub const DEFAULT_URL: &'static str = "https://api.open-elevation.com";

    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

impl ElevationSource for OpenElevationClient {
    async fn elevation(&self, position: GeoPosition) -> ServiceResult<Option<f64>> {
        let request = self
            .http
            .get(format!("{}/api/v1/lookup", self.base_url))
            .query(&[("locations", format!("{},{}", position.latitude, position.longitude))]);
        let body: OpenElevationResponse = fetch_json("open-elevation", request).await?;
        Ok(body.results.first().and_then(|r| r.elevation).filter(|z| z.is_finite()))
    }
}

#[derive(Debug, Deserialize)]
struct GeoportailResponse {
    #[serde(default)]
    elevations: Vec<GeoportailElevation>,
}

#[derive(Debug, Deserialize)]
struct GeoportailElevation {
    z: Option<f64>,
}

/// IGN altimetry REST API
#[derive(Debug, Clone)]
pub struct GeoportailClient {
    base_url: String,
    resource: String,
    http: reqwest::Client,
}

impl GeoportailClient {
    pub const DEFAULT_URL: &'static str = "https://data.geopf.fr";
    pub const DEFAULT_RESOURCE: &'static str = "ign_rge_alti_wld";

    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resource: Self::DEFAULT_RESOURCE.to_string(),
            http,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }
}

impl ElevationSource for GeoportailClient {
    async fn elevation(&self, position: GeoPosition) -> ServiceResult<Option<f64>> {
        let request = self
            .http
            .get(format!(
                "{}/altimetrie/1.0/calcul/alti/rest/elevation.json",
                self.base_url
            ))
            .query(&[
                ("lon", position.longitude.to_string()),
                ("lat", position.latitude.to_string()),
                ("resource", self.resource.clone()),
                ("zonly", "false".to_string()),
            ]);
        let body: GeoportailResponse = fetch_json("geoportail", request).await?;
        Ok(parse_geoportail_z(&body))
    }
}

fn parse_geoportail_z(body: &GeoportailResponse) -> Option<f64> {
    body.elevations
        .first()
        .and_then(|e| e.z)
        .filter(|z| z.is_finite() && *z != NO_DATA)
}

/// Elevation backend chosen at runtime
#[derive(Debug, Clone)]
pub enum AnyElevation {
    None(NoElevation),
    OpenElevation(OpenElevationClient),
    Geoportail(GeoportailClient),
}

impl ElevationSource for AnyElevation {
    async fn elevation(&self, position: GeoPosition) -> ServiceResult<Option<f64>> {
        match self {
            AnyElevation::None(source) => source.elevation(position).await,
            AnyElevation::OpenElevation(source) => source.elevation(position).await,
            AnyElevation::Geoportail(source) => source.elevation(position).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geoportail_no_data() {
        let body: GeoportailResponse =
            serde_json::from_str(r#"{"elevations":[{"lon":-1.5,"lat":47.2,"z":-99999.0,"acc":"Sans objet"}]}"#)
                .unwrap();
        assert_eq!(parse_geoportail_z(&body), None);

        let body: GeoportailResponse =
            serde_json::from_str(r#"{"elevations":[{"lon":-1.5,"lat":47.2,"z":21.37,"acc":"2.5 m"}]}"#).unwrap();
        assert_eq!(parse_geoportail_z(&body), Some(21.37));
    }

    #[test]
    fn test_open_elevation_shape() {
        let body: OpenElevationResponse = serde_json::from_str(
            r#"{"results":[{"latitude":47.2,"longitude":-1.5,"elevation":18.0}]}"#,
        )
        .unwrap();
        assert_eq!(body.results[0].elevation, Some(18.0));
    }

    #[tokio::test]
    async fn test_no_elevation() {
        let z = NoElevation
            .elevation(GeoPosition {
                latitude: 0.0,
                longitude: 0.0,
            })
            .await
            .unwrap();
        assert!(z.is_none());
    }
}
