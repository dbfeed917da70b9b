// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate projection through the MapTiler transform API.

use std::future::Future;

use crate::error::{fetch_json, ServiceError, ServiceResult};
use geoplace_core::{Crs, GeoPosition, ProjectedPosition};
use serde::Deserialize;

const SERVICE: &str = "projection service";

/// Default MapTiler API root
pub const MAPTILER_API_URL: &str = "https://api.maptiler.com";

/// Projects geographic positions into a projected CRS
pub trait Projector: Send + Sync {
    fn project(
        &self,
        position: GeoPosition,
        source: Crs,
        target: Crs,
    ) -> impl Future<Output = ServiceResult<ProjectedPosition>> + Send;
}

#[derive(Debug, Deserialize)]
struct TransformResponse {
    #[serde(default)]
    results: Vec<TransformResult>,
}

#[derive(Debug, Deserialize)]
struct TransformResult {
    x: Option<f64>,
    y: Option<f64>,
}

/// MapTiler `coordinates/transform` client
#[derive(Debug, Clone)]
pub struct MapTilerProjector {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl MapTilerProjector {
    pub fn new(base_url: &str, api_key: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        }
    }

    fn transform_url(&self, position: GeoPosition) -> String {
        format!(
            "{}/coordinates/transform/{},{}.json",
            self.base_url, position.longitude, position.latitude
        )
    }
}

impl Projector for MapTilerProjector {
    async fn project(
        &self,
        position: GeoPosition,
        source: Crs,
        target: Crs,
    ) -> ServiceResult<ProjectedPosition> {
        let request = self.http.get(self.transform_url(position)).query(&[
            ("s_srs", source.0.to_string()),
            ("t_srs", target.0.to_string()),
            ("key", self.api_key.clone()),
        ]);
        let body: TransformResponse = fetch_json(SERVICE, request).await?;
        let first = body
            .results
            .into_iter()
            .next()
            .ok_or(ServiceError::EmptyResult(SERVICE))?;

        // Missing components read as 0, like an untransformed coordinate
        let projected = ProjectedPosition {
            x: first.x.unwrap_or(0.0),
            y: first.y.unwrap_or(0.0),
        };
        tracing::debug!(
            latitude = position.latitude,
            longitude = position.longitude,
            x = projected.x,
            y = projected.y,
            target = %target,
            "Projected GPS fix"
        );
        Ok(projected)
    }
}
