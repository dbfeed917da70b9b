// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    /// Elements in the loaded model.
    pub elements: usize,
    /// Elements whose position is tracked.
    pub tracked: usize,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const fn endpoint(method: &'static str, path: &'static str, description: &'static str) -> EndpointInfo {
    EndpointInfo {
        method,
        path,
        description,
    }
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let session = state.session.lock().await;
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "geoplace-server",
        elements: session.catalog().len(),
        tracked: session.ledger().len(),
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "geoplace-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "GPS position tracking for BIM model elements",
        endpoints: vec![
            endpoint("GET", "/api/v1/health", "Health check endpoint"),
            endpoint("GET", "/api/v1/elements", "Tracked elements"),
            endpoint("GET", "/api/v1/elements/:id", "One tracked element"),
            endpoint("POST", "/api/v1/elements/:id/select", "Select an element"),
            endpoint("POST", "/api/v1/elements/:id/correction", "Move an element to its true position"),
            endpoint("POST", "/api/v1/elements/:id/sync", "Move an element to its GPS position"),
            endpoint("GET", "/api/v1/views/:id", "Panorama anchor"),
            endpoint("GET", "/api/v1/supports", "Supports from the record store"),
            endpoint("POST", "/api/v1/follow", "Follow a support's GPS position"),
            endpoint("DELETE", "/api/v1/follow", "Stop following"),
            endpoint("GET", "/api/v1/categories/:category/objects", "Object ids of a category"),
            endpoint("GET", "/api/v1/scene", "Drawable transforms"),
        ],
    })
}
