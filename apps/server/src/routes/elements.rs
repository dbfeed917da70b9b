// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element endpoints: ledger reads, selection and corrections.

use crate::error::ApiError;
use crate::types::{CorrectionRequest, CorrectionResponse, SyncResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use geoplace_core::{MoveMode, Point3, SelectionInfo, TrackedElement, ViewInfo};

/// GET /api/v1/elements - All tracked elements, in model order.
pub async fn list(State(state): State<AppState>) -> Json<Vec<TrackedElement>> {
    let session = state.session.lock().await;
    Json(session.ledger().iter().cloned().collect())
}

/// GET /api/v1/elements/:id - One tracked element.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackedElement>, ApiError> {
    let session = state.session.lock().await;
    session
        .ledger()
        .lookup(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotTracked(id))
}

/// POST /api/v1/elements/:id/select - Select an element and return its readout.
pub async fn select(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SelectionInfo>, ApiError> {
    let mut session = state.session.lock().await;
    session
        .select(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Element {id} is not in the model")))
}

/// GET /api/v1/views/:id - Select a panorama anchor.
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewInfo>, ApiError> {
    let mut session = state.session.lock().await;
    session
        .select_view(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No panorama anchor {id}")))
}

/// POST /api/v1/elements/:id/correction - Move a tracked element.
pub async fn correct(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CorrectionRequest>,
) -> Result<Json<CorrectionResponse>, ApiError> {
    let mode = if request.animate {
        MoveMode::Animated
    } else {
        MoveMode::Immediate
    };
    apply(&state, &id, request.true_position(), mode).await.map(Json)
}

/// POST /api/v1/elements/:id/sync - Move an element to its latest GPS position.
pub async fn sync(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SyncResponse>, ApiError> {
    if !state.session.lock().await.ledger().contains(&id) {
        return Err(ApiError::NotTracked(id));
    }

    // Network calls happen without holding the session
    let position = state
        .resolver
        .resolve(&id)
        .await
        .ok_or_else(|| ApiError::NoFix(id.clone()))?;

    let result = apply(&state, &id, position, MoveMode::Immediate).await?;
    Ok(Json(SyncResponse { position, result }))
}

async fn apply(
    state: &AppState,
    id: &str,
    position: Point3<f64>,
    mode: MoveMode,
) -> Result<CorrectionResponse, ApiError> {
    let mut session = state.session.lock().await;
    let correction = session
        .correct(id, position, mode)
        .ok_or_else(|| ApiError::NotTracked(id.to_string()))?;
    let element = session
        .ledger()
        .lookup(id)
        .cloned()
        .ok_or_else(|| ApiError::NotTracked(id.to_string()))?;

    tracing::info!(
        element_id = %id,
        dx = correction.delta.x,
        dy = correction.delta.y,
        dz = correction.delta.z,
        animated = mode == MoveMode::Animated,
        "Applied correction"
    );

    Ok(CorrectionResponse {
        element_id: id.to_string(),
        correction,
        element,
        animated: mode == MoveMode::Animated,
    })
}
