// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene and category endpoints.

use crate::error::ApiError;
use crate::scene::SceneSnapshot;
use crate::types::ObjectIdsResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use geoplace_core::{Category, Error};

/// GET /api/v1/scene - Drawable transforms and render generation.
pub async fn snapshot(State(state): State<AppState>) -> Json<SceneSnapshot> {
    let session = state.session.lock().await;
    Json(session.host().snapshot())
}

/// GET /api/v1/categories/:category/objects - Object ids for isolation.
pub async fn category_objects(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ObjectIdsResponse>, ApiError> {
    let kind = Category::from_slug(&category).ok_or_else(|| Error::UnknownCategory(category.clone()))?;
    let session = state.session.lock().await;
    let object_ids = session
        .catalog()
        .object_ids(kind)
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(ObjectIdsResponse {
        category,
        object_ids,
    }))
}
