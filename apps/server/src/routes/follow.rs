// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Support list and GPS follow endpoints.

use crate::error::ApiError;
use crate::types::{FollowRequest, FollowResponse};
use crate::AppState;
use axum::{extract::State, Json};
use geoplace_core::{RefreshInterval, SupportEntry};
use geoplace_services::RecordSource;

/// GET /api/v1/supports - Supports from the record store, placeholder first.
///
/// A store failure falls back to the last known list. When the followed
/// support is no longer listed, the follow loop is stopped.
pub async fn supports(State(state): State<AppState>) -> Json<Vec<SupportEntry>> {
    match state.resolver.records().fetch_supports().await {
        Ok(list) => {
            let mut session = state.session.lock().await;
            let follow_dropped = session.set_supports(list);
            let entries = session.supports().entries().to_vec();
            drop(session);

            if follow_dropped {
                state.follower.lock().await.stop();
            }
            Json(entries)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch supports, serving cached list");
            let session = state.session.lock().await;
            Json(session.supports().entries().to_vec())
        }
    }
}

/// POST /api/v1/follow - Follow a support's GPS position.
pub async fn start(
    State(state): State<AppState>,
    Json(request): Json<FollowRequest>,
) -> Result<Json<FollowResponse>, ApiError> {
    let interval = RefreshInterval::from_millis(request.interval_ms)?;

    let known = state
        .session
        .lock()
        .await
        .supports()
        .get(&request.element_id)
        .is_some();
    if !known {
        let list = state.resolver.records().fetch_supports().await?;
        state.session.lock().await.set_supports(list);
    }

    let mut session = state.session.lock().await;
    if session.supports().get(&request.element_id).is_none() {
        return Err(ApiError::NotFound(format!(
            "Support {} is not in the record store",
            request.element_id
        )));
    }
    session.choose_support(&request.element_id);
    session.set_refresh_interval(interval);
    let (element_id, interval) = session.enable_follow()?;
    let element_id = element_id.to_string();
    let settings = session.follow();
    drop(session);

    let mut follower = state.follower.lock().await;
    follower.start(
        state.resolver.clone(),
        element_id.clone(),
        interval.as_duration(),
        state.fixes.clone(),
    );

    Ok(Json(FollowResponse {
        element_id: Some(element_id),
        settings,
        running: follower.is_running(),
    }))
}

/// DELETE /api/v1/follow - Stop following.
pub async fn stop(State(state): State<AppState>) -> Json<FollowResponse> {
    state.follower.lock().await.stop();
    let mut session = state.session.lock().await;
    session.disable_follow();
    Json(FollowResponse {
        element_id: session.chosen_support().map(str::to_string),
        settings: session.follow(),
        running: false,
    })
}
