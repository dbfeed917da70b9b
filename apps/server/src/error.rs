// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Element {0} is not tracked")]
    NotTracked(String),

    #[error("No GPS position available for element {0}")]
    NoFix(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream service error: {0}")]
    Upstream(#[from] geoplace_services::ServiceError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::NotTracked(_) => (StatusCode::NOT_FOUND, "NOT_TRACKED"),
            ApiError::NoFix(_) => (StatusCode::NOT_FOUND, "NO_GPS_FIX"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<geoplace_core::Error> for ApiError {
    fn from(err: geoplace_core::Error) -> Self {
        use geoplace_core::Error;
        match err {
            Error::NoSupportSelected => ApiError::Conflict(err.to_string()),
            Error::InvalidRefreshInterval(_) | Error::UnknownCategory(_) => {
                ApiError::BadRequest(err.to_string())
            }
            Error::InvalidModel(_) => ApiError::Internal(err.to_string()),
        }
    }
}
