// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the remote services.

use thiserror::Error;

/// Errors from the record store, projection and elevation services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{service} response could not be decoded: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} returned no result")]
    EmptyResult(&'static str),
}

/// Result alias for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Send a request and decode a JSON body, mapping every failure to a [`ServiceError`].
pub(crate) async fn fetch_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> ServiceResult<T> {
    let resp = request
        .send()
        .await
        .map_err(|source| ServiceError::Transport { service, source })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ServiceError::Status {
            service,
            status,
            body,
        });
    }

    resp.json()
        .await
        .map_err(|source| ServiceError::Decode { service, source })
}
