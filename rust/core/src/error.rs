// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core.
///
/// Missing data (no transform, untracked element, absent record) is never
/// an error here; those paths degrade to defaults and return `Option`s.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid model data: {0}")]
    InvalidModel(#[from] serde_json::Error),

    #[error("GPS follow requires a valid support to be selected")]
    NoSupportSelected,

    #[error("Unsupported refresh interval: {0} ms")]
    InvalidRefreshInterval(u64),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
