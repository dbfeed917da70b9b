// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use geoplace_core::{Correction, FollowSettings, Point3, TrackedElement};
use serde::Serialize;

/// Result of a correction.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionResponse {
    pub element_id: String,
    pub correction: Correction,
    /// Ledger entry after the correction.
    pub element: TrackedElement,
    /// Whether the move is animated.
    pub animated: bool,
}

/// Result of a GPS sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    /// Model position resolved from the GPS record.
    pub position: Point3<f64>,
    #[serde(flatten)]
    pub result: CorrectionResponse,
}

/// GPS follow state.
#[derive(Debug, Clone, Serialize)]
pub struct FollowResponse {
    pub element_id: Option<String>,
    #[serde(flatten)]
    pub settings: FollowSettings,
    /// Whether a follow loop is running.
    pub running: bool,
}

/// Viewer object ids of a category.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectIdsResponse {
    pub category: String,
    pub object_ids: Vec<String>,
}
