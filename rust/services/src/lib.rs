// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GeoPlace Services
//!
//! Remote lookups that turn a support's GPS record into a model position:
//!
//! - [`RealtimeDbClient`]: per-support GPS records and the support list
//! - [`MapTilerProjector`]: WGS 84 → project CRS
//! - [`OpenElevationClient`] / [`GeoportailClient`]: optional ground heights
//! - [`GpsResolver`]: record → projection → base point, failures logged
//! - [`GpsFollower`]: periodic resolution feeding a channel

pub mod elevation;
pub mod error;
pub mod follow;
pub mod gps;
pub mod projection;
pub mod records;

pub use elevation::{AnyElevation, ElevationSource, GeoportailClient, NoElevation, OpenElevationClient};
pub use error::{ServiceError, ServiceResult};
pub use follow::{GpsFollower, PositionFix};
pub use gps::GpsResolver;
pub use projection::{MapTilerProjector, Projector, MAPTILER_API_URL};
pub use records::{RealtimeDbClient, RecordSource, StoreRecord};
