// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GPS fix → model position.
//!
//! Reads the element's record, projects it into the project CRS and maps it
//! through the base point. Every failure is logged here and reported as
//! `None`; callers just skip the update.

use crate::elevation::{ElevationSource, NoElevation};
use crate::projection::Projector;
use crate::records::RecordSource;
use geoplace_core::{BasePoint, Crs, HeightMode, Point3};

pub struct GpsResolver<R, P, E = NoElevation> {
    records: R,
    projector: P,
    elevation: E,
    base_point: BasePoint,
    source_crs: Crs,
    target_crs: Crs,
    height_mode: HeightMode,
}

impl<R, P> GpsResolver<R, P, NoElevation>
where
    R: RecordSource,
    P: Projector,
{
    /// Resolver placing fixes at the base point height
    pub fn new(records: R, projector: P, base_point: BasePoint) -> Self {
        Self {
            records,
            projector,
            elevation: NoElevation,
            base_point,
            source_crs: Crs::WGS84,
            target_crs: Crs::RGF93_CC47,
            height_mode: HeightMode::BasePoint,
        }
    }
}

impl<R, P, E> GpsResolver<R, P, E>
where
    R: RecordSource,
    P: Projector,
    E: ElevationSource,
{
    /// Use an elevation service for fix heights
    pub fn with_elevation<E2: ElevationSource>(self, elevation: E2) -> GpsResolver<R, P, E2> {
        GpsResolver {
            records: self.records,
            projector: self.projector,
            elevation,
            base_point: self.base_point,
            source_crs: self.source_crs,
            target_crs: self.target_crs,
            height_mode: HeightMode::Elevation,
        }
    }

    pub fn with_crs(mut self, source: Crs, target: Crs) -> Self {
        self.source_crs = source;
        self.target_crs = target;
        self
    }

    pub fn with_height_mode(mut self, mode: HeightMode) -> Self {
        self.height_mode = mode;
        self
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn base_point(&self) -> &BasePoint {
        &self.base_point
    }

    /// Model position of the element's latest GPS fix
    pub async fn resolve(&self, element_id: &str) -> Option<Point3<f64>> {
        let fix = match self.records.fetch_element_record(element_id).await {
            Ok(Some(fix)) => fix,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(element_id = %element_id, error = %e, "Could not read GPS record");
                return None;
            }
        };

        let projected = match self.projector.project(fix, self.source_crs, self.target_crs).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(element_id = %element_id, error = %e, "Could not project GPS fix");
                return None;
            }
        };

        let height = match self.height_mode {
            HeightMode::BasePoint => None,
            HeightMode::Elevation => match self.elevation.elevation(fix).await {
                Ok(z) => z,
                Err(e) => {
                    tracing::warn!(element_id = %element_id, error = %e, "Elevation lookup failed, using base point height");
                    None
                }
            },
        };

        let position = self.base_point.to_local_position(projected, height);
        tracing::info!(
            element_id = %element_id,
            x = position.x,
            y = position.y,
            z = position.z,
            "Resolved GPS position"
        );
        Some(position)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use crate::elevation::ElevationSource;
    use crate::error::{ServiceError, ServiceResult};
    use crate::projection::Projector;
    use crate::records::RecordSource;
    use geoplace_core::{Crs, GeoPosition, ProjectedPosition, SupportList};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct FakeRecords {
        pub fixes: HashMap<String, GeoPosition>,
        pub calls: AtomicUsize,
    }

    impl FakeRecords {
        pub fn with(id: &str, latitude: f64, longitude: f64) -> Self {
            let mut fixes = HashMap::new();
            fixes.insert(id.to_string(), GeoPosition { latitude, longitude });
            Self {
                fixes,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl RecordSource for FakeRecords {
        async fn fetch_element_record(&self, element_id: &str) -> ServiceResult<Option<GeoPosition>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.fixes.get(element_id).copied())
        }

        async fn fetch_supports(&self) -> ServiceResult<SupportList> {
            Ok(SupportList::default())
        }
    }

    /// Maps degrees straight to metres around a fixed origin
    pub struct OffsetProjector {
        pub origin: ProjectedPosition,
    }

    impl Projector for OffsetProjector {
        async fn project(&self, position: GeoPosition, _source: Crs, _target: Crs) -> ServiceResult<ProjectedPosition> {
            Ok(ProjectedPosition {
                x: self.origin.x + position.longitude,
                y: self.origin.y + position.latitude,
            })
        }
    }

    pub struct FailingProjector;

    impl Projector for FailingProjector {
        async fn project(&self, _position: GeoPosition, _source: Crs, _target: Crs) -> ServiceResult<ProjectedPosition> {
            Err(ServiceError::EmptyResult("projection service"))
        }
    }

    pub struct FixedElevation(pub f64);

    impl ElevationSource for FixedElevation {
        async fn elevation(&self, _position: GeoPosition) -> ServiceResult<Option<f64>> {
            Ok(Some(self.0))
        }
    }
}
