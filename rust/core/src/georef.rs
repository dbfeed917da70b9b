// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Base-point georeferencing
//!
//! GPS fixes are projected to a map CRS (Lambert CC47 by default) by an
//! external service. The model itself is authored around a project base
//! point, so a projected fix is brought into model coordinates by removing
//! the base point offset (and its rotation/scale, identity for most sites).

use crate::math::{round_and_sanitize, POSITION_DECIMALS};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// EPSG code of a coordinate reference system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crs(pub u32);

impl Crs {
    /// WGS 84 geographic (GPS)
    pub const WGS84: Crs = Crs(4326);
    /// RGF93 / CC47 conic conformal zone
    pub const RGF93_CC47: Crs = Crs(3947);
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Position in a projected CRS (metres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPosition {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPosition {
    /// Round to millimetres, as the projection service returns noisy decimals
    pub fn rounded(self) -> Self {
        Self {
            x: round_and_sanitize(self.x, POSITION_DECIMALS),
            y: round_and_sanitize(self.y, POSITION_DECIMALS),
        }
    }
}

/// Where the height of a GPS fix comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightMode {
    /// Keep the base point height; the terrain after construction does not
    /// match public elevation models
    #[default]
    BasePoint,
    /// Ask an elevation service, falling back to the base point height
    Elevation,
}

/// Project base point in map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePoint {
    /// Easting of the model origin
    pub eastings: f64,
    /// Northing of the model origin
    pub northings: f64,
    /// Height of the model origin
    pub orthogonal_height: f64,
    /// X-axis abscissa (cos of rotation angle)
    pub x_axis_abscissa: f64,
    /// X-axis ordinate (sin of rotation angle)
    pub x_axis_ordinate: f64,
    /// Scale factor
    pub scale: f64,
}

impl Default for BasePoint {
    fn default() -> Self {
        Self {
            eastings: 1_384_621.254,
            northings: 6_251_751.146,
            orthogonal_height: 18.3,
            x_axis_abscissa: 1.0,
            x_axis_ordinate: 0.0,
            scale: 1.0,
        }
    }
}

impl BasePoint {
    /// Base point at the given offset, no rotation
    pub fn new(eastings: f64, northings: f64, orthogonal_height: f64) -> Self {
        Self {
            eastings,
            northings,
            orthogonal_height,
            ..Self::default()
        }
    }

    /// Rotation angle in radians
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.x_axis_ordinate.atan2(self.x_axis_abscissa)
    }

    /// Transform model coordinates to map coordinates
    #[inline]
    pub fn local_to_map(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let cos_r = self.x_axis_abscissa;
        let sin_r = self.x_axis_ordinate;
        let s = self.scale;

        let e = s * (cos_r * x - sin_r * y) + self.eastings;
        let n = s * (sin_r * x + cos_r * y) + self.northings;
        let h = z + self.orthogonal_height;

        (e, n, h)
    }

    /// Transform map coordinates to model coordinates
    #[inline]
    pub fn map_to_local(&self, e: f64, n: f64, h: f64) -> (f64, f64, f64) {
        let cos_r = self.x_axis_abscissa;
        let sin_r = self.x_axis_ordinate;
        let inv_scale = if self.scale.abs() < f64::EPSILON {
            1.0
        } else {
            1.0 / self.scale
        };

        let dx = e - self.eastings;
        let dy = n - self.northings;

        let x = inv_scale * (cos_r * dx + sin_r * dy);
        let y = inv_scale * (-sin_r * dx + cos_r * dy);
        let z = h - self.orthogonal_height;

        (x, y, z)
    }

    /// Model position of a projected fix, rounded to millimetres.
    ///
    /// `height` is the map height of the fix; `None` keeps the base point
    /// height, which puts the element at z = 0.
    pub fn to_local_position(&self, projected: ProjectedPosition, height: Option<f64>) -> Point3<f64> {
        let p = projected.rounded();
        let h = round_and_sanitize(height.unwrap_or(self.orthogonal_height), POSITION_DECIMALS);
        let (x, y, z) = self.map_to_local(p.x, p.y, h);
        Point3::new(
            round_and_sanitize(x, POSITION_DECIMALS),
            round_and_sanitize(y, POSITION_DECIMALS),
            round_and_sanitize(z, POSITION_DECIMALS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_point_map_to_local() {
        let base = BasePoint::new(500000.0, 5000000.0, 100.0);
        let (x, y, z) = base.map_to_local(500010.0, 5000020.0, 105.0);
        assert!((x - 10.0).abs() < 1e-10);
        assert!((y - 20.0).abs() < 1e-10);
        assert!((z - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_base_point_round_trip_with_rotation() {
        let base = BasePoint {
            x_axis_abscissa: 0.0,
            x_axis_ordinate: 1.0,
            ..BasePoint::new(1000.0, 2000.0, 0.0)
        };
        let (e, n, _) = base.local_to_map(10.0, 0.0, 0.0);
        // 90 degree rotation: (10, 0) -> (0, 10)
        assert!((e - 1000.0).abs() < 1e-10);
        assert!((n - 2010.0).abs() < 1e-10);

        let (x, y, _) = base.map_to_local(e, n, 0.0);
        assert!((x - 10.0).abs() < 1e-10);
        assert!(y.abs() < 1e-10);
    }

    #[test]
    fn test_projected_fix_to_model() {
        // roundabout survey point
        let base = BasePoint::default();
        let projected = ProjectedPosition {
            x: 1_384_634.4793,
            y: 6_251_716.0004,
        };
        let p = base.to_local_position(projected, None);
        assert_eq!(p, Point3::new(13.225, -35.146, 0.0));
    }

    #[test]
    fn test_projected_fix_with_height() {
        let base = BasePoint::new(0.0, 0.0, 18.3);
        let p = base.to_local_position(ProjectedPosition { x: 1.0, y: 2.0 }, Some(20.5));
        assert_eq!(p, Point3::new(1.0, 2.0, 2.2));
    }

    #[test]
    fn test_crs_display() {
        assert_eq!(Crs::RGF93_CC47.to_string(), "EPSG:3947");
    }
}
