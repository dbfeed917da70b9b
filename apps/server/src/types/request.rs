// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use geoplace_core::Point3;
use serde::Deserialize;

/// Body of `POST /api/v1/elements/:id/correction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorrectionRequest {
    /// True position components; `null` or missing means unknown.
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,

    /// Animate instead of snapping.
    #[serde(default)]
    pub animate: bool,
}

impl CorrectionRequest {
    /// Target point with unknown axes as NaN.
    pub fn true_position(&self) -> Point3<f64> {
        Point3::new(
            self.x.unwrap_or(f64::NAN),
            self.y.unwrap_or(f64::NAN),
            self.z.unwrap_or(f64::NAN),
        )
    }
}

/// Body of `POST /api/v1/follow`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowRequest {
    /// Support (element id) to follow.
    pub element_id: String,

    /// Poll period: 3000, 5000 or 10000.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_null_axis() {
        let req: CorrectionRequest = serde_json::from_str(r#"{"x": 10.0, "y": null, "z": 3.5}"#).unwrap();
        let p = req.true_position();
        assert_eq!(p.x, 10.0);
        assert!(p.y.is_nan());
        assert_eq!(p.z, 3.5);
        assert!(!req.animate);
    }

    #[test]
    fn test_follow_default_interval() {
        let req: FollowRequest = serde_json::from_str(r#"{"element_id": "556473"}"#).unwrap();
        assert_eq!(req.interval_ms, 3000);
    }
}
