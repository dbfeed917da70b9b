// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use geoplace_core::{BasePoint, Crs};
use std::str::FromStr;

/// Where GPS fix heights come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightSource {
    /// Fixes sit at the base point height.
    #[default]
    Base,
    OpenElevation,
    Geoportail,
}

impl FromStr for HeightSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "base" => Ok(HeightSource::Base),
            "open-elevation" => Ok(HeightSource::OpenElevation),
            "geoportail" => Ok(HeightSource::Geoportail),
            other => Err(format!("unknown height mode: {other}")),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Model element JSON loaded at startup.
    pub model_path: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Animation frames per second.
    pub frame_rate: u32,
    /// Animation speed; one move lasts `1 / time_scale` seconds.
    pub animation_time_scale: f64,
    /// Realtime database root holding the GPS records.
    pub records_url: String,
    /// Optional database auth token.
    pub records_auth: Option<String>,
    /// Projection service root.
    pub projection_url: String,
    pub projection_api_key: String,
    pub source_crs: Crs,
    pub target_crs: Crs,
    /// Project base point in the target CRS.
    pub base_point: BasePoint,
    pub height_source: HeightSource,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

/// Read `key`, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = BasePoint::default();
        Self {
            port: env_or("PORT", 8080),
            model_path: std::env::var("MODEL_PATH").unwrap_or_else(|_| "./model.json".into()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            frame_rate: env_or("FRAME_RATE", 60u32).max(1),
            animation_time_scale: env_or("ANIMATION_TIME_SCALE", geoplace_core::DEFAULT_TIME_SCALE),
            records_url: std::env::var("RECORDS_URL").unwrap_or_default(),
            records_auth: std::env::var("RECORDS_AUTH").ok().filter(|s| !s.is_empty()),
            projection_url: std::env::var("PROJECTION_URL")
                .unwrap_or_else(|_| geoplace_services::MAPTILER_API_URL.into()),
            projection_api_key: std::env::var("PROJECTION_API_KEY").unwrap_or_default(),
            source_crs: Crs(env_or("SOURCE_CRS", Crs::WGS84.0)),
            target_crs: Crs(env_or("TARGET_CRS", Crs::RGF93_CC47.0)),
            base_point: BasePoint::new(
                env_or("BASE_EASTING", defaults.eastings),
                env_or("BASE_NORTHING", defaults.northings),
                env_or("BASE_HEIGHT", defaults.orthogonal_height),
            ),
            height_source: env_or("HEIGHT_MODE", HeightSource::Base),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                    // Default: allow common development origins
                    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
                }),
            ),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
