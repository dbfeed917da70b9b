// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoPlace Server - GPS position tracking for BIM model elements.
//!
//! Loads a model's element JSON, tracks the position of its equipment
//! elements and moves them to their true (surveyed or GPS) positions.
//! Drawables live in a headless scene that clients poll.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/elements` - Tracked elements
//! - `GET /api/v1/elements/:id` - One tracked element
//! - `POST /api/v1/elements/:id/select` - Select an element
//! - `POST /api/v1/elements/:id/correction` - Move to a true position
//! - `POST /api/v1/elements/:id/sync` - Move to the latest GPS position
//! - `GET /api/v1/views/:id` - Panorama anchor
//! - `GET /api/v1/supports` - Supports from the record store
//! - `POST /api/v1/follow` / `DELETE /api/v1/follow` - GPS follow
//! - `GET /api/v1/categories/:category/objects` - Object ids for isolation
//! - `GET /api/v1/scene` - Drawable transforms

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use geoplace_core::{ElementCatalog, HeightMode, Session};
use geoplace_services::{
    AnyElevation, GeoportailClient, GpsFollower, GpsResolver, MapTilerProjector, NoElevation,
    OpenElevationClient, PositionFix, RealtimeDbClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod scene;
mod tasks;
mod types;

use config::{Config, HeightSource};
use scene::SceneState;
use tasks::SharedSession;

/// GPS resolver used by the server.
pub type Resolver = GpsResolver<RealtimeDbClient, MapTilerProjector, AnyElevation>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub resolver: Arc<Resolver>,
    pub follower: Arc<Mutex<GpsFollower>>,
    /// Sender half of the follower's fix channel.
    pub fixes: mpsc::Sender<PositionFix>,
    pub config: Arc<Config>,
}

fn build_resolver(config: &Config, http: reqwest::Client) -> Resolver {
    let records = RealtimeDbClient::new(&config.records_url, config.records_auth.clone(), http.clone());
    let projector = MapTilerProjector::new(&config.projection_url, config.projection_api_key.clone(), http.clone());
    let elevation = match config.height_source {
        HeightSource::Base => AnyElevation::None(NoElevation),
        HeightSource::OpenElevation => {
            AnyElevation::OpenElevation(OpenElevationClient::new(OpenElevationClient::DEFAULT_URL, http))
        }
        HeightSource::Geoportail => {
            AnyElevation::Geoportail(GeoportailClient::new(GeoportailClient::DEFAULT_URL, http))
        }
    };
    let height_mode = match config.height_source {
        HeightSource::Base => HeightMode::BasePoint,
        _ => HeightMode::Elevation,
    };

    GpsResolver::new(records, projector, config.base_point)
        .with_crs(config.source_crs, config.target_crs)
        .with_elevation(elevation)
        .with_height_mode(height_mode)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the router over `state`.
pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Elements
        .route("/api/v1/elements", get(routes::elements::list))
        .route("/api/v1/elements/:id", get(routes::elements::get_one))
        .route("/api/v1/elements/:id/select", post(routes::elements::select))
        .route("/api/v1/elements/:id/correction", post(routes::elements::correct))
        .route("/api/v1/elements/:id/sync", post(routes::elements::sync))
        .route("/api/v1/views/:id", get(routes::elements::view))
        // Supports and GPS follow
        .route("/api/v1/supports", get(routes::follow::supports))
        .route(
            "/api/v1/follow",
            post(routes::follow::start).delete(routes::follow::stop),
        )
        // Scene
        .route("/api/v1/categories/:category/objects", get(routes::scene::category_objects))
        .route("/api/v1/scene", get(routes::scene::snapshot))
        // Middleware
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Assemble the state and start the background tasks.
fn start(config: Config, catalog: ElementCatalog, http: reqwest::Client) -> AppState {
    let scene = SceneState::from_catalog(&catalog);
    let session: SharedSession = Arc::new(Mutex::new(Session::new(
        catalog,
        scene,
        config.animation_time_scale,
    )));

    let (fixes, fix_rx) = mpsc::channel(16);
    tasks::spawn_frame_ticker(session.clone(), config.frame_rate);
    tasks::spawn_fix_consumer(session.clone(), fix_rx);

    AppState {
        session,
        resolver: Arc::new(build_resolver(&config, http)),
        follower: Arc::new(Mutex::new(GpsFollower::new())),
        fixes,
        config: Arc::new(config),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,geoplace_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        model_path = %config.model_path,
        frame_rate = config.frame_rate,
        time_scale = config.animation_time_scale,
        target_crs = %config.target_crs,
        "Starting GeoPlace Server"
    );

    let model = tokio::fs::read_to_string(&config.model_path)
        .await
        .with_context(|| format!("reading model {}", config.model_path))?;
    let catalog = ElementCatalog::from_json(&model).context("parsing model elements")?;

    let http = reqwest::Client::builder()
        .build()
        .context("building HTTP client")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = start(config, catalog, http);
    let app = app(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
