// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GeoPlace Core
//!
//! Position tracking and georeferenced correction of BIM model elements.
//!
//! ## Overview
//!
//! - **Position Ledger**: per tracked element, the corrected center, the
//!   accumulated correction vector and the drawable parts it applies to
//! - **Position Animator**: frame-driven, eased interpolation of part
//!   translations for animated moves
//! - **Render boundary**: the [`RenderHost`] trait, so the core runs
//!   without a real renderer
//! - **Georeferencing**: projected GPS fixes to model coordinates through
//!   the project [`BasePoint`]
//! - **Session**: the viewer's interactive state passed to event handlers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geoplace_core::{ElementCatalog, MoveMode, Session};
//! use nalgebra::Point3;
//!
//! let catalog = ElementCatalog::from_json(&model_json)?;
//! let mut session = Session::new(catalog, my_renderer, 0.25);
//!
//! session.select("556473");
//! session.set_true_position(Point3::new(13.225, -35.146, 0.0));
//! session.move_selected(MoveMode::Immediate);
//!
//! // from the renderer's frame loop
//! session.tick(delta_seconds);
//! ```

pub mod animator;
pub mod catalog;
pub mod element;
pub mod error;
pub mod georef;
pub mod ledger;
pub mod math;
pub mod render;
pub mod session;
pub mod support;

pub use animator::{AnimationTask, PositionAnimator, DEFAULT_TIME_SCALE};
pub use catalog::ElementCatalog;
pub use element::{Category, ElementData, Matrix4Data, Parameter, ParameterName};
pub use error::{Error, Result};
pub use georef::{BasePoint, Crs, GeoPosition, HeightMode, ProjectedPosition};
pub use ledger::{Correction, PositionLedger, TrackedElement};
pub use math::{ease_in_out_quint, Axes};
pub use render::{PartHandle, PartList, RenderHost};
pub use session::{FollowSettings, MoveMode, RefreshInterval, SelectionInfo, Session, ViewInfo};
pub use support::{SupportEntry, SupportList, PLACEHOLDER_KEY};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
