// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer session
//!
//! Everything an interactive viewer keeps between user events: the selected
//! element, the coordinates shown to the user, the chosen support and the
//! GPS follow settings, next to the ledger, the animator and the render host
//! they drive. Handlers receive the session explicitly.

use crate::animator::PositionAnimator;
use crate::catalog::ElementCatalog;
use crate::element::{Category, ParameterName};
use crate::error::{Error, Result};
use crate::ledger::{Correction, PositionLedger};
use crate::math::sanitize_point;
use crate::render::RenderHost;
use crate::support::SupportList;
use nalgebra::Point3;
use serde::Serialize;
use std::time::Duration;

/// How a correction reaches the drawables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    /// Snap to the corrected position
    #[default]
    Immediate,
    /// Ease from the previous correction to the new one over several frames
    Animated,
}

/// Period of the GPS follow loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RefreshInterval {
    #[default]
    ThreeSeconds,
    FiveSeconds,
    TenSeconds,
}

impl RefreshInterval {
    pub fn from_millis(ms: u64) -> Result<Self> {
        match ms {
            3000 => Ok(RefreshInterval::ThreeSeconds),
            5000 => Ok(RefreshInterval::FiveSeconds),
            10000 => Ok(RefreshInterval::TenSeconds),
            other => Err(Error::InvalidRefreshInterval(other)),
        }
    }

    pub fn as_duration(self) -> Duration {
        match self {
            RefreshInterval::ThreeSeconds => Duration::from_secs(3),
            RefreshInterval::FiveSeconds => Duration::from_secs(5),
            RefreshInterval::TenSeconds => Duration::from_secs(10),
        }
    }
}

/// GPS follow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FollowSettings {
    pub enabled: bool,
    pub interval: RefreshInterval,
}

/// What the viewer shows for a selected element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionInfo {
    pub element_id: String,
    /// Coordinates shown to the user (millimetre precision)
    pub coordinates: Point3<f64>,
    /// Only tracked elements can be moved
    pub tracked: bool,
    pub document_url: Option<String>,
}

/// What the viewer shows for a panorama anchor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewInfo {
    pub element_id: String,
    pub object_id: String,
    pub panorama_url: Option<String>,
}

/// Interactive state of one viewer
pub struct Session<H: RenderHost> {
    catalog: ElementCatalog,
    ledger: PositionLedger,
    animator: PositionAnimator,
    host: H,
    selected: Option<String>,
    readout: Point3<f64>,
    supports: SupportList,
    chosen_support: Option<String>,
    follow: FollowSettings,
}

impl<H: RenderHost> Session<H> {
    /// Start a session; the ledger tracks the catalog's specialty equipment
    pub fn new(catalog: ElementCatalog, host: H, time_scale: f64) -> Self {
        let ledger = PositionLedger::build(catalog.in_category(Category::SpecialtyEquipment), &host);
        Self {
            catalog,
            ledger,
            animator: PositionAnimator::new(time_scale),
            host,
            selected: None,
            readout: Point3::origin(),
            supports: SupportList::default(),
            chosen_support: None,
            follow: FollowSettings::default(),
        }
    }

    /// Swap in a new model. Selection, animations and follow are reset.
    pub fn reload(&mut self, catalog: ElementCatalog) {
        self.ledger = PositionLedger::build(catalog.in_category(Category::SpecialtyEquipment), &self.host);
        self.catalog = catalog;
        self.animator = PositionAnimator::new(self.animator.time_scale());
        self.selected = None;
        self.chosen_support = None;
        self.follow.enabled = false;
    }

    /// Select an element (3D pick or list choice) and refresh the readout.
    ///
    /// The readout becomes the tracked center, or the element's own
    /// transform when it is not tracked, or stays as it was without either.
    /// Unknown ids leave the selection untouched.
    pub fn select(&mut self, element_id: &str) -> Option<SelectionInfo> {
        let element = self.catalog.by_element_id(element_id);
        let tracked = self.ledger.lookup(element_id);
        if element.is_none() && tracked.is_none() {
            tracing::debug!(element_id = %element_id, "Selected element is not in the model");
            return None;
        }

        if let Some(entry) = tracked {
            self.readout = sanitize_point(entry.current_center);
        } else if let Some(p) = element.and_then(|e| e.embedded_position()) {
            self.readout = sanitize_point(p);
        }

        let info = SelectionInfo {
            element_id: element_id.to_string(),
            coordinates: self.readout,
            tracked: tracked.is_some(),
            document_url: element
                .and_then(|e| e.link(ParameterName::DocumentUrl))
                .map(str::to_string),
        };
        self.selected = Some(element_id.to_string());
        tracing::info!(element_id = %element_id, tracked = info.tracked, "Element selected");
        Some(info)
    }

    /// Select a panorama anchor
    pub fn select_view(&mut self, element_id: &str) -> Option<ViewInfo> {
        let element = self
            .catalog
            .by_element_id(element_id)
            .filter(|e| e.category_kind() == Some(Category::GenericModels))?;
        let info = ViewInfo {
            element_id: element.element_id.clone(),
            object_id: element.id.clone(),
            panorama_url: element.link(ParameterName::PanoramaUrl).map(str::to_string),
        };
        self.selected = Some(element_id.to_string());
        Some(info)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Coordinates currently shown (and used by [`move_selected`](Self::move_selected))
    pub fn readout(&self) -> Point3<f64> {
        self.readout
    }

    /// Set the true position, typed in or resolved from GPS
    pub fn set_true_position(&mut self, position: Point3<f64>) {
        self.readout = position;
    }

    /// Move the selected element to the readout position
    pub fn move_selected(&mut self, mode: MoveMode) -> Option<Correction> {
        let element_id = self.selected.clone()?;
        self.correct(&element_id, self.readout, mode)
    }

    /// Move a tracked element to `true_position`
    pub fn correct(&mut self, element_id: &str, true_position: Point3<f64>, mode: MoveMode) -> Option<Correction> {
        let parts = self.ledger.lookup(element_id)?.parts.clone();

        let correction = match mode {
            MoveMode::Immediate => {
                self.animator.supersede(&parts);
                self.ledger.apply_correction(element_id, true_position, &mut self.host)?
            }
            MoveMode::Animated => {
                let correction = self.ledger.record_correction(element_id, true_position)?;
                for &part in &parts {
                    let start = self
                        .animator
                        .current_translation(part)
                        .unwrap_or(correction.previous);
                    self.animator.supersede(&[part]);
                    self.animator.enqueue_parts(&[part], start, correction.accumulated);
                }
                correction
            }
        };

        if self.selected.as_deref() == Some(element_id) {
            if let Some(entry) = self.ledger.lookup(element_id) {
                self.readout = sanitize_point(entry.current_center);
            }
        }
        Some(correction)
    }

    /// Per-frame hook; returns the number of animation tasks advanced
    pub fn tick(&mut self, delta_seconds: f64) -> usize {
        self.animator.advance(delta_seconds, &mut self.host)
    }

    /// Replace the support list. When the chosen support is gone, the choice
    /// is cleared and follow turned off; returns true when a running follow
    /// was dropped that way.
    pub fn set_supports(&mut self, supports: SupportList) -> bool {
        let mut dropped = false;
        if let Some(key) = &self.chosen_support {
            if supports.get(key).is_none() {
                tracing::info!(element_id = %key, "Chosen support left the store");
                dropped = self.follow.enabled;
                self.chosen_support = None;
                self.follow.enabled = false;
            }
        }
        self.supports = supports;
        dropped
    }

    pub fn supports(&self) -> &SupportList {
        &self.supports
    }

    /// Choose a support from the list; the placeholder clears the selection
    /// and turns GPS follow off.
    pub fn choose_support(&mut self, key: &str) -> Option<SelectionInfo> {
        let entry = self.supports.get(key)?;
        if entry.is_placeholder() {
            self.chosen_support = None;
            self.follow.enabled = false;
            self.clear_selection();
            return None;
        }
        self.chosen_support = Some(key.to_string());
        let info = self.select(key);
        if info.is_none() {
            tracing::warn!(element_id = %key, "Support has no element in the model");
        }
        info
    }

    pub fn chosen_support(&self) -> Option<&str> {
        self.chosen_support.as_deref()
    }

    /// Turn GPS follow on for the chosen support
    pub fn enable_follow(&mut self) -> Result<(&str, RefreshInterval)> {
        let key = self.chosen_support.as_deref().ok_or(Error::NoSupportSelected)?;
        self.follow.enabled = true;
        Ok((key, self.follow.interval))
    }

    pub fn disable_follow(&mut self) {
        self.follow.enabled = false;
    }

    /// Change the follow period; returns true when a running loop must restart
    pub fn set_refresh_interval(&mut self, interval: RefreshInterval) -> bool {
        let changed = self.follow.interval != interval;
        self.follow.interval = interval;
        changed && self.follow.enabled
    }

    pub fn follow(&self) -> FollowSettings {
        self.follow
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn animator(&self) -> &PositionAnimator {
        &self.animator
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
