// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position ledger
//!
//! One entry per tracked element: its corrected center, the sum of every
//! correction applied so far and the drawable parts the corrections are
//! propagated to.
//!
//! Part transforms are expressed relative to the original geometry, so the
//! translation pushed to the host is always the *accumulated* correction,
//! never the last delta. The ledger keeps
//! `original_position + accumulated_correction == current_center`.

use crate::element::ElementData;
use crate::math::{coerce_nan, sanitize_point, Axes};
use crate::render::{PartList, RenderHost};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Ledger entry for one tracked element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedElement {
    pub element_id: String,
    /// Position after all corrections applied so far
    pub current_center: Point3<f64>,
    /// Sum of all corrections ever applied
    pub accumulated_correction: Vector3<f64>,
    /// Drawable parts, fixed at build time
    pub parts: PartList,
}

impl TrackedElement {
    /// Position before any correction
    #[inline]
    pub fn original_position(&self) -> Point3<f64> {
        self.current_center - self.accumulated_correction
    }
}

/// Outcome of [`PositionLedger::apply_correction`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correction {
    /// Vector added to the accumulated correction (NaN axes zeroed)
    pub delta: Vector3<f64>,
    /// Accumulated correction before this call
    pub previous: Vector3<f64>,
    /// Accumulated correction after this call
    pub accumulated: Vector3<f64>,
    /// Axes whose true position was unknown and were left unchanged
    pub skipped_axes: Axes,
}

/// Table of tracked elements keyed by element id
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    entries: Vec<TrackedElement>,
    index: FxHashMap<String, usize>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the ledger from a set of elements.
    ///
    /// Initial centers come from the embedded transform (origin when absent),
    /// rounded to millimetres. Elements without drawables still get an entry.
    /// A repeated element id keeps its first entry.
    pub fn build<'a, H, I>(elements: I, host: &H) -> Self
    where
        H: RenderHost + ?Sized,
        I: IntoIterator<Item = &'a ElementData>,
    {
        let mut ledger = Self::new();

        for element in elements {
            if ledger.index.contains_key(&element.element_id) {
                tracing::debug!(element_id = %element.element_id, "Duplicate element id, keeping first");
                continue;
            }

            let center = match element.embedded_position() {
                Some(p) => sanitize_point(p),
                None => {
                    tracing::debug!(
                        element_id = %element.element_id,
                        "No usable transform, starting at origin"
                    );
                    Point3::origin()
                }
            };
            let parts = host.resolve_parts(element);

            tracing::trace!(
                element_id = %element.element_id,
                x = center.x,
                y = center.y,
                z = center.z,
                parts = parts.len(),
                "Tracking element"
            );

            ledger.index.insert(element.element_id.clone(), ledger.entries.len());
            ledger.entries.push(TrackedElement {
                element_id: element.element_id.clone(),
                current_center: center,
                accumulated_correction: Vector3::zeros(),
                parts,
            });
        }

        tracing::info!(tracked = ledger.entries.len(), "Position ledger built");
        ledger
    }

    /// Entry for an element; `None` simply means the element is not tracked
    pub fn lookup(&self, element_id: &str) -> Option<&TrackedElement> {
        self.index.get(element_id).map(|&i| &self.entries[i])
    }

    #[inline]
    pub fn contains(&self, element_id: &str) -> bool {
        self.index.contains_key(element_id)
    }

    /// Move an element to its true position.
    ///
    /// The correction is `true_position - current_center`. Axes where the
    /// true position is unknown (NaN) get a zero correction and keep their
    /// current center. The accumulated correction is pushed to every part
    /// and a render is requested. Returns `None` for untracked elements.
    pub fn apply_correction<H>(
        &mut self,
        element_id: &str,
        true_position: Point3<f64>,
        host: &mut H,
    ) -> Option<Correction>
    where
        H: RenderHost + ?Sized,
    {
        let correction = self.record_correction(element_id, true_position)?;
        let entry = self.lookup(element_id)?;

        for &part in &entry.parts {
            host.set_translation(part, &correction.accumulated);
        }
        host.request_render();

        Some(correction)
    }

    /// Update the entry like [`apply_correction`](Self::apply_correction)
    /// without touching the host. Used when the parts are animated instead.
    pub fn record_correction(&mut self, element_id: &str, true_position: Point3<f64>) -> Option<Correction> {
        let Some(&i) = self.index.get(element_id) else {
            tracing::debug!(element_id = %element_id, "Correction skipped, element not tracked");
            return None;
        };
        let entry = &mut self.entries[i];

        let (delta, skipped_axes) = coerce_nan(true_position - entry.current_center);
        if !skipped_axes.is_empty() {
            tracing::warn!(
                element_id = %element_id,
                x = skipped_axes.x,
                y = skipped_axes.y,
                z = skipped_axes.z,
                "Unknown true position on some axes, leaving them unchanged"
            );
        }

        let previous = entry.accumulated_correction;
        entry.accumulated_correction += delta;
        entry.current_center += delta;

        tracing::debug!(
            element_id = %element_id,
            dx = delta.x,
            dy = delta.y,
            dz = delta.z,
            "Applied correction"
        );

        Some(Correction {
            delta,
            previous,
            accumulated: entry.accumulated_correction,
            skipped_axes,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedElement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
