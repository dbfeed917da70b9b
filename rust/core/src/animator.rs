// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position animator
//!
//! Moves drawable parts from a start to an end translation over wall-clock
//! time with a quintic ease-in-out. The host calls [`PositionAnimator::advance`]
//! once per rendered frame; finished tasks are dropped at the end of the pass.

use crate::element::ElementData;
use crate::math::{ease_in_out_quint, SNAP_EPSILON};
use crate::render::{PartHandle, RenderHost};
use nalgebra::Vector3;

/// Default progress per second (a move takes four seconds)
pub const DEFAULT_TIME_SCALE: f64 = 0.25;

/// One part moving between two translations
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTask {
    pub target: PartHandle,
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
    /// Progress in `[0, 1]`
    pub elapsed_fraction: f64,
}

impl AnimationTask {
    pub fn new(target: PartHandle, start: Vector3<f64>, end: Vector3<f64>) -> Self {
        Self {
            target,
            start,
            end,
            elapsed_fraction: 0.0,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed_fraction >= 1.0
    }

    /// Translation at the current progress
    pub fn position(&self) -> Vector3<f64> {
        let t = ease_in_out_quint(self.elapsed_fraction);
        // weighted form so t = 1 lands exactly on `end`
        self.start * (1.0 - t) + self.end * t
    }
}

/// Frame-driven pool of animation tasks
#[derive(Debug, Clone)]
pub struct PositionAnimator {
    tasks: Vec<AnimationTask>,
    time_scale: f64,
}

impl Default for PositionAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

impl PositionAnimator {
    /// Create an animator; a non-positive or non-finite scale falls back to the default
    pub fn new(time_scale: f64) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale
        } else {
            tracing::warn!(time_scale, "Invalid animation time scale, using default");
            DEFAULT_TIME_SCALE
        };
        Self {
            tasks: Vec::new(),
            time_scale,
        }
    }

    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Seconds a full move takes
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        1.0 / self.time_scale
    }

    /// Animate every drawable part of `element`. Returns the number of tasks added.
    pub fn enqueue<H>(
        &mut self,
        element: &ElementData,
        start: Vector3<f64>,
        end: Vector3<f64>,
        host: &H,
    ) -> usize
    where
        H: RenderHost + ?Sized,
    {
        let parts = host.resolve_parts(element);
        tracing::debug!(
            element_id = %element.element_id,
            parts = parts.len(),
            "Enqueue animated move"
        );
        self.enqueue_parts(&parts, start, end)
    }

    /// Animate already-resolved parts
    pub fn enqueue_parts(&mut self, parts: &[PartHandle], start: Vector3<f64>, end: Vector3<f64>) -> usize {
        self.tasks
            .extend(parts.iter().map(|&p| AnimationTask::new(p, start, end)));
        parts.len()
    }

    /// Translation a running task last pushed for `part`
    pub fn current_translation(&self, part: PartHandle) -> Option<Vector3<f64>> {
        self.tasks
            .iter()
            .rev()
            .find(|t| t.target == part)
            .map(AnimationTask::position)
    }

    /// Drop pending tasks for parts that just received a direct transform
    pub fn supersede(&mut self, parts: &[PartHandle]) {
        let before = self.tasks.len();
        self.tasks.retain(|t| !parts.contains(&t.target));
        let dropped = before - self.tasks.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Superseded running animations");
        }
    }

    /// Advance every running task by `delta_seconds` and push the eased
    /// translation to the host. Requests a render when anything moved.
    /// Returns the number of tasks advanced.
    pub fn advance<H>(&mut self, delta_seconds: f64, host: &mut H) -> usize
    where
        H: RenderHost + ?Sized,
    {
        if self.tasks.is_empty() {
            return 0;
        }
        let step = if delta_seconds.is_finite() {
            delta_seconds.max(0.0) * self.time_scale
        } else {
            0.0
        };

        let mut advanced = 0;
        for task in self.tasks.iter_mut().filter(|t| !t.is_finished()) {
            let fraction = task.elapsed_fraction + step;
            // frame deltas sum with rounding error; a full duration must land on 1
            task.elapsed_fraction = if fraction > 1.0 - SNAP_EPSILON { 1.0 } else { fraction };
            host.set_translation(task.target, &task.position());
            advanced += 1;
        }

        if advanced > 0 {
            host.request_render();
        }

        self.tasks.retain(|t| !t.is_finished());
        advanced
    }

    pub fn tasks(&self) -> &[AnimationTask] {
        &self.tasks
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}
