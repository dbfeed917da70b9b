// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic GPS follow of one element.

use std::sync::Arc;
use std::time::Duration;

use crate::elevation::ElevationSource;
use crate::gps::GpsResolver;
use crate::projection::Projector;
use crate::records::RecordSource;
use geoplace_core::Point3;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A resolved position for the followed element
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    pub element_id: String,
    pub position: Point3<f64>,
}

/// Polls the GPS resolver on a fixed period and sends each fix downstream.
///
/// At most one loop runs at a time; starting again replaces the running
/// loop. Dropping the follower stops it.
#[derive(Debug, Default)]
pub struct GpsFollower {
    handle: Option<JoinHandle<()>>,
    element_id: Option<String>,
    period: Option<Duration>,
}

impl GpsFollower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start following `element_id`. The first fix is requested one period
    /// after the call.
    pub fn start<R, P, E>(
        &mut self,
        resolver: Arc<GpsResolver<R, P, E>>,
        element_id: String,
        period: Duration,
        fixes: mpsc::Sender<PositionFix>,
    ) where
        R: RecordSource + 'static,
        P: Projector + 'static,
        E: ElevationSource + 'static,
    {
        self.stop();
        tracing::info!(element_id = %element_id, period_ms = period.as_millis() as u64, "Starting GPS follow");

        let id = element_id.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(position) = resolver.resolve(&id).await else {
                    continue;
                };
                let fix = PositionFix {
                    element_id: id.clone(),
                    position,
                };
                if fixes.send(fix).await.is_err() {
                    tracing::debug!(element_id = %id, "Fix receiver dropped, stopping GPS follow");
                    break;
                }
            }
        });

        self.handle = Some(handle);
        self.element_id = Some(element_id);
        self.period = Some(period);
    }

    /// Stop the running loop, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!(element_id = ?self.element_id, "Stopped GPS follow");
        }
        self.element_id = None;
        self.period = None;
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Drop for GpsFollower {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::fakes::{FakeRecords, OffsetProjector};
    use geoplace_core::{BasePoint, ProjectedPosition};
    use std::sync::atomic::Ordering;

    fn resolver() -> Arc<GpsResolver<FakeRecords, OffsetProjector>> {
        let base = BasePoint::new(1000.0, 2000.0, 0.0);
        Arc::new(GpsResolver::new(
            FakeRecords::with("12", 5.0, 3.0),
            OffsetProjector {
                origin: ProjectedPosition { x: 1000.0, y: 2000.0 },
            },
            base,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_sends_fixes_each_period() {
        let resolver = resolver();
        let (tx, mut rx) = mpsc::channel(4);
        let mut follower = GpsFollower::new();
        follower.start(resolver.clone(), "12".to_string(), Duration::from_secs(3), tx);
        assert!(follower.is_running());
        assert_eq!(follower.element_id(), Some("12"));

        let started = Instant::now();
        let first = rx.recv().await.unwrap();
        assert_eq!(first.element_id, "12");
        assert_eq!(first.position, Point3::new(3.0, 5.0, 0.0));
        assert!(started.elapsed() >= Duration::from_secs(3));

        rx.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(6));

        follower.stop();
        assert!(!follower.is_running());
        assert!(follower.element_id().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_loop() {
        let resolver = resolver();
        let (tx, mut rx) = mpsc::channel(4);
        let mut follower = GpsFollower::new();
        follower.start(resolver.clone(), "12".to_string(), Duration::from_secs(10), tx.clone());
        follower.start(resolver.clone(), "12".to_string(), Duration::from_secs(3), tx);
        assert_eq!(follower.period(), Some(Duration::from_secs(3)));

        let started = Instant::now();
        rx.recv().await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
        drop(follower);

        // the aborted loops release their senders
        assert!(rx.recv().await.is_none());
        assert!(resolver.records().calls.load(Ordering::SeqCst) >= 1);
    }
}
