// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background tasks driving the session.

use crate::scene::SceneState;
use geoplace_core::{MoveMode, Session};
use geoplace_services::PositionFix;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub type SharedSession = Arc<Mutex<Session<SceneState>>>;

/// Advance animations at `frame_rate` frames per second.
pub fn spawn_frame_ticker(session: SharedSession, frame_rate: u32) -> JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = Instant::now();
        loop {
            ticker.tick().await;
            let now = Instant::now();
            let delta = now.duration_since(last).as_secs_f64();
            last = now;

            let mut session = session.lock().await;
            if !session.animator().is_idle() {
                session.tick(delta);
            }
        }
    })
}

/// Apply every GPS fix from the follower immediately.
pub fn spawn_fix_consumer(session: SharedSession, mut fixes: mpsc::Receiver<PositionFix>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(fix) = fixes.recv().await {
            let mut session = session.lock().await;
            match session.correct(&fix.element_id, fix.position, MoveMode::Immediate) {
                Some(c) => tracing::info!(
                    element_id = %fix.element_id,
                    dx = c.delta.x,
                    dy = c.delta.y,
                    dz = c.delta.z,
                    "Applied GPS fix"
                ),
                None => tracing::warn!(element_id = %fix.element_id, "GPS fix for untracked element"),
            }
        }
        tracing::debug!("Fix channel closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoplace_core::{Category, ElementCatalog, ElementData, Point3};

    fn session() -> SharedSession {
        let catalog = ElementCatalog::from_elements(vec![
            ElementData::new("556473").with_category(Category::SpecialtyEquipment),
        ]);
        let scene = SceneState::from_catalog(&catalog);
        Arc::new(Mutex::new(Session::new(catalog, scene, 0.25)))
    }

    #[tokio::test]
    async fn test_fix_consumer_applies_fixes() {
        let session = session();
        let (tx, rx) = mpsc::channel(4);
        let handle = spawn_fix_consumer(session.clone(), rx);

        tx.send(PositionFix {
            element_id: "556473".to_string(),
            position: Point3::new(1.0, 2.0, 0.0),
        })
        .await
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        let session = session.lock().await;
        let entry = session.ledger().lookup("556473").unwrap();
        assert_eq!(entry.current_center, Point3::new(1.0, 2.0, 0.0));
        assert_eq!(session.host().generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_ticker_finishes_animation() {
        let session = session();
        session
            .lock()
            .await
            .correct("556473", Point3::new(4.0, 0.0, 0.0), MoveMode::Animated);
        let handle = spawn_frame_ticker(session.clone(), 60);

        tokio::time::sleep(Duration::from_secs(5)).await;
        handle.abort();

        let session = session.lock().await;
        assert!(session.animator().is_idle());
        let parts = session.ledger().lookup("556473").unwrap().parts.clone();
        assert_eq!(
            session.host().translation(parts[0]),
            Some(geoplace_core::Vector3::new(4.0, 0.0, 0.0))
        );
    }
}
