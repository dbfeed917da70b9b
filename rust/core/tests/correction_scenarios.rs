// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end correction scenarios over the ledger and the animator.

use approx::assert_relative_eq;
use geoplace_core::{
    ElementData, PartHandle, PartList, PositionAnimator, PositionLedger, RenderHost,
};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

/// In-memory scene: one drawable per element, numbered in resolution order
#[derive(Default)]
struct Scene {
    handles: FxHashMap<String, u32>,
    transforms: FxHashMap<PartHandle, Vector3<f64>>,
    renders: usize,
}

impl Scene {
    fn with_elements(ids: &[&str]) -> Self {
        let mut scene = Scene::default();
        for (i, id) in ids.iter().enumerate() {
            scene.handles.insert(id.to_string(), i as u32);
        }
        scene
    }
}

impl RenderHost for Scene {
    fn resolve_parts(&self, element: &ElementData) -> PartList {
        self.handles
            .get(&element.element_id)
            .map(|&h| PartList::from_slice(&[PartHandle(h)]))
            .unwrap_or_default()
    }

    fn set_translation(&mut self, part: PartHandle, translation: &Vector3<f64>) {
        self.transforms.insert(part, *translation);
    }

    fn request_render(&mut self) {
        self.renders += 1;
    }
}

fn row_major(x: f64, y: f64, z: f64) -> [f64; 16] {
    [
        1.0, 0.0, 0.0, x, 0.0, 1.0, 0.0, y, 0.0, 0.0, 1.0, z, 0.0, 0.0, 0.0, 1.0,
    ]
}

#[test]
fn element_without_transform_moves_from_origin() {
    let mut scene = Scene::with_elements(&["E1"]);
    let elements = vec![ElementData::new("E1")];
    let mut ledger = PositionLedger::build(&elements, &scene);
    assert_eq!(ledger.lookup("E1").unwrap().current_center, Point3::origin());

    ledger.apply_correction("E1", Point3::new(10.0, 20.0, 3.5), &mut scene);

    let entry = ledger.lookup("E1").unwrap();
    assert_eq!(entry.current_center, Point3::new(10.0, 20.0, 3.5));
    assert_eq!(entry.accumulated_correction, Vector3::new(10.0, 20.0, 3.5));
    assert_eq!(scene.transforms[&PartHandle(0)], Vector3::new(10.0, 20.0, 3.5));
    assert_eq!(scene.renders, 1);
}

#[test]
fn unknown_axis_keeps_its_center() {
    let mut scene = Scene::with_elements(&["E1"]);
    let elements = vec![ElementData::new("E1").with_transform(row_major(5.0, 5.0, 5.0))];
    let mut ledger = PositionLedger::build(&elements, &scene);

    let c = ledger
        .apply_correction("E1", Point3::new(7.0, f64::NAN, 2.0), &mut scene)
        .unwrap();

    assert_eq!(c.delta, Vector3::new(2.0, 0.0, -3.0));
    let entry = ledger.lookup("E1").unwrap();
    assert_eq!(entry.current_center.y, 5.0);
    assert_eq!(entry.current_center, Point3::new(7.0, 5.0, 2.0));
}

#[test]
fn repeated_correction_is_idempotent_on_center() {
    let mut scene = Scene::with_elements(&["E1"]);
    let elements = vec![ElementData::new("E1").with_transform(row_major(1.5, -2.0, 0.0))];
    let mut ledger = PositionLedger::build(&elements, &scene);
    let target = Point3::new(3.25, 4.0, -1.0);

    ledger.apply_correction("E1", target, &mut scene);
    let after_first = ledger.lookup("E1").unwrap().clone();
    let second = ledger.apply_correction("E1", target, &mut scene).unwrap();

    assert_eq!(second.delta, Vector3::zeros());
    assert_eq!(ledger.lookup("E1").unwrap(), &after_first);
    assert_eq!(after_first.current_center, target);
}

#[test]
fn accumulated_correction_is_the_sum_of_deltas() {
    let mut scene = Scene::with_elements(&["E1"]);
    let elements = vec![ElementData::new("E1").with_transform(row_major(100.0, 200.0, 10.0))];
    let mut ledger = PositionLedger::build(&elements, &scene);

    let targets = [
        Point3::new(101.0, 199.5, 10.0),
        Point3::new(f64::NAN, 190.0, 12.0),
        Point3::new(95.25, f64::NAN, f64::NAN),
        Point3::new(100.0, 200.0, 10.0),
    ];
    let mut sum = Vector3::zeros();
    for target in targets {
        sum += ledger.apply_correction("E1", target, &mut scene).unwrap().delta;
    }

    let entry = ledger.lookup("E1").unwrap();
    assert_relative_eq!(entry.accumulated_correction, sum, epsilon = 1e-9);
    assert_relative_eq!(entry.original_position(), Point3::new(100.0, 200.0, 10.0), epsilon = 1e-9);
    assert_relative_eq!(scene.transforms[&PartHandle(0)], sum, epsilon = 1e-9);
}

#[test]
fn animator_lands_on_end_after_full_duration() {
    let mut scene = Scene::with_elements(&["A", "B"]);
    let mut animator = PositionAnimator::new(0.25);
    let end_a = Vector3::new(13.225, -35.146, 0.0);
    let end_b = Vector3::new(-0.001, 0.3, 7.1);

    animator.enqueue(&ElementData::new("A"), Vector3::zeros(), end_a, &scene);
    animator.enqueue(&ElementData::new("B"), Vector3::new(1.0, 1.0, 1.0), end_b, &scene);

    // uneven frame times adding up to more than 1 / time_scale
    let frames = [0.016, 0.033, 0.5, 0.016, 1.2, 0.9, 0.7, 0.8];
    assert!(frames.iter().sum::<f64>() >= animator.duration_secs());
    for dt in frames {
        animator.advance(dt, &mut scene);
    }

    assert_eq!(scene.transforms[&PartHandle(0)], end_a);
    assert_eq!(scene.transforms[&PartHandle(1)], end_b);
    assert!(animator.is_idle());
}

#[test]
fn untracked_lookup_is_not_an_error() {
    let scene = Scene::default();
    let ledger = PositionLedger::build(std::iter::empty(), &scene);
    assert!(ledger.lookup("missing").is_none());
}
