// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the rendering engine
//!
//! The ledger and the animator never see a concrete renderer. They talk to
//! a [`RenderHost`], which resolves elements to drawable parts, accepts
//! translations for those parts and schedules redraws. Drawables are owned
//! by the host; the core only keeps their [`PartHandle`]s.

use crate::element::ElementData;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Opaque handle to one drawable sub-object owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartHandle(pub u32);

/// Drawable parts of one element (most elements have one to three)
pub type PartList = SmallVec<[PartHandle; 4]>;

/// Capabilities the core needs from the rendering engine
pub trait RenderHost {
    /// Resolve an element to its drawable parts (node -> render views -> drawables).
    /// Elements without drawables return an empty list.
    fn resolve_parts(&self, element: &ElementData) -> PartList;

    /// Set a part's translation, relative to its original geometry
    fn set_translation(&mut self, part: PartHandle, translation: &Vector3<f64>);

    /// Ask the host to redraw on its next frame
    fn request_render(&mut self);
}
