// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supports offered for GPS follow, as listed by the record store

use serde::{Deserialize, Serialize};

/// Key of the placeholder entry ("no support chosen")
pub const PLACEHOLDER_KEY: &str = "null";

/// One choosable support
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportEntry {
    /// Element id, or [`PLACEHOLDER_KEY`]
    pub key: String,
    pub comment: String,
    pub image_url: String,
}

impl SupportEntry {
    pub fn placeholder() -> Self {
        Self {
            key: PLACEHOLDER_KEY.to_string(),
            comment: "Support ?".to_string(),
            image_url: String::new(),
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.key == PLACEHOLDER_KEY
    }
}

/// Support list; the placeholder always comes first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportList {
    entries: Vec<SupportEntry>,
}

impl Default for SupportList {
    fn default() -> Self {
        Self {
            entries: vec![SupportEntry::placeholder()],
        }
    }
}

impl SupportList {
    /// Build from store entries; later duplicates of a key are ignored
    pub fn from_entries(entries: impl IntoIterator<Item = SupportEntry>) -> Self {
        let mut list = Self::default();
        for entry in entries {
            if entry.is_placeholder() || list.get(&entry.key).is_some() {
                continue;
            }
            list.entries.push(entry);
        }
        list
    }

    pub fn get(&self, key: &str) -> Option<&SupportEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> &[SupportEntry] {
        &self.entries
    }

    /// Number of real supports (placeholder excluded)
    pub fn support_count(&self) -> usize {
        self.entries.len() - 1
    }
}
