/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{collections::{BTreeSet,HashMap}, time::Duration};
use chrono::{DateTime,Utc};
use serde::Serialize;

use crate::{geo::Extent, model::TrackedEntity};

/// the per-cycle classification of target ids. Sets are cleared after each snapshot
#[derive(Debug,Clone,Default,PartialEq,Serialize)]
pub struct TargetStatus {
    pub updated: BTreeSet<String>,
    pub stale: BTreeSet<String>,
    pub expired: BTreeSet<String>,
}

impl TargetStatus {
    pub fn clear (&mut self) {
        self.updated.clear();
        self.stale.clear();
        self.expired.clear();
    }

    pub fn is_empty (&self)->bool {
        self.updated.is_empty() && self.stale.is_empty() && self.expired.is_empty()
    }
}

/// a keyed collection of tracked entities with get-or-create semantics. Keys are SignalK contexts
#[derive(Debug,Clone,Serialize)]
#[serde(transparent)]
pub struct Registry<T> {
    entries: HashMap<String,T>,
}

impl<T> Default for Registry<T> {
    fn default()->Self { Registry { entries: HashMap::new() } }
}

impl<T: TrackedEntity> Registry<T> {
    pub fn new ()->Self { Self::default() }

    pub fn get_or_create (&mut self, id: &str, create: impl FnOnce()->T)->&mut T {
        self.entries.entry( id.to_string()).or_insert_with( create)
    }

    pub fn get (&self, id: &str)->Option<&T> { self.entries.get(id) }
    pub fn get_mut (&mut self, id: &str)->Option<&mut T> { self.entries.get_mut(id) }
    pub fn contains (&self, id: &str)->bool { self.entries.contains_key(id) }
    pub fn remove (&mut self, id: &str)->Option<T> { self.entries.remove(id) }
    pub fn len (&self)->usize { self.entries.len() }
    pub fn is_empty (&self)->bool { self.entries.is_empty() }
    pub fn iter (&self)->impl Iterator<Item=(&String,&T)> { self.entries.iter() }

    /// remove all entries and mark them as expired
    pub fn expire_all (&mut self, status: &mut TargetStatus) {
        for id in self.entries.drain().map(|(id,_)| id) {
            status.expired.insert(id);
        }
    }

    /// classify all entries by the time elapsed since their last update. Entries older than `max_age`
    /// are removed and marked as expired, entries older than `stale_age` are marked as stale
    pub fn sweep (&mut self, now: DateTime<Utc>, stale_age: Duration, max_age: Duration, status: &mut TargetStatus)->usize {
        let len = self.entries.len();

        self.entries.retain( |id, e| {
            let elapsed = (now - e.last_updated()).to_std().unwrap_or_default();
            if elapsed > max_age {
                status.expired.insert( id.clone());
                false
            } else {
                if elapsed > stale_age {
                    status.stale.insert( id.clone());
                }
                true
            }
        });

        len - self.entries.len()
    }

    /// apply the category and spatial filter to the entry for `id`. Disabled categories are cleared,
    /// if there is a radius the entry has to have a position within `extent` to be kept
    pub fn filter_context (&mut self, id: &str, enabled: bool, radius: Option<f64>, extent: Option<&Extent>, status: &mut TargetStatus) {
        if !enabled {
            self.expire_all( status);
            return
        }

        if radius.is_some() {
            let inside = match (self.entries.get(id), extent) {
                (Some(e), Some(extent)) => e.position_received() && e.position().is_some_and(|p| extent.contains(p)),
                _ => false
            };
            if inside {
                status.updated.insert( id.to_string());
            } else {
                self.entries.remove(id);
                status.expired.insert( id.to_string());
            }
        } else {
            status.updated.insert( id.to_string());
        }
    }
}
