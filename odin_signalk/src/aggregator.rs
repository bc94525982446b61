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

//! the state of a single stream connection: self vessel, target registries and the per-cycle status.
//!
//! The aggregator is synchronous and takes the current time as an argument so that the worker
//! (which owns the timer) decides when things happen. Processing a delta frame goes through
//! ```text
//!   process_delta -> dispatch_value -> update_* (if the category is enabled) -> filter_context
//! ```
//! while each output cycle goes through
//! ```text
//!   flush -> snapshot -> clear status -> sweep -> (every n cycles) recompute extent
//! ```

use std::{collections::BTreeMap, time::Duration};
use chrono::{DateTime,Utc};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    config::{SignalKConfig, DEFAULT_UPDATE_INTERVAL},
    delta::{Delta, PathValue, hello_self_context},
    fields::is_pref_source_path,
    geo::Extent,
    messages::{Snapshot, SELF_CONTEXT},
    model::{Aircraft, Category, TrackedEntity, TypedTarget, Vessel},
    notification::{Notification, extract_notification},
    registry::{Registry, TargetStatus},
    updater::{UpdateContext, update_aircraft, update_typed_target, update_vessel},
};

/// number of output cycles between region-of-interest re-computations. A zero interval means
/// we flush after each frame, in which case we assume the default interval
pub fn extent_cycles (extent_period: Duration, interval: Duration)->usize {
    let interval = if interval.is_zero() { DEFAULT_UPDATE_INTERVAL } else { interval };
    ((extent_period.as_millis() / interval.as_millis().max(1)) as usize).max(1)
}

pub struct Aggregator {
    config: SignalKConfig,
    playback: bool,
    self_context: Option<String>,

    pub self_vessel: Vessel,
    pub vessels: Registry<Vessel>,
    pub atons: Registry<TypedTarget>,
    pub aircraft: Registry<Aircraft>,
    pub sar: Registry<TypedTarget>,

    pub status: TargetStatus,
    pub paths: BTreeMap<String,Value>, // raw values of preference candidate paths

    extent: Option<Extent>,
    extent_counter: usize,
    extent_cycles: usize,

    dirty: bool,
    feed_time: Option<String>, // timestamp of the last processed update (used for playback snapshots)
}

impl Aggregator {
    pub fn new (config: SignalKConfig, playback: bool, now: DateTime<Utc>)->Self {
        let extent_cycles = extent_cycles( config.extent_period, config.update_interval);

        Aggregator {
            config,
            playback,
            self_context: None,
            self_vessel: Vessel::new( SELF_CONTEXT, now),
            vessels: Registry::new(),
            atons: Registry::new(),
            aircraft: Registry::new(),
            sar: Registry::new(),
            status: TargetStatus::default(),
            paths: BTreeMap::new(),
            extent: None,
            extent_counter: 0,
            extent_cycles,
            dirty: false,
            feed_time: None,
        }
    }

    pub fn config (&self)->&SignalKConfig { &self.config }
    pub fn extent (&self)->Option<&Extent> { self.extent.as_ref() }
    pub fn extent_counter (&self)->usize { self.extent_counter }
    pub fn extent_cycles (&self)->usize { self.extent_cycles }
    pub fn is_dirty (&self)->bool { self.dirty }
    pub fn is_playback (&self)->bool { self.playback }
    pub fn self_context (&self)->Option<&str> { self.self_context.as_deref() }

    /// replace the runtime configuration. A changed radius causes an immediate extent re-computation
    pub fn set_config (&mut self, config: SignalKConfig, playback: bool) {
        let radius_changed = config.filter.radius() != self.config.filter.radius();
        let interval_changed = config.update_interval != self.config.update_interval
            || config.extent_period != self.config.extent_period;

        self.config = config;
        self.playback = playback;

        if interval_changed {
            self.extent_cycles = extent_cycles( self.config.extent_period, self.config.update_interval);
            if self.extent_counter >= self.extent_cycles { self.extent_counter = 0 }
            debug!("extent recomputed every {} cycles", self.extent_cycles);
        }
        if radius_changed {
            self.recompute_extent();
        }
    }

    pub fn process_hello (&mut self, hello: &Value) {
        if let Some(ctx) = hello_self_context(hello) {
            debug!("self context: {ctx}");
            self.self_context = Some(ctx);
        }
    }

    pub fn is_self (&self, context: &str)->bool {
        context == SELF_CONTEXT || self.self_context.as_deref() == Some(context)
    }

    /// process all values of a delta frame, returning the notifications that have to be reported immediately
    pub fn process_delta (&mut self, delta: &Delta, now: DateTime<Utc>)->Vec<Notification> {
        let mut notifications = Vec::new();
        self.dirty = true;

        for update in &delta.updates {
            for pv in &update.values {
                if let Some(ts) = &update.timestamp {
                    self.feed_time = Some(ts.clone());
                }
                if let Some(context) = &delta.context {
                    self.dispatch_value( context, pv, now, &mut notifications);
                }
            }
        }

        notifications
    }

    /// route a single value to the registry that corresponds to the first context segment. For non-self
    /// targets the category and spatial filter is applied after the (optional) update
    pub fn dispatch_value (&mut self, context: &str, pv: &PathValue, now: DateTime<Utc>, notifications: &mut Vec<Notification>) {
        let ctx = UpdateContext { preferred: &self.config.preferred_paths, max_track: self.config.max_track, now };
        let filter = &self.config.filter;

        match context.split('.').next().unwrap_or_default() {
            "shore" => {
                let context = format!("atons.{context}");
                if filter.atons {
                    let aton = self.atons.get_or_create( &context, || TypedTarget::aton( &context, now));
                    update_typed_target( aton, pv, now);
                }
                self.filter_context( Category::Atons, &context);
            }
            "atons" => {
                if filter.atons {
                    let aton = self.atons.get_or_create( context, || TypedTarget::aton( context, now));
                    update_typed_target( aton, pv, now);
                }
                self.filter_context( Category::Atons, context);
            }
            "sar" => {
                if filter.sar {
                    let sar = self.sar.get_or_create( context, || TypedTarget::sar( context, now));
                    update_typed_target( sar, pv, now);
                }
                self.filter_context( Category::Sar, context);
            }
            "aircraft" => {
                if filter.aircraft {
                    let aircraft = self.aircraft.get_or_create( context, || Aircraft::new( context, now));
                    update_aircraft( aircraft, pv, &ctx);
                }
                self.filter_context( Category::Aircraft, context);
            }
            "vessels" => {
                if self.is_self(context) {
                    if is_pref_source_path( &pv.path) {
                        self.paths.insert( pv.path.clone(), pv.value.clone());
                    }
                    update_vessel( &mut self.self_vessel, pv, true, &ctx);
                    if let Some(notification) = extract_notification(pv) {
                        notifications.push( notification);
                    }
                } else {
                    if filter.vessels {
                        let vessel = self.vessels.get_or_create( context, || Vessel::new( context, now));
                        update_vessel( vessel, pv, false, &ctx);
                    }
                    self.filter_context( Category::Vessels, context);
                }
            }
            other => trace!("ignoring context category {other}")
        }
    }

    /// apply category and spatial filter to the registry entry for `id`
    pub fn filter_context (&mut self, category: Category, id: &str) {
        let enabled = self.config.filter.is_enabled(category);
        let radius = self.config.filter.radius();
        let extent = self.extent.as_ref();

        match category {
            Category::Vessels => self.vessels.filter_context( id, enabled, radius, extent, &mut self.status),
            Category::Atons => self.atons.filter_context( id, enabled, radius, extent, &mut self.status),
            Category::Aircraft => self.aircraft.filter_context( id, enabled, radius, extent, &mut self.status),
            Category::Sar => self.sar.filter_context( id, enabled, radius, extent, &mut self.status),
        }
    }

    /// classify all targets by age, remove expired ones and clear disabled categories
    pub fn sweep (&mut self, now: DateTime<Utc>) {
        let stale_age = self.config.stale_age;
        let max_age = self.config.max_age;
        let filter = &self.config.filter;

        if filter.vessels { self.vessels.sweep( now, stale_age, max_age, &mut self.status); } else { self.vessels.expire_all( &mut self.status) }
        if filter.atons { self.atons.sweep( now, stale_age, max_age, &mut self.status); } else { self.atons.expire_all( &mut self.status) }
        if filter.aircraft { self.aircraft.sweep( now, stale_age, max_age, &mut self.status); } else { self.aircraft.expire_all( &mut self.status) }
        if filter.sar { self.sar.sweep( now, stale_age, max_age, &mut self.status); } else { self.sar.expire_all( &mut self.status) }
    }

    /// set the region of interest around the self position. Without radius or self position there is none
    pub fn recompute_extent (&mut self) {
        self.extent = match (self.self_vessel.position.as_ref(), self.config.filter.radius()) {
            (Some(pos), Some(radius)) => Some( Extent::around( pos, radius)),
            _ => None
        };
        if let Some(extent) = &self.extent {
            debug!("new region of interest: {extent:?}");
        }
    }

    pub fn snapshot (&self, now: DateTime<Utc>)->Snapshot {
        let timestamp = if self.playback {
            self.feed_time.clone().unwrap_or_else(|| now.to_rfc3339())
        } else {
            now.to_rfc3339()
        };

        Snapshot {
            self_vessel: self.self_vessel.clone(),
            ais_targets: self.vessels.clone(),
            ais_status: self.status.clone(),
            paths: self.paths.clone(),
            atons: self.atons.clone(),
            aircraft: self.aircraft.clone(),
            sar: self.sar.clone(),
            timestamp,
        }
    }

    /// produce a snapshot if anything was received since the last flush, then run the per-cycle
    /// maintenance. Marks set by the sweep are reported with the next snapshot
    pub fn flush (&mut self, now: DateTime<Utc>)->Option<Snapshot> {
        if !self.dirty { return None }

        let snapshot = self.snapshot(now);

        self.dirty = false;
        self.status.clear();
        self.self_vessel.resource_updates.clear();

        self.sweep(now);

        if self.extent_counter == 0 {
            if self.self_vessel.position_received() {
                self.recompute_extent();
                self.extent_counter = 1 % self.extent_cycles;
            }
        } else {
            self.extent_counter = (self.extent_counter + 1) % self.extent_cycles;
        }

        Some(snapshot)
    }

    /// rename the self vessel (context "self") or an AIS target
    pub fn rename_vessel (&mut self, context: &str, name: &str)->bool {
        if context == "self" || self.is_self(context) {
            self.self_vessel.set_name( name.to_string());
            true
        } else if let Some(vessel) = self.vessels.get_mut(context) {
            vessel.set_name( name.to_string());
            true
        } else {
            false
        }
    }
}
