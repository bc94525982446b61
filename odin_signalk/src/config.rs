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

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};
use tracing::warn;

use crate::{model::Category, errors::{Result, config_error}};

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(9 * 60);
pub const DEFAULT_STALE_AGE: Duration = Duration::from_secs(6 * 60);
pub const DEFAULT_MAX_TRACK: usize = 20;
pub const DEFAULT_EXTENT_PERIOD: Duration = Duration::from_secs(60);
pub const DEFAULT_CHANNEL_BOUNDS: usize = 64;

/// the static configuration of a SignalK worker. Most of these values can be overridden at runtime
/// through `settings` commands
#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct SignalKConfig {
    pub update_interval: Duration,    // snapshot flush interval (zero means flush after each delta)
    pub max_age: Duration,            // targets not updated within this duration are dropped
    pub stale_age: Duration,          // targets not updated within this duration are reported as stale
    pub max_track: usize,             // max number of points in the active track segment
    pub extent_period: Duration,      // wall clock time between region-of-interest re-computations
    pub channel_bounds: usize,        // capacity of command/event channels
    pub filter: TargetFilter,
    pub preferred_paths: PreferredPaths,
}

impl Default for SignalKConfig {
    fn default()->Self {
        SignalKConfig {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            max_age: DEFAULT_MAX_AGE,
            stale_age: DEFAULT_STALE_AGE,
            max_track: DEFAULT_MAX_TRACK,
            extent_period: DEFAULT_EXTENT_PERIOD,
            channel_bounds: DEFAULT_CHANNEL_BOUNDS,
            filter: TargetFilter::default(),
            preferred_paths: PreferredPaths::default(),
        }
    }
}

impl SignalKConfig {
    /// report settings that make target classification ambiguous. We don't correct them since
    /// this is a deliberate user setting
    pub fn check (&self) {
        if self.max_age <= self.stale_age {
            warn!("max_age ({:?}) does not exceed stale_age ({:?}), targets will never be reported as stale", self.max_age, self.stale_age);
        }
        if self.max_track == 0 {
            warn!("max_track is 0, no track history will be kept");
        }
    }
}

/// load a RON config file
pub fn load_config<P: AsRef<Path>> (path: P)->Result<SignalKConfig> {
    let data = fs::read_to_string( path.as_ref())?;
    let config: SignalKConfig = ron::de::from_str( data.as_str())?;
    if config.channel_bounds == 0 {
        return Err( config_error("channel_bounds has to be positive"))
    }
    config.check();
    Ok(config)
}

/// per-category enable flags plus optional radius (in meters) around the self position
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
#[serde(default, rename_all="camelCase")]
pub struct TargetFilter {
    pub vessels: bool,
    pub atons: bool,
    pub aircraft: bool,
    pub sar: bool,
    pub max_radius: Option<f64>,
}

impl Default for TargetFilter {
    fn default()->Self {
        TargetFilter { vessels: true, atons: true, aircraft: true, sar: true, max_radius: None }
    }
}

impl TargetFilter {
    pub fn is_enabled (&self, category: Category)->bool {
        match category {
            Category::Vessels => self.vessels,
            Category::Atons => self.atons,
            Category::Aircraft => self.aircraft,
            Category::Sar => self.sar,
        }
    }

    /// a zero or negative radius is the same as no radius
    pub fn radius (&self)->Option<f64> {
        self.max_radius.filter(|r| *r > 0.0)
    }
}

/// host selected source paths for values that can come from alternative sensors
#[derive(Deserialize,Serialize,Debug,Clone,Default,PartialEq)]
#[serde(default)]
pub struct PreferredPaths {
    pub heading: Option<String>,
    pub tws: Option<String>,
    pub twd: Option<String>,
}

impl PreferredPaths {
    #[inline] pub fn is_heading (&self, path: &str)->bool { self.heading.as_deref() == Some(path) }
    #[inline] pub fn is_tws (&self, path: &str)->bool { self.tws.as_deref() == Some(path) }
    #[inline] pub fn is_twd (&self, path: &str)->bool { self.twd.as_deref() == Some(path) }
}
