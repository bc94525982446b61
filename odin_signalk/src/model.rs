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

//! the data model for the self vessel and the tracked targets

use std::{collections::{BTreeMap,VecDeque}, fmt};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use serde_json::Value;

use crate::{geo::Position, delta::PathValue};

/// the target categories we keep registries for. The self vessel is not a category
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all="lowercase")]
pub enum Category {
    Vessels,
    Atons,
    Aircraft,
    Sar,
}

impl Category {
    pub const ALL: [Category;4] = [Category::Vessels, Category::Atons, Category::Aircraft, Category::Sar];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Vessels => "vessels",
            Category::Atons => "atons",
            Category::Aircraft => "aircraft",
            Category::Sar => "sar",
        };
        write!(f, "{s}")
    }
}

/// the capabilities shared by all registry entries. This is what the sweeper and the spatial filter work on
pub trait TrackedEntity {
    fn id (&self)->&str;
    fn position (&self)->Option<&Position>;
    fn position_received (&self)->bool;
    fn last_updated (&self)->DateTime<Utc>;
    fn set_name (&mut self, name: String);
}

/* #region Track ***********************************************************************************/

/// segmented position history. Only the last segment is active and bounded
#[derive(Debug,Clone,Default,Serialize)]
#[serde(transparent)]
pub struct Track(Vec<VecDeque<Position>>);

impl Track {
    pub fn new ()->Self { Track(Vec::new()) }

    /// append `p` to the active segment if it differs from the last point in at least one coordinate,
    /// then drop the oldest points of the active segment that exceed `max_points`.
    /// Returns true if a point was added
    pub fn append (&mut self, p: Position, max_points: usize)->bool {
        let appended = match self.0.last_mut() {
            None => {
                self.0.push( VecDeque::from([p]));
                true
            }
            Some(segment) => {
                let is_new = match segment.back() {
                    Some(last) => last.lon() != p.lon() || last.lat() != p.lat(),
                    None => true
                };
                if is_new { segment.push_back(p) }
                is_new
            }
        };

        if let Some(segment) = self.0.last_mut() {
            while segment.len() > max_points {
                segment.pop_front();
            }
        }
        appended
    }

    pub fn is_empty (&self)->bool { self.0.is_empty() }
    pub fn segments (&self)->&[VecDeque<Position>] { self.0.as_slice() }
    pub fn last_segment (&self)->Option<&VecDeque<Position>> { self.0.last() }
    pub fn last_point (&self)->Option<&Position> { self.0.last().and_then(|s| s.back()) }
}

/* #endregion Track */

/* #region Vessel **********************************************************************************/

#[derive(Debug,Clone,Default,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Wind {
    pub awa: Option<f64>,                // apparent angle
    pub aws: Option<f64>,                // apparent speed
    pub speed_true: Option<f64>,
    pub sog: Option<f64>,                // true speed over ground
    pub angle_true_ground: Option<f64>,
    pub angle_true_water: Option<f64>,
    pub twd: Option<f64>,                // direction true
    pub mwd: Option<f64>,                // direction magnetic
    pub tws: Option<f64>,                // resolved from preferred path
    pub direction: Option<f64>,          // resolved from preferred path
}

#[derive(Debug,Clone,Default,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Anchor {
    pub position: Option<Position>,
    pub max_radius: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Debug,Clone,Default,Serialize)]
pub struct Autopilot {
    pub state: Option<String>,
    pub mode: Option<String>,
}

/// the self vessel and the AIS vessels share the same model
#[derive(Debug,Clone,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Vessel {
    pub id: String,
    pub name: Option<String>,
    pub mmsi: Option<String>,
    pub callsign: Option<String>,
    pub buddy: Option<bool>,

    pub position: Option<Position>,
    pub position_received: bool,
    pub state: Option<String>,
    pub sog: Option<f64>,
    pub cog_true: Option<f64>,
    pub cog_magnetic: Option<f64>,
    pub heading_true: Option<f64>,
    pub heading_magnetic: Option<f64>,
    pub heading: Option<f64>,            // resolved (preferred path or best available)

    pub wind: Wind,
    pub mode: Option<String>,
    pub autopilot: Autopilot,
    pub anchor: Anchor,
    pub closest_approach: Option<Value>,
    pub course: BTreeMap<String,Value>,  // rhumbline/great circle course data, keyed by sub-path

    pub track: Track,
    pub last_updated: DateTime<Utc>,
    pub resource_updates: Vec<PathValue>,
}

impl Vessel {
    pub fn new (id: impl ToString, now: DateTime<Utc>)->Self {
        Vessel {
            id: id.to_string(),
            name: None,
            mmsi: None,
            callsign: None,
            buddy: None,
            position: None,
            position_received: false,
            state: None,
            sog: None,
            cog_true: None,
            cog_magnetic: None,
            heading_true: None,
            heading_magnetic: None,
            heading: None,
            wind: Wind::default(),
            mode: None,
            autopilot: Autopilot::default(),
            anchor: Anchor::default(),
            closest_approach: None,
            course: BTreeMap::new(),
            track: Track::new(),
            last_updated: now,
            resource_updates: Vec::new(),
        }
    }

    pub fn cog (&self)->Option<f64> { self.cog_true.or(self.cog_magnetic) }
}

impl TrackedEntity for Vessel {
    fn id (&self)->&str { self.id.as_str() }
    fn position (&self)->Option<&Position> { self.position.as_ref() }
    fn position_received (&self)->bool { self.position_received }
    fn last_updated (&self)->DateTime<Utc> { self.last_updated }
    fn set_name (&mut self, name: String) { self.name = Some(name) }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Vessel( id: {}", self.id)?;
        if let Some(name) = &self.name { write!( f, ", name: \"{name}\"")?; }
        if let Some(mmsi) = &self.mmsi { write!( f, ", mmsi: {mmsi}")?; }
        if let Some(pos) = &self.position { write!( f, ", pos: {pos}")?; }
        if let Some(sog) = self.sog { write!( f, ", sog: {sog:.1}")?; }
        if let Some(hdg) = self.heading { write!( f, ", hdg: {:.0}", hdg.to_degrees())?; }
        write!( f, ", time: {})", self.last_updated)
    }
}

/* #endregion Vessel */

/* #region TypedTarget *****************************************************************************/

/// type classification of aids-to-navigation (as reported in `atonType`)
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct TargetType {
    pub id: i64,
    pub name: String,
}

impl TargetType {
    pub fn basestation ()->Self { TargetType { id: -1, name: "Basestation".to_string() } }
    pub fn sar_beacon ()->Self { TargetType { id: -1, name: "SaR Beacon".to_string() } }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum TargetKind {
    AtoN,
    SaR,
}

/// aids-to-navigation and search-and-rescue beacons share this model
#[derive(Debug,Clone,Serialize)]
#[serde(rename_all="camelCase")]
pub struct TypedTarget {
    pub id: String,
    pub kind: TargetKind,
    pub name: Option<String>,
    pub mmsi: Option<String>,
    pub callsign: Option<String>,
    #[serde(rename="type")]
    pub target_type: TargetType,
    pub position: Option<Position>,
    pub position_received: bool,
    pub properties: BTreeMap<String,Value>,
    pub last_updated: DateTime<Utc>,
}

impl TypedTarget {
    fn new (id: impl ToString, kind: TargetKind, target_type: TargetType, now: DateTime<Utc>)->Self {
        TypedTarget {
            id: id.to_string(),
            kind,
            name: None,
            mmsi: None,
            callsign: None,
            target_type,
            position: None,
            position_received: false,
            properties: BTreeMap::new(),
            last_updated: now,
        }
    }

    /// shore base stations are reported as AtoNs with a synthetic type
    pub fn aton (id: &str, now: DateTime<Utc>)->Self {
        let target_type = if id.contains("shore.basestations") { TargetType::basestation() } else { TargetType::default() };
        Self::new( id, TargetKind::AtoN, target_type, now)
    }

    pub fn sar (id: &str, now: DateTime<Utc>)->Self {
        Self::new( id, TargetKind::SaR, TargetType::sar_beacon(), now)
    }
}

impl TrackedEntity for TypedTarget {
    fn id (&self)->&str { self.id.as_str() }
    fn position (&self)->Option<&Position> { self.position.as_ref() }
    fn position_received (&self)->bool { self.position_received }
    fn last_updated (&self)->DateTime<Utc> { self.last_updated }
    fn set_name (&mut self, name: String) { self.name = Some(name) }
}

/* #endregion TypedTarget */

/* #region Aircraft ********************************************************************************/

#[derive(Debug,Clone,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Aircraft {
    pub id: String,
    pub name: Option<String>,
    pub mmsi: Option<String>,
    pub callsign: Option<String>,
    pub position: Option<Position>,
    pub position_received: bool,
    pub orientation: Option<f64>,  // course over ground (true)
    pub sog: Option<f64>,
    pub track: Track,
    pub properties: BTreeMap<String,Value>,
    pub last_updated: DateTime<Utc>,
}

impl Aircraft {
    pub fn new (id: impl ToString, now: DateTime<Utc>)->Self {
        Aircraft {
            id: id.to_string(),
            name: None,
            mmsi: None,
            callsign: None,
            position: None,
            position_received: false,
            orientation: None,
            sog: None,
            track: Track::new(),
            properties: BTreeMap::new(),
            last_updated: now,
        }
    }
}

impl TrackedEntity for Aircraft {
    fn id (&self)->&str { self.id.as_str() }
    fn position (&self)->Option<&Position> { self.position.as_ref() }
    fn position_received (&self)->bool { self.position_received }
    fn last_updated (&self)->DateTime<Utc> { self.last_updated }
    fn set_name (&mut self, name: String) { self.name = Some(name) }
}

/* #endregion Aircraft */
