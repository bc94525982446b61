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

//! translation of SignalK path/value pairs into entity fields.
//!
//! All update functions return `true` if the value was accepted, in which case the `last_updated`
//! timestamp of the entity has been set. Values with unexpected JSON types are ignored for the
//! respective field, a JSON `null` clears optional fields.

use chrono::{DateTime,Utc};
use serde_json::Value;
use tracing::trace;

use crate::{
    config::PreferredPaths,
    delta::PathValue,
    fields::{self, VesselField, TargetField, VESSEL_FIELDS, TARGET_FIELDS},
    geo::{Position, angle_to_direction},
    model::{Aircraft, TargetKind, TargetType, TypedTarget, Vessel},
};

/// the update parameters that do not belong to the entity itself
#[derive(Debug,Clone,Copy)]
pub struct UpdateContext<'a> {
    pub preferred: &'a PreferredPaths,
    pub max_track: usize,
    pub now: DateTime<Utc>,
}

/* #region value helpers ***************************************************************************/

fn set_f64 (field: &mut Option<f64>, value: &Value)->bool {
    match value {
        Value::Null => { *field = None; true }
        Value::Number(n) => { *field = n.as_f64(); true }
        _ => false
    }
}

fn set_string (field: &mut Option<String>, value: &Value)->bool {
    match value {
        Value::Null => { *field = None; true }
        Value::String(s) => { *field = Some(s.clone()); true }
        _ => false
    }
}

fn set_bool (field: &mut Option<bool>, value: &Value)->bool {
    match value {
        Value::Null => { *field = None; true }
        Value::Bool(b) => { *field = Some(*b); true }
        _ => false
    }
}

/// MMSIs are strings in SignalK but some sources report them as numbers
fn set_mmsi (field: &mut Option<String>, value: &Value)->bool {
    match value {
        Value::Number(n) => { *field = Some(n.to_string()); true }
        _ => set_string(field, value)
    }
}

fn set_position (field: &mut Option<Position>, value: &Value)->bool {
    match value {
        Value::Null => { *field = None; true }
        _ => match Position::from_value(value) {
            Some(pos) => { *field = Some(pos); true }
            None => false
        }
    }
}

/// `navigation.position` updates need a valid position. A null value does not remove a known position
fn parse_position (value: &Value)->Option<Position> {
    Position::from_value(value)
}

/* #endregion value helpers */

/* #region vessels *********************************************************************************/

/// update the self vessel or an AIS vessel. Track points are only recorded for AIS vessels
pub fn update_vessel (v: &mut Vessel, pv: &PathValue, is_self: bool, ctx: &UpdateContext)->bool {
    let path = pv.path.as_str();
    let value = &pv.value;

    let mut accepted = if path.is_empty() {
        update_vessel_composite( v, value)

    } else if let Some(field) = VESSEL_FIELDS.get(path) {
        update_vessel_field( v, *field, value, is_self, ctx)

    } else if fields::is_course_path(path) {
        match fields::course_key(path) {
            Some(key) => { v.course.insert( key.to_string(), value.clone()); true }
            None => false
        }

    } else if path.contains(fields::CLOSEST_APPROACH) {
        v.closest_approach = if value.is_null() { None } else { Some(value.clone()) };
        true

    } else if path.starts_with(fields::RESOURCES_PREFIX) {
        v.resource_updates.push( pv.clone());
        true

    } else {
        trace!("ignored vessel path {path}");
        false
    };

    accepted |= apply_preferred_paths( v, path, value, ctx.preferred);

    if v.heading.is_none() {
        v.heading = v.cog();
    }

    if accepted {
        v.last_updated = ctx.now;
    }
    accepted
}

fn update_vessel_composite (v: &mut Vessel, value: &Value)->bool {
    let mut accepted = false;
    if let Some(name) = value.get("name") { accepted |= set_string( &mut v.name, name) }
    if let Some(mmsi) = value.get("mmsi") { accepted |= set_mmsi( &mut v.mmsi, mmsi) }
    if let Some(buddy) = value.get("buddy") { accepted |= set_bool( &mut v.buddy, buddy) }
    accepted
}

fn update_vessel_field (v: &mut Vessel, field: VesselField, value: &Value, is_self: bool, ctx: &UpdateContext)->bool {
    match field {
        VesselField::Callsign => set_string( &mut v.callsign, value),
        VesselField::Position => {
            if let Some(pos) = parse_position(value) {
                v.position = Some(pos);
                v.position_received = true;
                if !is_self {
                    v.track.append( pos, ctx.max_track);
                }
                true
            } else {
                false
            }
        }
        VesselField::State => set_string( &mut v.state, value),
        VesselField::Sog => set_f64( &mut v.sog, value),
        VesselField::CogTrue => set_f64( &mut v.cog_true, value),
        VesselField::CogMagnetic => set_f64( &mut v.cog_magnetic, value),
        VesselField::HeadingTrue => {
            let accepted = set_f64( &mut v.heading_true, value);
            if accepted && ctx.preferred.heading.is_none() { v.heading = v.heading_true.or(v.heading_magnetic) }
            accepted
        }
        VesselField::HeadingMagnetic => {
            let accepted = set_f64( &mut v.heading_magnetic, value);
            if accepted && ctx.preferred.heading.is_none() { v.heading = v.heading_true.or(v.heading_magnetic) }
            accepted
        }
        VesselField::WindAngleApparent => set_f64( &mut v.wind.awa, value),
        VesselField::WindSpeedApparent => set_f64( &mut v.wind.aws, value),
        VesselField::WindSpeedTrue => set_f64( &mut v.wind.speed_true, value),
        VesselField::WindSpeedOverGround => set_f64( &mut v.wind.sog, value),
        VesselField::WindAngleTrueGround => set_f64( &mut v.wind.angle_true_ground, value),
        VesselField::WindAngleTrueWater => set_f64( &mut v.wind.angle_true_water, value),
        VesselField::WindDirectionTrue => set_f64( &mut v.wind.twd, value),
        VesselField::WindDirectionMagnetic => set_f64( &mut v.wind.mwd, value),
        VesselField::EnvironmentMode => set_string( &mut v.mode, value),
        VesselField::AnchorPosition => set_position( &mut v.anchor.position, value),
        VesselField::AnchorMaxRadius => set_f64( &mut v.anchor.max_radius, value),
        VesselField::AnchorCurrentRadius => set_f64( &mut v.anchor.radius, value),
        VesselField::AutopilotState => set_string( &mut v.autopilot.state, value),
        VesselField::AutopilotMode => set_string( &mut v.autopilot.mode, value),
    }
}

/// host selected sources for heading, true wind speed and true wind direction. These are checked
/// in addition to the field table since the preferred path is also a regular field path
fn apply_preferred_paths (v: &mut Vessel, path: &str, value: &Value, preferred: &PreferredPaths)->bool {
    let mut accepted = false;

    if preferred.is_heading(path) {
        accepted |= set_f64( &mut v.heading, value);
    }

    if preferred.is_tws(path) {
        accepted |= set_f64( &mut v.wind.tws, value);
    }

    if preferred.is_twd(path) {
        if path == fields::WIND_ANGLE_TRUE_GROUND || path == fields::WIND_ANGLE_TRUE_WATER {
            match (value.as_f64(), v.heading) {
                (Some(angle), Some(heading)) => {
                    v.wind.direction = Some( angle_to_direction( angle, heading));
                    accepted = true;
                }
                (None, _) if value.is_null() => {
                    v.wind.direction = None;
                    accepted = true;
                }
                _ => {} // no heading yet, we can't compute a direction
            }
        } else {
            accepted |= set_f64( &mut v.wind.direction, value);
        }
    }

    accepted
}

/* #endregion vessels */

/* #region typed targets ***************************************************************************/

/// update an AtoN or SaR target. Unknown paths are stored in the property bag
pub fn update_typed_target (t: &mut TypedTarget, pv: &PathValue, now: DateTime<Utc>)->bool {
    let path = pv.path.as_str();
    let value = &pv.value;

    let accepted = if path.is_empty() {
        update_typed_target_composite( t, value)
    } else {
        match (TARGET_FIELDS.get(path), t.kind) {
            (Some(TargetField::Position), _) => {
                if let Some(pos) = parse_position(value) {
                    t.position = Some(pos);
                    t.position_received = true;
                    true
                } else {
                    false
                }
            }
            (Some(TargetField::AtonType), TargetKind::AtoN) => set_target_type( &mut t.target_type, value),
            (Some(TargetField::Callsign), TargetKind::SaR) => set_string( &mut t.callsign, value),
            _ => {
                t.properties.insert( path.to_string(), value.clone());
                true
            }
        }
    };

    if accepted {
        t.last_updated = now;
    }
    accepted
}

fn update_typed_target_composite (t: &mut TypedTarget, value: &Value)->bool {
    let mut accepted = false;
    if let Some(name) = value.get("name") { accepted |= set_string( &mut t.name, name) }
    if let Some(mmsi) = value.get("mmsi") { accepted |= set_mmsi( &mut t.mmsi, mmsi) }
    if t.kind == TargetKind::AtoN {
        if let Some(aton_type) = value.get(fields::ATON_TYPE) { accepted |= set_target_type( &mut t.target_type, aton_type) }
    }
    accepted
}

fn set_target_type (field: &mut TargetType, value: &Value)->bool {
    match serde_json::from_value::<TargetType>( value.clone()) {
        Ok(tt) => { *field = tt; true }
        Err(_) => false
    }
}

/* #endregion typed targets */

/* #region aircraft ********************************************************************************/

pub fn update_aircraft (a: &mut Aircraft, pv: &PathValue, ctx: &UpdateContext)->bool {
    let path = pv.path.as_str();
    let value = &pv.value;

    let accepted = if path.is_empty() {
        let mut accepted = false;
        if let Some(name) = value.get("name") { accepted |= set_string( &mut a.name, name) }
        if let Some(mmsi) = value.get("mmsi") { accepted |= set_mmsi( &mut a.mmsi, mmsi) }
        accepted

    } else {
        match TARGET_FIELDS.get(path) {
            Some(TargetField::Callsign) => set_string( &mut a.callsign, value),
            Some(TargetField::Position) => {
                if let Some(pos) = parse_position(value) {
                    a.position = Some(pos);
                    a.position_received = true;
                    a.track.append( pos, ctx.max_track);
                    true
                } else {
                    false
                }
            }
            Some(TargetField::CogTrue) => set_f64( &mut a.orientation, value),
            Some(TargetField::Sog) => set_f64( &mut a.sog, value),
            _ => {
                a.properties.insert( path.to_string(), value.clone());
                true
            }
        }
    };

    if accepted {
        a.last_updated = ctx.now;
    }
    accepted
}

/* #endregion aircraft */
