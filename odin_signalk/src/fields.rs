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

//! path tables that map SignalK data paths to the entity fields they update

use std::collections::HashMap;
use lazy_static::lazy_static;

pub const NAVIGATION_POSITION: &str = "navigation.position";
pub const CALLSIGN_VHF: &str = "communication.callsignVhf";
pub const ATON_TYPE: &str = "atonType";

pub const WIND_ANGLE_TRUE_GROUND: &str = "environment.wind.angleTrueGround";
pub const WIND_ANGLE_TRUE_WATER: &str = "environment.wind.angleTrueWater";

pub const COURSE_RHUMBLINE: &str = "navigation.courseRhumbline";
pub const COURSE_GREAT_CIRCLE: &str = "navigation.courseGreatCircle";
pub const CLOSEST_APPROACH: &str = "navigation.closestApproach";
pub const RESOURCES_PREFIX: &str = "resources.";

/// self vessel paths for which we cache the raw value so that the host can choose preferred sources
pub const PREF_SOURCE_PATHS: [&str;10] = [
    "environment.wind.speedTrue",
    "environment.wind.speedOverGround",
    "environment.wind.angleTrueGround",
    "environment.wind.angleTrueWater",
    "environment.wind.directionTrue",
    "environment.wind.directionMagnetic",
    "navigation.courseOverGroundTrue",
    "navigation.courseOverGroundMagnetic",
    "navigation.headingTrue",
    "navigation.headingMagnetic",
];

pub fn is_pref_source_path (path: &str)->bool {
    PREF_SOURCE_PATHS.contains(&path)
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum VesselField {
    Callsign,
    Position,
    State,
    Sog,
    CogTrue,
    CogMagnetic,
    HeadingTrue,
    HeadingMagnetic,
    WindAngleApparent,
    WindSpeedApparent,
    WindSpeedTrue,
    WindSpeedOverGround,
    WindAngleTrueGround,
    WindAngleTrueWater,
    WindDirectionTrue,
    WindDirectionMagnetic,
    EnvironmentMode,
    AnchorPosition,
    AnchorMaxRadius,
    AnchorCurrentRadius,
    AutopilotState,
    AutopilotMode,
}

/// fields of AtoN, SaR and aircraft targets. Everything else goes into the property bag
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TargetField {
    Callsign,
    Position,
    AtonType,
    CogTrue,
    Sog,
}

lazy_static! {
    pub static ref VESSEL_FIELDS: HashMap<&'static str, VesselField> = HashMap::from( [
        (CALLSIGN_VHF, VesselField::Callsign),
        (NAVIGATION_POSITION, VesselField::Position),
        ("navigation.state", VesselField::State),
        ("navigation.speedOverGround", VesselField::Sog),
        ("navigation.courseOverGroundTrue", VesselField::CogTrue),
        ("navigation.courseOverGroundMagnetic", VesselField::CogMagnetic),
        ("navigation.headingTrue", VesselField::HeadingTrue),
        ("navigation.headingMagnetic", VesselField::HeadingMagnetic),
        ("environment.wind.angleApparent", VesselField::WindAngleApparent),
        ("environment.wind.speedApparent", VesselField::WindSpeedApparent),
        ("environment.wind.speedTrue", VesselField::WindSpeedTrue),
        ("environment.wind.speedOverGround", VesselField::WindSpeedOverGround),
        (WIND_ANGLE_TRUE_GROUND, VesselField::WindAngleTrueGround),
        (WIND_ANGLE_TRUE_WATER, VesselField::WindAngleTrueWater),
        ("environment.wind.directionTrue", VesselField::WindDirectionTrue),
        ("environment.wind.directionMagnetic", VesselField::WindDirectionMagnetic),
        ("environment.mode", VesselField::EnvironmentMode),
        ("navigation.anchor.position", VesselField::AnchorPosition),
        ("navigation.anchor.maxRadius", VesselField::AnchorMaxRadius),
        ("navigation.anchor.currentRadius", VesselField::AnchorCurrentRadius),
        ("steering.autopilot.state", VesselField::AutopilotState),
        ("steering.autopilot.mode", VesselField::AutopilotMode),
    ]);

    pub static ref TARGET_FIELDS: HashMap<&'static str, TargetField> = HashMap::from( [
        (CALLSIGN_VHF, TargetField::Callsign),
        (NAVIGATION_POSITION, TargetField::Position),
        (ATON_TYPE, TargetField::AtonType),
        ("navigation.courseOverGroundTrue", TargetField::CogTrue),
        ("navigation.speedOverGround", TargetField::Sog),
    ]);
}

/// the course map key is the path without its first two segments
/// (e.g. "navigation.courseRhumbline.nextPoint.bearingTrue" -> "nextPoint.bearingTrue")
pub fn course_key (path: &str)->Option<&str> {
    let mut it = path.splitn(3, '.');
    it.next()?;
    it.next()?;
    it.next()
}

pub fn is_course_path (path: &str)->bool {
    path.starts_with(COURSE_RHUMBLINE) || path.starts_with(COURSE_GREAT_CIRCLE)
}
