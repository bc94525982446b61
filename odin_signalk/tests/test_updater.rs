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
#![allow(unused)]


use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use odin_signalk::{
    config::PreferredPaths,
    delta::PathValue,
    model::{Aircraft, TargetType, TrackedEntity, TypedTarget, Vessel},
    updater::{UpdateContext, update_aircraft, update_typed_target, update_vessel},
};

const AIS_ID: &str = "vessels.urn:mrn:imo:mmsi:366982330";

fn t0 ()->DateTime<Utc> { "2025-06-01T12:00:00Z".parse().unwrap() }

fn pv (path: &str, value: Value)->PathValue { PathValue::new( path, value) }

fn pos (lon: f64, lat: f64)->Value { json!({"longitude": lon, "latitude": lat}) }

fn ctx<'a> (preferred: &'a PreferredPaths, now: DateTime<Utc>)->UpdateContext<'a> {
    UpdateContext { preferred, max_track: 20, now }
}

#[test]
fn test_vessel_position_and_track () {
    println!("--- testing vessel position and track");
    let pref = PreferredPaths::default();
    let mut v = Vessel::new( AIS_ID, t0());
    assert!( !v.position_received());

    assert!( update_vessel( &mut v, &pv( "navigation.position", pos( -122.4, 37.8)), false, &ctx( &pref, t0())));
    assert!( v.position_received());
    assert_eq!( v.track.last_segment().unwrap().len(), 1);

    // identical position: no new track point, but last_updated is refreshed
    let t1 = t0() + Duration::seconds(10);
    assert!( update_vessel( &mut v, &pv( "navigation.position", pos( -122.4, 37.8)), false, &ctx( &pref, t1)));
    assert_eq!( v.track.last_segment().unwrap().len(), 1);
    assert_eq!( v.last_updated(), t1);

    // one coordinate differs
    update_vessel( &mut v, &pv( "navigation.position", pos( -122.4, 37.9)), false, &ctx( &pref, t1));
    assert_eq!( v.track.last_segment().unwrap().len(), 2);

    // null does not remove a known position
    assert!( !update_vessel( &mut v, &pv( "navigation.position", Value::Null), false, &ctx( &pref, t1)));
    assert!( v.position.is_some());
}

#[test]
fn test_track_bounds () {
    println!("--- testing track bounds");
    let pref = PreferredPaths::default();
    let mut v = Vessel::new( AIS_ID, t0());

    for i in 0..25 {
        update_vessel( &mut v, &pv( "navigation.position", pos( -122.0 + i as f64 * 0.01, 37.0 + i as f64 * 0.01)), false, &ctx( &pref, t0()));
    }
    let seg = v.track.last_segment().unwrap();
    println!("track: {:?}", seg);
    assert_eq!( v.track.segments().len(), 1);
    assert_eq!( seg.len(), 20);
    assert!( (seg[0].lon() - (-122.0 + 5.0 * 0.01)).abs() < 1e-9); // oldest 5 points dropped
}

#[test]
fn test_self_has_no_track () {
    println!("--- testing self vessel track");
    let pref = PreferredPaths::default();
    let mut v = Vessel::new( "vessels.self", t0());

    update_vessel( &mut v, &pv( "navigation.position", pos( 10.0, 50.0)), true, &ctx( &pref, t0()));
    update_vessel( &mut v, &pv( "navigation.position", pos( 10.1, 50.1)), true, &ctx( &pref, t0()));
    assert!( v.position_received());
    assert!( v.track.is_empty());
}

#[test]
fn test_vessel_fields () {
    println!("--- testing vessel field mapping");
    let pref = PreferredPaths::default();
    let t1 = t0() + Duration::seconds(1);
    let mut v = Vessel::new( AIS_ID, t0());

    assert!( update_vessel( &mut v, &pv( "", json!({"name": "Wanderer", "mmsi": 366982330})), false, &ctx( &pref, t0())));
    assert_eq!( v.name.as_deref(), Some("Wanderer"));
    assert_eq!( v.mmsi.as_deref(), Some("366982330"));

    assert!( update_vessel( &mut v, &pv( "navigation.speedOverGround", json!(3.2)), false, &ctx( &pref, t0())));
    assert_eq!( v.sog, Some(3.2));

    // wrong type is ignored and does not count as update
    assert!( !update_vessel( &mut v, &pv( "navigation.speedOverGround", json!("fast")), false, &ctx( &pref, t1)));
    assert_eq!( v.sog, Some(3.2));
    assert_eq!( v.last_updated(), t0());

    // null clears
    assert!( update_vessel( &mut v, &pv( "navigation.speedOverGround", Value::Null), false, &ctx( &pref, t1)));
    assert_eq!( v.sog, None);
    assert_eq!( v.last_updated(), t1);

    // unknown paths are not an update
    let t2 = t1 + Duration::seconds(1);
    assert!( !update_vessel( &mut v, &pv( "propulsion.main.revolutions", json!(20)), false, &ctx( &pref, t2)));
    assert_eq!( v.last_updated(), t1);

    update_vessel( &mut v, &pv( "communication.callsignVhf", json!("WDF1234")), false, &ctx( &pref, t2));
    update_vessel( &mut v, &pv( "navigation.state", json!("motoring")), false, &ctx( &pref, t2));
    update_vessel( &mut v, &pv( "steering.autopilot.state", json!("auto")), false, &ctx( &pref, t2));
    update_vessel( &mut v, &pv( "navigation.anchor.position", pos( 10.0, 50.0)), false, &ctx( &pref, t2));
    update_vessel( &mut v, &pv( "navigation.anchor.maxRadius", json!(45.0)), false, &ctx( &pref, t2));
    println!("{v}");
    assert_eq!( v.callsign.as_deref(), Some("WDF1234"));
    assert_eq!( v.state.as_deref(), Some("motoring"));
    assert_eq!( v.autopilot.state.as_deref(), Some("auto"));
    assert_eq!( v.anchor.position.unwrap().lat(), 50.0);
    assert_eq!( v.anchor.max_radius, Some(45.0));
}

#[test]
fn test_course_and_resources () {
    println!("--- testing course, closest approach and resource paths");
    let pref = PreferredPaths::default();
    let mut v = Vessel::new( "vessels.self", t0());

    assert!( update_vessel( &mut v, &pv( "navigation.courseRhumbline.nextPoint.bearingTrue", json!(1.2)), true, &ctx( &pref, t0())));
    assert!( update_vessel( &mut v, &pv( "navigation.courseGreatCircle.crossTrackError", json!(15.0)), true, &ctx( &pref, t0())));
    println!("course: {:?}", v.course);
    assert_eq!( v.course.get("nextPoint.bearingTrue"), Some(&json!(1.2)));
    assert_eq!( v.course.get("crossTrackError"), Some(&json!(15.0)));

    assert!( update_vessel( &mut v, &pv( "navigation.closestApproach", json!({"distance": 500, "timeTo": 60})), true, &ctx( &pref, t0())));
    assert!( v.closest_approach.is_some());

    assert!( update_vessel( &mut v, &pv( "resources.routes.abc", json!({"name": "home"})), true, &ctx( &pref, t0())));
    assert_eq!( v.resource_updates.len(), 1);
    assert_eq!( v.resource_updates[0].path, "resources.routes.abc");
}

#[test]
fn test_heading_resolution () {
    println!("--- testing heading resolution");
    let pref = PreferredPaths::default();
    let mut v = Vessel::new( "vessels.self", t0());

    update_vessel( &mut v, &pv( "navigation.courseOverGroundTrue", json!(0.3)), true, &ctx( &pref, t0()));
    assert_eq!( v.heading, Some(0.3)); // falls back to cog

    update_vessel( &mut v, &pv( "navigation.headingMagnetic", json!(0.5)), true, &ctx( &pref, t0()));
    assert_eq!( v.heading, Some(0.5));

    update_vessel( &mut v, &pv( "navigation.headingTrue", json!(0.6)), true, &ctx( &pref, t0()));
    assert_eq!( v.heading, Some(0.6)); // true before magnetic
}

#[test]
fn test_preferred_paths () {
    println!("--- testing preferred source paths");
    let pref = PreferredPaths {
        heading: Some("navigation.headingMagnetic".to_string()),
        tws: Some("environment.wind.speedOverGround".to_string()),
        twd: Some("environment.wind.angleTrueGround".to_string()),
    };
    let mut v = Vessel::new( "vessels.self", t0());

    update_vessel( &mut v, &pv( "navigation.headingTrue", json!(1.0)), true, &ctx( &pref, t0()));
    assert_eq!( v.heading_true, Some(1.0));
    assert_eq!( v.heading, None);

    update_vessel( &mut v, &pv( "navigation.headingMagnetic", json!(2.0)), true, &ctx( &pref, t0()));
    assert_eq!( v.heading, Some(2.0));

    update_vessel( &mut v, &pv( "environment.wind.speedTrue", json!(5.0)), true, &ctx( &pref, t0()));
    update_vessel( &mut v, &pv( "environment.wind.speedOverGround", json!(6.0)), true, &ctx( &pref, t0()));
    assert_eq!( v.wind.speed_true, Some(5.0));
    assert_eq!( v.wind.sog, Some(6.0));
    assert_eq!( v.wind.tws, Some(6.0));

    update_vessel( &mut v, &pv( "environment.wind.angleTrueGround", json!(0.5)), true, &ctx( &pref, t0()));
    println!("wind: {:?}", v.wind);
    assert_eq!( v.wind.angle_true_ground, Some(0.5));
    assert!( (v.wind.direction.unwrap() - 2.5).abs() < 1e-9);
}

#[test]
fn test_typed_targets () {
    println!("--- testing AtoN and SaR targets");
    let bs_id = "atons.shore.basestations.urn:mrn:imo:mmsi:003669702";
    let mut bs = TypedTarget::aton( bs_id, t0());
    assert_eq!( bs.target_type, TargetType::basestation());

    let mut aton = TypedTarget::aton( "atons.urn:mrn:imo:mmsi:993692028", t0());
    assert!( update_typed_target( &mut aton, &pv( "", json!({"name": "SF Approach", "atonType": {"id": 14, "name": "Beacon, Starboard Hand"}})), t0()));
    assert_eq!( aton.name.as_deref(), Some("SF Approach"));
    assert_eq!( aton.target_type.id, 14);

    assert!( update_typed_target( &mut aton, &pv( "navigation.position", pos( -122.6, 37.7)), t0()));
    assert!( aton.position_received());

    assert!( update_typed_target( &mut aton, &pv( "virtual", json!(true)), t0()));
    assert_eq!( aton.properties.get("virtual"), Some(&json!(true)));

    let mut sar = TypedTarget::sar( "sar.urn:mrn:imo:mmsi:972000001", t0());
    assert_eq!( sar.target_type, TargetType::sar_beacon());
    assert!( update_typed_target( &mut sar, &pv( "communication.callsignVhf", json!("SART1")), t0()));
    assert_eq!( sar.callsign.as_deref(), Some("SART1"));
}

#[test]
fn test_aircraft () {
    println!("--- testing aircraft");
    let pref = PreferredPaths::default();
    let mut a = Aircraft::new( "aircraft.urn:mrn:imo:mmsi:111366981", t0());

    update_aircraft( &mut a, &pv( "navigation.position", pos( -122.0, 37.0)), &ctx( &pref, t0()));
    update_aircraft( &mut a, &pv( "navigation.position", pos( -122.1, 37.1)), &ctx( &pref, t0()));
    update_aircraft( &mut a, &pv( "navigation.courseOverGroundTrue", json!(1.1)), &ctx( &pref, t0()));
    update_aircraft( &mut a, &pv( "navigation.speedOverGround", json!(60.0)), &ctx( &pref, t0()));
    update_aircraft( &mut a, &pv( "navigation.altitude", json!(300)), &ctx( &pref, t0()));

    assert_eq!( a.track.last_segment().unwrap().len(), 2);
    assert_eq!( a.orientation, Some(1.1));
    assert_eq!( a.sog, Some(60.0));
    assert_eq!( a.properties.get("navigation.altitude"), Some(&json!(300)));
}
