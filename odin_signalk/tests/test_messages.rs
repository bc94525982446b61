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


use std::time::Duration;
use serde_json::{Value, json};
use odin_signalk::{
    SignalKConfig, WorkerCommand, WorkerMessage, WorkerOutput,
    connector::stream_url,
    messages::{AlarmOptions, OpenOptions, SubscribeOptions, alarm_request, new_uuid, subscribe_request},
};

#[test]
fn test_parse_commands () {
    println!("--- testing command parsing");

    let cmd = WorkerCommand::from_json( r#"{
        "command": "open",
        "options": {
            "url": "ws://localhost:3000/signalk/v1/stream",
            "subscribe": "self",
            "token": "secret",
            "interval": 1000,
            "selections": { "aisMaxAge": 600000, "signalk": { "vessels": true, "atons": false, "aircraft": true, "sar": true, "maxRadius": 5000 } }
        }
    }"#).unwrap();
    println!("{cmd:?}");
    match cmd {
        WorkerCommand::Open(opts) => {
            assert_eq!( opts.url.as_deref(), Some("ws://localhost:3000/signalk/v1/stream"));
            assert_eq!( opts.token.as_deref(), Some("secret"));
            assert_eq!( opts.settings.interval, Some(1000));
            assert!( !opts.is_playback());

            let mut config = SignalKConfig::default();
            assert!( opts.settings.apply_to( &mut config));
            assert_eq!( config.update_interval, Duration::from_millis(1000));
            assert_eq!( config.max_age, Duration::from_secs(600));
            assert!( !config.filter.atons);
            assert_eq!( config.filter.radius(), Some(5000.0));
        }
        other => panic!("wrong command {other:?}")
    }

    let cmd = WorkerCommand::from_json( r#"{"command": "alarm", "options": {"raise": true, "type": "fire", "message": "fire in galley"}}"#).unwrap();
    assert!( matches!( cmd, WorkerCommand::Alarm( AlarmOptions { raise: true, .. })));

    let cmd = WorkerCommand::from_json( r#"{"command": "vessel", "options": {"context": "self", "name": "Dawn Treader"}}"#).unwrap();
    assert!( matches!( cmd, WorkerCommand::Vessel(_)));

    assert!( WorkerCommand::from_json( r#"{"command": "launch", "options": {}}"#).is_err());
}

#[test]
fn test_zero_ages_are_ignored () {
    println!("--- testing settings with zero ages");
    let cmd = WorkerCommand::from_json( r#"{"command": "settings", "options": {"selections": {"aisMaxAge": 0, "aisStaleAge": 0}}}"#).unwrap();
    let WorkerCommand::Settings(settings) = cmd else { panic!("not a settings command") };

    let mut config = SignalKConfig::default();
    assert!( !settings.apply_to( &mut config));
    assert_eq!( config.max_age, SignalKConfig::default().max_age);
    assert_eq!( config.stale_age, SignalKConfig::default().stale_age);
}

#[test]
fn test_stream_url () {
    println!("--- testing stream urls");
    let opts = OpenOptions { url: Some("ws://localhost:3000/signalk/v1/stream".to_string()), ..OpenOptions::default() };
    assert_eq!( stream_url(&opts).unwrap().as_str(), "ws://localhost:3000/signalk/v1/stream");

    let opts = OpenOptions { subscribe: Some("none".to_string()), ..opts };
    assert_eq!( stream_url(&opts).unwrap().as_str(), "ws://localhost:3000/signalk/v1/stream?subscribe=none");

    let opts = OpenOptions { url: Some("not a url".to_string()), ..OpenOptions::default() };
    assert!( stream_url(&opts).is_err());
}

#[test]
fn test_alarm_request () {
    println!("--- testing alarm requests");
    let raise = AlarmOptions { raise: true, alarm_type: "notifications.sinking".to_string(), message: None, state: Some("emergency".to_string()) };
    let req = alarm_request(&raise);
    println!("{req}");
    assert_eq!( req["context"], json!("vessels.self"));
    assert_eq!( req["put"]["path"], json!("notifications.sinking"));
    assert_eq!( req["put"]["value"]["state"], json!("emergency"));
    assert_eq!( req["put"]["value"]["method"], json!(["visual","sound"]));
    assert!( req["requestId"].is_string());

    let clear = AlarmOptions { raise: false, alarm_type: "sinking".to_string(), ..AlarmOptions::default() };
    let req = alarm_request(&clear);
    assert_eq!( req["put"]["path"], json!("notifications.sinking"));
    assert_eq!( req["put"]["value"], Value::Null);
}

#[test]
fn test_subscribe_request () {
    println!("--- testing subscribe requests");
    let opts = SubscribeOptions {
        context: "vessels.*".to_string(),
        path: vec![ json!("navigation.position"), json!({"path": "navigation.speedOverGround", "period": 1000}) ],
    };
    let req = subscribe_request(&opts);
    assert_eq!( req, json!({
        "context": "vessels.*",
        "subscribe": [ {"path": "navigation.position"}, {"path": "navigation.speedOverGround", "period": 1000} ]
    }));
}

#[test]
fn test_uuid () {
    let id = new_uuid();
    let parts: Vec<usize> = id.split('-').map(|p| p.len()).collect();
    assert_eq!( parts, vec![8,4,4,4,12]);
    assert_ne!( id, new_uuid());

    for _ in 0..50 { // random (v4) ids have fixed version and variant digits
        let c: Vec<char> = new_uuid().chars().collect();
        assert_eq!( c[14], '4');
        assert!( "89ab".contains(c[19]));
    }
}

#[test]
fn test_output_json () {
    println!("--- testing worker output serialization");
    let msg = WorkerMessage::new( WorkerOutput::Close(true), false);
    let v: Value = serde_json::from_str( &msg.to_json().unwrap()).unwrap();
    assert_eq!( v, json!({"action": "close", "result": true, "playback": false}));

    let msg = WorkerMessage::new( WorkerOutput::Error("connection error".to_string()), true);
    let v: Value = serde_json::from_str( &msg.to_json().unwrap()).unwrap();
    assert_eq!( v, json!({"action": "error", "result": "connection error", "playback": true}));
    assert_eq!( msg.action(), "error");
}
