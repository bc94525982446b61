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
use odin_signalk::{load_config, SignalKConfig};

#[test]
fn test_load_config () {
    println!("--- testing RON config");
    let config = load_config( "configs/signalk.ron").unwrap();
    println!("{config:?}");

    assert_eq!( config.update_interval, Duration::from_millis(500));
    assert_eq!( config.max_age, Duration::from_secs(9 * 60));
    assert_eq!( config.stale_age, Duration::from_secs(6 * 60));
    assert_eq!( config.max_track, 20);
    assert!( config.filter.vessels && config.filter.atons && config.filter.aircraft && config.filter.sar);
    assert_eq!( config.filter.radius(), None);
    assert!( config.preferred_paths.is_heading("navigation.headingTrue"));
    assert!( !config.preferred_paths.is_heading("navigation.headingMagnetic"));
}

#[test]
fn test_missing_config () {
    assert!( load_config( "configs/no_such_file.ron").is_err());

    let config = SignalKConfig::default();
    assert!( config.max_age > config.stale_age);
    assert_eq!( config.channel_bounds, 64);
}
