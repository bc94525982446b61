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

//! geometric support for SignalK positions and the region of interest around the self vessel.
//! Note that SignalK angles are in radians and distances in meters

use std::{f64::consts::PI, fmt};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use geo::{Destination, Haversine, Point};

pub const TWO_PI: f64 = 2.0 * PI;

/// the (haversine) mean earth radius in meters
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

#[inline]
pub fn normalize_90 (d: f64)->f64 {
    let x = d % 360.0;
    if x < -90.0 { -180.0 - x }
    else if x > 90.0 { 180.0 - x }
    else { x }
}

#[inline]
pub fn normalize_180 (d: f64)->f64 {
    let x = d % 360.0;
    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

#[inline]
pub fn normalize_two_pi (rad: f64)->f64 {
    let x = rad % TWO_PI;
    if x < 0.0 { TWO_PI + x } else { x }
}

/// convert a wind angle relative to the bow into a direction, using the given heading as reference
#[inline]
pub fn angle_to_direction (angle: f64, heading: f64)->f64 {
    normalize_two_pi( heading + angle)
}

/// a geodetic position in `[longitude, latitude]` order (degrees), which is how we report positions
/// to the host regardless of the order in which they were received
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Position([f64;2]);

impl Position {
    /// this is the only ctor - all positions are normalized
    pub fn from_lon_lat (lon: f64, lat: f64)->Self {
        Position([ normalize_180(lon), normalize_90(lat) ])
    }

    /// parse a SignalK `{"longitude": .., "latitude": ..}` value. Returns `None` if either field is missing
    pub fn from_value (v: &Value)->Option<Self> {
        let lon = v.get("longitude")?.as_f64()?;
        let lat = v.get("latitude")?.as_f64()?;
        Some( Position::from_lon_lat( lon, lat))
    }

    #[inline] pub fn lon (&self)->f64 { self.0[0] }
    #[inline] pub fn lat (&self)->f64 { self.0[1] }

    pub fn as_point (&self)->Point { Point::new( self.lon(), self.lat()) }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lon(), self.lat())
    }
}

/// the region of interest (west,south,east,north in degrees). If the region crosses the antimeridian
/// `west` is greater than `east`
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Extent {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Extent {
    /// compute the bounding box of a circle with `radius` meters around `center`.
    /// If the circle reaches a pole the box extends to that pole and covers all longitudes
    pub fn around (center: &Position, radius: f64)->Self {
        let radius_deg = (radius / MEAN_EARTH_RADIUS).to_degrees();
        if center.lat() + radius_deg >= 90.0 {
            return Extent { west: -180.0, south: (center.lat() - radius_deg).max(-90.0), east: 180.0, north: 90.0 }
        }
        if center.lat() - radius_deg <= -90.0 {
            return Extent { west: -180.0, south: -90.0, east: 180.0, north: (center.lat() + radius_deg).min(90.0) }
        }

        let p = center.as_point();
        let north = Haversine.destination( p, 0.0, radius);
        let east = Haversine.destination( p, 90.0, radius);
        let south = Haversine.destination( p, 180.0, radius);
        let west = Haversine.destination( p, 270.0, radius);

        Extent {
            west: normalize_180( west.x()),
            south: south.y().max(-90.0),
            east: normalize_180( east.x()),
            north: north.y().min(90.0),
        }
    }

    #[inline]
    pub fn crosses_antimeridian (&self)->bool { self.west > self.east }

    pub fn contains (&self, p: &Position)->bool {
        let lat_ok = p.lat() >= self.south && p.lat() <= self.north;
        let lon_ok = if self.crosses_antimeridian() {
            p.lon() >= self.west || p.lon() <= self.east
        } else {
            p.lon() >= self.west && p.lon() <= self.east
        };
        lat_ok && lon_ok
    }
}
