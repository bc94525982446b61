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

//! upload of (already parsed) routes, waypoints and tracks to the resources API of a SignalK server

use std::collections::BTreeMap;
use futures::stream::{FuturesUnordered, StreamExt};
use geo::{Distance, Haversine, Point};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize,Deserialize};
use serde_json::{Map, Value, json};
use strum::IntoStaticStr;
use tracing::{debug, info, warn};
use url::Url;

use crate::{errors::{Result, op_failed}, messages::new_uuid};

pub const RESOURCE_ID_PREFIX: &str = "urn:mrn:signalk:uuid:";

#[derive(Debug,Clone,Copy,PartialEq,Eq,IntoStaticStr)]
#[strum(serialize_all="lowercase")]
pub enum ResourceKind {
    Routes,
    Waypoints,
    Tracks,
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
pub struct RoutePoint {
    pub lon: f64,
    pub lat: f64,
    pub name: Option<String>,
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct RouteInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points: Vec<RoutePoint>,
    pub properties: BTreeMap<String,Value>, // cmt, src, number, type ..
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct WaypointInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub altitude: Option<f64>,
    pub properties: BTreeMap<String,Value>, // cmt, sym, type, fix ..
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct TrackInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub segments: Vec<Vec<[f64;2]>>, // [lon,lat] points
    pub properties: BTreeMap<String,Value>,
}

/// the items selected for upload
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct UploadSelection {
    pub routes: Vec<RouteInput>,
    pub waypoints: Vec<WaypointInput>,
    pub tracks: Vec<TrackInput>,
}

impl UploadSelection {
    pub fn len (&self)->usize { self.routes.len() + self.waypoints.len() + self.tracks.len() }
    pub fn is_empty (&self)->bool { self.len() == 0 }
}

/// the outcome of an upload, available once all submissions have been resolved
#[derive(Debug,Clone,Default,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct UploadReport {
    pub submitted: usize,
    pub errors: usize,
    pub routes: Vec<String>,    // ids of successfully uploaded routes
    pub waypoints: Vec<String>,
    pub tracks: Vec<String>,    // server assigned, if reported
}

impl UploadReport {
    pub fn is_ok (&self)->bool { self.errors == 0 }
}

/* #region payloads ********************************************************************************/

fn new_resource_id ()->String {
    format!("{RESOURCE_ID_PREFIX}{}", new_uuid())
}

fn item_name (name: &Option<String>, prefix: &str, idx: usize)->String {
    match name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("{prefix}: {idx}")
    }
}

fn properties_map (props: &BTreeMap<String,Value>)->Map<String,Value> {
    props.iter().map(|(k,v)| (k.clone(), v.clone())).collect()
}

/// total length of a route in meters
pub fn route_distance (points: &[RoutePoint])->f64 {
    points.windows(2).map(|w| {
        Haversine.distance( Point::new( w[0].lon, w[0].lat), Point::new( w[1].lon, w[1].lat))
    }).sum()
}

/// the SignalK v1 route resource. `idx` is the 1-based position of the route in its source
pub fn build_route (idx: usize, route: &RouteInput)->(String,Value) {
    let coords: Vec<[f64;2]> = route.points.iter().map(|p| [p.lon, p.lat]).collect();

    let mut props = properties_map( &route.properties);
    let wpt_names: Vec<Value> = route.points.iter().map(|p| p.name.clone().map_or( Value::Null, Value::String)).collect();
    if route.points.iter().any(|p| p.name.is_some()) {
        props.insert( "wptNames".to_string(), Value::Array(wpt_names));
    }

    let payload = json!({
        "name": item_name( &route.name, "Rte", idx),
        "description": route.description.clone().unwrap_or_default(),
        "distance": route_distance( &route.points),
        "start": null,
        "end": null,
        "feature": {
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": coords },
            "properties": props,
            "id": ""
        }
    });

    (new_resource_id(), payload)
}

pub fn build_waypoint (idx: usize, wpt: &WaypointInput)->(String,Value) {
    let mut props = properties_map( &wpt.properties);
    props.insert( "name".to_string(), Value::String( item_name( &wpt.name, "Wpt", idx)));
    if let Some(desc) = wpt.description.as_ref().filter(|d| !d.is_empty()) {
        props.insert( "description".to_string(), Value::String( desc.clone()));
    }

    let mut position = json!({ "latitude": wpt.lat, "longitude": wpt.lon });
    let mut coords = vec![ wpt.lon, wpt.lat ];
    if let Some(alt) = wpt.altitude {
        position["altitude"] = json!(alt);
        coords.push(alt);
    }

    let payload = json!({
        "position": position,
        "feature": {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": coords },
            "properties": props,
            "id": ""
        }
    });

    (new_resource_id(), payload)
}

/// the track resource. Tracks are POSTed, i.e. the server assigns the id
pub fn build_track (idx: usize, trk: &TrackInput)->Value {
    let mut props = properties_map( &trk.properties);
    props.insert( "name".to_string(), Value::String( item_name( &trk.name, "Trk", idx)));
    if let Some(desc) = trk.description.as_ref().filter(|d| !d.is_empty()) {
        props.insert( "description".to_string(), Value::String( desc.clone()));
    }

    json!({
        "feature": {
            "type": "Feature",
            "geometry": { "type": "MultiLineString", "coordinates": trk.segments },
            "properties": props,
            "id": ""
        }
    })
}

/* #endregion payloads */

/* #region uploader ********************************************************************************/

pub struct ResourceUploader {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ResourceUploader {
    /// `base` is the server root (e.g. "http://localhost:3000")
    pub fn new (base: &str, token: Option<String>)->Result<Self> {
        let base = Url::parse(base)?;
        Ok( ResourceUploader { client: Client::new(), base, token })
    }

    pub fn collection_url (&self, kind: ResourceKind)->Result<Url> {
        let kind: &'static str = kind.into();
        Ok( self.base.join( format!("/signalk/v1/api/resources/{kind}").as_str())?)
    }

    pub fn resource_url (&self, kind: ResourceKind, id: &str)->Result<Url> {
        let kind: &'static str = kind.into();
        Ok( self.base.join( format!("/signalk/v1/api/resources/{kind}/{id}").as_str())?)
    }

    /// PUT a resource with a client generated id
    pub async fn put_resource (&self, kind: ResourceKind, id: &str, payload: &Value)->Result<()> {
        let req = self.authorized( self.client.put( self.resource_url( kind, id)?).json(payload));
        completed_response( req.send().await?).await.map(|_| ())
    }

    /// POST a resource to its collection, returning the id assigned by the server (if reported)
    pub async fn post_resource (&self, kind: ResourceKind, payload: &Value)->Result<Option<String>> {
        let req = self.authorized( self.client.post( self.collection_url(kind)?).json(payload));
        let body = completed_response( req.send().await?).await?;
        Ok( body.get("id").and_then(|id| id.as_str()).map(|id| id.to_string()))
    }

    fn authorized (&self, req: RequestBuilder)->RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req
        }
    }

    /// submit all selected items concurrently and report once every submission is resolved
    pub async fn upload (&self, selection: &UploadSelection)->UploadReport {
        // items without id are POSTed
        let mut items: Vec<(ResourceKind,Option<String>,Value)> = Vec::with_capacity( selection.len());
        for (i,r) in selection.routes.iter().enumerate() {
            let (id, payload) = build_route( i+1, r);
            items.push( (ResourceKind::Routes, Some(id), payload));
        }
        for (i,w) in selection.waypoints.iter().enumerate() {
            let (id, payload) = build_waypoint( i+1, w);
            items.push( (ResourceKind::Waypoints, Some(id), payload));
        }
        for (i,t) in selection.tracks.iter().enumerate() {
            items.push( (ResourceKind::Tracks, None, build_track( i+1, t)));
        }

        let mut report = UploadReport { submitted: items.len(), ..UploadReport::default() };
        let mut pending: FuturesUnordered<_> = items.iter().map(|(kind,id,payload)| async move {
            let res = match id {
                Some(id) => self.put_resource( *kind, id, payload).await.map(|_| Some(id.clone())),
                None => self.post_resource( *kind, payload).await
            };
            (*kind, res)
        }).collect();

        let mut outstanding = report.submitted;
        while let Some((kind, res)) = pending.next().await {
            outstanding -= 1;
            match res {
                Ok(id) => {
                    debug!("uploaded {kind:?} {id:?}");
                    if let Some(id) = id {
                        match kind {
                            ResourceKind::Routes => report.routes.push(id),
                            ResourceKind::Waypoints => report.waypoints.push(id),
                            ResourceKind::Tracks => report.tracks.push(id),
                        }
                    }
                }
                Err(e) => {
                    warn!("upload of {kind:?} failed: {e}");
                    report.errors += 1;
                }
            }
            debug!("{outstanding} uploads outstanding");
        }

        info!("upload complete: {} submitted, {} errors", report.submitted, report.errors);
        report
    }
}

/// a resource request only succeeded if the server responds with a success status and a JSON body
/// that has a "COMPLETED" state
async fn completed_response (response: Response)->Result<Value> {
    let body: Value = response.error_for_status()?.json().await?;
    match body.get("state").and_then(|s| s.as_str()) {
        Some("COMPLETED") => Ok(body),
        Some(state) => Err( op_failed( format!("resource request state {state}"))),
        None => Err( op_failed("resource response without state"))
    }
}

/* #endregion uploader */
