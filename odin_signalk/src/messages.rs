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

//! the host protocol of the worker.
//!
//! Commands are JSON objects such as
//! ```json
//! {"command": "open", "options": {"url": "ws://localhost:3000/signalk/v1/stream", "subscribe": "all", "interval": 500}}
//! {"command": "close", "options": {"terminate": true}}
//! {"command": "alarm", "options": {"raise": true, "type": "mob", "message": "man overboard", "state": "emergency"}}
//! ```
//! Outputs are serialized as `{"action": .., "playback": .., "result": ..}`

use std::{collections::BTreeMap, time::Duration};
use serde::{Serialize,Deserialize};
use serde_json::{Value,json};
use uuid::Uuid;

use crate::{
    config::{PreferredPaths, SignalKConfig, TargetFilter},
    errors::{Result, command_error},
    model::{Aircraft, TypedTarget, Vessel},
    notification::{Notification, NOTIFICATIONS_PREFIX},
    registry::{Registry, TargetStatus},
};

pub const SELF_CONTEXT: &str = "vessels.self";

/* #region commands ********************************************************************************/

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(tag="command", content="options", rename_all="lowercase")]
pub enum WorkerCommand {
    Open(OpenOptions),
    Close(CloseOptions),
    Subscribe(SubscribeOptions),
    Settings(Settings),
    Alarm(AlarmOptions),
    Vessel(VesselOptions),
}

impl WorkerCommand {
    pub fn from_json (s: &str)->Result<Self> {
        serde_json::from_str(s).map_err(command_error)
    }
}

/// options of an `open` command. Settings can be passed along and are applied before the connection is opened
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default, rename_all="camelCase")]
pub struct OpenOptions {
    pub url: Option<String>,
    pub subscribe: Option<String>,
    pub token: Option<String>,
    pub playback_options: Option<PlaybackOptions>,
    #[serde(flatten)]
    pub settings: Settings,
}

impl OpenOptions {
    pub fn is_playback (&self)->bool { self.settings.playback.unwrap_or(false) }
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default, rename_all="camelCase")]
pub struct PlaybackOptions {
    pub start_time: Option<String>,
    pub playback_rate: Option<f64>,
    pub subscribe: Option<String>,
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct CloseOptions {
    pub terminate: bool,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct SubscribeOptions {
    pub context: String,
    pub path: Vec<Value>, // either plain path strings or SignalK subscription objects
}

/// runtime settings. Ages and the interval are in milliseconds
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default, rename_all="camelCase")]
pub struct Settings {
    pub interval: Option<u64>,
    pub playback: Option<bool>,
    pub selections: Option<Selections>,
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default, rename_all="camelCase")]
pub struct Selections {
    pub preferred_paths: Option<PreferredPaths>,
    pub ais_max_age: Option<u64>,
    pub ais_stale_age: Option<u64>,
    pub signalk: Option<TargetFilter>,
}

impl Settings {
    /// apply to config, returning true if the update interval was set
    pub fn apply_to (&self, config: &mut SignalKConfig)->bool {
        if let Some(sel) = &self.selections {
            if let Some(preferred) = &sel.preferred_paths { config.preferred_paths = preferred.clone() }
            if let Some(ms) = sel.ais_max_age.filter(|ms| *ms > 0) { config.max_age = Duration::from_millis(ms) }
            if let Some(ms) = sel.ais_stale_age.filter(|ms| *ms > 0) { config.stale_age = Duration::from_millis(ms) }
            if let Some(filter) = &sel.signalk { config.filter = filter.clone() }
            config.check();
        }

        if let Some(ms) = self.interval {
            config.update_interval = Duration::from_millis(ms);
            true
        } else {
            false
        }
    }
}

#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct AlarmOptions {
    pub raise: bool,
    #[serde(rename="type")]
    pub alarm_type: String,
    pub message: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct VesselOptions {
    pub context: String,
    pub name: Option<String>,
}

/* #endregion commands */

/* #region outputs *********************************************************************************/

#[derive(Debug,Clone,Serialize)]
#[serde(tag="action", content="result", rename_all="lowercase")]
pub enum WorkerOutput {
    Open(u16),            // ready state of the connection
    Close(bool),          // true if closed by command
    Error(String),
    Hello(Value),
    Notification(Notification),
    Update(Box<Snapshot>),
    Response(Value),
}

#[derive(Debug,Clone,Serialize)]
pub struct WorkerMessage {
    #[serde(flatten)]
    pub output: WorkerOutput,
    pub playback: bool,
}

impl WorkerMessage {
    pub fn new (output: WorkerOutput, playback: bool)->Self { WorkerMessage { output, playback } }

    pub fn action (&self)->&'static str {
        match self.output {
            WorkerOutput::Open(_) => "open",
            WorkerOutput::Close(_) => "close",
            WorkerOutput::Error(_) => "error",
            WorkerOutput::Hello(_) => "hello",
            WorkerOutput::Notification(_) => "notification",
            WorkerOutput::Update(_) => "update",
            WorkerOutput::Response(_) => "response",
        }
    }

    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string(self)?)
    }
}

/// the consolidated state we send to the host once per output cycle
#[derive(Debug,Clone,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Snapshot {
    #[serde(rename="self")]
    pub self_vessel: Vessel,
    pub ais_targets: Registry<Vessel>,
    pub ais_status: TargetStatus,
    pub paths: BTreeMap<String,Value>,
    pub atons: Registry<TypedTarget>,
    pub aircraft: Registry<Aircraft>,
    pub sar: Registry<TypedTarget>,
    pub timestamp: String,
}

/* #endregion outputs */

/* #region outgoing SignalK requests ***************************************************************/

/// random (v4) UUID as used for request and resource ids
pub fn new_uuid ()->String {
    Uuid::new_v4().to_string()
}

/// the subscription request for `context`. Plain path strings are wrapped into `{"path": ..}` objects
pub fn subscribe_request (opts: &SubscribeOptions)->Value {
    let subscribe: Vec<Value> = opts.path.iter().map(|p| match p {
        Value::String(_) => json!({ "path": p }),
        _ => p.clone()
    }).collect();

    json!({
        "context": opts.context,
        "subscribe": subscribe
    })
}

/// a PUT request that raises or clears a self vessel notification
pub fn alarm_request (opts: &AlarmOptions)->Value {
    let path = if opts.alarm_type.starts_with(NOTIFICATIONS_PREFIX) {
        opts.alarm_type.clone()
    } else {
        format!("{NOTIFICATIONS_PREFIX}{}", opts.alarm_type)
    };

    let value = if opts.raise {
        json!({
            "message": opts.message.as_deref().unwrap_or(""),
            "state": opts.state.as_deref().unwrap_or("alarm"),
            "method": ["visual", "sound"]
        })
    } else {
        Value::Null
    };

    json!({
        "context": SELF_CONTEXT,
        "requestId": new_uuid(),
        "put": { "path": path, "value": value }
    })
}

/* #endregion outgoing SignalK requests */
