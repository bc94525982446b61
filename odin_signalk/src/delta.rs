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

//! the (already deserialized) frames we receive from a SignalK server stream

use serde::{Serialize,Deserialize,Deserializer,de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::errors::Result;

/// a single value update of a delta frame. `path` is empty for composite values (name, mmsi etc.)
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl PathValue {
    pub fn new (path: impl ToString, value: Value)->Self {
        PathValue { path: path.to_string(), value }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct Update {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with="skip_malformed")]
    pub values: Vec<PathValue>,
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(deserialize_with="skip_malformed")]
    pub updates: Vec<Update>,
}

/// deserialize array entries one by one, dropping the ones that do not parse (e.g. values without
/// a `value` field). A malformed entry must not invalidate the rest of the frame
fn skip_malformed<'de,D,T> (deserializer: D)->std::result::Result<Vec<T>,D::Error>
    where D: Deserializer<'de>, T: DeserializeOwned
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok( items.unwrap_or_default().into_iter().filter_map(|v| {
        match serde_json::from_value::<T>(v) {
            Ok(item) => Some(item),
            Err(e) => { debug!("ignoring malformed entry: {e}"); None }
        }
    }).collect())
}

/// the frame types we distinguish
#[derive(Debug,Clone)]
pub enum SkMessage {
    Hello(Value),
    Delta(Delta),
    Response(Value),
    Unknown(Value),
}

impl SkMessage {
    pub fn classify (v: Value)->SkMessage {
        if v.get("self").is_some() && v.get("version").is_some() {
            SkMessage::Hello(v)

        } else if v.get("updates").is_some() {
            match serde_json::from_value::<Delta>( v.clone()) {
                Ok(delta) => SkMessage::Delta(delta),
                Err(e) => {
                    debug!("malformed delta frame: {e}");
                    SkMessage::Unknown(v)
                }
            }

        } else if v.get("requestId").is_some() {
            SkMessage::Response(v)

        } else {
            SkMessage::Unknown(v)
        }
    }

    pub fn parse (text: &str)->Result<SkMessage> {
        let v: Value = serde_json::from_str(text)?;
        Ok( Self::classify(v))
    }
}

/// the self context announced by a hello frame (e.g. "vessels.urn:mrn:imo:mmsi:123456789")
pub fn hello_self_context (hello: &Value)->Option<String> {
    hello.get("self").and_then(|s| s.as_str()).map(|s| s.to_string())
}
