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

//! typed notifications extracted from self vessel `notifications.*` paths. These are reported
//! immediately and do not go through the snapshot cycle

use std::str::FromStr;
use serde::{Serialize,Deserialize};
use serde_json::Value;
use strum::{EnumString,IntoStaticStr};

use crate::delta::PathValue;

pub const NOTIFICATIONS_PREFIX: &str = "notifications.";

#[derive(Debug,Clone,Copy,PartialEq,Eq,EnumString,IntoStaticStr)]
#[strum(serialize_all="lowercase")]
pub enum StandardAlarm {
    Mob,
    Sinking,
    Fire,
    Piracy,
    Flooding,
    Collision,
    Grounding,
    Listing,
    Adrift,
    Abandon,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Notification {
    #[serde(rename="type")]
    pub kind: String,
    pub path: String,
    pub value: Value,
    pub context: Option<String>,
}

const DEPTH_PATHS: [&str;3] = [
    "notifications.environment.depth.belowTransducer",
    "notifications.environment.depth.belowSurface",
    "notifications.environment.depth.belowKeel",
];
const ANCHOR_PATH: &str = "notifications.navigation.anchor";
const CLOSEST_APPROACH_PATH: &str = "notifications.navigation.closestApproach";
const BUDDY_PATH: &str = "notifications.buddy";
const ARRIVAL_CIRCLE_PATH: &str = "notifications.arrivalCircleEntered";

/// map a self vessel path/value to a notification. Later rules take precedence, i.e. a
/// `notifications.navigation.closestApproach.<ctx>` path is always reported as `closestApproach`
pub fn extract_notification (pv: &PathValue)->Option<Notification> {
    let path = pv.path.as_str();
    if !path.starts_with(NOTIFICATIONS_PREFIX) { return None }

    let seg: Vec<&str> = path.split('.').collect();
    let mut kind: Option<&str> = None;
    let mut context: Option<String> = None;

    if DEPTH_PATHS.contains(&path) || path == ANCHOR_PATH {
        kind = Some(seg[2]);
    }

    if let Some(last) = seg.last().copied() {
        if StandardAlarm::from_str(last).is_ok() {
            kind = Some(last);
        }
    }

    if is_path_or_child( path, CLOSEST_APPROACH_PATH) {
        kind = Some(seg[2]);
        context = remainder(&seg, 3);
    }

    if is_path_or_child( path, BUDDY_PATH) || is_path_or_child( path, ARRIVAL_CIRCLE_PATH) {
        kind = Some(seg[1]);
        context = remainder(&seg, 2);
    }

    kind.map(|k| Notification {
        kind: k.to_string(),
        path: pv.path.clone(),
        value: pv.value.clone(),
        context,
    })
}

/// `path` is `base` or one of its sub-paths (`base.<ctx>`), not just any path with the same prefix
fn is_path_or_child (path: &str, base: &str)->bool {
    match path.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false
    }
}

/// the (dotted) context that follows the notification type
fn remainder (seg: &[&str], idx: usize)->Option<String> {
    if seg.len() > idx { Some( seg[idx..].join(".")) } else { None }
}
