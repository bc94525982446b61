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

//! odin_signalk is a background aggregator for SignalK delta streams. It keeps the state of the
//! self vessel and of nearby targets (AIS vessels, aids-to-navigation, aircraft and SaR beacons),
//! classifies targets by age, limits them to a region of interest around the self position and
//! reports consolidated snapshots at a fixed rate that is independent of the stream rate.
//!
//! The worker runs as its own tokio task and is controlled through `WorkerCommand` messages:
//! ```ignore
//! let (hworker, rx) = spawn_worker( config, WsDeltaConnector::new());
//! hworker.send_json(r#"{"command":"open","options":{"url":"ws://localhost:3000/signalk/v1/stream"}}"#).await?;
//! while let Ok(msg) = rx.recv().await { .. }
//! ```

pub mod errors;
pub mod config;
pub mod geo;
pub mod model;
pub mod fields;
pub mod delta;
pub mod updater;
pub mod notification;
pub mod registry;
pub mod messages;
pub mod aggregator;
pub mod connector;
pub mod worker;
pub mod upload;

pub use errors::{OdinSignalKError, Result};
pub use config::{SignalKConfig, TargetFilter, PreferredPaths, load_config};
pub use model::{Category, TrackedEntity, Vessel, TypedTarget, TargetKind, TargetType, Aircraft, Track};
pub use delta::{Delta, PathValue, SkMessage, Update};
pub use aggregator::Aggregator;
pub use messages::{WorkerCommand, WorkerMessage, WorkerOutput, Snapshot};
pub use connector::{ConnectorEvent, DeltaConnector, WsDeltaConnector};
pub use worker::{WorkerHandle, spawn_worker};
