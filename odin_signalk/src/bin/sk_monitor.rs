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

/// monitor tool that connects to a SignalK server stream and logs notifications and update summaries
/// example:
/// ```
///   RUST_LOG=info sk_monitor --config configs/signalk.ron --radius 20000 ws://localhost:3000/signalk/v1/stream
/// ```

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use odin_signalk::{
    load_config, spawn_worker, SignalKConfig, WorkerCommand, WsDeltaConnector, WorkerOutput,
    messages::{CloseOptions, OpenOptions, PlaybackOptions, Selections, Settings},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "monitor a SignalK delta stream")]
pub struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(short,long)]
    pub config: Option<String>,

    /// bearer token for the stream connection
    #[arg(short,long)]
    pub token: Option<String>,

    /// stream subscription ("self", "all" or "none")
    #[arg(short,long, default_value = "all")]
    pub subscribe: String,

    /// snapshot interval in milliseconds (0 means after each delta)
    #[arg(short,long)]
    pub interval: Option<u64>,

    /// max target distance from self in meters
    #[arg(short,long)]
    pub radius: Option<f64>,

    /// playback start time (ISO 8601). This requires a playback stream URL
    #[arg(long)]
    pub start_time: Option<String>,

    /// playback rate
    #[arg(long)]
    pub playback_rate: Option<f64>,

    /// stream URL (e.g. ws://localhost:3000/signalk/v1/stream)
    pub url: String,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let config: SignalKConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => SignalKConfig::default()
    };

    let mut filter = config.filter.clone();
    if args.radius.is_some() { filter.max_radius = args.radius; }

    let is_playback = args.start_time.is_some() || args.playback_rate.is_some();
    let open = OpenOptions {
        url: Some( args.url.clone()),
        subscribe: Some( args.subscribe.clone()),
        token: args.token.clone(),
        playback_options: if is_playback {
            Some( PlaybackOptions { start_time: args.start_time.clone(), playback_rate: args.playback_rate, subscribe: Some( args.subscribe.clone()) })
        } else { None },
        settings: Settings {
            interval: args.interval,
            playback: Some(is_playback),
            selections: Some( Selections { signalk: Some(filter), ..Selections::default() }),
        },
    };

    let (hworker, rx) = spawn_worker( config, WsDeltaConnector::new());
    hworker.send( WorkerCommand::Open(open)).await?;

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Ok(msg) => match &msg.output {
                    WorkerOutput::Open(state) => info!("stream open (ready state {state})"),
                    WorkerOutput::Hello(hello) => info!("hello: {hello}"),
                    WorkerOutput::Notification(n) => info!("notification {}: {} {:?}", n.kind, n.path, n.context),
                    WorkerOutput::Update(snapshot) => {
                        info!("{} update: self {}, vessels: {}, atons: {}, aircraft: {}, sar: {}, updated: {}, stale: {}, expired: {}",
                            snapshot.timestamp, snapshot.self_vessel,
                            snapshot.ais_targets.len(), snapshot.atons.len(), snapshot.aircraft.len(), snapshot.sar.len(),
                            snapshot.ais_status.updated.len(), snapshot.ais_status.stale.len(), snapshot.ais_status.expired.len());
                    }
                    WorkerOutput::Response(response) => info!("response: {response}"),
                    WorkerOutput::Error(e) => warn!("error: {e}"),
                    WorkerOutput::Close(by_command) => {
                        info!("stream closed (by command: {by_command})");
                        break
                    }
                },
                Err(_) => break
            },
            _ = signal::ctrl_c() => {
                info!("terminating..");
                hworker.send( WorkerCommand::Close( CloseOptions { terminate: true })).await?;
            }
        }
    }

    hworker.shutdown().await;
    Ok(())
}
