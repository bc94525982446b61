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

//! the background task that owns a stream connection and its `Aggregator`. The host talks to it
//! only through channels: `WorkerCommand`s in, `WorkerMessage`s out

use std::future::pending;
use chrono::Utc;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::{select, task::JoinHandle, time::{Instant, Interval, MissedTickBehavior, interval_at}};
use tracing::{debug, error, info, warn};

use crate::{
    aggregator::Aggregator,
    config::SignalKConfig,
    connector::{ConnectorEvent, DeltaConnector, stream_url},
    delta::SkMessage,
    errors::{OdinSignalKError, Result},
    messages::{
        AlarmOptions, OpenOptions, Settings, SubscribeOptions, VesselOptions, WorkerCommand, WorkerMessage, WorkerOutput,
        alarm_request, subscribe_request,
    },
};

/// the host side of a running worker
pub struct WorkerHandle {
    tx: AsyncSender<WorkerCommand>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    pub async fn send (&self, cmd: WorkerCommand)->Result<()> {
        self.tx.send(cmd).await.map_err(|e| OdinSignalKError::ChannelClosed(e.to_string()))
    }

    /// parse and send a JSON command
    pub async fn send_json (&self, cmd: &str)->Result<()> {
        self.send( WorkerCommand::from_json(cmd)?).await
    }

    /// close the command channel and wait for the worker to terminate
    pub async fn shutdown (self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            warn!("worker task failed: {e}");
        }
    }
}

/// start a worker task for the given connector. The returned receiver has to be drained by the host
pub fn spawn_worker<C> (config: SignalKConfig, connector: C)->(WorkerHandle, AsyncReceiver<WorkerMessage>)
    where C: DeltaConnector + 'static
{
    let (cmd_tx, cmd_rx) = kanal::bounded_async::<WorkerCommand>( config.channel_bounds);
    let (out_tx, out_rx) = kanal::bounded_async::<WorkerMessage>( config.channel_bounds);

    let worker = SignalKWorker::new( config, connector, out_tx);
    let task = tokio::spawn( worker.run( cmd_rx));

    (WorkerHandle { tx: cmd_tx, task }, out_rx)
}

pub struct SignalKWorker<C> {
    config: SignalKConfig,
    playback: bool,
    connector: C,
    out: AsyncSender<WorkerMessage>,

    aggregator: Option<Aggregator>,
    events: Option<AsyncReceiver<ConnectorEvent>>, // per connection
    ticker: Option<Interval>,
}

impl<C> SignalKWorker<C> where C: DeltaConnector {
    pub fn new (config: SignalKConfig, connector: C, out: AsyncSender<WorkerMessage>)->Self {
        config.check();
        SignalKWorker { config, playback: false, connector, out, aggregator: None, events: None, ticker: None }
    }

    pub async fn run (mut self, cmd_rx: AsyncReceiver<WorkerCommand>) {
        info!("SignalK worker started");

        loop {
            select! {
                cmd = cmd_rx.recv() => match cmd {
                    Ok(cmd) => self.handle_command(cmd).await,
                    Err(_) => break // host is gone
                },
                event = next_event( self.events.as_ref()) => self.handle_event(event).await,
                _ = next_tick( self.ticker.as_mut()) => self.handle_tick().await,
            }
        }

        self.ticker = None;
        self.events = None;
        self.connector.close();
        info!("SignalK worker terminated");
    }

    fn is_connected (&self)->bool { self.events.is_some() }

    async fn emit (&self, output: WorkerOutput) {
        let msg = WorkerMessage::new( output, self.playback);
        if let Err(e) = self.out.send(msg).await {
            warn!("failed to send worker message: {e}");
        }
    }

    async fn emit_error (&self, e: impl ToString) {
        let msg = e.to_string();
        warn!("{msg}");
        self.emit( WorkerOutput::Error(msg)).await
    }

    /* #region commands ****************************************************************************/

    async fn handle_command (&mut self, cmd: WorkerCommand) {
        match cmd {
            WorkerCommand::Open(opts) => self.open(opts).await,
            WorkerCommand::Close(opts) => {
                debug!("close (terminate: {})", opts.terminate);
                self.close(true).await
            }
            WorkerCommand::Subscribe(opts) => self.subscribe(opts).await,
            WorkerCommand::Settings(settings) => self.apply_settings(&settings),
            WorkerCommand::Alarm(opts) => self.alarm(opts).await,
            WorkerCommand::Vessel(opts) => self.rename_vessel(opts),
        }
    }

    async fn open (&mut self, opts: OpenOptions) {
        if self.is_connected() {
            debug!("ignoring open request, connection already active");
            return
        }
        if opts.url.is_none() {
            self.emit_error("Valid options not provided!").await;
            return
        }

        self.apply_settings( &opts.settings);

        let url = match stream_url(&opts) {
            Ok(url) => url,
            Err(e) => { self.emit_error(e).await; return }
        };

        let (tx, rx) = kanal::bounded_async::<ConnectorEvent>( self.config.channel_bounds);
        match self.connector.open( url, opts.token.clone(), tx).await {
            Ok(()) => {
                self.aggregator = Some( Aggregator::new( self.config.clone(), self.playback, Utc::now()));
                self.events = Some(rx);
            }
            Err(e) => {
                error!("failed to open connection: {e}");
                self.emit( WorkerOutput::Error( e.to_string())).await;
            }
        }
    }

    /// stop timer, drop the connection event channel and report. This is a no-op if there is no connection
    async fn close (&mut self, by_command: bool) {
        self.ticker = None;
        self.events = None;
        self.connector.close();
        self.emit( WorkerOutput::Close(by_command)).await;
    }

    async fn subscribe (&mut self, opts: SubscribeOptions) {
        if !self.is_connected() {
            self.emit_error( OdinSignalKError::NotConnected).await;
            return
        }
        let req = subscribe_request(&opts).to_string();
        if let Err(e) = self.connector.send(req).await {
            self.emit_error(e).await;
        }
    }

    async fn alarm (&mut self, opts: AlarmOptions) {
        if !self.is_connected() {
            self.emit_error( OdinSignalKError::NotConnected).await;
            return
        }
        let req = alarm_request(&opts).to_string();
        if let Err(e) = self.connector.send(req).await {
            self.emit_error(e).await;
        }
    }

    fn apply_settings (&mut self, settings: &Settings) {
        let interval_set = settings.apply_to( &mut self.config);
        self.playback = settings.playback.unwrap_or(false);

        if let Some(aggregator) = &mut self.aggregator {
            aggregator.set_config( self.config.clone(), self.playback);
        }

        if interval_set && self.is_connected() {
            self.start_ticker();
        }
    }

    fn rename_vessel (&mut self, opts: VesselOptions) {
        if let (Some(aggregator), Some(name)) = (&mut self.aggregator, &opts.name) {
            if !aggregator.rename_vessel( &opts.context, name) {
                debug!("no vessel {} to rename", opts.context);
            }
        }
    }

    /* #endregion commands */

    /* #region connection events *******************************************************************/

    async fn handle_event (&mut self, event: Option<ConnectorEvent>) {
        match event {
            Some(ConnectorEvent::Connected(ready_state)) => {
                info!("connected");
                self.emit( WorkerOutput::Open(ready_state)).await
            }
            Some(ConnectorEvent::Message(v)) => self.handle_frame( SkMessage::classify(v)).await,
            Some(ConnectorEvent::Error(msg)) => self.emit_error(msg).await,
            Some(ConnectorEvent::Closed) | None => {
                info!("connection closed");
                self.close(false).await
            }
        }
    }

    async fn handle_frame (&mut self, msg: SkMessage) {
        match msg {
            SkMessage::Hello(hello) => {
                if let Some(aggregator) = &mut self.aggregator {
                    aggregator.process_hello(&hello);
                }
                self.emit( WorkerOutput::Hello(hello)).await;
                self.start_ticker();
            }

            SkMessage::Delta(delta) => {
                let now = Utc::now();
                let (notifications, snapshot) = match &mut self.aggregator {
                    Some(aggregator) => {
                        let notifications = aggregator.process_delta( &delta, now);
                        let snapshot = if self.config.update_interval.is_zero() { aggregator.flush(now) } else { None };
                        (notifications, snapshot)
                    }
                    None => return
                };

                for notification in notifications {
                    self.emit( WorkerOutput::Notification(notification)).await;
                }
                if let Some(snapshot) = snapshot {
                    self.emit( WorkerOutput::Update( Box::new(snapshot))).await;
                }
            }

            SkMessage::Response(response) => self.emit( WorkerOutput::Response(response)).await,

            SkMessage::Unknown(v) => debug!("ignoring unknown frame: {v}"),
        }
    }

    /* #endregion connection events */

    /* #region output timer ************************************************************************/

    /// (re)start the flush timer. A zero interval means we flush after each delta frame
    fn start_ticker (&mut self) {
        let period = self.config.update_interval;
        if period.is_zero() {
            self.ticker = None;
        } else {
            let mut ticker = interval_at( Instant::now() + period, period);
            ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);
            self.ticker = Some(ticker);
        }
    }

    async fn handle_tick (&mut self) {
        let snapshot = self.aggregator.as_mut().and_then(|aggregator| aggregator.flush( Utc::now()));
        if let Some(snapshot) = snapshot {
            self.emit( WorkerOutput::Update( Box::new(snapshot))).await;
        }
    }

    /* #endregion output timer */
}

async fn next_event (rx: Option<&AsyncReceiver<ConnectorEvent>>)->Option<ConnectorEvent> {
    match rx {
        Some(rx) => rx.recv().await.ok(),
        None => pending().await
    }
}

async fn next_tick (ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => { ticker.tick().await; }
        None => pending().await
    }
}
