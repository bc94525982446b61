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

//! the upstream side of the worker. A `DeltaConnector` opens a SignalK stream and reports connection
//! events through a (per-connection) channel

use async_trait::async_trait;
use futures_util::{sink::SinkExt, stream::StreamExt};
use kanal::{AsyncReceiver, AsyncSender};
use serde_json::Value;
use tokio::{select, net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    connect_async, WebSocketStream, MaybeTlsStream,
    tungstenite::{
        protocol::Message,
        http::header::{AUTHORIZATION, HeaderValue},
        client::IntoClientRequest,
    }
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{errors::{OdinSignalKError, Result}, messages::OpenOptions};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// the ready state we report once the stream is connected
pub const READY_STATE_OPEN: u16 = 1;

#[derive(Debug,Clone)]
pub enum ConnectorEvent {
    Connected(u16),
    Message(Value),
    Error(String),
    Closed,
}

/// abstraction of the stream transport so that we can run the worker with in-memory feeds
#[async_trait]
pub trait DeltaConnector: Send + Sync {
    /// open a new connection to `url`. Events have to be sent to `tx` until the connection is closed
    async fn open (&mut self, url: Url, token: Option<String>, tx: AsyncSender<ConnectorEvent>)->Result<()>;

    /// send a (JSON) request upstream
    async fn send (&mut self, msg: String)->Result<()>;

    /// close the current connection. This has to be idempotent
    fn close (&mut self);
}

/// build the stream URL from open options. Playback connections get `startTime` and `playbackRate`
/// query parameters, both kinds get an optional `subscribe` parameter
pub fn stream_url (opts: &OpenOptions)->Result<Url> {
    let base = opts.url.as_deref().ok_or( OdinSignalKError::UrlError("no url".to_string()))?;
    let mut url = Url::parse(base)?;

    {
        let mut query = url.query_pairs_mut();
        if opts.is_playback() {
            if let Some(po) = &opts.playback_options {
                if let Some(start_time) = &po.start_time { query.append_pair("startTime", start_time); }
                if let Some(rate) = po.playback_rate { query.append_pair("playbackRate", rate.to_string().as_str()); }
                if let Some(subscribe) = &po.subscribe { query.append_pair("subscribe", subscribe); }
            }
        } else if let Some(subscribe) = &opts.subscribe {
            query.append_pair("subscribe", subscribe);
        }
    }

    // don't leave a dangling '?'
    if url.query() == Some("") { url.set_query(None) }
    Ok(url)
}

/* #region websocket connector *********************************************************************/

/// the live connector that reads a SignalK websocket stream
#[derive(Default)]
pub struct WsDeltaConnector {
    out_tx: Option<AsyncSender<String>>,
    task: Option<JoinHandle<()>>,
}

impl WsDeltaConnector {
    pub fn new ()->Self { Self::default() }
}

#[async_trait]
impl DeltaConnector for WsDeltaConnector {
    async fn open (&mut self, url: Url, token: Option<String>, tx: AsyncSender<ConnectorEvent>)->Result<()> {
        self.close();

        let mut request = url.as_str().into_client_request()?;
        if let Some(token) = token {
            let auth_val = format!("Bearer {token}");
            request.headers_mut().append( AUTHORIZATION, HeaderValue::from_str(auth_val.as_str())?);
        }

        let (out_tx, out_rx) = kanal::bounded_async::<String>(16);
        self.out_tx = Some(out_tx);

        self.task = Some( tokio::spawn( async move {
            info!("connecting to {url}");
            match connect_async(request).await {
                Ok((ws_stream,_)) => {
                    if tx.send( ConnectorEvent::Connected(READY_STATE_OPEN)).await.is_ok() {
                        run_ws( ws_stream, out_rx, &tx).await;
                    }
                }
                Err(e) => {
                    warn!("websocket connect failed: {e}");
                    let _ = tx.send( ConnectorEvent::Error( format!("connection error: {e}"))).await;
                    let _ = tx.send( ConnectorEvent::Closed).await;
                }
            }
        }));

        Ok(())
    }

    async fn send (&mut self, msg: String)->Result<()> {
        match &self.out_tx {
            Some(out_tx) => out_tx.send(msg).await.map_err(|e| OdinSignalKError::ChannelClosed(e.to_string())),
            None => Err(OdinSignalKError::NotConnected)
        }
    }

    fn close (&mut self) {
        // dropping the sender makes the connection task close the websocket
        self.out_tx = None;
        self.task = None;
    }
}

impl Drop for WsDeltaConnector {
    fn drop (&mut self) {
        if let Some(task) = self.task.take() { task.abort() }
    }
}

async fn run_ws (mut ws_stream: WsStream, out_rx: AsyncReceiver<String>, tx: &AsyncSender<ConnectorEvent>) {
    loop {
        select! {
            maybe_msg = ws_stream.next() => { // in: frame from server
                match maybe_msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<Value>( text.as_str()) {
                            Ok(v) => {
                                if tx.send( ConnectorEvent::Message(v)).await.is_err() { return } // worker dropped this connection
                            }
                            Err(e) => debug!("ignoring malformed frame: {e}")
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("server closed websocket");
                        let _ = tx.send( ConnectorEvent::Closed).await;
                        return
                    }
                    Some(Ok(_)) => {} // ping/pong/binary
                    Some(Err(e)) => {
                        warn!("websocket read failed: {e}");
                        let _ = tx.send( ConnectorEvent::Error( format!("connection error: {e}"))).await;
                        let _ = tx.send( ConnectorEvent::Closed).await;
                        return
                    }
                }
            }

            maybe_req = out_rx.recv() => { // out: request to server
                match maybe_req {
                    Ok(req) => {
                        if ws_stream.send( Message::text(req)).await.is_err() {
                            warn!("failed to write to websocket");
                            let _ = tx.send( ConnectorEvent::Error( "failed to write to websocket".to_string())).await;
                        }
                    }
                    Err(_) => { // connector closed, this is nominal termination
                        let _ = ws_stream.send( Message::Close(None)).await;
                        return
                    }
                }
            }
        }
    }
}

/* #endregion websocket connector */
