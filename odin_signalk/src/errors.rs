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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinSignalKError>;

/// odin_signalk specific error type. We keep foreign errors opaque (as strings) so that errors
/// can be cloned and sent to the host as `error` messages
#[derive(Error,Debug,Clone)]
pub enum OdinSignalKError {
    #[error("IO error {0}")]
    IOError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("JSON error {0}")]
    JsonError(String),

    #[error("http error {0}")]
    HttpError(String),

    #[error("websock error {0}")]
    WsError(String),

    #[error("invalid URL {0}")]
    UrlError(String),

    #[error("no open connection")]
    NotConnected,

    #[error("channel closed {0}")]
    ChannelClosed(String),

    #[error("invalid command {0}")]
    CommandError(String),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed(String)
}

macro_rules! map_to_opaque_error {
    ($from_error:ty => $to_error:ident :: $variant:ident) => {
        impl From<$from_error> for $to_error {
            fn from (e: $from_error)->Self { $to_error :: $variant ( e.to_string()) }
        }
    };
}

map_to_opaque_error!{ std::io::Error => OdinSignalKError::IOError }
map_to_opaque_error!{ serde_json::Error => OdinSignalKError::JsonError }
map_to_opaque_error!{ ron::error::SpannedError => OdinSignalKError::ConfigError }
map_to_opaque_error!{ reqwest::Error => OdinSignalKError::HttpError }
map_to_opaque_error!{ url::ParseError => OdinSignalKError::UrlError }
map_to_opaque_error!{ tokio_tungstenite::tungstenite::Error => OdinSignalKError::WsError }
map_to_opaque_error!{ tokio_tungstenite::tungstenite::http::header::InvalidHeaderValue => OdinSignalKError::HttpError }

pub fn op_failed (msg: impl ToString)->OdinSignalKError {
    OdinSignalKError::OpFailed(msg.to_string())
}

pub fn config_error (msg: impl ToString)->OdinSignalKError {
    OdinSignalKError::ConfigError(msg.to_string())
}

pub fn command_error (msg: impl ToString)->OdinSignalKError {
    OdinSignalKError::CommandError(msg.to_string())
}
