//! Telemetry channel adapter.
//!
//! Wraps the backend's push WebSocket and delivers typed events. Link
//! establishment and loss are observable status transitions, not errors;
//! the adapter reconnects on its own with backoff.

use std::time::Duration;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use fleetwatch_core::models::{Alert, Geofence, UavRecord, VideoFeedStatus};

use crate::backoff::Backoff;
use crate::error::LinkError;

/// Typed inbound event delivered to the console.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    LinkEstablished,
    LinkLost,
    /// Full fleet snapshot superseding all prior records.
    Snapshot(Vec<UavRecord>),
    Alerts(Vec<Alert>),
    /// Full geofence set superseding all prior fences.
    Geofences(Vec<Geofence>),
    VideoFeeds(Vec<VideoFeedStatus>),
    /// Raw downlink frame, relayed to screens untouched.
    VideoFrame { id: u32, image: String },
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Backend base URL (`http://host:port`); the scheme is rewritten to ws.
    pub base_url: String,
    /// Stream path on the backend.
    pub path: String,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl ChannelConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: "/stream".to_string(),
            backoff_base: Duration::from_millis(500),
            backoff_max: Duration::from_secs(30),
        }
    }

    fn ws_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let rewritten = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!("{}{}", rewritten, self.path)
    }
}

/// Connect-and-read loop. Each established connection emits
/// `LinkEstablished`, each drop emits `LinkLost` followed by a backoff wait.
/// Returns when the receiving side of `tx` is gone.
pub async fn run(config: ChannelConfig, tx: mpsc::Sender<ChannelEvent>) {
    let url = config.ws_url();
    let mut backoff = Backoff::new(config.backoff_base, config.backoff_max);

    loop {
        match connect_async(&url).await {
            Ok((mut socket, _)) => {
                backoff.reset();
                tracing::info!("Telemetry link established: {}", url);
                if tx.send(ChannelEvent::LinkEstablished).await.is_err() {
                    return;
                }

                while let Some(message) = socket.next().await {
                    let text = match message {
                        Ok(Message::Text(text)) => text,
                        Ok(Message::Binary(data)) => match String::from_utf8(data) {
                            Ok(text) => text,
                            Err(_) => continue,
                        },
                        Ok(Message::Close(_)) => break,
                        Ok(_) => continue,
                        Err(err) => {
                            tracing::warn!("Telemetry socket error: {}", err);
                            break;
                        }
                    };

                    match parse_frame(&text) {
                        Ok(Some(event)) => {
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::warn!("Dropping unreadable frame: {}", err);
                        }
                    }
                }

                tracing::warn!("Telemetry link lost");
                if tx.send(ChannelEvent::LinkLost).await.is_err() {
                    return;
                }
            }
            Err(err) => {
                tracing::warn!("Telemetry connect failed: {}", err);
            }
        }

        let delay = backoff.fail();
        tokio::time::sleep(delay).await;
    }
}

/// Parse one wire frame (`{"event": ..., "data": ...}`) into a typed event.
/// Unknown events are ignored; malformed array elements are dropped
/// one-by-one so a single bad record never aborts the batch.
pub fn parse_frame(text: &str) -> Result<Option<ChannelEvent>, LinkError> {
    let envelope: Envelope = serde_json::from_str(text)
        .map_err(|err| LinkError::Protocol(format!("bad envelope: {err}")))?;

    let event = match envelope.event.as_str() {
        "uav_data" | "uav_update" => {
            Some(ChannelEvent::Snapshot(decode_each(envelope.data, "uav record")))
        }
        "alerts" => Some(ChannelEvent::Alerts(decode_each(envelope.data, "alert"))),
        "geofence_data" => Some(ChannelEvent::Geofences(decode_each(
            envelope.data,
            "geofence",
        ))),
        "video_update" => Some(ChannelEvent::VideoFeeds(decode_each(
            envelope.data,
            "video feed",
        ))),
        "frame" => decode_video_frame(envelope.data),
        other => {
            tracing::debug!("Ignoring unknown event '{}'", other);
            None
        }
    };

    Ok(event)
}

#[derive(Debug, serde::Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

fn decode_each<T: DeserializeOwned>(data: Value, what: &str) -> Vec<T> {
    let Value::Array(items) = data else {
        tracing::warn!("Expected array payload for {}", what);
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!("Dropping malformed {}: {}", what, err);
                None
            }
        })
        .collect()
}

fn decode_video_frame(data: Value) -> Option<ChannelEvent> {
    // An out-of-range id is dropped, never truncated onto another feed.
    let id = u32::try_from(data.get("id")?.as_u64()?).ok()?;
    let image = data.get("image")?.as_str()?.to_string();
    Some(ChannelEvent::VideoFrame { id, image })
}
