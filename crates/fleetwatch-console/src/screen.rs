//! Operator screen fan-out over WebSocket.
//!
//! Screens are thin: they render the frames broadcast here and send back
//! operator actions. All fleet state lives in the console process.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use fleetwatch_core::{
    Alert, CommandVerb, LogEntry, SurfaceOp, UavCard, UavDetail, VideoFeedStatus,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;

use crate::prefs::Theme;

/// One rendering update pushed to every connected screen.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenFrame {
    Surface {
        ops: Vec<SurfaceOp>,
    },
    Cards {
        cards: Vec<UavCard>,
        active_count: usize,
        total: usize,
    },
    Detail {
        detail: UavDetail,
    },
    Alerts {
        alerts: Vec<Alert>,
    },
    Log {
        entries: Vec<LogEntry>,
    },
    LogExport {
        text: String,
    },
    Feeds {
        feeds: Vec<VideoFeedStatus>,
    },
    VideoFrame {
        id: u32,
        image: String,
    },
    Status {
        link_up: bool,
        theme: Theme,
    },
}

/// An action a screen sends back to the console.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OperatorAction {
    Command { uav_id: String, verb: CommandVerb },
    SetLayer { name: String },
    TogglePaths,
    SetTheme { theme: Theme },
    SelectUav { uav_id: String },
    ClearLog,
    ExportLog,
}

/// Collects reconciler output so a pass reaches screens as one frame.
#[derive(Debug, Default)]
pub struct SurfaceBatch {
    ops: Vec<SurfaceOp>,
}

impl SurfaceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn into_frame(self) -> ScreenFrame {
        ScreenFrame::Surface { ops: self.ops }
    }
}

impl fleetwatch_core::MapSurface for SurfaceBatch {
    fn apply(&mut self, op: SurfaceOp) {
        self.ops.push(op);
    }
}

#[derive(Clone)]
pub struct ScreenState {
    pub frames: broadcast::Sender<String>,
    pub actions: mpsc::Sender<OperatorAction>,
}

pub fn broadcast_frame(frames: &broadcast::Sender<String>, frame: &ScreenFrame) {
    match serde_json::to_string(frame) {
        // send only fails when no screen is connected
        Ok(payload) => {
            let _ = frames.send(payload);
        }
        Err(err) => tracing::error!("Failed to encode screen frame: {}", err),
    }
}

pub fn routes(state: ScreenState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/screen", get(ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ScreenState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: ScreenState) {
    let mut rx = state.frames.subscribe();

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<OperatorAction>(&text) {
                            Ok(action) => {
                                if state.actions.send(action).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!("Ignoring malformed operator action: {}", err);
                            }
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            frame = rx.recv() => {
                match frame {
                    Ok(payload) => {
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        // Drop missed frames; a newer snapshot will arrive soon.
                        continue;
                    }
                    Err(_) => break,
                }
            }
        }
    }
}
