//! Link error taxonomy.
//!
//! Transport failures and backend rejections are different things: a
//! rejected command still produced a well-formed `{success: false}` response
//! and is reported as an `Ok` outcome by the command client, never as a
//! `LinkError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("backend returned HTTP {0}")]
    Status(u16),

    #[error("protocol error: {0}")]
    Protocol(String),
}
