//! Fleetwatch console - fleet monitoring and command for UAV operations.

mod config;
mod context;
mod dispatcher;
mod prefs;
mod run;
mod screen;

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use fleetwatch_link::{ChannelConfig, CommandClient};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::context::ConsoleContext;
use crate::dispatcher::CommandDispatcher;
use crate::screen::ScreenState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fleetwatch_console=debug".parse()?),
        )
        .init();

    tracing::info!("Starting Fleetwatch console...");

    let config = Config::from_env();
    let loaded = prefs::load(Path::new(&config.prefs_path)).await;

    let ctx = ConsoleContext::new(config.clone(), loaded.theme)?;
    let dispatcher = CommandDispatcher::new(CommandClient::new(
        &config.backend_url,
        config.endpoint_style,
    ));

    let (channel_tx, channel_rx) = mpsc::channel(64);
    let (action_tx, action_rx) = mpsc::channel(64);
    let (frames, _) = broadcast::channel(256);

    let mut channel_config = ChannelConfig::new(&config.backend_url);
    channel_config.path = config.stream_path.clone();
    tokio::spawn(fleetwatch_link::run_channel(channel_config, channel_tx));

    let app = screen::routes(ScreenState {
        frames: frames.clone(),
        actions: action_tx,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], config.screen_port));
    tracing::info!("Screens on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("Screen server failed: {}", err);
        }
    });

    run::run(ctx, channel_rx, action_rx, frames, dispatcher).await;

    Ok(())
}
