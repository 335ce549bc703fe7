//! The console event loop.
//!
//! One task owns all mutable state. Channel events, operator actions and
//! dispatch reports arrive over channels and are applied in arrival order,
//! so no snapshot is ever applied against a half-updated store.

use std::path::PathBuf;
use std::sync::Arc;

use fleetwatch_core::{cards, LogLevel};
use fleetwatch_link::{ChannelEvent, CommandSender};
use tokio::sync::{broadcast, mpsc};

use crate::context::ConsoleContext;
use crate::dispatcher::{CommandDispatcher, DispatchReport};
use crate::prefs::{self, Prefs};
use crate::screen::{broadcast_frame, OperatorAction, ScreenFrame, SurfaceBatch};

pub async fn run<S>(
    mut ctx: ConsoleContext,
    mut channel_rx: mpsc::Receiver<ChannelEvent>,
    mut action_rx: mpsc::Receiver<OperatorAction>,
    frames: broadcast::Sender<String>,
    dispatcher: CommandDispatcher<S>,
) where
    S: CommandSender + Send + Sync + 'static,
{
    let dispatcher = Arc::new(dispatcher);
    let (report_tx, mut report_rx) = mpsc::channel::<DispatchReport>(16);

    loop {
        tokio::select! {
            event = channel_rx.recv() => {
                match event {
                    Some(event) => handle_channel_event(&mut ctx, event, &frames),
                    None => {
                        tracing::info!("Uplink channel closed, shutting down");
                        break;
                    }
                }
            }
            action = action_rx.recv() => {
                if let Some(action) = action {
                    handle_action(&mut ctx, action, &frames, &dispatcher, &report_tx);
                }
            }
            report = report_rx.recv() => {
                if let Some(report) = report {
                    ctx.log.push(report.entry);
                    broadcast_frame(&frames, &ctx.log_frame());
                }
            }
        }
    }
}

fn handle_channel_event(
    ctx: &mut ConsoleContext,
    event: ChannelEvent,
    frames: &broadcast::Sender<String>,
) {
    match event {
        ChannelEvent::LinkEstablished => {
            ctx.link_up = true;
            ctx.push_log("COMMUNICATIONS ESTABLISHED", LogLevel::Success);
            broadcast_frame(frames, &ctx.status_frame());
            broadcast_frame(frames, &ctx.log_frame());
        }
        ChannelEvent::LinkLost => {
            ctx.link_up = false;
            ctx.push_log("COMMUNICATIONS LOST", LogLevel::Error);
            broadcast_frame(frames, &ctx.status_frame());
            broadcast_frame(frames, &ctx.log_frame());
        }
        ChannelEvent::Snapshot(records) => {
            ctx.store.replace_all(records);
            let mut batch = SurfaceBatch::new();
            // Screens get no replay on connect; carrying the base layer in
            // every snapshot frame lets a late joiner catch up in one tick.
            ctx.reconciler.activate(&mut batch);
            ctx.reconciler.reconcile(&ctx.store, &mut batch);
            broadcast_frame(frames, &batch.into_frame());
            broadcast_frame(frames, &ctx.cards_frame());
        }
        ChannelEvent::Alerts(alerts) => {
            ctx.push_alerts(alerts);
            broadcast_frame(frames, &ctx.alerts_frame());
            broadcast_frame(frames, &ctx.log_frame());
        }
        ChannelEvent::Geofences(fences) => {
            let mut batch = SurfaceBatch::new();
            ctx.reconciler.set_geofences(&fences, &mut batch);
            broadcast_frame(frames, &batch.into_frame());
        }
        ChannelEvent::VideoFeeds(mut feeds) => {
            feeds.truncate(ctx.config.max_feed_tiles);
            ctx.feeds = feeds;
            broadcast_frame(frames, &ctx.feeds_frame());
        }
        ChannelEvent::VideoFrame { id, image } => {
            // Relayed as-is; frames are ephemeral and never buffered.
            broadcast_frame(frames, &ScreenFrame::VideoFrame { id, image });
        }
    }
}

fn handle_action<S>(
    ctx: &mut ConsoleContext,
    action: OperatorAction,
    frames: &broadcast::Sender<String>,
    dispatcher: &Arc<CommandDispatcher<S>>,
    report_tx: &mpsc::Sender<DispatchReport>,
) where
    S: CommandSender + Send + Sync + 'static,
{
    match action {
        OperatorAction::Command { uav_id, verb } => {
            // Dispatched off the loop so a slow backend never stalls snapshots.
            let dispatcher = dispatcher.clone();
            let report_tx = report_tx.clone();
            tokio::spawn(async move {
                let report = dispatcher.dispatch(&uav_id, verb).await;
                let _ = report_tx.send(report).await;
            });
        }
        OperatorAction::SetLayer { name } => {
            let mut batch = SurfaceBatch::new();
            match ctx.reconciler.set_base_layer(&name, &mut batch) {
                Ok(()) => {
                    if !batch.is_empty() {
                        ctx.push_log(
                            format!("MAP LAYER: {}", name.to_uppercase()),
                            LogLevel::Info,
                        );
                        broadcast_frame(frames, &batch.into_frame());
                        broadcast_frame(frames, &ctx.log_frame());
                    }
                }
                Err(err) => tracing::warn!("Rejected layer switch: {}", err),
            }
        }
        OperatorAction::TogglePaths => {
            let show = !ctx.reconciler.show_paths();
            let mut batch = SurfaceBatch::new();
            ctx.reconciler.set_show_paths(show, &mut batch);
            if show {
                // Redraw now rather than waiting for the next snapshot.
                ctx.reconciler.reconcile(&ctx.store, &mut batch);
            }
            ctx.push_log(
                format!(
                    "FLIGHT PATHS: {}",
                    if show { "VISIBLE" } else { "HIDDEN" }
                ),
                LogLevel::Info,
            );
            broadcast_frame(frames, &batch.into_frame());
            broadcast_frame(frames, &ctx.log_frame());
        }
        OperatorAction::SetTheme { theme } => {
            ctx.theme = theme;
            ctx.push_log(format!("DISPLAY MODE: {}", theme.label()), LogLevel::Info);
            broadcast_frame(frames, &ctx.status_frame());
            broadcast_frame(frames, &ctx.log_frame());

            let path = PathBuf::from(ctx.config.prefs_path.clone());
            tokio::spawn(async move {
                if let Err(err) = prefs::store(&path, &Prefs { theme }).await {
                    tracing::warn!("Failed to persist prefs: {}", err);
                }
            });
        }
        OperatorAction::SelectUav { uav_id } => {
            if let Some(record) = ctx.store.get(&uav_id) {
                broadcast_frame(
                    frames,
                    &ScreenFrame::Detail {
                        detail: cards::detail(record),
                    },
                );
            } else {
                tracing::debug!("Selected unknown UAV {}", uav_id);
            }
        }
        OperatorAction::ClearLog => {
            ctx.log.clear();
            ctx.push_log("MISSION LOG CLEARED", LogLevel::Info);
            broadcast_frame(frames, &ctx.log_frame());
        }
        OperatorAction::ExportLog => {
            broadcast_frame(
                frames,
                &ScreenFrame::LogExport {
                    text: ctx.log.export_text(),
                },
            );
        }
    }
}
