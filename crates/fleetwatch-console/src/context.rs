//! In-process console state: the fleet store, reconciler, buffers and
//! operator-facing status.

use fleetwatch_core::{
    cards, Alert, LogEntry, LogLevel, MapReconciler, RingBuffer, UnknownLayer, VideoFeedStatus,
    ViewStateStore,
};

use crate::config::Config;
use crate::prefs::Theme;
use crate::screen::ScreenFrame;

pub struct ConsoleContext {
    pub config: Config,
    pub store: ViewStateStore,
    pub reconciler: MapReconciler,
    pub alerts: RingBuffer<Alert>,
    pub log: RingBuffer<LogEntry>,
    pub feeds: Vec<VideoFeedStatus>,
    pub link_up: bool,
    pub theme: Theme,
}

impl ConsoleContext {
    pub fn new(config: Config, theme: Theme) -> Result<Self, UnknownLayer> {
        let reconciler = MapReconciler::new(
            config.layer_set.clone(),
            &config.default_layer,
            config.show_paths,
        )?;
        Ok(Self {
            alerts: RingBuffer::new(config.alert_capacity),
            log: RingBuffer::new(config.log_capacity),
            store: ViewStateStore::new(),
            feeds: Vec::new(),
            link_up: false,
            theme,
            reconciler,
            config,
        })
    }

    pub fn push_log(&mut self, message: impl Into<String>, level: LogLevel) {
        self.log.push(LogEntry::new(message, level));
    }

    /// Buffers incoming alerts and mirrors each into the mission log.
    pub fn push_alerts(&mut self, alerts: Vec<Alert>) {
        for alert in alerts {
            self.push_log(format!("ALERT: {}", alert.message), LogLevel::Warning);
            self.alerts.push(alert);
        }
    }

    pub fn cards_frame(&self) -> ScreenFrame {
        ScreenFrame::Cards {
            cards: cards::project(&self.store),
            active_count: self.store.active_count(),
            total: self.store.len(),
        }
    }

    pub fn alerts_frame(&self) -> ScreenFrame {
        ScreenFrame::Alerts {
            alerts: self.alerts.iter().cloned().collect(),
        }
    }

    pub fn log_frame(&self) -> ScreenFrame {
        ScreenFrame::Log {
            entries: self.log.iter().cloned().collect(),
        }
    }

    pub fn feeds_frame(&self) -> ScreenFrame {
        ScreenFrame::Feeds {
            feeds: self.feeds.clone(),
        }
    }

    pub fn status_frame(&self) -> ScreenFrame {
        ScreenFrame::Status {
            link_up: self.link_up,
            theme: self.theme,
        }
    }
}
