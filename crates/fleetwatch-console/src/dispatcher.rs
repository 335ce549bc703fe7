//! Command dispatch with mission log reporting.

use fleetwatch_core::{CommandVerb, LogEntry, LogLevel};
use fleetwatch_link::CommandSender;

/// What a dispatch produced: did the backend accept it, and the log line
/// describing the outcome.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub success: bool,
    pub entry: LogEntry,
}

/// Sends operator commands and turns every outcome into a mission log entry.
/// Dispatch never fails; transport errors become log entries too.
pub struct CommandDispatcher<S: CommandSender> {
    sender: S,
}

impl<S: CommandSender> CommandDispatcher<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    pub async fn dispatch(&self, uav_id: &str, verb: CommandVerb) -> DispatchReport {
        match self.sender.send_command(uav_id, verb).await {
            Ok(outcome) if outcome.success => DispatchReport {
                success: true,
                entry: LogEntry::new(
                    format!("COMMAND SENT: {} TO {}", verb.label(), uav_id),
                    LogLevel::Info,
                ),
            },
            Ok(_) => DispatchReport {
                success: false,
                entry: LogEntry::new(
                    format!("COMMAND FAILED: {} TO {}", verb.label(), uav_id),
                    LogLevel::Error,
                ),
            },
            Err(err) => DispatchReport {
                success: false,
                entry: LogEntry::new(format!("COMMAND ERROR: {}", err), LogLevel::Error),
            },
        }
    }
}
