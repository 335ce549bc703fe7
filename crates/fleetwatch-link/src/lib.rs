//! Backend link for the fleetwatch console.
//!
//! One inbound surface (the telemetry push channel) and one outbound
//! surface (the command endpoint); everything else is the console's job.

pub mod backoff;
pub mod channel;
pub mod commands;
pub mod error;

pub use backoff::Backoff;
pub use channel::{run as run_channel, ChannelConfig, ChannelEvent};
pub use commands::{CommandClient, CommandOutcome, CommandSender, EndpointStyle};
pub use error::LinkError;
