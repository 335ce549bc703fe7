//! Outbound operator command requests.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fleetwatch_core::models::CommandVerb;

use crate::error::LinkError;

/// Endpoint shape spoken by the backend.
///
/// `Unified` is the canonical `POST /api/uav/{id}/command` with a JSON body.
/// `PerVerb` is the deprecated legacy form (`POST /api/uav/{id}/{verb}`,
/// empty body) some deployments still expose; both return `{success: bool}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointStyle {
    #[default]
    Unified,
    PerVerb,
}

/// Backend decision on a delivered command. Distinct from transport
/// failure: an `Ok` outcome with `success == false` means the backend
/// received and rejected the command.
#[derive(Debug, Clone, Copy)]
pub struct CommandOutcome {
    pub success: bool,
}

#[derive(Debug, Serialize)]
struct CommandRequest {
    command: CommandVerb,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    success: bool,
}

/// Abstraction over the command endpoint so the dispatcher can be tested
/// against a mock backend.
pub trait CommandSender {
    fn send_command(
        &self,
        uav_id: &str,
        verb: CommandVerb,
    ) -> impl Future<Output = Result<CommandOutcome, LinkError>> + Send;
}

/// HTTP client for the command endpoint.
#[derive(Debug, Clone)]
pub struct CommandClient {
    client: reqwest::Client,
    base_url: String,
    style: EndpointStyle,
}

impl CommandClient {
    /// The 10s timeout bounds how long a dispatch can stay pending; the
    /// backend itself specifies none.
    pub fn new(base_url: impl Into<String>, style: EndpointStyle) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            style,
        }
    }
}

impl CommandSender for CommandClient {
    async fn send_command(
        &self,
        uav_id: &str,
        verb: CommandVerb,
    ) -> Result<CommandOutcome, LinkError> {
        let base = self.base_url.trim_end_matches('/');

        let request = match self.style {
            EndpointStyle::Unified => {
                let url = format!("{}/api/uav/{}/command", base, uav_id);
                self.client.post(&url).json(&CommandRequest { command: verb })
            }
            EndpointStyle::PerVerb => {
                let url = format!("{}/api/uav/{}/{}", base, uav_id, verb.as_str());
                self.client.post(&url)
            }
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LinkError::Status(response.status().as_u16()));
        }

        let body: CommandResponse = response.json().await?;
        Ok(CommandOutcome {
            success: body.success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_request_serializes_lowercase_verb() {
        let body = serde_json::to_string(&CommandRequest {
            command: CommandVerb::Rtb,
        })
        .unwrap();
        assert_eq!(body, r#"{"command":"rtb"}"#);
    }

    #[test]
    fn response_success_defaults_to_false() {
        let body: CommandResponse = serde_json::from_str("{}").unwrap();
        assert!(!body.success);

        let ok: CommandResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ok.success);
    }
}
