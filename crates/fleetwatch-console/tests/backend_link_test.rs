//! Backend link integration tests.
//!
//! Run with: cargo test --test backend_link_test -- --ignored
//!
//! Note: Requires a running mock backend at http://localhost:5000
//! (cargo run --bin mock_backend) or set FLEETWATCH_TEST_URL.

use std::time::Duration;

use fleetwatch_core::CommandVerb;
use fleetwatch_link::{ChannelConfig, ChannelEvent, CommandClient, CommandSender, EndpointStyle};
use tokio::sync::mpsc;
use tokio::time::timeout;

fn base_url() -> String {
    std::env::var("FLEETWATCH_TEST_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

async fn next_event(rx: &mut mpsc::Receiver<ChannelEvent>) -> ChannelEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("Timed out waiting for channel event")
        .expect("Channel closed")
}

#[tokio::test]
#[ignore] // Run only when the mock backend is running
async fn test_stream_delivers_snapshot_and_geofences() {
    let (tx, mut rx) = mpsc::channel(16);
    let handle = tokio::spawn(fleetwatch_link::run_channel(
        ChannelConfig::new(base_url()),
        tx,
    ));

    assert!(matches!(
        next_event(&mut rx).await,
        ChannelEvent::LinkEstablished
    ));

    let mut saw_snapshot = false;
    let mut saw_geofences = false;
    for _ in 0..6 {
        match next_event(&mut rx).await {
            ChannelEvent::Snapshot(records) => {
                assert!(!records.is_empty(), "Snapshot should carry UAV records");
                saw_snapshot = true;
            }
            ChannelEvent::Geofences(fences) => {
                assert!(!fences.is_empty(), "Backend should send its fence set");
                saw_geofences = true;
            }
            _ => {}
        }
        if saw_snapshot && saw_geofences {
            break;
        }
    }
    assert!(saw_snapshot && saw_geofences);

    drop(rx);
    let _ = timeout(Duration::from_secs(5), handle).await;
}

#[tokio::test]
#[ignore]
async fn test_command_endpoints_accept_known_uav() {
    let unified = CommandClient::new(base_url(), EndpointStyle::Unified);
    let outcome = unified
        .send_command("UAV-1", CommandVerb::Pause)
        .await
        .expect("Command request failed");
    assert!(outcome.success);

    // Second pause resumes; backend treats pause as a toggle.
    let outcome = unified.send_command("UAV-1", CommandVerb::Pause).await.unwrap();
    assert!(outcome.success);

    let legacy = CommandClient::new(base_url(), EndpointStyle::PerVerb);
    let outcome = legacy
        .send_command("UAV-2", CommandVerb::Rtb)
        .await
        .expect("Legacy command request failed");
    assert!(outcome.success);

    let outcome = unified
        .send_command("NO-SUCH-UAV", CommandVerb::Kill)
        .await
        .unwrap();
    assert!(!outcome.success, "Unknown UAV must be rejected");
}
