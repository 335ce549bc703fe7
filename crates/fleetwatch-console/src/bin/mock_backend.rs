//! Stand-in fleet backend for development and integration tests.
//!
//! Serves the telemetry stream and command endpoints the console expects,
//! backed by a small kinematic simulation: UAVs chase their waypoints,
//! drain battery and go emergency when it runs out.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use fleetwatch_core::{Geofence, MissionStatus, UavRecord, UavType};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mock_backend", about = "Simulated fleet backend")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Number of simulated UAVs.
    #[arg(long, default_value_t = 4)]
    uavs: usize,
    /// Simulation tick in milliseconds.
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,
}

const PATH_HISTORY_CAP: usize = 100;
const HOME: [f64; 2] = [12.84, 80.15];

struct SimUav {
    record: UavRecord,
}

impl SimUav {
    fn spawn(n: usize) -> Self {
        let quad = n % 2 == 0;
        let lat = HOME[0] + 0.01 * n as f64;
        let lon = HOME[1] + 0.008 * n as f64;
        Self {
            record: UavRecord {
                id: format!("UAV-{}", n + 1),
                uav_type: if quad {
                    UavType::Quadcopter
                } else {
                    UavType::FixedWing
                },
                model: Some(if quad { "RQ-28A" } else { "MQ-1C" }.to_string()),
                lat,
                lon,
                altitude: 100.0 + 20.0 * n as f64,
                speed: if quad { 12.0 } else { 38.0 },
                heading: 0.0,
                battery_level: 100.0,
                fuel_level: None,
                mission_status: MissionStatus::EnRoute,
                paused: false,
                threat_level: None,
                path_history: Vec::new(),
                waypoints: vec![
                    [lat + 0.03, lon + 0.02],
                    [lat + 0.05, lon - 0.01],
                    [lat + 0.02, lon - 0.03],
                ],
                current_waypoint: 0,
                home_lat: HOME[0],
                home_lon: HOME[1],
            },
        }
    }

    fn tick(&mut self, dt_secs: f64) -> Option<String> {
        let r = &mut self.record;
        if r.paused || matches!(r.mission_status, MissionStatus::Idle | MissionStatus::Emergency) {
            return None;
        }

        let target = match r.mission_status {
            MissionStatus::Rtb => [r.home_lat, r.home_lon],
            _ => match r.waypoints.get(r.current_waypoint) {
                Some(wp) => *wp,
                None => {
                    r.mission_status = MissionStatus::Loitering;
                    return None;
                }
            },
        };

        // Crude flat-earth step toward the target, good enough for a demo.
        let dlat = target[0] - r.lat;
        let dlon = target[1] - r.lon;
        let dist = (dlat * dlat + dlon * dlon).sqrt();
        let step = r.speed * dt_secs / 111_000.0;

        if dist <= step {
            r.lat = target[0];
            r.lon = target[1];
            match r.mission_status {
                MissionStatus::Rtb => r.mission_status = MissionStatus::Idle,
                _ => r.current_waypoint += 1,
            }
        } else {
            r.lat += dlat / dist * step;
            r.lon += dlon / dist * step;
            r.heading = dlon.atan2(dlat).to_degrees().rem_euclid(360.0);
        }

        r.path_history.insert(0, [r.lat, r.lon]);
        r.path_history.truncate(PATH_HISTORY_CAP);

        r.battery_level = (r.battery_level - 0.15 * dt_secs).max(0.0);
        if r.battery_level < 15.0 && r.mission_status != MissionStatus::Emergency {
            r.mission_status = MissionStatus::Emergency;
            return Some(format!("LOW BATTERY: {} BELOW 15%", r.id));
        }
        None
    }
}

struct Sim {
    uavs: Vec<SimUav>,
    geofences: Vec<Geofence>,
}

impl Sim {
    fn new(count: usize) -> Self {
        Self {
            uavs: (0..count).map(SimUav::spawn).collect(),
            geofences: vec![
                Geofence {
                    id: "NFZ-001".to_string(),
                    name: "Restricted Zone Alpha".to_string(),
                    coordinates: vec![
                        [12.88, 80.18],
                        [12.90, 80.18],
                        [12.90, 80.21],
                        [12.88, 80.21],
                    ],
                    color: "red".to_string(),
                },
                Geofence {
                    id: "NFZ-002".to_string(),
                    name: "Airfield Perimeter".to_string(),
                    coordinates: vec![
                        [12.80, 80.10],
                        [12.82, 80.10],
                        [12.82, 80.13],
                        [12.80, 80.13],
                    ],
                    color: "orange".to_string(),
                },
            ],
        }
    }

    fn records(&self) -> Vec<UavRecord> {
        self.uavs.iter().map(|u| u.record.clone()).collect()
    }

    fn apply_command(&mut self, uav_id: &str, command: &str) -> bool {
        let Some(uav) = self.uavs.iter_mut().find(|u| u.record.id == uav_id) else {
            return false;
        };
        let r = &mut uav.record;
        match command {
            "pause" => {
                r.paused = !r.paused;
                r.mission_status = if r.paused {
                    MissionStatus::Paused
                } else {
                    MissionStatus::EnRoute
                };
                true
            }
            "rtb" => {
                r.paused = false;
                r.mission_status = MissionStatus::Rtb;
                true
            }
            "kill" => {
                r.paused = false;
                r.mission_status = MissionStatus::Emergency;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone)]
struct AppState {
    sim: Arc<Mutex<Sim>>,
    stream: broadcast::Sender<String>,
}

#[derive(Debug, Deserialize)]
struct CommandBody {
    command: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let (stream, _) = broadcast::channel(64);
    let state = AppState {
        sim: Arc::new(Mutex::new(Sim::new(args.uavs))),
        stream,
    };

    tokio::spawn(simulation_loop(state.clone(), args.tick_ms));

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/stream", get(ws_handler))
        .route("/api/uav/:id/command", post(unified_command))
        .route("/api/uav/:id/:verb", post(per_verb_command))
        .with_state(state)
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Mock backend on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn simulation_loop(state: AppState, tick_ms: u64) {
    let dt = tick_ms as f64 / 1000.0;
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));

    loop {
        interval.tick().await;

        let (records, alerts) = {
            let mut sim = state.sim.lock().unwrap();
            let mut alerts = Vec::new();
            for uav in &mut sim.uavs {
                if let Some(message) = uav.tick(dt) {
                    alerts.push(message);
                }
            }
            (sim.records(), alerts)
        };

        let frame = json!({ "event": "uav_update", "data": records }).to_string();
        let _ = state.stream.send(frame);

        if !alerts.is_empty() {
            let data: Vec<_> = alerts
                .into_iter()
                .map(|message| {
                    json!({
                        "severity": "high",
                        "message": message,
                        "timestamp": chrono::Utc::now(),
                        "type": "low_battery",
                    })
                })
                .collect();
            let _ = state
                .stream
                .send(json!({ "event": "alerts", "data": data }).to_string());
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut rx = state.stream.subscribe();

    // New subscribers get the current picture before the tick stream.
    let (records, fences) = {
        let sim = state.sim.lock().unwrap();
        (sim.records(), sim.geofences.clone())
    };
    let initial = [
        json!({ "event": "uav_data", "data": records }).to_string(),
        json!({ "event": "geofence_data", "data": fences }).to_string(),
    ];
    for frame in initial {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
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
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
        }
    }
}

async fn unified_command(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<CommandBody>,
) -> Json<serde_json::Value> {
    let success = state.sim.lock().unwrap().apply_command(&id, &body.command);
    Json(json!({ "success": success }))
}

async fn per_verb_command(
    Path((id, verb)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    let success = state.sim.lock().unwrap().apply_command(&id, &verb);
    Json(json!({ "success": success }))
}
