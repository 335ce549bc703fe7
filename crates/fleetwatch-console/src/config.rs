//! Console configuration from environment.

use std::env;

use fleetwatch_link::EndpointStyle;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub stream_path: String,
    pub screen_port: u16,
    pub alert_capacity: usize,
    pub log_capacity: usize,
    pub max_feed_tiles: usize,
    pub layer_set: Vec<String>,
    pub default_layer: String,
    pub show_paths: bool,
    pub endpoint_style: EndpointStyle,
    pub prefs_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend_url: env::var("FLEETWATCH_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            stream_path: env::var("FLEETWATCH_STREAM_PATH")
                .unwrap_or_else(|_| "/stream".to_string()),
            screen_port: env::var("FLEETWATCH_SCREEN_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            alert_capacity: env::var("FLEETWATCH_ALERT_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            log_capacity: env::var("FLEETWATCH_LOG_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            max_feed_tiles: env::var("FLEETWATCH_MAX_FEED_TILES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            layer_set: env::var("FLEETWATCH_LAYERS")
                .map(|s| {
                    s.split(',')
                        .map(|l| l.trim().to_string())
                        .filter(|l| !l.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    ["satellite", "terrain", "street", "dark"]
                        .iter()
                        .map(|l| l.to_string())
                        .collect()
                }),
            default_layer: env::var("FLEETWATCH_DEFAULT_LAYER")
                .unwrap_or_else(|_| "satellite".to_string()),
            show_paths: env::var("FLEETWATCH_SHOW_PATHS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            endpoint_style: match env::var("FLEETWATCH_LEGACY_COMMANDS").as_deref() {
                Ok("1") | Ok("true") => EndpointStyle::PerVerb,
                _ => EndpointStyle::Unified,
            },
            prefs_path: env::var("FLEETWATCH_PREFS_PATH")
                .unwrap_or_else(|_| "fleetwatch-prefs.json".to_string()),
        }
    }
}
