pub mod cards;
pub mod models;
pub mod reconcile;
pub mod ring;
pub mod scene;
pub mod store;
pub mod styling;
pub mod surface;

pub use cards::{UavCard, UavDetail};
pub use models::{
    Alert, AlertSeverity, CommandVerb, Geofence, LogEntry, LogLevel, MissionStatus, ThreatLevel,
    UavRecord, UavType, VideoFeedStatus,
};
pub use reconcile::{MapReconciler, UnknownLayer};
pub use ring::RingBuffer;
pub use scene::{FenceSpec, MarkerSpec, PathSpec, Scene, WaypointSpec};
pub use store::ViewStateStore;
pub use styling::{battery_class, threat_class, uav_color, BatteryClass};
pub use surface::{MapSurface, RecordingSurface, SurfaceOp};
