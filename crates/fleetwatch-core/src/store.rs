//! View-state store: the single owner of the current UAV record set.

use std::collections::HashMap;

use crate::models::{MissionStatus, UavRecord};

/// In-memory mapping from UAV id to its last-known record, kept in snapshot
/// order. The store is the only writer; renderers re-project it on every
/// pass and hold nothing across snapshots.
#[derive(Debug, Default)]
pub struct ViewStateStore {
    records: Vec<UavRecord>,
    index: HashMap<String, usize>,
}

impl ViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swap the whole record set. No partial merge: a record
    /// absent from the new snapshot is gone. Duplicate ids within one
    /// snapshot keep the last occurrence.
    pub fn replace_all(&mut self, records: Vec<UavRecord>) {
        let mut deduped: Vec<UavRecord> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for record in records {
            match index.get(&record.id) {
                Some(&pos) => deduped[pos] = record,
                None => {
                    index.insert(record.id.clone(), deduped.len());
                    deduped.push(record);
                }
            }
        }

        self.records = deduped;
        self.index = index;
    }

    pub fn get(&self, id: &str) -> Option<&UavRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Records in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &UavRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count shown on the "ACTIVE UAVS" readout: everything not idle and
    /// not in emergency.
    pub fn active_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| {
                r.mission_status != MissionStatus::Idle
                    && r.mission_status != MissionStatus::Emergency
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UavType;

    fn record(id: &str, status: MissionStatus) -> UavRecord {
        UavRecord {
            id: id.to_string(),
            uav_type: UavType::Quadcopter,
            model: None,
            lat: 12.84,
            lon: 80.15,
            altitude: 120.0,
            speed: 10.0,
            heading: 90.0,
            battery_level: 80.0,
            fuel_level: None,
            mission_status: status,
            paused: false,
            threat_level: None,
            path_history: Vec::new(),
            waypoints: Vec::new(),
            current_waypoint: 0,
            home_lat: 12.84,
            home_lon: 80.15,
        }
    }

    #[test]
    fn replace_all_drops_stale_records() {
        let mut store = ViewStateStore::new();
        store.replace_all(vec![
            record("A", MissionStatus::EnRoute),
            record("B", MissionStatus::Idle),
        ]);
        assert_eq!(store.len(), 2);

        store.replace_all(vec![record("B", MissionStatus::EnRoute)]);
        assert_eq!(store.len(), 1);
        assert!(store.get("A").is_none());
        assert!(store.get("B").is_some());
    }

    #[test]
    fn duplicate_ids_keep_last_occurrence() {
        let mut store = ViewStateStore::new();
        let mut second = record("A", MissionStatus::EnRoute);
        second.battery_level = 42.0;
        store.replace_all(vec![record("A", MissionStatus::Idle), second]);

        assert_eq!(store.len(), 1);
        let kept = store.get("A").unwrap();
        assert_eq!(kept.battery_level, 42.0);
        assert_eq!(kept.mission_status, MissionStatus::EnRoute);
    }

    #[test]
    fn active_count_excludes_idle_and_emergency() {
        let mut store = ViewStateStore::new();
        store.replace_all(vec![
            record("A", MissionStatus::EnRoute),
            record("B", MissionStatus::Idle),
            record("C", MissionStatus::Emergency),
            record("D", MissionStatus::Rtb),
        ]);
        assert_eq!(store.active_count(), 2);
    }

    #[test]
    fn iter_preserves_snapshot_order() {
        let mut store = ViewStateStore::new();
        store.replace_all(vec![
            record("C", MissionStatus::Idle),
            record("A", MissionStatus::Idle),
            record("B", MissionStatus::Idle),
        ]);
        let ids: Vec<_> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }
}
