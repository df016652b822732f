use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::model::{MatchRecord, MatchStatus};

/// One published sensor: an entity id, a state string and a flat attribute
/// map, mirroring how home-automation platforms model sensors.
#[derive(Debug, Clone, Serialize)]
pub struct SensorSnapshot {
    pub entity_id: String,
    pub state: String,
    pub attributes: Map<String, Value>,
    pub last_update: DateTime<Utc>,
}

impl SensorSnapshot {
    pub fn found(entity_id: String, record: &MatchRecord, now: DateTime<Utc>) -> Self {
        SensorSnapshot {
            entity_id,
            state: record.status.as_str().to_string(),
            attributes: record.attributes(now),
            last_update: now,
        }
    }

    /// No relevant match; the sensor degrades instead of going stale.
    pub fn not_found(entity_id: String, now: DateTime<Utc>) -> Self {
        SensorSnapshot {
            entity_id,
            state: MatchStatus::NotFound.as_str().to_string(),
            attributes: Map::new(),
            last_update: now,
        }
    }

    /// Side assignment could not be resolved; distinct from NOT_FOUND so a
    /// dashboard can tell "no match listed" from "listed but unattributable".
    pub fn ambiguous(entity_id: String, now: DateTime<Utc>) -> Self {
        SensorSnapshot {
            entity_id,
            state: "AMBIGUOUS".to_string(),
            attributes: Map::new(),
            last_update: now,
        }
    }
}

/// Shared in-memory sensor registry. Snapshots are replaced whole, so a
/// reader never observes a half-updated sensor.
#[derive(Clone, Default)]
pub struct SensorStore {
    inner: Arc<RwLock<HashMap<String, SensorSnapshot>>>,
}

impl SensorStore {
    pub fn new() -> Self {
        SensorStore::default()
    }

    pub async fn update(&self, snapshot: SensorSnapshot) {
        self.inner
            .write()
            .await
            .insert(snapshot.entity_id.clone(), snapshot);
    }

    pub async fn get(&self, entity_id: &str) -> Option<SensorSnapshot> {
        self.inner.read().await.get(entity_id).cloned()
    }

    pub async fn list(&self) -> Vec<SensorSnapshot> {
        let mut all: Vec<SensorSnapshot> = self.inner.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        all
    }
}
