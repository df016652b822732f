use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::{Config, TeamSpec};
use crate::error::ExtractError;
use crate::sensor::{SensorSnapshot, SensorStore};
use crate::sources::MatchSource;

/// Spawn the background poll loop. Each cycle refreshes every tracked team
/// concurrently; a slow cycle skips missed ticks instead of bursting.
pub fn spawn(
    config: &Config,
    source: Arc<dyn MatchSource>,
    store: SensorStore,
) -> JoinHandle<()> {
    let teams = config.teams.clone();
    let period = Duration::from_secs(config.poll_interval_secs);

    tokio::spawn(async move {
        // Small startup jitter so restarts across instances don't hit the
        // upstream at the same instant.
        let jitter = rand::thread_rng().gen_range(0..=5);
        tokio::time::sleep(Duration::from_secs(jitter)).await;

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            info!(source = source.name(), teams = teams.len(), "Poll cycle starting");
            let tasks = teams
                .iter()
                .map(|team| refresh_team(source.as_ref(), &store, team));
            join_all(tasks).await;
            debug!("Poll cycle finished");
        }
    })
}

async fn refresh_team(source: &dyn MatchSource, store: &SensorStore, team: &TeamSpec) {
    let entity_id = team.entity_id();
    let now = Utc::now();
    match source.fetch_match(team).await {
        Ok(record) => {
            debug!(
                entity_id,
                status = record.status.as_str(),
                opponent = %record.opponent.name,
                "Sensor updated"
            );
            store.update(SensorSnapshot::found(entity_id, &record, now)).await;
        }
        Err(ExtractError::Ambiguous {
            tracked,
            left,
            right,
        }) => {
            error!(entity_id, tracked, left, right, "Could not attribute match sides");
            store.update(SensorSnapshot::ambiguous(entity_id, now)).await;
        }
        Err(err) if err.is_expected() => {
            info!(entity_id, %err, "No usable match");
            store.update(SensorSnapshot::not_found(entity_id, now)).await;
        }
        Err(err) => {
            // Transport failure degrades the sensor for this cycle too; a
            // stale record would misreport a match that may have moved.
            warn!(entity_id, %err, "Fetch failed");
            store.update(SensorSnapshot::not_found(entity_id, now)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchPhase;
    use crate::error::Result;
    use crate::model::{MatchRecord, MatchStatus, TeamRef, TournamentRef};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSource {
        calls: AtomicUsize,
        outcome: fn(usize) -> Result<MatchRecord>,
    }

    #[async_trait]
    impl MatchSource for ScriptedSource {
        async fn fetch_match(&self, _team: &TeamSpec) -> Result<MatchRecord> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)(n)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn spec() -> TeamSpec {
        TeamSpec {
            name: "FaZe_Clan".to_string(),
            phase: MatchPhase::Upcoming,
            show_scores: false,
        }
    }

    fn record() -> MatchRecord {
        MatchRecord {
            team: TeamRef {
                abbreviation: "FaZe_Clan".into(),
                name: "FaZe Clan".into(),
                link: String::new(),
                logo: String::new(),
                score: None,
            },
            opponent: TeamRef::tbd(""),
            tournament: TournamentRef::default(),
            start_time: 0,
            status: MatchStatus::Pre,
            streams: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_refresh_publishes_found_record() {
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            outcome: |_| Ok(record()),
        };
        let store = SensorStore::new();
        refresh_team(&source, &store, &spec()).await;

        let snap = store.get("sensor.cs_faze_clan_upcoming").await.unwrap();
        assert_eq!(snap.state, "PRE");
    }

    #[tokio::test]
    async fn test_refresh_marks_ambiguous() {
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            outcome: |_| {
                Err(ExtractError::Ambiguous {
                    tracked: "FaZe_Clan".into(),
                    left: "G2".into(),
                    right: "NAVI".into(),
                })
            },
        };
        let store = SensorStore::new();
        refresh_team(&source, &store, &spec()).await;

        let snap = store.get("sensor.cs_faze_clan_upcoming").await.unwrap();
        assert_eq!(snap.state, "AMBIGUOUS");
    }

    #[tokio::test]
    async fn test_refresh_degrades_to_not_found() {
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            outcome: |_| Err(ExtractError::not_found("matches for team")),
        };
        let store = SensorStore::new();
        refresh_team(&source, &store, &spec()).await;

        let snap = store.get("sensor.cs_faze_clan_upcoming").await.unwrap();
        assert_eq!(snap.state, "NOT_FOUND");
        assert!(snap.attributes.is_empty());
    }

    struct UnreachableSource;

    #[async_trait]
    impl MatchSource for UnreachableSource {
        async fn fetch_match(&self, _team: &TeamSpec) -> Result<MatchRecord> {
            let err = reqwest::Client::new()
                .get("http://127.0.0.1:1/")
                .timeout(Duration::from_millis(200))
                .send()
                .await
                .unwrap_err();
            Err(err.into())
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_previous_snapshot() {
        let good = ScriptedSource {
            calls: AtomicUsize::new(0),
            outcome: |_| Ok(record()),
        };
        let store = SensorStore::new();
        refresh_team(&good, &store, &spec()).await;
        assert_eq!(
            store.get("sensor.cs_faze_clan_upcoming").await.unwrap().state,
            "PRE"
        );

        refresh_team(&UnreachableSource, &store, &spec()).await;
        let snap = store.get("sensor.cs_faze_clan_upcoming").await.unwrap();
        assert_eq!(snap.state, "NOT_FOUND");
        assert!(snap.attributes.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_markup_degrades_to_not_found() {
        let source = ScriptedSource {
            calls: AtomicUsize::new(0),
            outcome: |_| Err(ExtractError::malformed("timestamp", "not a number")),
        };
        let store = SensorStore::new();
        refresh_team(&source, &store, &spec()).await;

        let snap = store.get("sensor.cs_faze_clan_upcoming").await.unwrap();
        assert_eq!(snap.state, "NOT_FOUND");
    }
}
