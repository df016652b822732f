use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::sensor::{SensorSnapshot, SensorStore};

#[derive(Clone)]
pub struct AppState {
    pub store: SensorStore,
}

pub fn router(store: SensorStore) -> Router {
    Router::new()
        .route("/api/sensors", get(list_sensors))
        .route("/api/sensors/:entity_id", get(get_sensor))
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

pub async fn serve(listen_addr: &str, store: SensorStore) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(addr = listen_addr, "Sensor API listening");
    axum::serve(listener, router(store)).await?;
    Ok(())
}

async fn list_sensors(State(state): State<AppState>) -> Json<Vec<SensorSnapshot>> {
    Json(state.store.list().await)
}

async fn get_sensor(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Result<Json<SensorSnapshot>, StatusCode> {
    state
        .store
        .get(&entity_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_get_sensor_returns_snapshot() {
        let store = SensorStore::new();
        store
            .update(SensorSnapshot::not_found(
                "sensor.cs_faze_clan_upcoming".into(),
                Utc::now(),
            ))
            .await;
        let state = AppState {
            store: store.clone(),
        };

        let Json(snap) = get_sensor(
            State(state),
            Path("sensor.cs_faze_clan_upcoming".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(snap.entity_id, "sensor.cs_faze_clan_upcoming");
        assert_eq!(snap.state, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_unknown_sensor_is_404() {
        let state = AppState {
            store: SensorStore::new(),
        };
        let err = get_sensor(State(state), Path("sensor.cs_missing".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_sensors_returns_all() {
        let store = SensorStore::new();
        let now = Utc::now();
        store
            .update(SensorSnapshot::not_found("sensor.cs_a_upcoming".into(), now))
            .await;
        store
            .update(SensorSnapshot::not_found("sensor.cs_b_completed".into(), now))
            .await;
        let state = AppState { store };

        let Json(all) = list_sensors(State(state)).await;
        assert_eq!(all.len(), 2);
    }
}
