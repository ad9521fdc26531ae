//! Gateway Health API
//!
//! Exposes process uptime and lobby occupancy.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalHealthReport {
    pub status: String,
    pub uptime_seconds: u64,
    pub online: usize,
    pub waiting: usize,
    pub paired: usize,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<GlobalHealthReport> {
    let stats = state.lobby.lock().await.stats();
    Json(GlobalHealthReport {
        status: "ok".into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        online: stats.online,
        waiting: stats.waiting,
        paired: stats.paired,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobby::{Lobby, LobbyPolicy};
    use crate::moderation::MemoryModerationSink;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn reports_lobby_occupancy() {
        let lobby = Lobby::new(LobbyPolicy::default(), Arc::new(MemoryModerationSink::new())).into_shared();
        {
            let mut guard = lobby.lock().await;
            let (tx, _rx) = mpsc::unbounded_channel();
            let id = guard.connect(tx);
            guard.join(id, Some("solo"), None, vec![]);
        }

        let Json(report) = get_health(State(GatewayState::new(lobby))).await;
        assert_eq!(report.status, "ok");
        assert_eq!((report.online, report.waiting, report.paired), (1, 1, 0));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("uptimeSeconds").is_some());
    }
}
