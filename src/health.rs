use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

use crate::ports::TransactionRepository;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage: DependencyStatus,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        matches!(self.storage, DependencyStatus::Healthy { .. })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy { status: String, latency_ms: u64 },
    Unhealthy { status: String, error: String },
}

pub async fn check_storage(repository: &dyn TransactionRepository) -> DependencyStatus {
    let start = Instant::now();
    match repository.health_check().await {
        Ok(()) => DependencyStatus::Healthy {
            status: "healthy".to_string(),
            latency_ms: start.elapsed().as_millis() as u64,
        },
        Err(e) => DependencyStatus::Unhealthy {
            status: "unhealthy".to_string(),
            error: e.to_string(),
        },
    }
}

pub async fn health_report(
    repository: &dyn TransactionRepository,
    start_time: Instant,
) -> HealthResponse {
    let storage = check_storage(repository).await;
    let status = match storage {
        DependencyStatus::Healthy { .. } => "healthy",
        DependencyStatus::Unhealthy { .. } => "unhealthy",
    };

    HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
        storage,
    }
}
