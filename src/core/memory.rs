use crate::app::router::AppState;
use crate::core::params::RequestParams;
use crate::domain::model::MemorySnapshot;
use crate::utils::error::{Result, SandboxError};
use crate::utils::monitor::SystemMonitor;
use axum::extract::State;
use axum::Json;

pub const DEFAULT_LENGTH: u64 = 100_000_000;

/// Allocates `length` elements, reverses them and drops them.
pub fn allocation_workload(length: u64) -> Result<()> {
    let requested = usize::try_from(length)
        .map_err(|_| SandboxError::AllocationError { requested: usize::MAX })?;

    let mut values: Vec<u32> = Vec::new();
    values
        .try_reserve_exact(requested)
        .map_err(|_| SandboxError::AllocationError { requested })?;

    values.extend((0..requested).map(|i| i as u32));
    values.reverse();
    std::hint::black_box(&values);

    Ok(())
}

pub fn probe(monitor: &SystemMonitor, length: u64) -> Result<MemorySnapshot> {
    allocation_workload(length)?;
    monitor.log_stats("memory probe");
    Ok(monitor.snapshot())
}

pub async fn memory_usage(
    State(state): State<AppState>,
    params: RequestParams,
) -> Result<Json<MemorySnapshot>> {
    let length = params.positive_or("length", DEFAULT_LENGTH);
    tracing::debug!("Running allocation probe with {} elements", length);

    let monitor = state.monitor.clone();
    let snapshot = tokio::task::spawn_blocking(move || probe(&monitor, length))
        .await
        .map_err(|e| SandboxError::TaskError {
            message: e.to_string(),
        })??;

    Ok(Json(snapshot))
}
