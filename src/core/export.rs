use crate::core::params::RequestParams;
use crate::domain::model::ExportRecord;
use crate::utils::error::{Result, SandboxError};
use crate::utils::headers::{content_disposition, DispositionType};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rand::Rng;

pub const DEFAULT_COUNT: u64 = 10;
pub const MAX_VALUE: u32 = 10_000;

/// `count` records with sequential ids and random values in `0..=MAX_VALUE`.
pub fn generate_records(count: u64) -> Result<Vec<ExportRecord>> {
    let requested = usize::try_from(count)
        .map_err(|_| SandboxError::AllocationError { requested: usize::MAX })?;

    let mut records = Vec::new();
    records
        .try_reserve_exact(requested)
        .map_err(|_| SandboxError::AllocationError { requested })?;

    let mut rng = rand::thread_rng();
    records.extend((0..count).map(|id| ExportRecord {
        id,
        value: rng.gen_range(0..=MAX_VALUE),
    }));

    Ok(records)
}

pub async fn export(params: RequestParams) -> Result<Response> {
    let count = params.positive_or("count", DEFAULT_COUNT);
    tracing::debug!("Exporting {} records", count);

    let records = generate_records(count)?;
    let body = serde_json::to_vec(&records)?;

    let disposition = content_disposition(
        DispositionType::Attachment,
        &format!("{}_items.json", count),
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_records_ids_and_bounds() {
        let records = generate_records(500).unwrap();

        assert_eq!(records.len(), 500);
        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.id, idx as u64);
            assert!(record.value <= MAX_VALUE);
        }
    }

    #[test]
    fn test_generate_records_varies() {
        let first = generate_records(50).unwrap();
        let second = generate_records(50).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_unreservable_count_fails_cleanly() {
        let result = generate_records(u64::MAX);
        assert!(matches!(result, Err(SandboxError::AllocationError { .. })));
    }
}
