//! Batch input files: tenant schedules and already persisted session keys.

use std::fs;
use std::path::Path;

use halaqa_service::batch::{ExistingSession, TenantSchedule};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

fn parse_json<T: DeserializeOwned>(text: &str, origin: &str) -> AppResult<T> {
    serde_json::from_str(text).map_err(|source| AppError::Json {
        path: origin.to_string(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let origin = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: origin.clone(),
        source,
    })?;
    parse_json(&text, &origin)
}

/// ## Summary
/// Parses a JSON array of tenant schedules.
///
/// ## Errors
/// Returns `AppError::Json` if the text is not a valid schedule array.
pub fn parse_tenants(text: &str) -> AppResult<Vec<TenantSchedule>> {
    parse_json(text, "<input>")
}

/// ## Summary
/// Reads the tenant schedules file.
///
/// ## Errors
/// Returns `AppError::Io` if the file cannot be read and `AppError::Json` if
/// it does not hold a schedule array.
pub fn read_tenants(path: impl AsRef<Path>) -> AppResult<Vec<TenantSchedule>> {
    let tenants: Vec<TenantSchedule> = read_json(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), tenants = tenants.len(), "Loaded tenant schedules");
    Ok(tenants)
}

/// ## Summary
/// Reads persisted `(scheduleId, scheduledAt)` keys; no path means nothing
/// is persisted yet.
///
/// ## Errors
/// Returns `AppError::Io` if the file cannot be read and `AppError::Json` if
/// it does not hold a key array.
pub fn read_existing(path: Option<impl AsRef<Path>>) -> AppResult<Vec<ExistingSession>> {
    let Some(path) = path else {
        tracing::debug!("No existing sessions file configured");
        return Ok(Vec::new());
    };

    let existing: Vec<ExistingSession> = read_json(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), existing = existing.len(), "Loaded existing sessions");
    Ok(existing)
}
