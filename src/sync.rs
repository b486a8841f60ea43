use crate::errors::AppError;
use crate::models::{SyncSnapshot, TrackerData};
use crate::reminders::INSTANT_FORMAT;
use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::info;

pub fn snapshot(data: &TrackerData) -> SyncSnapshot {
    snapshot_at(data, Local::now().naive_local())
}

pub fn snapshot_at(data: &TrackerData, now: NaiveDateTime) -> SyncSnapshot {
    SyncSnapshot {
        data: data.clone(),
        last_sync: now.format(INSTANT_FORMAT).to_string(),
    }
}

/// Newest-wins merge of a remote snapshot into local state. The remote copy
/// only overwrites local data when its sync instant is strictly newer than
/// the local session's most recent day entry; otherwise local stays
/// authoritative and the snapshot is dropped. Returns whether it applied.
pub fn merge_remote(data: &mut TrackerData, snapshot: SyncSnapshot) -> Result<bool, AppError> {
    let sync_at = NaiveDateTime::parse_from_str(&snapshot.last_sync, INSTANT_FORMAT)
        .map_err(|_| AppError::bad_request("invalid lastSync instant"))?;

    if snapshot.data.days.is_empty() {
        return Ok(false);
    }

    let local_latest = data
        .days
        .keys()
        .next_back()
        .and_then(|key| NaiveDate::parse_from_str(key, "%Y-%m-%d").ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0));
    if let Some(local_latest) = local_latest {
        if sync_at <= local_latest {
            return Ok(false);
        }
    }

    info!(last_sync = %snapshot.last_sync, "applying remote snapshot");
    *data = snapshot.data;
    // Undo entries never transfer between sessions.
    data.undo_stack.clear();
    Ok(true)
}
