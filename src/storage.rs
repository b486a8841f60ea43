use crate::errors::AppError;
use crate::models::{ReminderSettings, TrackerData};
use crate::reminders::migrate_settings;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_tracker_path() -> PathBuf {
    env::var("HYDRO_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/tracker.json"))
}

pub fn resolve_reminders_path() -> PathBuf {
    env::var("HYDRO_REMINDERS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/reminders.json"))
}

/// Malformed or missing tracker data is never fatal; every field defaults
/// independently via serde and a broken file falls back to a fresh state.
pub async fn load_tracker(path: &Path) -> TrackerData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse tracker data, starting fresh: {err}");
                TrackerData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => TrackerData::default(),
        Err(err) => {
            error!("failed to read tracker data: {err}");
            TrackerData::default()
        }
    }
}

/// Reminder settings pass through the schema upgrade before use, so blobs
/// written by older versions load cleanly.
pub async fn load_reminders(path: &Path) -> ReminderSettings {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => migrate_settings(value),
            Err(err) => {
                error!("failed to parse reminder settings: {err}");
                ReminderSettings::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ReminderSettings::default(),
        Err(err) => {
            error!("failed to read reminder settings: {err}");
            ReminderSettings::default()
        }
    }
}

pub async fn persist_tracker(path: &Path, data: &TrackerData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

pub async fn persist_reminders(path: &Path, settings: &ReminderSettings) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(settings).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
