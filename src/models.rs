use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_DAILY_GOAL_ML: u32 = 2000;
pub const GOAL_MIN_ML: u32 = 500;
pub const GOAL_MAX_ML: u32 = 10_000;
pub const MAX_ENTRY_ML: u32 = 5000;
pub const MAX_UNDO_ENTRIES: usize = 10;
pub const HYDRATION_HERO_ML: u32 = 3000;
pub const WEEK_WARRIOR_DAYS: u32 = 7;

pub const DEFAULT_REMINDER_TIMES: [&str; 3] = ["09:00", "13:00", "18:00"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub seq: u64,
    pub amount_ml: u32,
    /// Display label, local wall clock "HH:MM".
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DayRecord {
    pub date: String,
    pub amount_ml: u32,
    /// Newest first.
    pub activities: Vec<Activity>,
    pub next_seq: u64,
}

/// Each undo entry names the exact activity it reverses by `seq`, so the
/// undo stack and the activity list cannot silently drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoEntry {
    pub seq: u64,
    pub amount_ml: u32,
    pub crossed_goal: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievements {
    pub first_drop: bool,
    pub goal_master: bool,
    pub week_warrior: bool,
    pub hydration_hero: bool,
}

/// Persisted and exported with camelCase keys, matching every other wire
/// payload and the storage keys of the original browser builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerData {
    pub daily_goal_ml: u32,
    /// Keyed by local date "YYYY-MM-DD"; the last key is the most recent day.
    pub days: BTreeMap<String, DayRecord>,
    pub streak: u32,
    pub best_streak: u32,
    pub goals_reached: u32,
    pub achievements: Achievements,
    pub undo_stack: Vec<UndoEntry>,
}

impl Default for TrackerData {
    fn default() -> Self {
        Self {
            daily_goal_ml: DEFAULT_DAILY_GOAL_ML,
            days: BTreeMap::new(),
            streak: 0,
            best_streak: 0,
            goals_reached: 0,
            achievements: Achievements::default(),
            undo_stack: Vec::new(),
        }
    }
}

/// Persisted with the storage keys the browser builds used, so legacy blobs
/// can be recognized by field presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReminderSettings {
    pub enabled: bool,
    /// Three "HH:MM" wall-clock slots.
    pub scheduled_times: Vec<String>,
    /// Slot -> local instant "%Y-%m-%dT%H:%M:%S" of the last delivery.
    pub last_fired: BTreeMap<String, String>,
    pub permission_granted: bool,
    pub push_token: Option<String>,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            scheduled_times: DEFAULT_REMINDER_TIMES.iter().map(|t| t.to_string()).collect(),
            last_fired: BTreeMap::new(),
            permission_granted: false,
            push_token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkRequest {
    pub amount_ml: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub daily_goal_ml: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: String,
    pub amount_ml: u32,
    pub daily_goal_ml: u32,
    pub remaining_ml: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub goals_reached: u32,
    pub achievements: Achievements,
    pub activities: Vec<Activity>,
    pub undo_depth: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkResponse {
    pub amount_ml: u32,
    pub crossed_goal: bool,
    pub unlocked: Vec<String>,
    pub undo_depth: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoResponse {
    pub amount_ml: u32,
    pub removed_ml: u32,
    pub uncrossed_goal: bool,
    pub undo_depth: usize,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ReminderUpdateRequest {
    pub enabled: Option<bool>,
    pub scheduled_times: Option<Vec<String>>,
    pub permission_granted: Option<bool>,
    pub push_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: String,
    pub amount_ml: u32,
    pub goal_met: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub total_days: usize,
    pub total_ml: u64,
    pub average_daily_ml: u32,
    pub goals_reached: u32,
    pub streak: u32,
    pub best_streak: u32,
}

/// Superset of the tracker blob exchanged with a remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    #[serde(flatten)]
    pub data: TrackerData,
    /// Local instant "%Y-%m-%dT%H:%M:%S" at which the snapshot was taken.
    pub last_sync: String,
}
