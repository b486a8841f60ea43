use crate::errors::AppError;
use crate::models::{
    DrinkRequest, DrinkResponse, GoalRequest, ReminderSettings, ReminderUpdateRequest,
    StatsResponse, SyncSnapshot, TodayResponse, TrackerData, UndoResponse,
};
use crate::notify::{Banner, Notifier};
use crate::reminders;
use crate::scheduler;
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::{persist_reminders, persist_tracker};
use crate::sync;
use crate::tracker;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};
use chrono::Local;
use serde_json::{json, Value};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let today = refreshed_today(&state).await?;
    Ok(Html(render_index(&today)))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    Ok(Json(refreshed_today(&state).await?))
}

pub async fn drink(
    State(state): State<AppState>,
    Json(payload): Json<DrinkRequest>,
) -> Result<Json<DrinkResponse>, AppError> {
    let mut data = state.tracker.lock().await;
    let outcome = tracker::add_water(&mut data, payload.amount_ml)?;
    persist_tracker(&state.tracker_path, &data).await?;

    Ok(Json(DrinkResponse {
        amount_ml: outcome.amount_ml,
        crossed_goal: outcome.crossed_goal,
        unlocked: outcome.unlocked.iter().map(|id| id.to_string()).collect(),
        undo_depth: data.undo_stack.len(),
    }))
}

pub async fn undo(State(state): State<AppState>) -> Result<Json<UndoResponse>, AppError> {
    let today = Local::now().date_naive();
    let mut data = state.tracker.lock().await;
    // Settle the day boundary first: a stale stack from yesterday is cleared
    // by the rollover rather than replayed against today's record.
    if tracker::rollover_if_new_day_at(&mut data, today) {
        persist_tracker(&state.tracker_path, &data).await?;
    }
    let outcome = tracker::undo_last_entry_at(&mut data, today)
        .ok_or_else(|| AppError::bad_request("nothing to undo"))?;
    persist_tracker(&state.tracker_path, &data).await?;

    Ok(Json(UndoResponse {
        amount_ml: outcome.amount_ml,
        removed_ml: outcome.removed_ml,
        uncrossed_goal: outcome.uncrossed_goal,
        undo_depth: data.undo_stack.len(),
    }))
}

pub async fn set_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<Value>, AppError> {
    let mut data = state.tracker.lock().await;
    tracker::set_daily_goal(&mut data, payload.daily_goal_ml)?;
    persist_tracker(&state.tracker_path, &data).await?;
    Ok(Json(json!({ "dailyGoalMl": data.daily_goal_ml })))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.tracker.lock().await;
    Ok(Json(build_stats(&data)))
}

pub async fn get_reminders(
    State(state): State<AppState>,
) -> Result<Json<ReminderSettings>, AppError> {
    let settings = state.reminders.lock().await;
    Ok(Json(settings.clone()))
}

pub async fn update_reminders(
    State(state): State<AppState>,
    Json(payload): Json<ReminderUpdateRequest>,
) -> Result<Json<ReminderSettings>, AppError> {
    let (schedule_changed, updated) = {
        let mut settings = state.reminders.lock().await;
        let changed = reminders::apply_update(&mut settings, payload)?;
        persist_reminders(&state.reminders_path, &settings).await?;
        (changed, settings.clone())
    };

    // The tick loop is never patched in place; any schedule change swaps it.
    if schedule_changed {
        scheduler::restart(&state, false).await;
    }

    Ok(Json(updated))
}

/// Manual "remind me now" button; bypasses slot bookkeeping entirely.
pub async fn notify_test(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let remaining = {
        let data = state.tracker.lock().await;
        tracker::remaining_ml_at(&data, Local::now().date_naive())
    };
    let body = reminders::compose_manual(remaining);
    state.notifier.deliver(reminders::REMINDER_TITLE, &body);
    Ok(Json(json!({ "sent": true })))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Banner>> {
    Json(state.banners.drain())
}

pub async fn sync_export(State(state): State<AppState>) -> Result<Json<SyncSnapshot>, AppError> {
    let data = state.tracker.lock().await;
    Ok(Json(sync::snapshot(&data)))
}

pub async fn sync_import(
    State(state): State<AppState>,
    Json(snapshot): Json<SyncSnapshot>,
) -> Result<Json<Value>, AppError> {
    let mut data = state.tracker.lock().await;
    let applied = sync::merge_remote(&mut data, snapshot)?;
    if applied {
        persist_tracker(&state.tracker_path, &data).await?;
    }
    Ok(Json(json!({ "applied": applied })))
}

/// Explicit full reset of tracker data; reminder settings are untouched.
pub async fn reset(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut data = state.tracker.lock().await;
    *data = TrackerData::default();
    persist_tracker(&state.tracker_path, &data).await?;
    info!("tracker data reset");
    Ok(Json(json!({ "reset": true })))
}

async fn refreshed_today(state: &AppState) -> Result<TodayResponse, AppError> {
    let today = Local::now().date_naive();
    let mut data = state.tracker.lock().await;
    // Day-boundary check runs at every UI refresh point.
    if tracker::rollover_if_new_day_at(&mut data, today) {
        persist_tracker(&state.tracker_path, &data).await?;
    }

    let record = data.days.get(&today.to_string());
    Ok(TodayResponse {
        date: today.to_string(),
        amount_ml: record.map(|r| r.amount_ml).unwrap_or(0),
        daily_goal_ml: data.daily_goal_ml,
        remaining_ml: tracker::remaining_ml_at(&data, today),
        streak: data.streak,
        best_streak: data.best_streak,
        goals_reached: data.goals_reached,
        achievements: data.achievements,
        activities: record.map(|r| r.activities.clone()).unwrap_or_default(),
        undo_depth: data.undo_stack.len(),
    })
}
