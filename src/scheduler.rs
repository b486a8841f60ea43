use crate::notify::Notifier;
use crate::reminders::{
    compose_reminder, due_slots_at, mark_fired, overdue_slots_at, REMINDER_TITLE,
};
use crate::state::AppState;
use crate::storage::{persist_reminders, persist_tracker};
use crate::tracker;
use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const TICK_PERIOD: Duration = Duration::from_secs(60);
const CATCH_UP_STAGGER: Duration = Duration::from_secs(3);

/// Owns the single tick loop task. The loop is never patched in place:
/// any schedule change aborts it and spawns a fresh one, so a stale timer
/// can never double-fire alongside its replacement.
pub struct SchedulerHandle {
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn new() -> Self {
        Self { task: None }
    }
}

impl Default for SchedulerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Cancel-then-recreate. Called on startup (with `auto_restore`) and after
/// every settings change. A disabled scheduler ends up with no task at all.
pub async fn restart(state: &AppState, auto_restore: bool) {
    let mut handle = state.scheduler.lock().await;
    if let Some(task) = handle.task.take() {
        task.abort();
    }

    let enabled = state.reminders.lock().await.enabled;
    if !enabled {
        info!("reminder loop stopped");
        return;
    }

    info!(auto_restore, "reminder loop starting");
    let state = state.clone();
    handle.task = Some(tokio::spawn(run_loop(state, auto_restore)));
}

async fn run_loop(state: AppState, auto_restore: bool) {
    if auto_restore {
        catch_up_overdue(&state, Local::now().naive_local()).await;
    }

    let mut ticker = tokio::time::interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        tick(&state, Local::now().naive_local()).await;
    }
}

/// One pass over the configured slots; each due slot fires independently.
pub async fn tick(state: &AppState, now: NaiveDateTime) {
    let due = {
        let settings = state.reminders.lock().await;
        if !settings.enabled {
            return;
        }
        due_slots_at(&settings, now)
    };

    for slot in due {
        fire_slot(state, &slot, now).await;
    }
}

/// Fires slots missed while the app was closed, spaced out so a restore
/// late in the day does not deliver a burst of notifications at once.
async fn catch_up_overdue(state: &AppState, now: NaiveDateTime) {
    let overdue = {
        let settings = state.reminders.lock().await;
        overdue_slots_at(&settings, now)
    };
    if overdue.is_empty() {
        return;
    }

    info!(count = overdue.len(), "catching up on overdue reminders");
    for slot in overdue {
        tokio::time::sleep(CATCH_UP_STAGGER).await;
        fire_slot(state, &slot, now).await;
    }
}

async fn fire_slot(state: &AppState, slot: &str, now: NaiveDateTime) {
    let remaining = {
        let mut tracker = state.tracker.lock().await;
        // The day boundary must be observed even when no user action has
        // touched the tracker since yesterday.
        if tracker::rollover_if_new_day_at(&mut tracker, now.date()) {
            if let Err(err) = persist_tracker(&state.tracker_path, &tracker).await {
                warn!("failed to persist day rollover: {}", err.message);
            }
        }
        tracker::remaining_ml_at(&tracker, now.date())
    };

    if remaining == 0 {
        // Goal already met: suppress delivery without stamping the slot, so
        // a later undo leaves the reminder eligible again today.
        debug!(slot, "goal met, reminder suppressed");
        return;
    }

    let body = compose_reminder(slot, remaining);
    state.notifier.deliver(REMINDER_TITLE, &body);

    let mut settings = state.reminders.lock().await;
    mark_fired(&mut settings, slot, now);
    if let Err(err) = persist_reminders(&state.reminders_path, &settings).await {
        warn!("failed to persist reminder settings: {}", err.message);
    }
}
