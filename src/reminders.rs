use crate::errors::AppError;
use crate::models::{ReminderSettings, ReminderUpdateRequest, DEFAULT_REMINDER_TIMES};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::IndexedRandom;
use serde_json::{json, Map, Value};
use tracing::{error, info};

/// Local instants in the settings blob are stored without an offset; the
/// "already fired today" check is a plain date comparison in local time.
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const WINDOW_MINUTES: i64 = 1;
pub const REMINDER_TITLE: &str = "HydroTracker Reminder";

const REMINDER_PHRASES: [&str; 15] = [
    "Time to hydrate!",
    "Your body needs water!",
    "Stay hydrated, stay healthy!",
    "Water break!",
    "Drink up for better health!",
    "Keep that water flowing!",
    "Your hydration check-in!",
    "Don't forget to drink water!",
    "Sip some water now!",
    "Hydration reminder!",
    "Water is life, drink up!",
    "Feeling thirsty? Here's your reminder!",
    "Cheers to your health - drink water!",
    "Your body says thank you!",
    "Every glass counts!",
];

pub fn parse_slot(slot: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(slot, "%H:%M").ok()
}

/// Same-day clock arithmetic only; the date component is irrelevant here.
pub fn within_window(now: NaiveTime, slot: &str, window_minutes: i64) -> bool {
    let Some(slot_time) = parse_slot(slot) else {
        return false;
    };
    (now - slot_time).num_minutes().abs() <= window_minutes
}

pub fn fired_today(settings: &ReminderSettings, slot: &str, today: NaiveDate) -> bool {
    settings
        .last_fired
        .get(slot)
        .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, INSTANT_FORMAT).ok())
        .is_some_and(|fired| fired.date() == today)
}

/// Slots whose window covers `now` and which have not fired today yet.
pub fn due_slots_at(settings: &ReminderSettings, now: NaiveDateTime) -> Vec<String> {
    settings
        .scheduled_times
        .iter()
        .filter(|slot| {
            within_window(now.time(), slot, WINDOW_MINUTES) && !fired_today(settings, slot, now.date())
        })
        .cloned()
        .collect()
}

/// Slots whose time of day already passed today without a fire. Used once on
/// auto-restore to catch up on reminders missed while the app was closed.
pub fn overdue_slots_at(settings: &ReminderSettings, now: NaiveDateTime) -> Vec<String> {
    settings
        .scheduled_times
        .iter()
        .filter(|slot| {
            parse_slot(slot).is_some_and(|t| t < now.time())
                && !fired_today(settings, slot, now.date())
        })
        .cloned()
        .collect()
}

pub fn mark_fired(settings: &mut ReminderSettings, slot: &str, now: NaiveDateTime) {
    settings
        .last_fired
        .insert(slot.to_string(), now.format(INSTANT_FORMAT).to_string());
}

pub fn format_time_12h(slot: &str) -> String {
    match parse_slot(slot) {
        Some(time) => {
            use chrono::Timelike;
            let (hour, minute) = (time.hour(), time.minute());
            let period = if hour >= 12 { "PM" } else { "AM" };
            let hour12 = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{hour12}:{minute:02} {period}")
        }
        None => slot.to_string(),
    }
}

pub fn compose_reminder(slot: &str, remaining_ml: u32) -> String {
    let phrase = REMINDER_PHRASES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(REMINDER_PHRASES[0]);
    format!(
        "{phrase} ({}) You still need {remaining_ml}ml to reach your daily goal.",
        format_time_12h(slot)
    )
}

pub fn compose_manual(remaining_ml: u32) -> String {
    let phrase = REMINDER_PHRASES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(REMINDER_PHRASES[0]);
    if remaining_ml > 0 {
        format!("{phrase} You still need {remaining_ml}ml to reach your daily goal.")
    } else {
        format!("{phrase} You've reached your daily goal today. Great job!")
    }
}

/// Upgrades a persisted settings value from any known older schema before
/// deserialization. Steps are applied in order; unknown damage falls back to
/// defaults field by field.
pub fn migrate_settings(mut value: Value) -> ReminderSettings {
    if let Some(obj) = value.as_object_mut() {
        upgrade_interval_schema(obj);
        upgrade_single_last_fired(obj);
    }
    match serde_json::from_value(value) {
        Ok(settings) => settings,
        Err(err) => {
            error!("failed to parse reminder settings, using defaults: {err}");
            ReminderSettings::default()
        }
    }
}

/// v1 stored a single numeric repeat interval in minutes. It cannot be mapped
/// onto explicit slots, so interval-based settings collapse to the defaults.
fn upgrade_interval_schema(obj: &mut Map<String, Value>) {
    if obj.remove("interval").is_some() && !obj.contains_key("scheduledTimes") {
        info!("migrating interval-based reminder settings to scheduled times");
        obj.insert("scheduledTimes".to_string(), json!(DEFAULT_REMINDER_TIMES));
    }
}

/// v2 stored one last-fired instant for all slots. A single instant cannot be
/// attributed to a specific slot, so it is discarded.
fn upgrade_single_last_fired(obj: &mut Map<String, Value>) {
    let legacy = matches!(obj.get("lastFired"), Some(Value::String(_)));
    if legacy {
        info!("discarding legacy single last-fired instant");
        obj.insert("lastFired".to_string(), json!({}));
    }
}

/// Applies a settings update; returns true when the schedule (enabled flag or
/// slot times) changed and the tick loop must be restarted.
pub fn apply_update(
    settings: &mut ReminderSettings,
    update: ReminderUpdateRequest,
) -> Result<bool, AppError> {
    if let Some(times) = &update.scheduled_times {
        if times.len() != DEFAULT_REMINDER_TIMES.len() {
            return Err(AppError::bad_request(format!(
                "expected exactly {} reminder times",
                DEFAULT_REMINDER_TIMES.len()
            )));
        }
        if let Some(bad) = times.iter().find(|slot| parse_slot(slot).is_none()) {
            return Err(AppError::bad_request(format!(
                "invalid reminder time {bad:?}, expected HH:MM"
            )));
        }
    }

    let mut schedule_changed = false;
    if let Some(enabled) = update.enabled {
        schedule_changed |= settings.enabled != enabled;
        settings.enabled = enabled;
    }
    if let Some(times) = update.scheduled_times {
        schedule_changed |= settings.scheduled_times != times;
        settings.scheduled_times = times;
    }
    if let Some(granted) = update.permission_granted {
        settings.permission_granted = granted;
    }
    if let Some(token) = update.push_token {
        settings.push_token = Some(token);
    }
    Ok(schedule_changed)
}
