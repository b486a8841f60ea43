use crate::errors::AppError;
use crate::models::{
    Activity, DayRecord, TrackerData, UndoEntry, GOAL_MAX_ML, GOAL_MIN_ML, HYDRATION_HERO_ML,
    MAX_ENTRY_ML, MAX_UNDO_ENTRIES, WEEK_WARRIOR_DAYS,
};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

#[derive(Debug)]
pub struct AddOutcome {
    pub amount_ml: u32,
    pub crossed_goal: bool,
    pub unlocked: Vec<&'static str>,
}

#[derive(Debug)]
pub struct UndoOutcome {
    pub amount_ml: u32,
    pub removed_ml: u32,
    pub uncrossed_goal: bool,
}

pub fn rollover_if_new_day(data: &mut TrackerData) -> bool {
    rollover_if_new_day_at(data, Local::now().date_naive())
}

/// Opens a record for `today` if none exists yet, settling yesterday's streak
/// first. A day with no record at all leaves the streak untouched; only a
/// recorded day that fell short resets it.
pub fn rollover_if_new_day_at(data: &mut TrackerData, today: NaiveDate) -> bool {
    let key = today.to_string();
    if data.days.contains_key(&key) {
        return false;
    }

    let yesterday = (today - Duration::days(1)).to_string();
    match data.days.get(&yesterday) {
        Some(record) if record.amount_ml >= data.daily_goal_ml => {
            data.streak += 1;
            if data.streak > data.best_streak {
                data.best_streak = data.streak;
            }
        }
        Some(_) => data.streak = 0,
        None => {}
    }

    data.days.insert(
        key.clone(),
        DayRecord {
            date: key,
            ..DayRecord::default()
        },
    );
    // Undo entries reference activities of the day they were logged.
    data.undo_stack.clear();
    true
}

pub fn add_water(data: &mut TrackerData, amount_ml: u32) -> Result<AddOutcome, AppError> {
    add_water_at(data, amount_ml, Local::now().naive_local())
}

pub fn add_water_at(
    data: &mut TrackerData,
    amount_ml: u32,
    now: NaiveDateTime,
) -> Result<AddOutcome, AppError> {
    if amount_ml == 0 {
        return Err(AppError::bad_request("amount must be greater than zero"));
    }
    if amount_ml > MAX_ENTRY_ML {
        return Err(AppError::bad_request(format!(
            "a single entry cannot exceed {MAX_ENTRY_ML}ml"
        )));
    }

    rollover_if_new_day_at(data, now.date());
    let goal = data.daily_goal_ml;

    let key = now.date().to_string();
    let record = data.days.entry(key.clone()).or_insert_with(|| DayRecord {
        date: key,
        ..DayRecord::default()
    });

    let previous = record.amount_ml;
    record.amount_ml = previous.saturating_add(amount_ml);
    let seq = record.next_seq;
    record.next_seq += 1;
    record.activities.insert(
        0,
        Activity {
            seq,
            amount_ml,
            time: now.format("%H:%M").to_string(),
        },
    );

    let crossed_goal = previous < goal && record.amount_ml >= goal;
    let amount_now = record.amount_ml;
    if crossed_goal {
        data.goals_reached += 1;
    }

    let goals_reached = data.goals_reached;
    let streak = data.streak;
    let mut unlocked = Vec::new();
    let flags = &mut data.achievements;
    if !flags.first_drop && amount_now > 0 {
        flags.first_drop = true;
        unlocked.push("first-drop");
    }
    if !flags.goal_master && goals_reached >= 1 {
        flags.goal_master = true;
        unlocked.push("goal-master");
    }
    if !flags.week_warrior && streak >= WEEK_WARRIOR_DAYS {
        flags.week_warrior = true;
        unlocked.push("week-warrior");
    }
    if !flags.hydration_hero && amount_now >= HYDRATION_HERO_ML {
        flags.hydration_hero = true;
        unlocked.push("hydration-hero");
    }

    data.undo_stack.push(UndoEntry {
        seq,
        amount_ml,
        crossed_goal,
    });
    if data.undo_stack.len() > MAX_UNDO_ENTRIES {
        data.undo_stack.remove(0);
    }

    Ok(AddOutcome {
        amount_ml: amount_now,
        crossed_goal,
        unlocked,
    })
}

pub fn undo_last_entry(data: &mut TrackerData) -> Option<UndoOutcome> {
    undo_last_entry_at(data, Local::now().date_naive())
}

/// Reverses the most recent add: amount (floored at zero), its exact
/// activity, and the goal-crossing bookkeeping. Achievements stay unlocked.
pub fn undo_last_entry_at(data: &mut TrackerData, today: NaiveDate) -> Option<UndoOutcome> {
    // Today's record must exist before the stack is touched; a rejected
    // undo leaves the stack exactly as it was.
    let record = data.days.get_mut(&today.to_string())?;
    let entry = data.undo_stack.pop()?;

    record.amount_ml = record.amount_ml.saturating_sub(entry.amount_ml);
    if let Some(pos) = record.activities.iter().position(|a| a.seq == entry.seq) {
        record.activities.remove(pos);
    }
    if entry.crossed_goal {
        data.goals_reached = data.goals_reached.saturating_sub(1);
    }

    Some(UndoOutcome {
        amount_ml: record.amount_ml,
        removed_ml: entry.amount_ml,
        uncrossed_goal: entry.crossed_goal,
    })
}

pub fn set_daily_goal(data: &mut TrackerData, goal_ml: u32) -> Result<(), AppError> {
    if !(GOAL_MIN_ML..=GOAL_MAX_ML).contains(&goal_ml) {
        return Err(AppError::bad_request(format!(
            "daily goal must be between {GOAL_MIN_ML} and {GOAL_MAX_ML}ml"
        )));
    }
    data.daily_goal_ml = goal_ml;
    Ok(())
}

pub fn current_amount_at(data: &TrackerData, today: NaiveDate) -> u32 {
    data.days
        .get(&today.to_string())
        .map(|record| record.amount_ml)
        .unwrap_or(0)
}

pub fn remaining_ml_at(data: &TrackerData, today: NaiveDate) -> u32 {
    data.daily_goal_ml
        .saturating_sub(current_amount_at(data, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(date: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
        date.and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn add_accumulates_and_undo_floors_at_zero() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);

        add_water_at(&mut data, 300, at(today, 8, 0)).unwrap();
        add_water_at(&mut data, 250, at(today, 9, 30)).unwrap();
        assert_eq!(current_amount_at(&data, today), 550);

        undo_last_entry_at(&mut data, today).unwrap();
        assert_eq!(current_amount_at(&data, today), 300);

        // Corrupt the stored total below the next undo amount; the floor holds.
        data.days.get_mut(&today.to_string()).unwrap().amount_ml = 100;
        let outcome = undo_last_entry_at(&mut data, today).unwrap();
        assert_eq!(outcome.amount_ml, 0);
        assert_eq!(current_amount_at(&data, today), 0);
    }

    #[test]
    fn rejects_zero_and_oversized_amounts() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);
        assert!(add_water_at(&mut data, 0, at(today, 8, 0)).is_err());
        assert!(add_water_at(&mut data, MAX_ENTRY_ML + 1, at(today, 8, 0)).is_err());
        assert_eq!(current_amount_at(&data, today), 0);
        assert!(data.undo_stack.is_empty());
    }

    #[test]
    fn goal_crossing_fires_once_and_undo_reverses_it() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);

        let first = add_water_at(&mut data, 1500, at(today, 8, 0)).unwrap();
        assert!(!first.crossed_goal);
        assert_eq!(data.goals_reached, 0);

        let second = add_water_at(&mut data, 600, at(today, 12, 0)).unwrap();
        assert!(second.crossed_goal);
        assert_eq!(data.goals_reached, 1);
        assert_eq!(second.amount_ml, 2100);

        // Already past the goal, no re-trigger.
        let third = add_water_at(&mut data, 200, at(today, 13, 0)).unwrap();
        assert!(!third.crossed_goal);
        assert_eq!(data.goals_reached, 1);

        undo_last_entry_at(&mut data, today).unwrap();
        assert_eq!(data.goals_reached, 1);
        let outcome = undo_last_entry_at(&mut data, today).unwrap();
        assert!(outcome.uncrossed_goal);
        assert_eq!(outcome.amount_ml, 1500);
        assert_eq!(data.goals_reached, 0);
    }

    #[test]
    fn achievements_unlock_once_and_survive_undo() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);

        let outcome = add_water_at(&mut data, 500, at(today, 8, 0)).unwrap();
        assert_eq!(outcome.unlocked, vec!["first-drop"]);

        let outcome = add_water_at(&mut data, 1500, at(today, 9, 0)).unwrap();
        assert_eq!(outcome.unlocked, vec!["goal-master"]);

        let outcome = add_water_at(&mut data, 1000, at(today, 10, 0)).unwrap();
        assert_eq!(outcome.unlocked, vec!["hydration-hero"]);

        while undo_last_entry_at(&mut data, today).is_some() {}
        assert!(data.achievements.first_drop);
        assert!(data.achievements.goal_master);
        assert!(data.achievements.hydration_hero);

        // Re-earning does not re-announce.
        let outcome = add_water_at(&mut data, 2000, at(today, 11, 0)).unwrap();
        assert!(outcome.unlocked.is_empty());
    }

    #[test]
    fn week_warrior_unlocks_at_seven_day_streak() {
        let mut data = TrackerData::default();
        data.streak = 7;
        let outcome = add_water_at(&mut data, 100, at(day(2026, 3, 10), 8, 0)).unwrap();
        assert!(outcome.unlocked.contains(&"week-warrior"));
        assert!(data.achievements.week_warrior);
    }

    #[test]
    fn rollover_is_idempotent_within_a_day() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);

        assert!(rollover_if_new_day_at(&mut data, today));
        let days = data.days.len();
        let streak = data.streak;

        assert!(!rollover_if_new_day_at(&mut data, today));
        assert_eq!(data.days.len(), days);
        assert_eq!(data.streak, streak);
    }

    #[test]
    fn rollover_streak_policy() {
        // Yesterday met the goal: streak grows and best streak follows.
        let mut data = TrackerData::default();
        add_water_at(&mut data, 2000, at(day(2026, 3, 9), 8, 0)).unwrap();
        rollover_if_new_day_at(&mut data, day(2026, 3, 10));
        assert_eq!(data.streak, 1);
        assert_eq!(data.best_streak, 1);

        // Yesterday fell short: streak resets.
        let mut data = TrackerData::default();
        data.streak = 4;
        data.best_streak = 4;
        add_water_at(&mut data, 500, at(day(2026, 3, 9), 8, 0)).unwrap();
        rollover_if_new_day_at(&mut data, day(2026, 3, 10));
        assert_eq!(data.streak, 0);
        assert_eq!(data.best_streak, 4);

        // No record for yesterday: absence is not a miss.
        let mut data = TrackerData::default();
        data.streak = 3;
        rollover_if_new_day_at(&mut data, day(2026, 3, 10));
        assert_eq!(data.streak, 3);
    }

    #[test]
    fn undo_stack_bounded_at_ten() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);
        for i in 0..11 {
            add_water_at(&mut data, 100 + i, at(today, 8, 0)).unwrap();
        }
        assert_eq!(data.undo_stack.len(), MAX_UNDO_ENTRIES);
        // The first push (100ml) was evicted silently.
        assert_eq!(data.undo_stack[0].amount_ml, 101);

        let mut undone = 0u32;
        while let Some(outcome) = undo_last_entry_at(&mut data, today) {
            undone += outcome.removed_ml;
        }
        let retained: u32 = (101..=110).sum();
        assert_eq!(undone, retained);
        assert_eq!(current_amount_at(&data, today), 100);
    }

    #[test]
    fn undo_removes_its_exact_activity() {
        let mut data = TrackerData::default();
        let today = day(2026, 3, 10);
        add_water_at(&mut data, 100, at(today, 8, 0)).unwrap();
        add_water_at(&mut data, 200, at(today, 9, 0)).unwrap();
        add_water_at(&mut data, 300, at(today, 10, 0)).unwrap();

        let outcome = undo_last_entry_at(&mut data, today).unwrap();
        assert_eq!(outcome.removed_ml, 300);
        let record = &data.days[&today.to_string()];
        let amounts: Vec<u32> = record.activities.iter().map(|a| a.amount_ml).collect();
        assert_eq!(amounts, vec![200, 100]);
    }

    #[test]
    fn rejected_undo_before_rollover_keeps_stack_intact() {
        let mut data = TrackerData::default();
        add_water_at(&mut data, 300, at(day(2026, 3, 9), 20, 0)).unwrap();
        add_water_at(&mut data, 200, at(day(2026, 3, 9), 21, 0)).unwrap();

        // Midnight has passed but no rollover ran yet: the undo is rejected
        // without popping anything.
        assert!(undo_last_entry_at(&mut data, day(2026, 3, 10)).is_none());
        assert_eq!(data.undo_stack.len(), 2);
        assert_eq!(data.days["2026-03-09"].amount_ml, 500);
    }

    #[test]
    fn undo_stack_clears_on_rollover() {
        let mut data = TrackerData::default();
        add_water_at(&mut data, 300, at(day(2026, 3, 9), 20, 0)).unwrap();
        assert_eq!(data.undo_stack.len(), 1);

        rollover_if_new_day_at(&mut data, day(2026, 3, 10));
        assert!(data.undo_stack.is_empty());
        assert!(undo_last_entry_at(&mut data, day(2026, 3, 10)).is_none());
    }

    #[test]
    fn goal_validation_bounds() {
        let mut data = TrackerData::default();
        assert!(set_daily_goal(&mut data, 499).is_err());
        assert!(set_daily_goal(&mut data, 10_001).is_err());
        assert_eq!(data.daily_goal_ml, 2000);
        set_daily_goal(&mut data, 2500).unwrap();
        assert_eq!(data.daily_goal_ml, 2500);
    }
}
