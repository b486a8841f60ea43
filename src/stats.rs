use crate::models::{DailyPoint, StatsResponse, TrackerData};
use chrono::{Duration, Local, NaiveDate};

pub fn build_stats(data: &TrackerData) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), data)
}

pub fn build_stats_at(today: NaiveDate, data: &TrackerData) -> StatsResponse {
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let amount_ml = data
            .days
            .get(&date.to_string())
            .map(|record| record.amount_ml)
            .unwrap_or(0);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            amount_ml,
            goal_met: amount_ml >= data.daily_goal_ml,
        });
    }

    let total_days = data.days.len();
    let total_ml: u64 = data.days.values().map(|record| u64::from(record.amount_ml)).sum();
    let average_daily_ml = if total_days > 0 {
        (total_ml / total_days as u64) as u32
    } else {
        0
    };

    StatsResponse {
        last_7_days,
        total_days,
        total_ml,
        average_daily_ml,
        goals_reached: data.goals_reached,
        streak: data.streak,
        best_streak: data.best_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::add_water_at;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn chart_covers_each_of_the_last_seven_days() {
        let mut data = TrackerData::default();
        add_water_at(&mut data, 2100, day(8).and_hms_opt(9, 0, 0).unwrap()).unwrap();

        let stats = build_stats_at(day(10), &data);
        assert_eq!(stats.last_7_days.len(), 7);

        let point = stats
            .last_7_days
            .iter()
            .find(|point| point.date == "2026-03-08")
            .expect("missing day");
        assert_eq!(point.amount_ml, 2100);
        assert!(point.goal_met);
        assert!(!stats.last_7_days.last().unwrap().goal_met);
    }

    #[test]
    fn lifetime_summary_averages_recorded_days_only() {
        let mut data = TrackerData::default();
        add_water_at(&mut data, 1000, day(8).and_hms_opt(9, 0, 0).unwrap()).unwrap();
        add_water_at(&mut data, 2000, day(9).and_hms_opt(9, 0, 0).unwrap()).unwrap();

        let stats = build_stats_at(day(10), &data);
        assert_eq!(stats.total_days, 2);
        assert_eq!(stats.total_ml, 3000);
        assert_eq!(stats.average_daily_ml, 1500);
    }

    #[test]
    fn empty_history_yields_zeroes() {
        let stats = build_stats_at(day(10), &TrackerData::default());
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.average_daily_ml, 0);
        assert!(stats.last_7_days.iter().all(|p| p.amount_ml == 0));
    }
}
