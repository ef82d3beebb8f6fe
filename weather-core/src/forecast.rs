use chrono::{Days, Local, NaiveDate};

use crate::model::ForecastEntry;

/// Day offsets shown on the forecast screen, with their labels.
pub const FORECAST_DAYS: [(u64, &str); 3] = [(0, "Сегодня"), (1, "Завтра"), (2, "Послезавтра")];

/// First entry whose timestamp falls on `today + day_offset`.
///
/// This is the earliest 3-hour slot of that day, not a daily average or peak.
pub fn select_for_day(
    entries: &[ForecastEntry],
    day_offset: u64,
    today: NaiveDate,
) -> Option<&ForecastEntry> {
    let target = today.checked_add_days(Days::new(day_offset))?;
    let prefix = target.format("%Y-%m-%d").to_string();

    entries.iter().find(|e| e.timestamp.starts_with(&prefix))
}

/// Same as [`select_for_day`] using the local clock's date.
pub fn select_for_day_local(entries: &[ForecastEntry], day_offset: u64) -> Option<&ForecastEntry> {
    select_for_day(entries, day_offset, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str, temp: f64, condition: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: ts.into(),
            temperature_c: temp,
            condition: condition.into(),
            icon_code: "04d".into(),
        }
    }

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn sample() -> Vec<ForecastEntry> {
        vec![
            entry("2024-05-01 03:00:00", 10.0, "облачно"),
            entry("2024-05-01 06:00:00", 12.0, "ясно"),
            entry("2024-05-02 03:00:00", 8.0, "дождь"),
        ]
    }

    #[test]
    fn today_picks_first_slot_of_the_day() {
        let entries = sample();
        let today = select_for_day(&entries, 0, may_first()).expect("entry for today");

        assert_eq!(today.timestamp, "2024-05-01 03:00:00");
        assert_eq!(today.temperature_c, 10.0);
        assert_eq!(today.condition, "облачно");
    }

    #[test]
    fn tomorrow_and_missing_day() {
        let entries = sample();

        let tomorrow = select_for_day(&entries, 1, may_first()).expect("entry for tomorrow");
        assert_eq!(tomorrow.condition, "дождь");

        assert!(select_for_day(&entries, 2, may_first()).is_none());
    }

    #[test]
    fn month_boundary_is_handled() {
        let entries = vec![entry("2024-03-01 00:00:00", -2.0, "снег")];
        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let next = select_for_day(&entries, 1, leap_day).expect("entry on March 1st");
        assert_eq!(next.condition, "снег");
    }

    #[test]
    fn empty_list_yields_nothing() {
        assert!(select_for_day(&[], 0, may_first()).is_none());
    }

    #[test]
    fn local_variant_matches_todays_prefix() {
        let before = Local::now().date_naive();
        let next = before.succ_opt().unwrap();
        let noon = |d: NaiveDate| format!("{} 12:00:00", d.format("%Y-%m-%d"));
        let entries = vec![
            entry("1999-01-01 00:00:00", 0.0, "ясно"),
            entry(&noon(before), 5.0, "туман"),
            entry(&noon(next), 7.0, "снег"),
        ];

        let found = select_for_day_local(&entries, 0).expect("entry for local today");
        let after = Local::now().date_naive();

        // The date may roll over between the two clock reads.
        assert!(found.timestamp == noon(before) || found.timestamp == noon(after));
    }
}
