use crate::clock::now_rfc3339;
use crate::error::AppError;
use crate::model::{DayCompletion, Habit, HabitSeries};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration};

pub const SERIES_DAYS: usize = 45;

const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const SAMPLE_COMPLETED: [bool; 10] = [
    true, true, false, true, true, true, false, true, false, true,
];
const SAMPLE_COUNTS: [u32; 10] = [2, 1, 0, 3, 2, 1, 0, 2, 0, 1];

pub fn format_day(date: Date) -> Result<String, AppError> {
    date.format(DAY_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn parse_day(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw, DAY_FORMAT).map_err(|_| AppError::invalid_data("date must be YYYY-MM-DD"))
}

/// Reconstruct a 45-day series from a single task snapshot.
///
/// The remote service reports no per-day history for dailies, only today's
/// completed flag and the current streak length. Everything before today is a
/// guess filled backward from yesterday; only the final entry reflects live
/// server state. The index arithmetic is kept exactly as shipped, including
/// the quirk that small streaks (2-3) still mark only yesterday.
pub fn build_series(habit: &Habit, today: Date) -> Result<HabitSeries, AppError> {
    let streak = habit.streak.unwrap_or(0);
    let live_completed = habit.is_completed();

    let mut completion_data = Vec::with_capacity(SERIES_DAYS);
    for i in 0..SERIES_DAYS {
        let date = today - Duration::days((SERIES_DAYS - 1 - i) as i64);
        let is_today = i == SERIES_DAYS - 1;
        let is_yesterday = i == SERIES_DAYS - 2;

        let mut completed = false;
        let mut count = 0u32;

        if streak > 0 {
            if is_yesterday && streak >= 1 {
                completed = true;
                count = 1;
            } else if !is_today && !is_yesterday && (i as i64) >= (SERIES_DAYS as i64) - streak + 1 {
                completed = true;
                count = 1;
            }
        }

        if is_today {
            completed = live_completed;
            count = if completed { 1 } else { 0 };
        }

        completion_data.push(DayCompletion {
            date: format_day(date)?,
            completed,
            count,
        });
    }

    Ok(HabitSeries {
        habit_id: habit.id.clone(),
        habit_name: String::new(),
        completion_data,
        last_updated: now_rfc3339()?,
    })
}

/// Deterministic placeholder series shown before any refresh has happened.
pub fn sample_series(today: Date) -> Result<HabitSeries, AppError> {
    let mut completion_data = Vec::with_capacity(SERIES_DAYS);
    for i in 0..SERIES_DAYS {
        let date = today - Duration::days((SERIES_DAYS - 1 - i) as i64);
        completion_data.push(DayCompletion {
            date: format_day(date)?,
            completed: SAMPLE_COMPLETED[i % 10],
            count: SAMPLE_COUNTS[i % 10],
        });
    }

    Ok(HabitSeries {
        habit_id: "sample".to_string(),
        habit_name: String::new(),
        completion_data,
        last_updated: now_rfc3339()?,
    })
}

/// Consecutive completed days counted backward from the newest entry.
pub fn current_streak(series: &HabitSeries) -> usize {
    series
        .completion_data
        .iter()
        .rev()
        .take_while(|day| day.completed)
        .count()
}

#[cfg(test)]
mod tests {
    use super::{SERIES_DAYS, build_series, current_streak, parse_day, sample_series};
    use crate::model::Habit;
    use time::macros::date;

    fn daily(streak: i64, completed: bool) -> Habit {
        Habit {
            id: "habit-1".to_string(),
            text: "Morning run".to_string(),
            kind: "daily".to_string(),
            completed: Some(completed),
            streak: Some(streak),
            is_due: Some(true),
        }
    }

    #[test]
    fn builds_exactly_45_contiguous_days_for_all_inputs() {
        let today = date!(2026 - 08 - 06);

        for streak in 0..=45 {
            for completed in [false, true] {
                let series = build_series(&daily(streak, completed), today).unwrap();
                assert_eq!(series.completion_data.len(), SERIES_DAYS);
                assert_eq!(series.habit_id, "habit-1");
                assert!(series.habit_name.is_empty());

                for (i, day) in series.completion_data.iter().enumerate() {
                    let expected = today - time::Duration::days((SERIES_DAYS - 1 - i) as i64);
                    assert_eq!(parse_day(&day.date).unwrap(), expected);
                }

                let last = series.completion_data.last().unwrap();
                assert_eq!(parse_day(&last.date).unwrap(), today);
                assert_eq!(last.completed, completed);
                assert_eq!(last.count, u32::from(completed));
            }
        }
    }

    #[test]
    fn streak_of_three_marks_only_yesterday() {
        // The backward-fill condition `i >= 45 - streak + 1` excludes indices
        // 43 and 44, so streak 3 still fills a single day. Kept as shipped.
        let today = date!(2026 - 08 - 06);
        let series = build_series(&daily(3, false), today).unwrap();
        let days = &series.completion_data;

        assert!(!days[41].completed);
        assert!(!days[42].completed);
        assert!(days[43].completed);
        assert_eq!(days[43].count, 1);
        assert!(!days[44].completed);
        assert_eq!(days[44].count, 0);
    }

    #[test]
    fn long_streak_fills_backward_from_yesterday() {
        let today = date!(2026 - 08 - 06);
        let series = build_series(&daily(10, true), today).unwrap();
        let days = &series.completion_data;

        // 45 - 10 + 1 = 36: indices 36..=42 via backward fill, 43 via the
        // yesterday rule, 44 from the live flag.
        for (i, day) in days.iter().enumerate() {
            let expected = i >= 36;
            assert_eq!(day.completed, expected, "index {i}");
        }
        assert!(!days[35].completed);
    }

    #[test]
    fn zero_streak_leaves_history_empty() {
        let today = date!(2026 - 08 - 06);
        let series = build_series(&daily(0, true), today).unwrap();
        let days = &series.completion_data;

        for day in &days[..SERIES_DAYS - 1] {
            assert!(!day.completed);
            assert_eq!(day.count, 0);
        }
        assert!(days[44].completed);
        assert_eq!(days[44].count, 1);
    }

    #[test]
    fn missing_streak_and_completed_behave_like_zero() {
        let today = date!(2026 - 08 - 06);
        let habit = Habit {
            id: "habit-1".to_string(),
            text: "Morning run".to_string(),
            kind: "daily".to_string(),
            completed: None,
            streak: None,
            is_due: None,
        };

        let series = build_series(&habit, today).unwrap();
        assert!(series.completion_data.iter().all(|day| !day.completed));
    }

    #[test]
    fn sample_series_repeats_fixed_pattern() {
        let today = date!(2026 - 08 - 06);
        let series = sample_series(today).unwrap();

        assert_eq!(series.habit_id, "sample");
        assert_eq!(series.completion_data.len(), SERIES_DAYS);
        assert!(series.completion_data[0].completed);
        assert_eq!(series.completion_data[0].count, 2);
        assert!(!series.completion_data[2].completed);
        assert_eq!(series.completion_data[3].count, 3);
        // Pattern wraps every 10 entries.
        assert_eq!(
            series.completion_data[12].completed,
            series.completion_data[2].completed
        );
        assert_eq!(series.completion_data[13].count, series.completion_data[3].count);
    }

    #[test]
    fn current_streak_counts_trailing_completed_days() {
        let today = date!(2026 - 08 - 06);

        let series = build_series(&daily(10, true), today).unwrap();
        assert_eq!(current_streak(&series), 9);

        let broken = build_series(&daily(10, false), today).unwrap();
        assert_eq!(current_streak(&broken), 0);
    }
}
