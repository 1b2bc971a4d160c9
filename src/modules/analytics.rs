use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;
use std::collections::HashSet;

use crate::modules::models::{Mood, MoodLog, MOODS};

/// Dashboard streaks only look at the most recent entries, so the walk is
/// bounded to 30 offsets.
const STREAK_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStats {
    pub journal_count: i64,
    pub mood_count: i64,
    pub vision_board_count: i64,
    pub recent_mood: Option<Mood>,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MoodShare {
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct WeeklyInsight {
    pub entry_count: usize,
    pub logged_days: usize,
    pub top_mood: Option<Mood>,
}

/// Consecutive calendar days with at least one journal entry, walking
/// backward from today. No entry today means no streak, whatever happened
/// before. Duplicate dates count once.
pub fn journal_streak(entry_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = entry_dates.iter().copied().collect();
    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        if dates.contains(&(today - Duration::days(offset))) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Same walk over mood-log dates, but not capped: continues until the first
/// gap or the list is exhausted.
pub fn mood_streak(log_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = log_dates.iter().copied().collect();
    let mut streak: u32 = 0;
    while dates.contains(&(today - Duration::days(streak as i64))) {
        streak += 1;
    }
    streak
}

pub fn dashboard_stats(
    journal_count: i64,
    mood_count: i64,
    vision_board_count: i64,
    recent_mood: Option<Mood>,
    entry_dates: &[NaiveDate],
    today: NaiveDate,
) -> DashboardStats {
    DashboardStats {
        journal_count,
        mood_count,
        vision_board_count,
        recent_mood,
        streak: journal_streak(entry_dates, today),
    }
}

/// Count and rounded percentage per category. Every category is reported,
/// zero-occurrence ones included, in the fixed display order.
pub fn mood_distribution(logs: &[MoodLog]) -> IndexMap<Mood, MoodShare> {
    let total = logs.len();
    let mut distribution = IndexMap::with_capacity(MOODS.len());
    for mood in MOODS {
        let count = logs.iter().filter(|log| log.mood == mood).count();
        let percentage = if total > 0 {
            (count as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };
        distribution.insert(mood, MoodShare { count, percentage });
    }
    distribution
}

/// Records whose date falls within the trailing 7 days inclusive of today.
pub fn weekly_window<T, F>(items: &[T], date_of: F, today: NaiveDate) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> NaiveDate,
{
    let start = today - Duration::days(6);
    items
        .iter()
        .filter(|item| {
            let date = date_of(item);
            date >= start && date <= today
        })
        .cloned()
        .collect()
}

/// Summary for the weekly insight notification: entries this week plus the
/// most frequent mood over the window. Ties resolve to the earlier category
/// in display order.
pub fn weekly_insight(logs: &[MoodLog], entry_count: usize, today: NaiveDate) -> WeeklyInsight {
    let window = weekly_window(logs, |log| log.log_date, today);
    let distribution = mood_distribution(&window);
    let mut top: Option<(Mood, usize)> = None;
    for (mood, share) in &distribution {
        if share.count > 0 && top.map_or(true, |(_, count)| share.count > count) {
            top = Some((*mood, share.count));
        }
    }
    WeeklyInsight {
        entry_count,
        logged_days: window.len(),
        top_mood: top.map(|(mood, _)| mood),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap() - Duration::days(offset)
    }

    fn log(offset: i64, mood: Mood) -> MoodLog {
        MoodLog {
            id: offset,
            user_id: "user-1".to_string(),
            log_date: day(offset),
            mood,
            note: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_streak_is_zero_without_entry_today() {
        let dates = vec![day(1), day(2), day(3)];
        assert_eq!(0, journal_streak(&dates, day(0)));
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        // Entries today, yesterday and three days ago: the gap at two days
        // ago ends the streak at 2.
        let dates = vec![day(0), day(1), day(3)];
        assert_eq!(2, journal_streak(&dates, day(0)));
    }

    #[test]
    fn test_streak_recurrence() {
        // streak(D, T) = 1 + streak(D, T - 1 day) when T is present.
        let dates: Vec<NaiveDate> = (0..5).map(day).collect();
        for today in 0..4 {
            assert_eq!(
                journal_streak(&dates, day(today)),
                1 + journal_streak(&dates, day(today + 1))
            );
        }
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let dates = vec![day(0), day(0), day(0), day(1)];
        assert_eq!(2, journal_streak(&dates, day(0)));
    }

    #[test]
    fn test_journal_streak_is_capped() {
        let dates: Vec<NaiveDate> = (0..45).map(day).collect();
        assert_eq!(30, journal_streak(&dates, day(0)));
    }

    #[test]
    fn test_mood_streak_walks_the_full_list() {
        let dates: Vec<NaiveDate> = (0..45).map(day).collect();
        assert_eq!(45, mood_streak(&dates, day(0)));
        assert_eq!(0, mood_streak(&[], day(0)));
    }

    #[test]
    fn test_distribution_percentages() {
        let logs = vec![
            log(0, Mood::Happy),
            log(1, Mood::Happy),
            log(2, Mood::Happy),
            log(3, Mood::Sad),
        ];
        let distribution = mood_distribution(&logs);
        assert_eq!(75, distribution[&Mood::Happy].percentage);
        assert_eq!(25, distribution[&Mood::Sad].percentage);
        assert_eq!(0, distribution[&Mood::Content].percentage);
        assert_eq!(0, distribution[&Mood::Okay].percentage);
        assert_eq!(0, distribution[&Mood::Anxious].percentage);

        let count_sum: usize = distribution.values().map(|share| share.count).sum();
        assert_eq!(logs.len(), count_sum);
        let pct_sum: u32 = distribution.values().map(|share| share.percentage).sum();
        assert_eq!(100, pct_sum);
    }

    #[test]
    fn test_distribution_rounding_stays_near_100() {
        let logs = vec![log(0, Mood::Happy), log(1, Mood::Sad), log(2, Mood::Okay)];
        let distribution = mood_distribution(&logs);
        let pct_sum: u32 = distribution.values().map(|share| share.percentage).sum();
        assert!((99..=101).contains(&pct_sum));
    }

    #[test]
    fn test_distribution_of_empty_input() {
        let distribution = mood_distribution(&[]);
        assert_eq!(5, distribution.len());
        assert!(distribution.values().all(|share| share.percentage == 0));
    }

    #[test]
    fn test_weekly_window_bounds() {
        let logs: Vec<MoodLog> = (0..10).map(|offset| log(offset, Mood::Okay)).collect();
        let window = weekly_window(&logs, |l| l.log_date, day(0));
        assert_eq!(7, window.len());
        assert!(window.iter().all(|l| l.log_date >= day(6)));
    }

    #[test]
    fn test_weekly_window_is_idempotent() {
        let logs: Vec<MoodLog> = (0..10).map(|offset| log(offset, Mood::Okay)).collect();
        let once = weekly_window(&logs, |l| l.log_date, day(0));
        let twice = weekly_window(&once, |l| l.log_date, day(0));
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn test_weekly_insight_tie_breaks_by_display_order() {
        let logs = vec![log(0, Mood::Sad), log(1, Mood::Happy)];
        let insight = weekly_insight(&logs, 4, day(0));
        assert_eq!(Some(Mood::Happy), insight.top_mood);
        assert_eq!(4, insight.entry_count);
        assert_eq!(2, insight.logged_days);
    }

    #[test]
    fn test_dashboard_stats_passes_counts_through() {
        let stats = dashboard_stats(12, 8, 2, Some(Mood::Content), &[day(0), day(1)], day(0));
        assert_eq!(12, stats.journal_count);
        assert_eq!(8, stats.mood_count);
        assert_eq!(2, stats.vision_board_count);
        assert_eq!(Some(Mood::Content), stats.recent_mood);
        assert_eq!(2, stats.streak);
    }
}
