use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::models::habit::Habit;
use crate::models::stats::{
    DailyCompletionPoint, HabitComparisonEntry, HabitStats, MonthlyRatePoint, OverviewStats,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-habit statistics anchored at the local calendar day. Pure and
/// side-effect free; cheap enough to recompute on every read.
pub fn compute_stats(habit: &Habit) -> HabitStats {
    compute_stats_at(habit, Local::now().date_naive())
}

/// Same computation anchored at an explicit day, so callers and tests
/// stay deterministic.
pub fn compute_stats_at(habit: &Habit, today: NaiveDate) -> HabitStats {
    if habit.completions.is_empty() {
        return HabitStats::default();
    }

    let total_days = habit.completions.len() as u32;
    let total_completions = habit
        .completions
        .values()
        .filter(|completed| **completed)
        .count() as u32;
    let completion_rate = f64::from(total_completions) / f64::from(total_days) * 100.0;

    HabitStats {
        streak: current_streak(habit, today),
        longest_streak: longest_streak(habit),
        completion_rate,
        total_completions,
        total_days,
    }
}

/// Longest run of completed entries over the recorded history in
/// calendar order. Counts consecutive *entries*, not consecutive days:
/// dates missing from the record are invisible here, while the current
/// streak below does require day adjacency.
fn longest_streak(habit: &Habit) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    for completed in habit.completions.values() {
        if *completed {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Current streak: the consecutive-day run of completions ending at
/// `today`. The run survives when the most recent completion is today
/// or yesterday, or two days back while today has no entry at all (an
/// explicit `false` for today breaks it).
fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut completed_dates: Vec<NaiveDate> = habit
        .completions
        .iter()
        .filter(|(_, completed)| **completed)
        .filter_map(|(date, _)| NaiveDate::parse_from_str(date, DATE_FORMAT).ok())
        .collect();
    completed_dates.sort_unstable_by(|a, b| b.cmp(a));

    let Some(&latest) = completed_dates.first() else {
        return 0;
    };

    let gap = (today - latest).num_days();
    let today_untracked = !habit
        .completions
        .contains_key(&today.format(DATE_FORMAT).to_string());

    if gap > 1 && !(gap == 2 && today_untracked) {
        return 0;
    }

    let mut streak = 1u32;
    for pair in completed_dates.windows(2) {
        if (pair[0] - pair[1]) == Duration::days(1) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Aggregate card figures across the whole collection.
pub fn overview(habits: &[Habit]) -> OverviewStats {
    overview_at(habits, Local::now().date_naive())
}

pub fn overview_at(habits: &[Habit], today: NaiveDate) -> OverviewStats {
    let mut total_completions = 0u32;
    let mut total_days = 0u32;
    let mut longest_streak = 0u32;
    let mut streak_sum = 0u32;

    for habit in habits {
        let stats = compute_stats_at(habit, today);
        total_completions += stats.total_completions;
        total_days += stats.total_days;
        longest_streak = longest_streak.max(stats.longest_streak);
        streak_sum += stats.streak;
    }

    let completion_rate = if total_days > 0 {
        f64::from(total_completions) / f64::from(total_days) * 100.0
    } else {
        0.0
    };
    let average_streak = if habits.is_empty() {
        0.0
    } else {
        f64::from(streak_sum) / habits.len() as f64
    };

    OverviewStats {
        total_habits: habits.len(),
        completion_rate,
        longest_streak,
        average_streak,
    }
}

/// The trailing seven days (ending today): per day, how many habits
/// were completed and the resulting percentage.
pub fn weekly_completion_series(habits: &[Habit]) -> Vec<DailyCompletionPoint> {
    weekly_completion_series_at(habits, Local::now().date_naive())
}

pub fn weekly_completion_series_at(habits: &[Habit], today: NaiveDate) -> Vec<DailyCompletionPoint> {
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let key = date.format(DATE_FORMAT).to_string();
            let completions = habits
                .iter()
                .filter(|habit| habit.is_completed_on(&key))
                .count() as u32;
            let total = habits.len();
            let rate = if total > 0 {
                f64::from(completions) / total as f64 * 100.0
            } else {
                0.0
            };

            DailyCompletionPoint {
                date: key,
                weekday: date.format("%a").to_string(),
                completions,
                total,
                rate,
            }
        })
        .collect()
}

/// Completion rate per month of the current year, up to today. A month
/// only counts entries whose date key carries its `YYYY-MM` prefix.
pub fn monthly_completion_rates(habits: &[Habit]) -> Vec<MonthlyRatePoint> {
    monthly_completion_rates_at(habits, Local::now().date_naive())
}

pub fn monthly_completion_rates_at(habits: &[Habit], today: NaiveDate) -> Vec<MonthlyRatePoint> {
    (1..=today.month())
        .map(|month| {
            let prefix = format!("{:04}-{:02}", today.year(), month);
            let mut tracked = 0u32;
            let mut completed = 0u32;

            for habit in habits {
                for (date, done) in &habit.completions {
                    if date.starts_with(&prefix) {
                        tracked += 1;
                        if *done {
                            completed += 1;
                        }
                    }
                }
            }

            let rate = if tracked > 0 {
                f64::from(completed) / f64::from(tracked) * 100.0
            } else {
                0.0
            };

            MonthlyRatePoint {
                month: prefix,
                rate,
            }
        })
        .collect()
}

/// Per-habit comparison rows, best completion rate first.
pub fn habit_comparison(habits: &[Habit]) -> Vec<HabitComparisonEntry> {
    habit_comparison_at(habits, Local::now().date_naive())
}

pub fn habit_comparison_at(habits: &[Habit], today: NaiveDate) -> Vec<HabitComparisonEntry> {
    let mut entries: Vec<HabitComparisonEntry> = habits
        .iter()
        .map(|habit| {
            let stats = compute_stats_at(habit, today);
            HabitComparisonEntry {
                name: habit.name.clone(),
                completion_rate: stats.completion_rate,
                streak: stats.streak,
                total_completions: stats.total_completions,
            }
        })
        .collect();

    entries.sort_by(|left, right| {
        right
            .completion_rate
            .partial_cmp(&left.completion_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| left.name.cmp(&right.name))
    });
    entries
}
