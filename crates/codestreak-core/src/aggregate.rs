//! Rankings, recent-activity windows, and goal progress.
//!
//! All functions read the store; nothing here mutates or persists. Sorts
//! are stable, so users with equal solved counts keep their first-seen
//! order from the underlying map.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::store::{ActivityRecord, ActivityStore};
use crate::streak::streak;

/// Goal progress for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub solved: u64,
    pub goal: u64,
    /// `100 * solved / goal`, or `None` when no goal is set.
    pub percent: Option<u64>,
}

/// 1-based leaderboard position by problems solved, descending.
///
/// A user with no record ranks after everyone: `store.len() + 1`.
pub fn rank(store: &ActivityStore, user_id: &str) -> usize {
    if !store.contains(user_id) {
        return store.len() + 1;
    }

    let mut users: Vec<(&str, u64)> = store
        .iter()
        .map(|(id, rec)| (id, rec.problems_solved))
        .collect();
    users.sort_by(|a, b| b.1.cmp(&a.1));

    users
        .iter()
        .position(|(id, _)| *id == user_id)
        .map(|pos| pos + 1)
        .unwrap_or(store.len() + 1)
}

/// Top `n` users by problems solved, descending.
pub fn top_n<'a>(store: &'a ActivityStore, n: usize) -> Vec<(&'a str, &'a ActivityRecord)> {
    let mut users: Vec<(&str, &ActivityRecord)> = store.iter().collect();
    users.sort_by(|a, b| b.1.problems_solved.cmp(&a.1.problems_solved));
    users.truncate(n);
    users
}

/// Top `n` nonzero streaks, descending.
pub fn top_streaks(store: &ActivityStore, n: usize, today: NaiveDate) -> Vec<(String, u32)> {
    let mut streaks: Vec<(String, u32)> = store
        .iter()
        .map(|(id, rec)| (id.to_string(), streak(&rec.activity, today)))
        .filter(|(_, s)| *s > 0)
        .collect();
    streaks.sort_by(|a, b| b.1.cmp(&a.1));
    streaks.truncate(n);
    streaks
}

/// Sum of activity over the `days` most recent calendar dates ending
/// `today` inclusive. Missing days count as 0.
pub fn window_sum(record: &ActivityRecord, days: u64, today: NaiveDate) -> u64 {
    (0..days)
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| u64::from(record.events_on(date)))
        .sum()
}

/// Solved count against the user's goal.
pub fn goal_progress(record: &ActivityRecord) -> GoalProgress {
    let percent = if record.goal > 0 {
        Some(record.problems_solved * 100 / record.goal)
    } else {
        None
    };
    GoalProgress {
        solved: record.problems_solved,
        goal: record.goal,
        percent,
    }
}
