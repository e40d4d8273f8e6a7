//! Consecutive-day streak computation.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

/// Length of the most recent run of consecutive active days.
///
/// The walk anchors at the most recent active day, not at `today`: a user
/// whose last run ended long ago still reports that run's length. Days
/// after `today` are never counted.
pub fn streak(activity: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let most_recent = match activity
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(date, _)| *date)
        .max()
    {
        Some(date) => date,
        None => return 0,
    };

    let mut count = 0;
    let mut day = most_recent;
    loop {
        if activity.get(&day).copied().unwrap_or(0) == 0 {
            break;
        }
        if day <= today {
            count += 1;
        }
        day = match day.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => break,
        };
    }
    count
}
