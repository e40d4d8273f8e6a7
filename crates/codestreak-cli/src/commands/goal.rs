use chrono::Utc;
use clap::Subcommand;
use codestreak_core::aggregate::{goal_progress, window_sum};
use codestreak_core::Settings;
use serde_json::json;

use super::open_tracker;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Set a user's target solve count
    Set { user_id: String, goal: u64 },
    /// Goal progress and recent-window sum for a user
    Progress { user_id: String },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GoalAction::Set { user_id, goal } => {
            let mut tracker = open_tracker()?;
            tracker.set_goal(&user_id, goal)?;
            println!("{}", serde_json::to_string_pretty(&json!({
                "user_id": user_id,
                "goal": goal,
            }))?);
        }
        GoalAction::Progress { user_id } => {
            let settings = Settings::load()?;
            let tracker = open_tracker()?;
            let today = Utc::now().date_naive();
            let out = match tracker.store().get(&user_id) {
                Some(rec) => {
                    let progress = goal_progress(rec);
                    json!({
                        "user_id": user_id,
                        "solved": progress.solved,
                        "goal": progress.goal,
                        "percent": progress.percent,
                        "window_days": settings.progress_window_days,
                        "window_sum": window_sum(rec, settings.progress_window_days, today),
                    })
                }
                None => json!({
                    "user_id": user_id,
                    "solved": 0,
                    "goal": 0,
                    "percent": null,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
