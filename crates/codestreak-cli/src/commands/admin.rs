use chrono::Utc;
use clap::Subcommand;
use codestreak_core::aggregate::{goal_progress, rank, window_sum};
use codestreak_core::{Settings, streak};
use serde_json::json;

use super::open_tracker;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Adjust a user's solved count by a signed amount (clamped at 0)
    Adjust {
        user_id: String,
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// Extended report for one user
    Report { user_id: String },
}

pub fn run(action: AdminAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AdminAction::Adjust { user_id, amount } => {
            let mut tracker = open_tracker()?;
            let updated = tracker.adjust_solved(&user_id, amount)?;
            println!("{}", serde_json::to_string_pretty(&json!({
                "user_id": user_id,
                "problems_solved": updated,
            }))?);
        }
        AdminAction::Report { user_id } => {
            let settings = Settings::load()?;
            let tracker = open_tracker()?;
            let store = tracker.store();
            let today = Utc::now().date_naive();
            let user_rank = rank(store, &user_id);
            let out = match store.get(&user_id) {
                Some(rec) => {
                    let progress = goal_progress(rec);
                    json!({
                        "user_id": user_id,
                        "problems_solved": rec.problems_solved,
                        "rank": user_rank,
                        "streak": streak(&rec.activity, today),
                        "goal": progress.goal,
                        "goal_percent": progress.percent,
                        "window_days": settings.report_window_days,
                        "window_sum": window_sum(rec, settings.report_window_days, today),
                        "last_active": rec.last_active,
                    })
                }
                None => json!({
                    "user_id": user_id,
                    "problems_solved": 0,
                    "rank": user_rank,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
