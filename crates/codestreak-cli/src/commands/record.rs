use chrono::Utc;
use clap::Subcommand;
use codestreak_core::PuzzleOutcome;
use serde_json::json;

use super::open_tracker;

#[derive(Subcommand)]
pub enum RecordAction {
    /// Record one solve for a user (counts every time)
    Solve { user_id: String },
    /// Record the daily puzzle for a user (once per day)
    Puzzle { user_id: String },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker()?;
    let now = Utc::now();

    match action {
        RecordAction::Solve { user_id } => {
            tracker.record_solve(&user_id, now)?;
            let rec = tracker.store().get(&user_id).ok_or("record missing after solve")?;
            println!("{}", serde_json::to_string_pretty(&json!({
                "user_id": user_id,
                "problems_solved": rec.problems_solved,
            }))?);
        }
        RecordAction::Puzzle { user_id } => {
            let outcome = tracker.record_daily_puzzle(&user_id, now)?;
            println!("{}", serde_json::to_string_pretty(&json!({
                "user_id": user_id,
                "recorded": outcome == PuzzleOutcome::Recorded,
            }))?);
        }
    }
    Ok(())
}
