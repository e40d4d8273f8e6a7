use chrono::Utc;
use clap::Subcommand;
use codestreak_core::aggregate::{rank, top_n, top_streaks};
use codestreak_core::{Settings, streak};
use serde_json::json;

use super::open_tracker;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Top solvers
    Leaderboard,
    /// One user's counters, rank and streak
    User { user_id: String },
    /// Longest active streaks
    Streaks,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let tracker = open_tracker()?;
    let store = tracker.store();
    let today = Utc::now().date_naive();

    match action {
        StatsAction::Leaderboard => {
            let board: Vec<_> = top_n(store, settings.leaderboard_size)
                .into_iter()
                .enumerate()
                .map(|(pos, (id, rec))| {
                    json!({
                        "rank": pos + 1,
                        "user_id": id,
                        "problems_solved": rec.problems_solved,
                        "last_active": rec.last_active,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        StatsAction::User { user_id } => {
            let user_rank = rank(store, &user_id);
            let out = match store.get(&user_id) {
                Some(rec) => json!({
                    "user_id": user_id,
                    "problems_solved": rec.problems_solved,
                    "rank": user_rank,
                    "streak": streak(&rec.activity, today),
                    "goal": rec.goal,
                    "last_active": rec.last_active,
                }),
                None => json!({
                    "user_id": user_id,
                    "problems_solved": 0,
                    "rank": user_rank,
                    "streak": 0,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Streaks => {
            let board: Vec<_> = top_streaks(store, settings.leaderboard_size, today)
                .into_iter()
                .map(|(id, len)| json!({ "user_id": id, "streak": len }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
    }
    Ok(())
}
