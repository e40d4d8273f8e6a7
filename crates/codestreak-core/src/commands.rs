//! Command surface and dispatch.
//!
//! The connector turns slash-command invocations into [`Command`] values;
//! this module owns permission checks, validation, the actual state
//! changes through the tracker, and reply text. Unexpected failures are
//! caught at the dispatch boundary so a broken command never takes the
//! process down.

use chrono::{DateTime, Utc};
use tracing::error;

use crate::aggregate::{goal_progress, rank, top_n, top_streaks, window_sum};
use crate::config::Settings;
use crate::content::ContentProvider;
use crate::error::{CoreError, Result, ValidationError};
use crate::message::{classify, MessageSignal};
use crate::store::StorePersistence;
use crate::streak::streak;
use crate::tracker::{PuzzleOutcome, Tracker};

/// A parsed command from the chat surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Leaderboard,
    Stats { target: Option<String> },
    Streak,
    TopStreaks,
    SetGoal { goal: u64 },
    Progress,
    DailyPuzzle,
    ModifySolves { target: String, amount: i64 },
    UserReport { target: String },
    Send { channel: String, text: String },
    Motivate { target: String },
    Help,
}

/// Who invoked a command, and when.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub user_id: String,
    pub display_name: String,
    /// Resolved by the connector from platform roles.
    pub is_admin: bool,
    pub now: DateTime<Utc>,
}

/// Text sent back to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Visible only to the invoker.
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }
}

/// Outcome of one command: a reply, plus an optional verbatim relay for
/// the connector to deliver elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub reply: Reply,
    pub relay: Option<RelayIntent>,
}

impl Response {
    fn reply(reply: Reply) -> Self {
        Self { reply, relay: None }
    }
}

/// A message the connector should post verbatim to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayIntent {
    pub channel: String,
    pub text: String,
}

const HELP_TEXT: &str = "\
Commands:
  /leaderboard            top solvers
  /stats [member]         counters, rank and streak for you or a member
  /streak                 your current streak
  /top_streaks            longest streaks
  /set_goal <n>           set your target solve count
  /progress               goal progress and your last 7 days
  /daily_puzzle           log today's puzzle (once per day) and get a prompt
  /motivate <member>      send a member some encouragement
  /modify_solves <m> <n>  (admin) adjust a member's solve count
  /user_report <member>   (admin) extended report for a member
  /send <channel> <text>  (admin) relay a message to a channel
  /help                   this message";

pub struct CommandHandler<P: StorePersistence, C: ContentProvider> {
    tracker: Tracker<P>,
    content: C,
    settings: Settings,
    owner_id: Option<String>,
}

impl<P: StorePersistence, C: ContentProvider> CommandHandler<P, C> {
    pub fn new(
        tracker: Tracker<P>,
        content: C,
        settings: Settings,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            tracker,
            content,
            settings,
            owner_id,
        }
    }

    pub fn tracker(&self) -> &Tracker<P> {
        &self.tracker
    }

    /// Dispatch one command, catching everything at the boundary.
    pub fn handle(&mut self, inv: &Invocation, cmd: Command) -> Response {
        match self.dispatch(inv, cmd) {
            Ok(response) => response,
            Err(CoreError::Validation(e)) => Response::reply(Reply::ephemeral(e.to_string())),
            Err(e) => {
                error!(user = %inv.user_id, error = %e, "command failed");
                Response::reply(Reply::ephemeral(
                    "Something went wrong running that command. Try again later.",
                ))
            }
        }
    }

    /// Process an inbound chat message. A fenced code block counts as a
    /// solve (no reply, every occurrence counts); a greeting gets a
    /// greeting back.
    pub fn handle_message(&mut self, inv: &Invocation, content: &str) -> Result<Option<Reply>> {
        match classify(content) {
            MessageSignal::CodeBlock => {
                self.tracker.record_solve(&inv.user_id, inv.now)?;
                Ok(None)
            }
            MessageSignal::Greeting => Ok(Some(Reply::public(
                self.content.greeting(&inv.display_name),
            ))),
            MessageSignal::None => Ok(None),
        }
    }

    fn is_admin(&self, inv: &Invocation) -> bool {
        inv.is_admin || self.owner_id.as_deref() == Some(inv.user_id.as_str())
    }

    fn require_admin(&self, inv: &Invocation) -> Result<()> {
        if self.is_admin(inv) {
            Ok(())
        } else {
            Err(ValidationError::NotAdmin.into())
        }
    }

    fn dispatch(&mut self, inv: &Invocation, cmd: Command) -> Result<Response> {
        let today = inv.now.date_naive();
        match cmd {
            Command::Leaderboard => {
                let top = top_n(self.tracker.store(), self.settings.leaderboard_size);
                if top.is_empty() {
                    return Ok(Response::reply(Reply::public(
                        "No solves recorded yet. Post a code block to get on the board!",
                    )));
                }
                let mut lines = vec!["Coding leaderboard:".to_string()];
                for (pos, (id, rec)) in top.iter().enumerate() {
                    lines.push(format!(
                        "{}. <@{}> | solved: {}, last active: {}",
                        pos + 1,
                        id,
                        rec.problems_solved,
                        format_last_active(rec.last_active),
                    ));
                }
                Ok(Response::reply(Reply::public(lines.join("\n"))))
            }

            Command::Stats { target } => {
                let store = self.tracker.store();
                let user_id = target.as_deref().unwrap_or(inv.user_id.as_str());
                let user_rank = rank(store, user_id);
                let (solved, current_streak, last_active) = match store.get(user_id) {
                    Some(rec) => (
                        rec.problems_solved,
                        streak(&rec.activity, today),
                        rec.last_active,
                    ),
                    None => (0, 0, None),
                };
                Ok(Response::reply(Reply::public(format!(
                    "Stats for <@{}>\nsolved: {}\nrank: #{}\nstreak: {} day(s)\nlast active: {}",
                    user_id,
                    solved,
                    user_rank,
                    current_streak,
                    format_last_active(last_active),
                ))))
            }

            Command::Streak => {
                let current = self
                    .tracker
                    .store()
                    .get(&inv.user_id)
                    .map(|rec| streak(&rec.activity, today))
                    .unwrap_or(0);
                let text = if current == 0 {
                    "No streak yet. Solve something today to start one!".to_string()
                } else {
                    format!("Your streak: {current} consecutive day(s). Keep it going!")
                };
                Ok(Response::reply(Reply::public(text)))
            }

            Command::TopStreaks => {
                let streaks = top_streaks(
                    self.tracker.store(),
                    self.settings.leaderboard_size,
                    today,
                );
                if streaks.is_empty() {
                    return Ok(Response::reply(Reply::public("No active streaks yet.")));
                }
                let mut lines = vec!["Longest streaks:".to_string()];
                for (pos, (id, len)) in streaks.iter().enumerate() {
                    lines.push(format!("{}. <@{}> | {} day(s)", pos + 1, id, len));
                }
                Ok(Response::reply(Reply::public(lines.join("\n"))))
            }

            Command::SetGoal { goal } => {
                self.tracker.set_goal(&inv.user_id, goal)?;
                Ok(Response::reply(Reply::public(format!(
                    "Goal set: {goal} problems. Check /progress to see how you're doing."
                ))))
            }

            Command::Progress => {
                let store = self.tracker.store();
                let window_days = self.settings.progress_window_days;
                let (progress, recent) = match store.get(&inv.user_id) {
                    Some(rec) => (goal_progress(rec), window_sum(rec, window_days, today)),
                    None => (goal_progress(&Default::default()), 0),
                };
                let goal_line = match progress.percent {
                    Some(pct) => format!(
                        "goal: {}/{} ({}%)",
                        progress.solved, progress.goal, pct
                    ),
                    None => format!("goal: unset (solved {})", progress.solved),
                };
                Ok(Response::reply(Reply::public(format!(
                    "Progress for <@{}>\n{}\nlast {} days: {} solve(s)",
                    inv.user_id, goal_line, window_days, recent,
                ))))
            }

            Command::DailyPuzzle => {
                match self.tracker.record_daily_puzzle(&inv.user_id, inv.now)? {
                    PuzzleOutcome::Recorded => Ok(Response::reply(Reply::public(format!(
                        "Counted! Today's puzzle: {}",
                        self.content.puzzle()
                    )))),
                    PuzzleOutcome::AlreadyDone => Ok(Response::reply(Reply::public(
                        "Already done today. Come back tomorrow!",
                    ))),
                }
            }

            Command::ModifySolves { target, amount } => {
                self.require_admin(inv)?;
                let updated = self.tracker.adjust_solved(&target, amount)?;
                Ok(Response::reply(Reply::public(format!(
                    "Adjusted <@{target}> by {amount}: now {updated} solved."
                ))))
            }

            Command::UserReport { target } => {
                self.require_admin(inv)?;
                let store = self.tracker.store();
                let user_rank = rank(store, &target);
                let report_days = self.settings.report_window_days;
                let text = match store.get(&target) {
                    Some(rec) => {
                        let progress = goal_progress(rec);
                        let goal_line = match progress.percent {
                            Some(pct) => format!("{}/{} ({}%)", progress.solved, progress.goal, pct),
                            None => "unset".to_string(),
                        };
                        format!(
                            "Report for <@{}>\nsolved: {}\nrank: #{}\nstreak: {} day(s)\ngoal: {}\nlast {} days: {} solve(s)\nlast active: {}",
                            target,
                            rec.problems_solved,
                            user_rank,
                            streak(&rec.activity, today),
                            goal_line,
                            report_days,
                            window_sum(rec, report_days, today),
                            format_last_active(rec.last_active),
                        )
                    }
                    None => format!("No activity recorded for <@{target}> (rank #{user_rank})."),
                };
                Ok(Response::reply(Reply::ephemeral(text)))
            }

            Command::Send { channel, text } => {
                self.require_admin(inv)?;
                Ok(Response {
                    reply: Reply::ephemeral(format!("Sent to {channel}.")),
                    relay: Some(RelayIntent { channel, text }),
                })
            }

            Command::Motivate { target } => {
                let motivation = self.content.motivation(&target);
                Ok(Response::reply(Reply::public(format!(
                    "**{}**\n{}",
                    motivation.title, motivation.message
                ))))
            }

            Command::Help => Ok(Response::reply(Reply::public(HELP_TEXT))),
        }
    }
}

fn format_last_active(last_active: Option<DateTime<Utc>>) -> String {
    match last_active {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FixedContent;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn handler() -> CommandHandler<MemoryStore, FixedContent> {
        CommandHandler::new(
            Tracker::open(MemoryStore::default()),
            FixedContent,
            Settings::default(),
            Some("owner".to_string()),
        )
    }

    fn user(id: &str) -> Invocation {
        Invocation {
            user_id: id.to_string(),
            display_name: format!("name-{id}"),
            is_admin: false,
            now: Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap(),
        }
    }

    fn admin(id: &str) -> Invocation {
        Invocation {
            is_admin: true,
            ..user(id)
        }
    }

    #[test]
    fn leaderboard_lists_top_solvers_in_order() {
        let mut h = handler();
        h.handle_message(&user("a"), "```x```").unwrap();
        h.handle_message(&user("b"), "```x```").unwrap();
        h.handle_message(&user("b"), "```y```").unwrap();

        let resp = h.handle(&user("a"), Command::Leaderboard);
        let lines: Vec<&str> = resp.reply.text.lines().collect();
        assert!(lines[1].starts_with("1. <@b>"));
        assert!(lines[2].starts_with("2. <@a>"));
        assert!(!resp.reply.ephemeral);
    }

    #[test]
    fn stats_for_unseen_user_shows_zeros_and_last_rank() {
        let mut h = handler();
        h.handle_message(&user("a"), "```x```").unwrap();

        let resp = h.handle(&user("ghost"), Command::Stats { target: None });
        assert!(resp.reply.text.contains("solved: 0"));
        assert!(resp.reply.text.contains("rank: #2"));
        assert!(resp.reply.text.contains("streak: 0"));
        assert!(resp.reply.text.contains("Never"));
    }

    #[test]
    fn set_goal_and_progress() {
        let mut h = handler();
        h.handle_message(&user("a"), "```x```").unwrap();
        h.handle(&user("a"), Command::SetGoal { goal: 10 });

        let resp = h.handle(&user("a"), Command::Progress);
        assert!(resp.reply.text.contains("goal: 1/10 (10%)"));
        assert!(resp.reply.text.contains("last 7 days: 1 solve(s)"));
    }

    #[test]
    fn zero_goal_is_rejected_with_ephemeral_reply() {
        let mut h = handler();
        let resp = h.handle(&user("a"), Command::SetGoal { goal: 0 });
        assert!(resp.reply.ephemeral);
        assert!(resp.reply.text.contains("greater than zero"));
    }

    #[test]
    fn progress_without_goal_reads_unset() {
        let mut h = handler();
        let resp = h.handle(&user("a"), Command::Progress);
        assert!(resp.reply.text.contains("goal: unset"));
    }

    #[test]
    fn daily_puzzle_guard_replies_already_done() {
        let mut h = handler();
        let first = h.handle(&user("a"), Command::DailyPuzzle);
        assert!(first.reply.text.contains("puzzle"));

        let second = h.handle(&user("a"), Command::DailyPuzzle);
        assert!(second.reply.text.contains("Already done today"));
        assert_eq!(h.tracker().store().get("a").unwrap().problems_solved, 1);
    }

    #[test]
    fn code_blocks_count_every_time() {
        let mut h = handler();
        h.handle_message(&user("a"), "```x```").unwrap();
        h.handle_message(&user("a"), "```y```").unwrap();
        assert_eq!(h.tracker().store().get("a").unwrap().problems_solved, 2);
    }

    #[test]
    fn greeting_gets_a_reply_and_no_tracking() {
        let mut h = handler();
        let reply = h.handle_message(&user("a"), "hello bot").unwrap();
        assert_eq!(reply.unwrap().text, "hello name-a");
        assert!(!h.tracker().store().contains("a"));
    }

    #[test]
    fn admin_commands_denied_for_regular_users() {
        let mut h = handler();
        for cmd in [
            Command::ModifySolves {
                target: "b".to_string(),
                amount: 1,
            },
            Command::UserReport {
                target: "b".to_string(),
            },
            Command::Send {
                channel: "general".to_string(),
                text: "hi".to_string(),
            },
        ] {
            let resp = h.handle(&user("a"), cmd);
            assert!(resp.reply.ephemeral);
            assert!(resp.reply.text.contains("admin"));
            assert!(resp.relay.is_none());
        }
    }

    #[test]
    fn owner_is_always_admin() {
        let mut h = handler();
        let resp = h.handle(
            &user("owner"),
            Command::ModifySolves {
                target: "b".to_string(),
                amount: 3,
            },
        );
        assert!(resp.reply.text.contains("now 3 solved"));
    }

    #[test]
    fn modify_solves_clamps_and_reports() {
        let mut h = handler();
        let resp = h.handle(
            &admin("a"),
            Command::ModifySolves {
                target: "b".to_string(),
                amount: -5,
            },
        );
        assert!(resp.reply.text.contains("now 0 solved"));
    }

    #[test]
    fn zero_adjustment_rejected() {
        let mut h = handler();
        let resp = h.handle(
            &admin("a"),
            Command::ModifySolves {
                target: "b".to_string(),
                amount: 0,
            },
        );
        assert!(resp.reply.ephemeral);
        assert!(resp.reply.text.contains("must not be zero"));
    }

    #[test]
    fn user_report_is_ephemeral() {
        let mut h = handler();
        h.handle_message(&user("b"), "```x```").unwrap();
        let resp = h.handle(
            &admin("a"),
            Command::UserReport {
                target: "b".to_string(),
            },
        );
        assert!(resp.reply.ephemeral);
        assert!(resp.reply.text.contains("last 30 days: 1 solve(s)"));
    }

    #[test]
    fn send_produces_a_relay_intent() {
        let mut h = handler();
        let resp = h.handle(
            &admin("a"),
            Command::Send {
                channel: "general".to_string(),
                text: "announcement".to_string(),
            },
        );
        assert_eq!(
            resp.relay,
            Some(RelayIntent {
                channel: "general".to_string(),
                text: "announcement".to_string(),
            })
        );
    }

    #[test]
    fn motivate_uses_the_content_provider() {
        let mut h = handler();
        let resp = h.handle(
            &user("a"),
            Command::Motivate {
                target: "Sam".to_string(),
            },
        );
        assert!(resp.reply.text.contains("go Sam"));
    }

    #[test]
    fn help_lists_commands() {
        let mut h = handler();
        let resp = h.handle(&user("a"), Command::Help);
        assert!(resp.reply.text.contains("/leaderboard"));
        assert!(resp.reply.text.contains("/modify_solves"));
    }
}
