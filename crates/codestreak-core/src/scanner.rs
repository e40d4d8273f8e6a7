//! Periodic inactivity sweep.
//!
//! Walks every known member of every group the bot can see, compares
//! their last-active timestamp against a threshold, and pushes a reminder
//! through the [`Notifier`] port. The sweep never mutates the store and a
//! failed delivery never aborts the rest of the pass.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::content::ContentProvider;
use crate::error::DeliveryError;
use crate::store::ActivityStore;

/// One member of a group, as the connector sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    /// Non-human accounts are never nudged.
    pub is_bot: bool,
}

/// A group (server/guild) the bot is part of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<Member>,
}

/// Enumerates the groups and members the bot can see.
pub trait Roster {
    fn groups(&self) -> Result<Vec<Group>, DeliveryError>;
}

/// Delivers a reminder to one member in one group's notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, group: &Group, member: &Member, text: &str)
        -> Result<(), DeliveryError>;
}

/// Counters from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub scanned: usize,
    pub notified: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct InactivityScanner<R, N, C> {
    roster: R,
    notifier: N,
    content: C,
    inactive_after: Duration,
}

impl<R, N, C> InactivityScanner<R, N, C>
where
    R: Roster,
    N: Notifier,
    C: ContentProvider,
{
    pub fn new(roster: R, notifier: N, content: C, inactive_after_hours: u64) -> Self {
        Self {
            roster,
            notifier,
            content,
            inactive_after: Duration::hours(inactive_after_hours as i64),
        }
    }

    /// One full pass over every group and member.
    ///
    /// Skips bots and members with no recorded activity (a user we have
    /// never seen solve anything gets no reminder). Per-member delivery
    /// failures are logged and counted, not propagated.
    pub async fn sweep(&self, store: &ActivityStore, now: DateTime<Utc>) -> SweepSummary {
        let groups = match self.roster.groups() {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "inactivity sweep skipped: roster unavailable");
                return SweepSummary::default();
            }
        };

        let mut summary = SweepSummary::default();
        for group in &groups {
            for member in &group.members {
                if member.is_bot {
                    continue;
                }
                summary.scanned += 1;

                let last_active = store.get(&member.id).and_then(|rec| rec.last_active);
                let Some(last_active) = last_active else {
                    summary.skipped += 1;
                    continue;
                };
                if now - last_active <= self.inactive_after {
                    summary.skipped += 1;
                    continue;
                }

                let text = self.content.reminder(&member.display_name);
                match self.notifier.notify(group, member, &text).await {
                    Ok(()) => summary.notified += 1,
                    Err(e) => {
                        warn!(
                            group = %group.name,
                            member = %member.display_name,
                            error = %e,
                            "reminder delivery failed"
                        );
                        summary.failed += 1;
                    }
                }
            }
        }

        info!(
            scanned = summary.scanned,
            notified = summary.notified,
            skipped = summary.skipped,
            failed = summary.failed,
            "inactivity sweep complete"
        );
        summary
    }
}
