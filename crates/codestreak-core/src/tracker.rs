//! Single-writer activity tracker.
//!
//! Owns the in-memory [`ActivityStore`] plus the injected persistence
//! port. Every mutation completes in-memory and is flushed to persistent
//! state before the call returns, so an acknowledged event is always
//! durable. Handlers must not hold partial mutations across await points;
//! all methods here are synchronous for that reason.

use chrono::{DateTime, Utc};

use crate::error::{Result, ValidationError};
use crate::store::{ActivityStore, StorePersistence};

/// Outcome of the daily-puzzle trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleOutcome {
    /// Counted: first puzzle event of the day.
    Recorded,
    /// Skipped: the user already has activity recorded today.
    AlreadyDone,
}

pub struct Tracker<P: StorePersistence> {
    store: ActivityStore,
    persistence: P,
}

impl<P: StorePersistence> Tracker<P> {
    /// Load the persisted store (empty on first run) and take ownership
    /// of the persistence port.
    pub fn open(persistence: P) -> Self {
        let store = persistence.load();
        Self { store, persistence }
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    /// Record one solved problem for the user at the given time.
    ///
    /// Not idempotent: every call counts one more solve. The once-per-day
    /// guard exists only on the daily-puzzle trigger
    /// ([`record_daily_puzzle`](Self::record_daily_puzzle)).
    pub fn record_solve(&mut self, user_id: &str, at: DateTime<Utc>) -> Result<()> {
        let rec = self.store.get_or_create(user_id);
        *rec.activity.entry(at.date_naive()).or_insert(0) += 1;
        rec.problems_solved += 1;
        rec.last_active = Some(at);
        self.persistence.save(&self.store)?;
        Ok(())
    }

    /// Record the daily puzzle, at most once per calendar day.
    ///
    /// If the user already has a positive activity count today, nothing
    /// is mutated or persisted and `AlreadyDone` is returned.
    pub fn record_daily_puzzle(
        &mut self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<PuzzleOutcome> {
        let rec = self.store.get_or_create(user_id);
        if rec.events_on(at.date_naive()) > 0 {
            return Ok(PuzzleOutcome::AlreadyDone);
        }
        self.record_solve(user_id, at)?;
        Ok(PuzzleOutcome::Recorded)
    }

    /// Admin adjustment of the solved counter by a signed amount.
    ///
    /// Bypasses the per-day activity map; clamps at zero. Returns the new
    /// count.
    pub fn adjust_solved(&mut self, user_id: &str, amount: i64) -> Result<u64> {
        if amount == 0 {
            return Err(ValidationError::ZeroAdjustment.into());
        }
        let rec = self.store.get_or_create(user_id);
        rec.problems_solved = if amount >= 0 {
            rec.problems_solved.saturating_add(amount as u64)
        } else {
            rec.problems_solved.saturating_sub(amount.unsigned_abs())
        };
        let updated = rec.problems_solved;
        self.persistence.save(&self.store)?;
        Ok(updated)
    }

    /// Set the user's goal. Zero is rejected; a goal is cleared by admin
    /// adjustment of the data file, not through the command surface.
    pub fn set_goal(&mut self, user_id: &str, goal: u64) -> Result<()> {
        if goal == 0 {
            return Err(ValidationError::ZeroGoal.into());
        }
        self.store.get_or_create(user_id).goal = goal;
        self.persistence.save(&self.store)?;
        Ok(())
    }
}
