//! # Codestreak Core Library
//!
//! Core business logic for the Codestreak community coding-activity bot.
//! The chat platform itself is an external collaborator: a connector
//! process feeds message events and command invocations in, and delivers
//! the replies, relays, and reminders that come back out.
//!
//! ## Architecture
//!
//! - **Store**: insertion-ordered per-user activity records with
//!   write-through JSON persistence
//! - **Tracker**: the single writer -- solve recording, the daily-puzzle
//!   guard, admin adjustments
//! - **Aggregation**: ranks, streak boards, recent-window sums, goal
//!   progress, all computed live from the store
//! - **Scanner**: periodic inactivity sweep emitting reminders through a
//!   notifier port
//!
//! ## Key Components
//!
//! - [`Tracker`]: mutation entry point, persists after every change
//! - [`CommandHandler`]: the chat command surface
//! - [`InactivityScanner`]: the 24h reminder sweep
//! - [`JsonStore`]: file-backed persistence behind [`StorePersistence`]

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod message;
pub mod notify;
pub mod roster;
pub mod scanner;
pub mod store;
pub mod streak;
pub mod tracker;

pub use commands::{Command, CommandHandler, Invocation, RelayIntent, Reply, Response};
pub use config::{BotEnv, Settings};
pub use content::{BuiltinContent, ContentProvider, Motivation};
pub use error::{ConfigError, CoreError, DeliveryError, StoreError, ValidationError};
pub use notify::WebhookNotifier;
pub use roster::FileRoster;
pub use scanner::{Group, InactivityScanner, Member, Notifier, Roster, SweepSummary};
pub use store::{ActivityRecord, ActivityStore, JsonStore, StorePersistence};
pub use streak::streak;
pub use tracker::{PuzzleOutcome, Tracker};
