use clap::Args;
use codestreak_core::{
    BuiltinContent, FileRoster, InactivityScanner, Settings, WebhookNotifier,
};
use serde_json::json;

use super::open_tracker;

#[derive(Args)]
pub struct SweepArgs {
    /// Roster file (groups, members, webhooks)
    #[arg(long)]
    pub roster: std::path::PathBuf,
}

pub fn run(args: SweepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let tracker = open_tracker()?;

    let roster = FileRoster::new(args.roster);
    let mut notifier = WebhookNotifier::new();
    for (group_id, url) in roster.webhooks()? {
        notifier.add_endpoint(&group_id, &url)?;
    }

    let scanner = InactivityScanner::new(
        roster,
        notifier,
        BuiltinContent,
        settings.inactive_after_hours,
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(scanner.sweep(tracker.store(), chrono::Utc::now()));

    println!("{}", serde_json::to_string_pretty(&json!({
        "scanned": summary.scanned,
        "notified": summary.notified,
        "skipped": summary.skipped,
        "failed": summary.failed,
    }))?);
    Ok(())
}
