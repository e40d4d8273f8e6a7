use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use codestreak_core::{
    BotEnv, BuiltinContent, CommandHandler, FileRoster, InactivityScanner, JsonStore, Settings,
    Tracker, WebhookNotifier,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

mod gateway;

#[derive(Parser)]
#[command(name = "codestreak-bot", version, about = "Codestreak bot service")]
struct Cli {
    /// Roster file for inactivity sweeps (groups, members, webhooks).
    /// Without it the bot runs the gateway only.
    #[arg(long, env = "CODESTREAK_ROSTER")]
    roster: Option<PathBuf>,

    /// Override the activity data file path
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codestreak_core=info".parse()?)
                .add_directive("codestreak_bot=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Missing token is the only fatal startup condition.
    let env = BotEnv::from_env()?;
    let settings = Settings::load()?;

    let data_path = match cli.data {
        Some(path) => path,
        None => settings.data_path()?,
    };
    let tracker = Tracker::open(JsonStore::new(data_path));
    let mut handler = CommandHandler::new(
        tracker,
        BuiltinContent,
        settings.clone(),
        env.owner_id.clone(),
    );

    let scanner = match cli.roster {
        Some(path) => {
            let roster = FileRoster::new(path);
            let mut notifier = WebhookNotifier::new();
            for (group_id, url) in roster.webhooks()? {
                notifier.add_endpoint(&group_id, &url)?;
            }
            Some(InactivityScanner::new(
                roster,
                notifier,
                BuiltinContent,
                settings.inactive_after_hours,
            ))
        }
        None => {
            warn!("no roster configured; inactivity sweeps disabled");
            None
        }
    };

    info!(tracked_users = handler.tracker().store().len(), "gateway up");

    // First sweep lands one full interval after startup; uptime-based,
    // not calendar-aligned.
    let period = Duration::from_secs(settings.sweep_interval_hours * 3600);
    let mut sweep_timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        for out in gateway::process_line(&mut handler, &line) {
                            println!("{}", serde_json::to_string(&out)?);
                        }
                    }
                    None => {
                        info!("connector hung up, shutting down");
                        break;
                    }
                }
            }
            _ = sweep_timer.tick(), if scanner.is_some() => {
                if let Some(scanner) = &scanner {
                    scanner.sweep(handler.tracker().store(), Utc::now()).await;
                }
            }
        }
    }

    Ok(())
}
