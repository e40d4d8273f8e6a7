use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "codestreak-cli", version, about = "Codestreak CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Leaderboards and per-user stats
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Record activity events
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Admin adjustments and reports
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
    /// Run the inactivity sweep once
    Sweep(commands::sweep::SweepArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Record { action } => commands::record::run(action),
        Commands::Admin { action } => commands::admin::run(action),
        Commands::Sweep(args) => commands::sweep::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
