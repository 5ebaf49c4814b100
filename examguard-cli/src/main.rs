use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "examguard", about = "Exam lockdown monitor tooling")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted event trace through the lockdown monitor
    Replay(commands::replay::ReplayArgs),
    /// Check whether a key combination is suppressed during lockdown
    CheckKey(commands::check_key::CheckKeyArgs),
    /// Show time remaining until an exam deadline
    Countdown(commands::countdown::CountdownArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    // Logs go to stderr so JSON output on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay(args) => commands::replay::run(args),
        Commands::CheckKey(args) => commands::check_key::run(args),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
