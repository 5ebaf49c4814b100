use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use examguard_core::{Countdown, CountdownTick, format_hms};

#[derive(Args)]
pub struct CountdownArgs {
    /// Exam deadline (RFC 3339, e.g. 2026-06-01T10:00:00Z)
    #[arg(long, value_parser = parse_rfc3339)]
    pub ends_at: DateTime<Utc>,

    /// Evaluate at this instant instead of the current time
    #[arg(long, value_parser = parse_rfc3339)]
    pub now: Option<DateTime<Utc>>,
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

pub fn run(args: CountdownArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let mut countdown = Countdown::new(args.ends_at);
    println!("{}", render(countdown.tick(now)));
    Ok(())
}

fn render(tick: CountdownTick) -> String {
    match tick {
        CountdownTick::Running(remaining) => format!("Time remaining: {}", format_hms(remaining)),
        CountdownTick::Expired | CountdownTick::AlreadyExpired => "Time is up".to_string(),
    }
}
