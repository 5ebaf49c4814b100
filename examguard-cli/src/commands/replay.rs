//! `examguard replay`: run a scripted trace through the lockdown monitor

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use tracing::debug;
use examguard_core::trace::CallbackFired;
use examguard_core::{
    EventTrace, LockdownSettings, ReplayOutcome, SessionReport, ShortcutCategory, ViolationKind,
    replay,
};

use crate::config::{ConfigLoader, ExamguardConfig, ReportFormat};

#[derive(Args)]
pub struct ReplayArgs {
    /// Trace file (.toml or .json)
    pub trace: PathBuf,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the configured violation threshold
    #[arg(long)]
    pub max_violations: Option<u32>,

    /// Do not request or enforce fullscreen
    #[arg(long)]
    pub no_fullscreen: bool,

    /// Save session reports to the reports directory
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let settings = effective_settings(&config, &args);
    debug!(
        max_violations = settings.max_violations,
        enable_fullscreen = settings.enable_fullscreen,
        fullscreen_retry_ms = settings.fullscreen_retry_ms,
        "Effective lockdown settings"
    );

    let trace = EventTrace::load(&args.trace)
        .with_context(|| format!("Failed to load trace {}", args.trace.display()))?;
    debug!(
        path = %args.trace.display(),
        steps = trace.steps.len(),
        "Loaded trace"
    );
    let outcome = replay(&trace, &settings)?;
    debug!(
        sessions = outcome.sessions.len(),
        callbacks = outcome.callbacks.len(),
        "Replay finished"
    );

    if args.json || config.report.format == ReportFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    if args.save || config.report.save {
        let dir = config.report.reports_dir();
        for session in &outcome.sessions {
            let path = save_report(session, &dir)?;
            eprintln!("Saved report to {}", path.display());
        }
    }
    Ok(())
}

fn effective_settings(config: &ExamguardConfig, args: &ReplayArgs) -> LockdownSettings {
    let mut settings = config.lockdown.clone();
    if let Some(max) = args.max_violations {
        settings.max_violations = max;
    }
    if args.no_fullscreen {
        settings.enable_fullscreen = false;
    }
    settings
}

fn save_report(report: &SessionReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.json", report.session_id));
    std::fs::write(&path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(session_id = %report.session_id, path = %path.display(), "Saved session report");
    Ok(path)
}

fn print_outcome(outcome: &ReplayOutcome) {
    println!("{}", timeline_table(outcome));
    println!();

    if outcome.sessions.is_empty() {
        println!("No lockdown session was started.");
    }
    for session in &outcome.sessions {
        println!("{}", session_table(session));
    }

    if !outcome.callbacks.is_empty() {
        println!();
        println!("Callbacks:");
        for callback in &outcome.callbacks {
            println!("  {}", describe_callback(callback));
        }
    }

    let state = &outcome.final_state;
    println!();
    println!(
        "Final state: {}, {}, {} violation(s), {} fullscreen request(s)",
        if state.is_locked { "locked" } else { "unlocked" },
        if state.is_fullscreen {
            "fullscreen"
        } else {
            "windowed"
        },
        state.violations,
        outcome.fullscreen_requests,
    );
}

fn timeline_table(outcome: &ReplayOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Time (ms)").fg(Color::Cyan),
        Cell::new("Event").fg(Color::Cyan),
        Cell::new("Detail").fg(Color::Cyan),
        Cell::new("Default").fg(Color::Cyan),
        Cell::new("Violations").fg(Color::Cyan),
    ]);

    for entry in &outcome.timeline {
        let dispatch = if entry.dispatch.is_prevented() {
            Cell::new("prevented").fg(Color::Yellow)
        } else {
            Cell::new("passed")
        };
        table.add_row(vec![
            Cell::new(entry.at_ms),
            Cell::new(&entry.event),
            Cell::new(entry.detail.as_deref().unwrap_or("-")),
            dispatch,
            Cell::new(entry.violations),
        ]);
    }
    table
}

fn session_table(session: &SessionReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Session").fg(Color::Cyan),
        Cell::new(session.session_id).fg(Color::Cyan),
    ]);

    let status = match (session.ended_at, session.max_reached()) {
        (_, true) => Cell::new("max violations reached").fg(Color::Red),
        (Some(_), false) => Cell::new("stopped"),
        (None, false) => Cell::new("still locked"),
    };
    table.add_row(vec![Cell::new("Status"), status]);
    table.add_row(vec![
        Cell::new("Violations"),
        Cell::new(format!(
            "{} of {}",
            session.violation_count(),
            session.max_violations
        )),
    ]);
    for kind in [
        ViolationKind::TabHidden,
        ViolationKind::FocusLost,
        ViolationKind::FullscreenExit,
    ] {
        table.add_row(vec![
            Cell::new(format!("  {kind}")),
            Cell::new(session.count_of(kind)),
        ]);
    }
    for category in ShortcutCategory::ALL {
        let count = session
            .suppressed_shortcuts
            .get(&category)
            .copied()
            .unwrap_or(0);
        if count > 0 {
            table.add_row(vec![
                Cell::new(format!("Suppressed {category}")),
                Cell::new(count),
            ]);
        }
    }
    if session.suppressed_context_menus > 0 {
        table.add_row(vec![
            Cell::new("Suppressed context menus"),
            Cell::new(session.suppressed_context_menus),
        ]);
    }
    if !session.fullscreen_failures.is_empty() {
        table.add_row(vec![
            Cell::new("Fullscreen failures"),
            Cell::new(session.fullscreen_failures.join("\n")),
        ]);
    }
    table
}

fn describe_callback(callback: &CallbackFired) -> String {
    match callback {
        CallbackFired::TabSwitch { ordinal } => format!("on_tab_switch (violation #{ordinal})"),
        CallbackFired::FullscreenExit { ordinal } => {
            format!("on_fullscreen_exit (violation #{ordinal})")
        }
        CallbackFired::MaxViolations { count } => format!("on_max_violations ({count})"),
    }
}
