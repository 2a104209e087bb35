//! curfew - restriction checks from the command line
//!
//! Loads a restriction configuration and answers whether an action may
//! start at a given instant:
//! - `check`: evaluate one named restriction
//! - `list`: show every configured restriction
//!
//! Exit codes for `check`: 0 allowed, 1 restricted, 2 error.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use curfew_config::{NamedRestriction, Policy, load_config};
use curfew_core::{Dimension, Verdict};
use curfew_util::{
    CurfewError, RestrictionId, check_offset_hours, default_config_path, format_instant,
    now_epoch, parse_instant,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// curfew - is this action restricted right now?
#[derive(Parser, Debug)]
#[command(name = "curfew")]
#[command(about = "Check actions against recurring calendar restrictions", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/curfew/config.toml, or CURFEW_CONFIG)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether an action is restricted
    Check {
        /// Restriction ID from the configuration
        #[arg(short, long)]
        restriction: String,

        /// Request time: epoch seconds, RFC 3339, or "YYYY-MM-DD HH:MM:SS" (UTC). Default: now
        #[arg(long, value_parser = parse_at)]
        at: Option<i64>,

        /// UTC offset of the caller, in hours. Default: the restriction's reference offset
        #[arg(long, allow_negative_numbers = true, value_parser = parse_offset)]
        offset: Option<f64>,

        /// Estimated duration of the action, in seconds
        #[arg(short, long, default_value_t = 0)]
        duration: u64,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured restrictions
    List,
}

fn parse_at(s: &str) -> std::result::Result<i64, String> {
    parse_instant(s).map_err(|e| e.to_string())
}

fn parse_offset(s: &str) -> std::result::Result<f64, String> {
    let hours: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number of hours", s))?;
    check_offset_hours(hours).map_err(|e| e.to_string())
}

/// Result of a `check`, as printed
#[derive(Debug, Serialize)]
struct CheckReport {
    restriction: RestrictionId,
    request_time: i64,
    request_offset: Option<f64>,
    reference_offset: f64,
    estimated_secs: u64,
    translated: i64,
    evaluated_at: String,
    restricted: bool,
    dimension: Option<Dimension>,
    disabled: bool,
}

impl CheckReport {
    fn new(
        named: &NamedRestriction,
        request_time: i64,
        request_offset: Option<f64>,
        estimated: Duration,
        verdict: Verdict,
    ) -> Self {
        Self {
            restriction: named.id.clone(),
            request_time,
            request_offset,
            reference_offset: named.restriction.reference_offset,
            estimated_secs: estimated.as_secs(),
            translated: verdict.translated,
            evaluated_at: format_instant(verdict.translated, named.restriction.calendar),
            restricted: verdict.restricted,
            dimension: verdict.dimension,
            disabled: named.disabled,
        }
    }

    fn summary(&self) -> String {
        match (self.restricted, self.dimension) {
            (false, _) if self.disabled => "allowed (restriction disabled)".to_string(),
            (false, _) => "allowed".to_string(),
            (true, Some(dimension)) => format!("RESTRICTED by {}", dimension),
            (true, None) => "RESTRICTED (instant outside the calendar range)".to_string(),
        }
    }
}

fn find_restriction<'a>(policy: &'a Policy, id: &str) -> Result<&'a NamedRestriction> {
    let id = RestrictionId::new(id);
    policy
        .get_restriction(&id)
        .ok_or_else(|| CurfewError::not_found(id).into())
}

fn check(
    policy: &Policy,
    restriction: &str,
    at: Option<i64>,
    offset: Option<f64>,
    duration: u64,
) -> Result<CheckReport> {
    let named = find_restriction(policy, restriction)?;
    let request_time = at.unwrap_or_else(now_epoch);
    let estimated = Duration::from_secs(duration);

    debug!(
        restriction = %named.id,
        request_time,
        request_offset = ?offset,
        estimated_secs = duration,
        "Checking restriction"
    );

    let verdict = named.evaluate(offset, request_time, estimated);
    Ok(CheckReport::new(named, request_time, offset, estimated, verdict))
}

fn print_report(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let offset = match report.request_offset {
        Some(offset) => format!("{}h", offset),
        None => format!("{}h (reference)", report.reference_offset),
    };

    println!("restriction: {}", report.restriction);
    println!("requested:   {} (offset {})", report.request_time, offset);
    println!("duration:    {}s", report.estimated_secs);
    println!("evaluated:   {}", report.evaluated_at);
    println!("verdict:     {}", report.summary());
    Ok(())
}

fn list(policy: &Policy) {
    if policy.restrictions.is_empty() {
        println!("No restrictions configured");
        return;
    }

    for named in &policy.restrictions {
        let state = if named.disabled { " (disabled)" } else { "" };
        println!("{}: {}{}", named.id, named.label, state);
        println!(
            "  reference offset {}h, calendar {}",
            named.restriction.reference_offset, named.restriction.calendar
        );

        if let Some(reason) = &named.disabled_reason {
            println!("  disabled: {}", reason);
        }

        if named.restriction.intervals.is_unrestricted() {
            println!("  no intervals");
            continue;
        }

        for dimension in Dimension::ALL {
            let intervals = named.restriction.intervals.describe(dimension);
            if !intervals.is_empty() {
                println!("  {}: {}", dimension, intervals.join(", "));
            }
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let policy = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    info!(
        config_path = %args.config.display(),
        restriction_count = policy.restrictions.len(),
        "Configuration loaded"
    );

    match args.command {
        Command::Check {
            restriction,
            at,
            offset,
            duration,
            json,
        } => {
            let report = check(&policy, &restriction, at, offset, duration)?;
            print_report(&report, json)?;
            Ok(if report.restricted {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::List => {
            list(&policy);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "curfew starting");

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "curfew failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
