//! Data Model CLI
//!
//! Validates trace model and objective model files, and schedule expressions,
//! without a running server.
//!
//! # Usage
//!
//! ```bash
//! datamodel --help
//! datamodel validate-trace models/trace.json
//! datamodel validate-objective models/objectives.json
//! datamodel check-schedule --type CRON --expression "0 */5 * * * *" --count 3
//! ```

#![deny(unsafe_code)]

mod commands;

use chrono::Utc;
use clap::{Parser, Subcommand};
use shared::models::Schedule;
use std::path::PathBuf;

/// Data Model CLI - offline validation of model configurations
#[derive(Parser)]
#[command(name = "datamodel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `shared=debug`
    #[arg(long, env = "DATAMODEL_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON file with one trace model or an array of them
    ValidateTrace {
        /// Path to the model file
        file: PathBuf,
    },
    /// Validate a JSON file with one objective model or an array of them
    ValidateObjective {
        /// Path to the model file
        file: PathBuf,
    },
    /// Validate a schedule and preview cron fire times
    CheckSchedule {
        /// `FIX_RATE` or `CRON`
        #[arg(long = "type", value_name = "TYPE")]
        schedule_type: String,
        /// Period such as `5m`, or a 6-field cron expression
        #[arg(long)]
        expression: String,
        /// Number of upcoming cron fire times to print
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::ValidateTrace { file }) => {
            println!("{}", commands::run_validate_trace(&file)?);
        }
        Some(Commands::ValidateObjective { file }) => {
            println!("{}", commands::run_validate_objective(&file)?);
        }
        Some(Commands::CheckSchedule {
            schedule_type,
            expression,
            count,
        }) => {
            let schedule = Schedule::new(schedule_type, expression);
            let fire_times =
                commands::run_check_schedule(&schedule, count, Utc::now().naive_utc())?;
            println!("Schedule is valid");
            for time in fire_times {
                println!("{time} UTC");
            }
        }
        None => {
            println!("Data Model CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
