//! Seatplan binary.
//!
//! # Usage
//!
//! ```bash
//! # Allocate every exam in the snapshot, print the plan to stdout
//! seatplan --data snapshot.json
//!
//! # Allocate two exams with strict accessibility, write to a file
//! seatplan --data snapshot.json --exam 3 --exam 4 --strict-accessibility --output plan.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use seatplan_core::{AllocationPolicy, ExamId};
use seatplan_service::{AllocatorConfig, RuntimeConfig, execute, write_summary};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exam seat allocator
#[derive(Parser, Debug)]
#[command(name = "seatplan")]
#[command(about = "Allocate exam seats from a JSON snapshot")]
#[command(version)]
struct Args {
    /// JSON snapshot with courses, students, rooms, exams and assignments
    #[arg(short, long)]
    data: PathBuf,

    /// Exam to allocate (repeatable, default: every exam in schedule order)
    #[arg(short, long = "exam")]
    exams: Vec<u64>,

    /// Leave accessibility-flagged students unseated instead of placing
    /// them in an inaccessible room
    #[arg(long)]
    strict_accessibility: bool,

    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the JSON result
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = RuntimeConfig {
        snapshot_path: args.data,
        exams: args.exams.into_iter().map(ExamId).collect(),
        output: args.output,
        allocator: AllocatorConfig {
            policy: AllocationPolicy { strict_accessibility: args.strict_accessibility },
        },
    };

    tracing::info!("seatplan starting");

    let summary = execute(&config)?;
    write_summary(&config, &summary)?;

    Ok(())
}
