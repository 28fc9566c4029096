//! # Arm Control
//!
//! Runs the mobile arm simulator: loads the configuration, starts the
//! fixed-rate scheduler thread, reads JSON commands from stdin and writes
//! JSON snapshots to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Defaults, commands typed on stdin
//! arm_control
//!
//! # Config file, 60 Hz, verbose logs
//! arm_control --config config/arm.toml --tick-rate 60 -v
//!
//! # Exits once the input is exhausted and the arm has settled
//! echo '{"type":"inverse_kinematic","x":0.6,"y":0.2,"z":0.3}' | arm_control
//! ```

use arm_common::prelude::{ArmConfig, ConfigError, LogLevel, load_config};
use arm_control::adapter::pump_commands;
use arm_control::publisher::JsonLinesPublisher;
use arm_control::scheduler::Scheduler;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Arm Control - mobile robot arm simulator
#[derive(Parser, Debug)]
#[command(name = "arm_control")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Fixed-rate motion engine for a simulated mobile robot arm")]
struct Args {
    /// Path to the arm configuration (arm.toml). Built-in defaults when omitted.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override scheduler.tick_rate_hz.
    #[arg(long, value_name = "HZ")]
    tick_rate: Option<u32>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Load before installing the subscriber so the configured level applies.
    let config = load(&args);
    let log_level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("Arm Control v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(run);
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Arm Control shutdown complete");
}

/// Resolve the configuration from file or defaults, applying CLI overrides.
fn load(args: &Args) -> Result<ArmConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ArmConfig::default(),
    };
    if let Some(rate) = args.tick_rate {
        config.scheduler.tick_rate_hz = rate;
    }
    config.validate()?;
    Ok(config)
}

fn run(config: ArmConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, tick_rate={}Hz, reach={:.3}..{:.3}m",
        config.shared.service_name,
        config.scheduler.tick_rate_hz,
        config.geometry.reach_range().0,
        config.geometry.reach_range().1,
    );

    let publisher = JsonLinesPublisher::new(std::io::stdout());
    let (scheduler, handle) = Scheduler::from_config(&config, Box::new(publisher))?;

    let running = handle.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let scheduler_thread = scheduler.spawn()?;

    // stdin blocks, so it gets its own thread. The scheduler stops on
    // Ctrl-C, or after end of input once every axis has settled.
    let input_handle = handle.clone();
    thread::Builder::new()
        .name("arm-stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            let stats = pump_commands(stdin.lock(), &input_handle);
            info!(
                "Command input closed: {} submitted, {} malformed, {} dropped",
                stats.submitted, stats.malformed, stats.dropped
            );
            input_handle.finish_when_idle();
        })?;

    let scheduler = scheduler_thread
        .join()
        .map_err(|_| "scheduler thread panicked")?;
    let stats = scheduler.stats();
    info!(
        "Scheduler stats: {} ticks, avg={}us, max={}us, overruns={}, published={}",
        stats.tick_count,
        stats.avg_tick_time_us(),
        stats.max_tick_time_us,
        stats.overruns,
        stats.published
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        log_level
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
