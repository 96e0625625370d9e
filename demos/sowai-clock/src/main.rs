//! SOWAI Clock - generative digit clock in the terminal
//!
//! Usage:
//! - `sowai-clock` or `sowai-clock run`: draw the clock until q, Esc or Ctrl-C
//! - `sowai-clock probe <digit>`: generate one digit, print timing and ASCII art
//!
//! Configuration comes from `SOWAI_CONFIG` (a JSON file) and `SOWAI_*`
//! overrides. Logs go to stderr, filtered by `RUST_LOG`.

mod terminal;

use std::process::ExitCode;

use sowai_core::{ClockError, ClockResult};
use sowai_runtime::{load_engine, probe_digit, ClockConfig, DualCadenceScheduler, NoiseSource};
use sowai_time::SystemClock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use terminal::{KeyboardShutdown, TerminalSurface};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str);

    // The clock draws on the same terminal stderr writes to
    init_tracing(if command == Some("probe") { "info" } else { "warn" });

    match run(command, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Option<&str>, argument: Option<&str>) -> ClockResult<()> {
    let config = ClockConfig::load()?;
    match command {
        None | Some("run") => run_clock(&config),
        Some("probe") => run_probe(&config, argument),
        Some(other) => Err(ClockError::InvalidConfig(format!(
            "unknown command {:?} (expected `run` or `probe <digit>`)",
            other
        ))),
    }
}

/// One-line message for a fatal error
fn diagnostic(e: &ClockError) -> String {
    if e.is_startup() {
        format!("sowai-clock: cannot start: {}", e)
    } else {
        format!("sowai-clock: stopped: {}", e)
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_clock(config: &ClockConfig) -> ClockResult<()> {
    // Resolve the model before touching the terminal
    let engine = load_engine(&config.model_path, config.shape)?;
    let surface = TerminalSurface::enter()?;
    let shutdown = KeyboardShutdown::new();

    let mut scheduler = DualCadenceScheduler::new(config, engine, surface, SystemClock::new())?;
    let result = scheduler.run(&shutdown);
    // Restores the terminal before anything is printed
    drop(scheduler);

    let stats = result?;
    if let Some(e) = shutdown.input_error() {
        return Err(e);
    }

    info!(
        generations = stats.generations,
        renders = stats.renders,
        "clock stopped"
    );
    println!(
        "Stopped after {} generations and {} renders",
        stats.generations, stats.renders
    );
    Ok(())
}

fn run_probe(config: &ClockConfig, digit: Option<&str>) -> ClockResult<()> {
    let digit: u8 = digit
        .ok_or_else(|| ClockError::InvalidConfig("usage: sowai-clock probe <digit>".into()))?
        .parse()
        .map_err(|_| ClockError::InvalidConfig("probe digit must be 0-9".into()))?;

    let mut engine = load_engine(&config.model_path, config.shape)?;
    let mut noise = NoiseSource::from_time();
    let report = probe_digit(engine.as_mut(), digit, &mut noise)?;

    println!("Generated digit {}:", report.digit);
    print!("{}", report.ascii());
    println!("Inference completed: {} microseconds", report.latency.as_micros());
    Ok(())
}
