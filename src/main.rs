//! Irrigator main entry point.
//!
//! Hexagonal layout with a single-threaded poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  RelayValve       LogEventSink   JsonStatusFile   SystemClock  │
//! │  (ValvePort)      (EventSink)    (StatusStore)    (Clock)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Zone (pure policy)                        │    │
//! │  │  SupplyLedger · daily-cap gate · interval trigger      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Runner (sweep · persist-if-acted)                             │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use irrigator::adapters::hardware::RelayValve;
use irrigator::adapters::log_sink::LogEventSink;
use irrigator::adapters::status_file::JsonStatusFile;
use irrigator::adapters::time::SystemClock;
use irrigator::config::{self, RunnerSettings};
use irrigator::pins;
use irrigator::runner::{self, Runner};

// ── CLI ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "irrigator", version, about = "Interval and daily-cap irrigation controller")]
struct Cli {
    /// The filename for the zones config JSON file
    #[arg(long, default_value = "rpi_zone_configs.json")]
    zone_config_filename: PathBuf,

    /// The filename for storing the execution status JSON data
    #[arg(long, default_value = "rpi_water_status.json")]
    status_filename: PathBuf,

    /// Seconds between each round of zone checks
    #[arg(long, default_value_t = 300)]
    check_interval_secs: u64,

    /// Milliseconds to wait before checking each zone
    #[arg(long, default_value_t = 1000)]
    zone_gap_ms: u64,

    /// Trailing window, in seconds, over which the daily cap applies
    #[arg(long, default_value_t = 86_400)]
    rolling_window_secs: u64,

    /// Run a single sweep, persist if anything watered, then exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> RunnerSettings {
        RunnerSettings {
            check_interval: Duration::from_secs(self.check_interval_secs),
            zone_gap: Duration::from_millis(self.zone_gap_ms),
            rolling_window: Duration::from_secs(self.rolling_window_secs),
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Logging ────────────────────────────────────────────
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Irrigator v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Zone configs (fatal on failure) ────────────────────
    let configs = config::load_zone_configs(&cli.zone_config_filename).with_context(|| {
        format!(
            "Failed to load zone configs from JSON file {}",
            cli.zone_config_filename.display()
        )
    })?;

    // ── 3. Relays ─────────────────────────────────────────────
    let settings = cli.settings();
    let zones = runner::build_zones(configs, &settings, |c| {
        let pin = pins::open_relay_pin(c.relay_pin)?;
        Ok(RelayValve::new(c.name.clone(), pin))
    })?;

    // ── 4. Runner + persisted status (non-fatal) ──────────────
    let mut runner = Runner::new(
        zones,
        SystemClock::new(),
        JsonStatusFile::new(&cli.status_filename),
        LogEventSink::new(),
        settings,
    );
    let report = runner.load_statuses();
    for name in &report.unknown {
        info!("Status file has zone {} which is not configured; ignoring", name);
    }
    runner.log_summary();

    // ── 5. Poll loop ──────────────────────────────────────────
    if cli.once {
        runner.run_once();
        return Ok(());
    }
    runner.run()
}
