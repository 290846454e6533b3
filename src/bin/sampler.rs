//! Sampling run entry point.
//!
//! Wires the loop controller to an SGP4 ground track, the generated solar
//! dataset, and (absent flight drivers on this bench) the simulated camera
//! and a steady sensor. Real hardware binds the same `CameraSink` /
//! `FieldSensor` traits.

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};

use groundtrack::camera::SimulatedCamera;
use groundtrack::controller::{LoopController, SystemClock};
use groundtrack::mock::MockSensor;
use groundtrack::position::TleGroundTrack;
use groundtrack::recorder::SampleRecorder;
use groundtrack::solar::SolarEphemeris;
use groundtrack::store::PhotoStore;
use groundtrack::RunConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Autonomous ground-track sampling run")]
struct Args {
    /// Path to the platform's TLE file (two-line or named three-line set)
    tle: PathBuf,

    /// Output directory for the sample log and photo slots
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Override the run duration in minutes (default: flight value)
    #[arg(long)]
    duration_minutes: Option<u64>,

    /// Brightness reported by the simulated camera
    #[arg(long, default_value_t = 0.5)]
    brightness: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    let args = Args::parse();

    let mut config = RunConfig::default();
    if let Some(minutes) = args.duration_minutes {
        config.run_duration = Duration::from_secs(minutes * 60);
    }

    // Startup failures are fatal: no partial run is attempted.
    let ground_track = TleGroundTrack::from_tle_file(&args.tle)
        .with_context(|| format!("loading TLE from {}", args.tle.display()))?;
    let ephemeris = SolarEphemeris::generate(Utc::now().year());
    let store = PhotoStore::new(&args.output_dir)
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;
    let recorder = SampleRecorder::create(args.output_dir.join("data.csv"))
        .context("creating sample log")?;

    info!(
        tle = %args.tle.display(),
        output = %args.output_dir.display(),
        ephemeris_year = ephemeris.year(),
        "startup complete"
    );

    let mut controller = LoopController::new(
        config,
        ground_track,
        MockSensor::steady(),
        SimulatedCamera::new(args.brightness),
        SystemClock,
        ephemeris,
        store,
        recorder,
    );

    let summary = controller.run().context("sampling run failed")?;
    info!(
        cycles = summary.cycles,
        records = summary.records_written,
        failed = summary.failed_cycles,
        "run complete"
    );
    Ok(())
}
