//! Replays recorded facial landmarks through the gesture detector.

use anyhow::{Context, Result};
use clap::Parser;
use face_gestures::{
    app::{EventTally, GestureApp, MANUAL_FALLBACK_HINT},
    config::Config,
    pump::ReplaySource,
};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark recording to replay (YAML)
    #[arg(short, long, required_unless_present = "dump_config")]
    frames: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,

    /// Override the closed-eye openness threshold
    #[arg(long)]
    blink_threshold: Option<f64>,

    /// Override the head tilt threshold in degrees
    #[arg(long)]
    tilt_threshold: Option<f64>,

    /// Override the frame pump interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Pace the replay against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Start without blink calibration
    #[arg(long)]
    skip_calibration: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(threshold) = args.blink_threshold {
        config.blink.threshold = threshold;
    }
    if let Some(threshold) = args.tilt_threshold {
        config.tilt.threshold_degrees = threshold;
    }
    if let Some(interval) = args.interval_ms {
        config.pump.interval_ms = interval;
    }
    if args.realtime {
        config.pump.realtime = true;
    }
    if args.skip_calibration {
        config.calibration.enabled = false;
    }

    if args.dump_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let Some(frames) = args.frames else {
        anyhow::bail!("--frames is required");
    };

    let source = match ReplaySource::from_file(&frames) {
        Ok(source) => source,
        Err(e) => {
            error!("{e}");
            error!("{MANUAL_FALLBACK_HINT}");
            return Err(e.into());
        }
    };

    let mut app = GestureApp::new(config)?;
    app.start(Box::new(source));

    let mut tally = EventTally::default();
    let summary = app.run(&mut tally)?;
    app.stop();

    info!(
        "Replay finished: {} marks, {} previous, {} next",
        tally.marks, tally.previous, tally.next
    );
    print!("{}", serde_yaml::to_string(&summary)?);

    Ok(())
}
