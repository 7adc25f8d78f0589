//! Headless runner.
//!
//! Drives the engine with a fixed-step clock and a scripted hand that sweeps
//! across the frame, opening and closing on a fixed period, and logs every
//! switch along with render-buffer statistics.

use std::path::PathBuf;
use std::process::ExitCode;

use attractor_morph::gesture::{landmark, LANDMARK_COUNT};
use attractor_morph::prelude::*;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "attractor-morph")]
#[command(version)]
#[command(about = "Run the attractor engine headless with a scripted hand")]
struct Cli {
    /// JSON config file (missing keys use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting attractor, overrides the config
    #[arg(long)]
    attractor: Option<String>,

    /// Number of ticks to run
    #[arg(long, default_value = "1800")]
    ticks: u64,

    /// Milliseconds per tick
    #[arg(long, default_value = "16.0")]
    step_ms: f64,

    /// Ticks per half open/close cycle of the scripted hand (0 = no hand)
    #[arg(long, default_value = "90")]
    gesture_period: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> attractor_morph::Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(id) = &cli.attractor {
        config.initial_attractor = id.parse()?;
    }

    let mut engine = Engine::new(config)?;
    engine.set_detector_status(if cli.gesture_period > 0 {
        DetectorStatus::Ready
    } else {
        DetectorStatus::Failed("scripted hand disabled".into())
    });
    let sender = engine.hand_sender();
    let mut clock = TickClock::fixed(cli.step_ms);
    let mut switches = 0usize;

    for tick in 0..cli.ticks {
        if cli.gesture_period > 0 {
            sender.push(scripted_hand(tick, cli.gesture_period));
        }

        let now = clock.tick();
        let out = engine.tick(now);
        let (events, gesture, camera) = (out.events, out.gesture, out.camera);

        for event in &events {
            match event {
                EngineEvent::SwitchRequested(next) => info!(tick, next = %next, "Gesture requested switch"),
                EngineEvent::AttractorSwitched(current) => {
                    switches += 1;
                    info!(tick, attractor = %current, "Attractor switched");
                }
            }
        }

        if tick % 300 == 0 {
            let (min, max) = bounds(engine.simulation().positions());
            info!(
                tick,
                attractor = %engine.attractor(),
                gesture = ?gesture,
                camera = ?camera.position,
                min = ?min,
                max = ?max,
                "Frame"
            );
        }
    }

    let finite = engine.simulation().positions().iter().all(|v| v.is_finite());
    info!(
        ticks = clock.frame(),
        switches,
        attractor = %engine.attractor(),
        finite,
        "Run complete"
    );
    Ok(())
}

/// Open or closed hand whose palm sweeps left to right and back.
fn scripted_hand(tick: u64, period: u64) -> HandFrame {
    let closed = (tick / period) % 2 == 1;
    let palm_x = 0.5 + 0.35 * (tick as f32 * 0.01).sin();
    let mut points = [Vec3::new(palm_x, 0.85, 0.0); LANDMARK_COUNT];
    for (i, &(base, tip)) in landmark::FINGERS.iter().enumerate() {
        let x = palm_x - 0.06 + i as f32 * 0.04;
        points[base] = Vec3::new(x, 0.65, 0.0);
        points[tip] = Vec3::new(x, if closed { 0.75 } else { 0.4 }, 0.0);
    }
    HandFrame::new(points)
}

fn bounds(positions: &[f32]) -> (Vec3, Vec3) {
    positions
        .chunks_exact(3)
        .map(Vec3::from_slice)
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        })
}
