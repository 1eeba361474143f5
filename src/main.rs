//! Gesture Pong entry point
//!
//! Headless native build: a seeded synthetic hand stands in for the camera
//! and the field is drawn as text. Type the quit key and Enter to stop.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;

use gesture_pong::clock::{Clock, FixedRateClock, Unthrottled};
use gesture_pong::gesture::SyntheticHand;
use gesture_pong::render::TerminalDisplay;
use gesture_pong::{MatchLoop, Settings, TerminationReason};

#[derive(Parser, Debug)]
#[command(name = "gesture-pong")]
#[command(about = "Pong with a hand-tracked paddle against a reactive computer player", long_about = None)]
struct Cli {
    /// Settings file (JSON); defaults are used when it does not exist
    #[arg(long, default_value = "gesture-pong.json")]
    config: PathBuf,

    /// Write the effective settings to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Seed for the synthetic hand
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Target ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Draw every Nth frame (0 = never draw, only log scores)
    #[arg(long, default_value_t = 6)]
    render_every: u64,

    /// Chance per tick that the synthetic hand leaves the view
    #[arg(long, default_value_t = 0.005)]
    drop_rate: f64,

    /// Run as fast as possible
    #[arg(long, default_value_t = false)]
    no_clock: bool,

    /// Text grid width
    #[arg(long, default_value_t = 80)]
    cols: usize,

    /// Text grid height
    #[arg(long, default_value_t = 30)]
    rows: usize,
}

/// Forward typed characters to the display
fn spawn_key_reader() -> mpsc::Receiver<char> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for byte in stdin.lock().bytes() {
            let Ok(byte) = byte else { break };
            if tx.send(byte as char).is_err() {
                break;
            }
        }
    });
    rx
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = Settings::load_or_default(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    if let Some(max_ticks) = cli.max_ticks {
        settings.game_loop.max_ticks = Some(max_ticks);
    }
    if let Some(fps) = cli.fps {
        settings.game_loop.ticks_per_second = fps;
    }
    settings.validate().context("command line overrides")?;

    if let Some(path) = &cli.write_config {
        settings
            .save(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        return Ok(ExitCode::SUCCESS);
    }

    anyhow::ensure!(
        cli.drop_rate.is_finite() && (0.0..=1.0).contains(&cli.drop_rate),
        "--drop-rate must be between 0 and 1, got {}",
        cli.drop_rate
    );
    let gesture = SyntheticHand::new(cli.seed, cli.drop_rate);

    let interactive = io::stdin().is_terminal();
    let mut display = TerminalDisplay::new(io::stdout(), cli.cols, cli.rows, cli.render_every)
        .with_ansi(io::stdout().is_terminal());
    if interactive {
        display = display.with_keys(spawn_key_reader());
    }

    let clock: Box<dyn Clock> = if cli.no_clock {
        Box::new(Unthrottled)
    } else {
        Box::new(FixedRateClock::new(settings.game_loop.ticks_per_second))
    };

    let mut game = MatchLoop::new(&settings, gesture, display, clock);
    let summary = game.run().context("starting match")?;

    log::info!(
        "Final score {} after {} ticks ({:?})",
        summary.score.label(),
        summary.ticks,
        summary.reason
    );

    match summary.reason {
        TerminationReason::CaptureFailed(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        TerminationReason::DisplayFailed(msg) => {
            eprintln!("Display failed: {}", msg);
            Ok(ExitCode::FAILURE)
        }
        TerminationReason::QuitEvent | TerminationReason::QuitKey | TerminationReason::TickLimit => {
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Gesture Pong (native) starting...");

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
