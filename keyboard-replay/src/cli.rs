//! Command-line arguments for `kbd-replay`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Replay a keyboard notification script.
#[derive(Debug, Clone, Parser)]
#[command(name = "kbd-replay")]
#[command(about = "Replay keyboard notifications and print the animated frames")]
#[command(version)]
pub struct ReplayArgs {
    /// Path to the JSON script
    pub script: PathBuf,

    /// Frames per second
    #[arg(long, env = "KBD_REPLAY_FPS", default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Print frames as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Step a virtual clock instead of waiting in real time
    #[arg(long)]
    pub virtual_clock: bool,
}

impl ReplayArgs {
    /// Time between frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}
