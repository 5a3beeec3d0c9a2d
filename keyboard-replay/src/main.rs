//! # kbd-replay
//!
//! Replays a keyboard notification script and prints one line per frame.

use std::io::Write;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use keyboard_core::{ControllerConfig, KeyboardStore, ManualFrameClock};
use keyboard_replay::{run_realtime, run_virtual, ReplayArgs, ReplayScript};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Supports JSON format via `RUST_LOG_FORMAT=json`. Logs go to stderr so
/// stdout carries only frames.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,keyboard_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = ReplayArgs::parse();
    let script = ReplayScript::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;
    tracing::info!(
        steps = script.len(),
        fps = args.fps,
        virtual_clock = args.virtual_clock,
        "Starting replay"
    );

    let frames = if args.virtual_clock {
        let clock = ManualFrameClock::new();
        let store = KeyboardStore::with_config(Rc::new(clock.clone()), ControllerConfig::from_env());
        let frames = run_virtual(&script, &store, &clock, args.frame_interval());
        log_dropped(&store);
        frames
    } else {
        let store = KeyboardStore::global();
        let frames = run_realtime(&script, &store, args.frame_interval()).await;
        log_dropped(&store);
        frames
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for frame in &frames {
        if args.json {
            writeln!(out, "{}", serde_json::to_string(frame)?)?;
        } else {
            writeln!(out, "{frame}")?;
        }
    }
    out.flush()?;

    Ok(())
}

fn log_dropped(store: &KeyboardStore) {
    let dropped = store.dropped_notifications();
    if dropped > 0 {
        tracing::warn!(dropped, "Some script steps were malformed and dropped");
    }
}
