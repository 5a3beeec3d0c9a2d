//! Frame loops that play a script through a store.

use std::fmt;
use std::time::Duration;

use keyboard_core::{KeyboardStore, ManualFrameClock};
use serde::{Deserialize, Serialize};
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::{ReplayScript, ScriptStep};

/// The animated value sampled at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame time from the start of the replay.
    pub at_ms: u64,
    /// Animated height.
    pub height: f32,
    /// Animated progress.
    pub progress: f32,
    /// Whether the store considers the keyboard visible.
    pub visible: bool,
}

impl FrameRecord {
    fn sample(at_ms: u64, store: &KeyboardStore) -> Self {
        let frame = store.animated_value().get();
        Self {
            at_ms,
            height: frame.height,
            progress: frame.progress,
            visible: store.state().is_visible,
        }
    }
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6} ms  height {:>8.2}  progress {:.3}  {}",
            self.at_ms,
            self.height,
            self.progress,
            if self.visible { "visible" } else { "hidden" }
        )
    }
}

fn deliver(store: &KeyboardStore, step: &ScriptStep) {
    if !store.handle_notification(&step.notification) {
        tracing::debug!(at_ms = step.at_ms, name = %step.notification.name, "step had no effect");
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Replay `script` on a virtual clock.
///
/// Each frame delivers the steps due by then (with the clock set to each
/// step's own time), advances the clock to the frame time, ticks, and records
/// a sample. Stops after the first frame where every step is delivered and the
/// value has settled.
pub fn run_virtual(
    script: &ReplayScript,
    store: &KeyboardStore,
    clock: &ManualFrameClock,
    frame_interval: Duration,
) -> Vec<FrameRecord> {
    let step_ms = duration_ms(frame_interval).max(1);
    let mut pending = script.steps().iter().peekable();
    let mut frames = Vec::new();
    let mut now_ms = 0;

    loop {
        while let Some(step) = pending.next_if(|step| step.at_ms <= now_ms) {
            clock.set_now(Duration::from_millis(step.at_ms));
            deliver(store, step);
        }
        clock.set_now(Duration::from_millis(now_ms));
        store.tick();
        frames.push(FrameRecord::sample(now_ms, store));

        if pending.peek().is_none() && !store.is_animating() {
            break;
        }
        now_ms += step_ms;
    }

    tracing::info!(frames = frames.len(), "virtual replay finished");
    frames
}

/// Replay `script` in real time, ticking `store` from a tokio interval.
///
/// The store keeps its own clock; the interval only paces delivery and frames.
pub async fn run_realtime(
    script: &ReplayScript,
    store: &KeyboardStore,
    frame_interval: Duration,
) -> Vec<FrameRecord> {
    let mut ticker = interval(frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let start = Instant::now();
    let mut pending = script.steps().iter().peekable();
    let mut frames = Vec::new();

    loop {
        ticker.tick().await;
        let now_ms = duration_ms(start.elapsed());

        while let Some(step) = pending.next_if(|step| step.at_ms <= now_ms) {
            deliver(store, step);
        }
        store.tick();
        frames.push(FrameRecord::sample(now_ms, store));

        if pending.peek().is_none() && !store.is_animating() {
            break;
        }
    }

    tracing::info!(frames = frames.len(), "realtime replay finished");
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_record_display() {
        let record = FrameRecord {
            at_ms: 16,
            height: 120.5,
            progress: 0.5,
            visible: true,
        };
        assert_eq!(
            record.to_string(),
            "    16 ms  height   120.50  progress 0.500  visible"
        );
    }
}
