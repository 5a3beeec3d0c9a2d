//! Keyboard state snapshot.

use std::time::Duration;

use serde::Serialize;

use crate::{AnimatedValue, Easing, KeyboardEvent, KeyboardPhase};

/// The canonical keyboard state, as last written by the store.
///
/// `height` and `is_visible` change once per accepted event. `animated` is the
/// shared value the driver moves every frame; reading it never triggers a
/// state notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardState {
    /// Settled or in-flight target height.
    pub height: f32,
    /// Whether the keyboard is (becoming) visible.
    pub is_visible: bool,
    /// Phase of the last accepted event, `None` before the first one.
    pub phase: Option<KeyboardPhase>,
    /// Duration of the last accepted transition.
    pub duration: Duration,
    /// Curve of the last accepted transition.
    pub easing: Easing,
    /// Focused input tag reported with the last event.
    pub target: Option<i64>,
    /// Platform timestamp of the last event.
    pub timestamp_ms: u64,
    /// Shared animated value.
    #[serde(skip)]
    pub animated: AnimatedValue,
}

impl KeyboardState {
    /// Initial hidden state bound to `animated`.
    #[must_use]
    pub fn hidden(animated: AnimatedValue) -> Self {
        Self {
            height: 0.0,
            is_visible: false,
            phase: None,
            duration: Duration::ZERO,
            easing: Easing::default(),
            target: None,
            timestamp_ms: 0,
            animated,
        }
    }

    /// Apply an accepted event's fields.
    pub(crate) fn apply(&mut self, event: &KeyboardEvent) {
        self.height = event.height;
        self.is_visible = event.is_visible();
        self.phase = Some(event.phase);
        self.duration = event.duration;
        self.easing = event.easing;
        self.target = event.target;
        self.timestamp_ms = event.timestamp_ms;
    }

    /// Whether a transition was announced but not yet confirmed.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase.is_some_and(KeyboardPhase::is_start)
    }
}
