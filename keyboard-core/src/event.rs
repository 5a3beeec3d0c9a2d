//! Canonical keyboard events.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Easing;

/// Phase of a keyboard transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardPhase {
    /// Keyboard is about to appear.
    WillShow,
    /// Keyboard finished appearing.
    DidShow,
    /// Keyboard is about to disappear.
    WillHide,
    /// Keyboard finished disappearing.
    DidHide,
    /// Keyboard frame is about to change (e.g. suggestions bar toggled).
    WillChangeFrame,
    /// Keyboard frame finished changing.
    DidChangeFrame,
}

impl KeyboardPhase {
    /// All phases, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::WillShow,
        Self::DidShow,
        Self::WillHide,
        Self::DidHide,
        Self::WillChangeFrame,
        Self::DidChangeFrame,
    ];

    /// Parse a native event name such as `keyboardWillShow`.
    #[must_use]
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.event_name() == name)
    }

    /// The native event name for this phase.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::WillShow => "keyboardWillShow",
            Self::DidShow => "keyboardDidShow",
            Self::WillHide => "keyboardWillHide",
            Self::DidHide => "keyboardDidHide",
            Self::WillChangeFrame => "keyboardWillChangeFrame",
            Self::DidChangeFrame => "keyboardDidChangeFrame",
        }
    }

    /// Whether this phase announces a transition that is about to start.
    #[must_use]
    pub const fn is_start(self) -> bool {
        matches!(
            self,
            Self::WillShow | Self::WillHide | Self::WillChangeFrame
        )
    }

    /// Whether the keyboard is visible after this phase.
    ///
    /// Frame changes keep the keyboard visible as long as it has any height.
    #[must_use]
    pub fn is_visible(self, height: f32) -> bool {
        match self {
            Self::WillShow | Self::DidShow => true,
            Self::WillHide | Self::DidHide => false,
            Self::WillChangeFrame | Self::DidChangeFrame => height > 0.0,
        }
    }
}

/// A single normalized keyboard transition.
///
/// Produced by the normalizer, consumed immediately by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    /// Lifecycle phase.
    pub phase: KeyboardPhase,
    /// Target keyboard height in layout units, never negative.
    pub height: f32,
    /// Transition duration. Zero means apply immediately.
    pub duration: Duration,
    /// Transition curve.
    pub easing: Easing,
    /// Tag of the focused input, if the platform reported one.
    pub target: Option<i64>,
    /// Timestamp in milliseconds, as reported by the platform (0 if absent).
    pub timestamp_ms: u64,
}

impl KeyboardEvent {
    /// Create a new event. Negative or non-finite heights become 0.
    #[must_use]
    pub fn new(phase: KeyboardPhase, height: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            phase,
            height: sanitize_height(height),
            duration,
            easing,
            target: None,
            timestamp_ms: 0,
        }
    }

    /// Shorthand for an event that applies immediately.
    #[must_use]
    pub fn immediate(phase: KeyboardPhase, height: f32) -> Self {
        Self::new(phase, height, Duration::ZERO, Easing::default())
    }

    /// Set the focused input tag.
    #[must_use]
    pub fn with_target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the platform timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Whether the keyboard is visible after this event.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase.is_visible(self.height)
    }

    /// Whether `other` describes the same transition (same phase and height).
    #[must_use]
    pub fn same_transition(&self, other: &Self) -> bool {
        self.phase == other.phase && (self.height - other.height).abs() < f32::EPSILON
    }
}

/// Clamp a reported height into the valid range.
pub(crate) fn sanitize_height(height: f32) -> f32 {
    if height.is_finite() {
        height.max(0.0)
    } else {
        0.0
    }
}
