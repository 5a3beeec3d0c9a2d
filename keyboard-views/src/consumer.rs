//! The capability every keyboard-aware view shares.

use keyboard_core::{
    use_keyboard_animated_value, use_keyboard_state, AnimatedFrame, AnimatedValue,
    KeyboardProvider, KeyboardState, KeyboardStateHook, Subscription,
};
use serde::{Deserialize, Serialize};

/// A view's measured bounds, in layout units from the top-left of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl LayoutRect {
    /// Create a rect.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Everything a view needs to lay itself out against the keyboard.
#[derive(Debug, Clone)]
pub struct KeyboardFrame {
    /// Latest canonical state.
    pub state: KeyboardState,
    /// Animated height at this instant.
    pub height: f32,
    /// Animated progress at this instant.
    pub progress: f32,
}

impl KeyboardFrame {
    /// Combine a state snapshot with an animated sample.
    #[must_use]
    pub fn new(state: KeyboardState, frame: AnimatedFrame) -> Self {
        Self {
            state,
            height: frame.height,
            progress: frame.progress,
        }
    }
}

/// A view that lays itself out from the keyboard frame.
pub trait KeyboardConsumer {
    /// Layout description produced for the renderer.
    type Layout;

    /// Compute the layout for `keyboard`.
    fn layout(&self, keyboard: &KeyboardFrame) -> Self::Layout;
}

/// A mounted view's connection to the keyboard store.
///
/// Holds the state hook (for re-render scoping) and the animated value (for
/// per-frame binding). Dropping the binding unmounts both.
#[derive(Debug)]
pub struct KeyboardBinding {
    state: KeyboardStateHook,
    animated: AnimatedValue,
}

impl KeyboardBinding {
    /// Mount under `provider`.
    #[must_use]
    pub fn mount(provider: &KeyboardProvider) -> Self {
        Self {
            state: use_keyboard_state(provider),
            animated: use_keyboard_animated_value(provider),
        }
    }

    /// Current keyboard frame.
    #[must_use]
    pub fn frame(&self) -> KeyboardFrame {
        KeyboardFrame::new(self.state.get(), self.animated.get())
    }

    /// Lay out `consumer` against the current frame.
    pub fn layout<C: KeyboardConsumer>(&self, consumer: &C) -> C::Layout {
        consumer.layout(&self.frame())
    }

    /// Number of state changes seen since mounting.
    #[must_use]
    pub fn state_revision(&self) -> u64 {
        self.state.revision()
    }

    /// Bind a per-frame callback, e.g. a native transform update.
    pub fn observe_frames(&self, callback: impl Fn(&AnimatedFrame) + 'static) -> Subscription {
        self.animated.observe(callback)
    }

    /// Stop receiving state changes before the binding is dropped.
    pub fn unmount(&self) {
        self.state.unmount();
    }
}
