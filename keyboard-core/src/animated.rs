//! The shared animated keyboard value.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::subscription::{Listeners, Subscription};

/// One published sample of the animated value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatedFrame {
    /// Current keyboard height in layout units.
    pub height: f32,
    /// Current height relative to the full keyboard height, in `[0, 1]`.
    pub progress: f32,
    /// Whether this sample is the last one of its transition.
    pub settled: bool,
}

struct Inner {
    frame: Cell<AnimatedFrame>,
    observers: Listeners<AnimatedFrame>,
}

/// Read-only handle to the keyboard's animated height and progress.
///
/// Clones share the same value. Only the [`AnimationDriver`](crate::AnimationDriver)
/// can write to it; consumers read it or bind to it with
/// [`AnimatedValue::observe`], which fires once per frame without going
/// through state subscriptions.
#[derive(Clone)]
pub struct AnimatedValue {
    inner: Rc<Inner>,
}

impl AnimatedValue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                frame: Cell::new(AnimatedFrame {
                    settled: true,
                    ..AnimatedFrame::default()
                }),
                observers: Listeners::new("animated value"),
            }),
        }
    }

    /// Latest published frame.
    #[must_use]
    pub fn get(&self) -> AnimatedFrame {
        self.inner.frame.get()
    }

    /// Latest published height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.get().height
    }

    /// Latest published progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.get().progress
    }

    /// Register a per-frame callback.
    pub fn observe(&self, callback: impl Fn(&AnimatedFrame) + 'static) -> Subscription {
        self.inner.observers.add(callback)
    }

    /// Number of active frame observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Whether both handles point at the same shared value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Store a new frame and notify observers.
    pub(crate) fn publish(&self, frame: AnimatedFrame) {
        self.inner.frame.set(frame);
        self.inner.observers.notify(&frame);
    }
}

impl PartialEq for AnimatedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("frame", &self.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}
