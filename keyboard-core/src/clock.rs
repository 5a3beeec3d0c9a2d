//! Frame clocks driving the animation.
//!
//! The driver never spins its own timer. It asks a [`FrameClock`] for frames
//! while a transition is in flight and releases them once it settles; the host
//! calls [`KeyboardStore::tick`](crate::KeyboardStore::tick) from its frame
//! callback for as long as frames are requested.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of frame timestamps and frame scheduling.
pub trait FrameClock {
    /// Monotonic time since an arbitrary origin.
    fn now(&self) -> Duration;

    /// Start delivering frames. Called when a transition begins or retargets.
    fn request_frames(&self);

    /// Stop delivering frames. Called when the value settles or snaps.
    fn cancel_frames(&self);

    /// Whether frames are currently requested.
    fn is_running(&self) -> bool;
}

/// Wall-clock frame source for production hosts.
#[derive(Debug)]
pub struct SystemFrameClock {
    origin: Instant,
    running: Cell<bool>,
}

impl SystemFrameClock {
    /// Create a clock whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            running: Cell::new(false),
        }
    }
}

impl Default for SystemFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemFrameClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn request_frames(&self) {
        self.running.set(true);
    }

    fn cancel_frames(&self) {
        self.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.running.get()
    }
}

#[derive(Debug, Default)]
struct ManualState {
    now: Cell<Duration>,
    running: Cell<bool>,
    requests: Cell<u64>,
}

/// Deterministic clock for tests and offline replay.
///
/// Time only moves when [`ManualFrameClock::advance`] is called. Clones share
/// the same time, so a test can keep one handle and give another to the store.
#[derive(Debug, Clone, Default)]
pub struct ManualFrameClock {
    state: Rc<ManualState>,
}

impl ManualFrameClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, delta: Duration) {
        self.state.now.set(self.state.now.get() + delta);
    }

    /// Jump to an absolute time. Earlier times are ignored.
    pub fn set_now(&self, now: Duration) {
        if now > self.state.now.get() {
            self.state.now.set(now);
        }
    }

    /// How many times frames were requested.
    #[must_use]
    pub fn frame_requests(&self) -> u64 {
        self.state.requests.get()
    }
}

impl FrameClock for ManualFrameClock {
    fn now(&self) -> Duration {
        self.state.now.get()
    }

    fn request_frames(&self) {
        self.state.running.set(true);
        self.state.requests.set(self.state.requests.get() + 1);
    }

    fn cancel_frames(&self) {
        self.state.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.state.running.get()
    }
}
