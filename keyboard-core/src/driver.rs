//! Animation driver owning the shared keyboard value.
//!
//! ## Retargeting
//!
//! ```text
//! height
//!   300 ┤        ╭── WillShow target (abandoned)
//!       │      ╭╯
//!    60 ┤    ╭╯ ← WillHide arrives: new segment starts HERE
//!       │  ╭╯ ╲
//!     0 ┼─╯    ╲________ WillHide target
//! ```
//!
//! A new target always starts from the last published height and runs the new
//! event's full duration with its own curve. The value never jumps back to the
//! old start or to zero before moving.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::event::sanitize_height;
use crate::{AnimatedFrame, AnimatedValue, Easing, FrameClock};

/// Default tolerance below which two heights are considered equal.
pub const DEFAULT_SETTLE_EPSILON: f32 = 0.01;

/// Result of advancing the driver by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing in flight; no frame was published.
    Idle,
    /// An intermediate frame was published.
    Animating,
    /// The final frame was published and frames were released.
    Settled,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
    easing: Easing,
    /// Progress reference when the segment started.
    reference_from: f32,
    /// Progress reference once the segment settles.
    reference_to: f32,
}

/// One sampled point of a segment.
struct Sample {
    height: f32,
    reference: f32,
    done: bool,
}

impl Segment {
    fn sample(&self, now: Duration) -> Sample {
        let elapsed = now.saturating_sub(self.start);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        if t >= 1.0 {
            return Sample {
                height: self.to,
                reference: self.reference_to,
                done: true,
            };
        }
        let eased = self.easing.apply(t);
        Sample {
            height: self.from + (self.to - self.from) * eased,
            reference: self.reference_from + (self.reference_to - self.reference_from) * eased,
            done: false,
        }
    }
}

/// Sole writer of the [`AnimatedValue`].
///
/// All methods take `&self`: a frame observer may feed a new event back into
/// the store while the driver is publishing, and that must not deadlock or
/// panic on a borrow.
pub struct AnimationDriver {
    value: AnimatedValue,
    clock: Rc<dyn FrameClock>,
    segment: Cell<Option<Segment>>,
    target: Cell<f32>,
    /// Last non-zero target; the reference for progress.
    keyboard_height: Cell<f32>,
    /// Progress reference of the last published frame.
    reference: Cell<f32>,
    invocations: Cell<u64>,
    settle_epsilon: f32,
}

impl AnimationDriver {
    /// Create a driver resting at zero.
    #[must_use]
    pub fn new(clock: Rc<dyn FrameClock>) -> Self {
        Self::with_epsilon(clock, DEFAULT_SETTLE_EPSILON)
    }

    /// Create a driver with a custom equality tolerance.
    #[must_use]
    pub fn with_epsilon(clock: Rc<dyn FrameClock>, settle_epsilon: f32) -> Self {
        Self {
            value: AnimatedValue::new(),
            clock,
            segment: Cell::new(None),
            target: Cell::new(0.0),
            keyboard_height: Cell::new(0.0),
            reference: Cell::new(0.0),
            invocations: Cell::new(0),
            settle_epsilon: settle_epsilon.max(0.0),
        }
    }

    /// Read handle to the driven value.
    #[must_use]
    pub fn value(&self) -> AnimatedValue {
        self.value.clone()
    }

    /// Animate toward `target` over `duration` using `easing`.
    ///
    /// Starts from the current published height. An in-flight transition is
    /// cancelled, unless it is already heading to the same target, in which
    /// case it keeps running untouched. A zero `duration` snaps immediately
    /// without intermediate frames.
    ///
    /// Progress is measured against the keyboard height. When a transition
    /// moves between two open heights, that reference eases from the old
    /// height to the new one along with the value, so progress stays
    /// continuous too.
    pub fn animate_to(&self, target: f32, duration: Duration, easing: Easing) {
        self.invocations.set(self.invocations.get() + 1);
        let target = sanitize_height(target);
        let previous_reference = self.reference.get();
        if target > self.settle_epsilon {
            self.keyboard_height.set(target);
        }

        if let Some(segment) = self.segment.get() {
            if self.same_height(segment.to, target) {
                tracing::debug!(target, "keyboard animation already heading to target");
                return;
            }
        }

        self.target.set(target);
        let from = self.value.height();

        if duration.is_zero() {
            self.snap_to(target);
            return;
        }

        if self.segment.get().is_none() && self.same_height(from, target) {
            if from.to_bits() != target.to_bits() {
                self.publish(target, true, self.keyboard_height.get());
            }
            return;
        }

        let reference_to = self.keyboard_height.get();
        let reference_from = if previous_reference <= self.settle_epsilon {
            reference_to
        } else {
            previous_reference
        };

        tracing::debug!(
            from,
            target,
            duration_ms = duration.as_millis(),
            ?easing,
            "keyboard animation started"
        );
        self.segment.set(Some(Segment {
            from,
            to: target,
            start: self.clock.now(),
            duration,
            easing,
            reference_from,
            reference_to,
        }));
        self.clock.request_frames();
    }

    /// Jump to `target`, cancelling any in-flight transition.
    pub fn snap_to(&self, target: f32) {
        let target = sanitize_height(target);
        self.target.set(target);
        self.segment.set(None);
        self.clock.cancel_frames();
        self.publish(target, true, self.keyboard_height.get());
    }

    /// Advance the in-flight transition to the clock's current time.
    pub fn tick(&self) -> TickOutcome {
        let Some(segment) = self.segment.get() else {
            return TickOutcome::Idle;
        };

        let sample = segment.sample(self.clock.now());
        if sample.done {
            self.segment.set(None);
            self.clock.cancel_frames();
            tracing::debug!(height = sample.height, "keyboard animation settled");
            self.publish(sample.height, true, sample.reference);
            TickOutcome::Settled
        } else {
            self.publish(sample.height, false, sample.reference);
            TickOutcome::Animating
        }
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.segment.get().is_some()
    }

    /// Height the value is heading to (or resting at).
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target.get()
    }

    /// Last non-zero target height.
    #[must_use]
    pub fn keyboard_height(&self) -> f32 {
        self.keyboard_height.get()
    }

    /// Number of [`AnimationDriver::animate_to`] calls so far.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations.get()
    }

    fn same_height(&self, a: f32, b: f32) -> bool {
        (a - b).abs() <= self.settle_epsilon
    }

    fn publish(&self, height: f32, settled: bool, reference: f32) {
        self.reference.set(reference);
        let progress = if reference <= self.settle_epsilon {
            0.0
        } else {
            (height / reference).clamp(0.0, 1.0)
        };
        self.value.publish(AnimatedFrame {
            height,
            progress,
            settled,
        });
    }
}

impl fmt::Debug for AnimationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("value", &self.value)
            .field("target", &self.target.get())
            .field("animating", &self.is_animating())
            .field("invocations", &self.invocations.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualFrameClock;
    use std::cell::RefCell;

    const FRAME: Duration = Duration::from_millis(16);

    fn driver() -> (AnimationDriver, ManualFrameClock) {
        let clock = ManualFrameClock::new();
        (AnimationDriver::new(Rc::new(clock.clone())), clock)
    }

    fn run_until_settled(driver: &AnimationDriver, clock: &ManualFrameClock) -> Vec<f32> {
        let mut heights = Vec::new();
        for _ in 0..1000 {
            clock.advance(FRAME);
            let outcome = driver.tick();
            heights.push(driver.value().height());
            if outcome != TickOutcome::Animating {
                break;
            }
        }
        heights
    }

    #[test]
    fn test_animates_to_target() {
        let (driver, clock) = driver();
        driver.animate_to(300.0, Duration::from_millis(250), Easing::EaseOut);
        assert!(driver.is_animating());
        assert!(clock.is_running());

        let heights = run_until_settled(&driver, &clock);
        assert!((driver.value().height() - 300.0).abs() < f32::EPSILON);
        assert!((driver.value().progress() - 1.0).abs() < f32::EPSILON);
        assert!(driver.value().get().settled);
        assert!(!clock.is_running());
        // 250ms at 16ms per frame settles on the 16th frame.
        assert_eq!(heights.len(), 16);
        assert!(heights.iter().all(|h| *h <= 300.0));
    }

    #[test]
    fn test_zero_duration_snaps_without_frames() {
        let (driver, clock) = driver();
        let frames = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let frames = Rc::clone(&frames);
            driver.value().observe(move |f| frames.borrow_mut().push(*f))
        };

        driver.animate_to(280.0, Duration::ZERO, Easing::Linear);

        assert!(!driver.is_animating());
        assert_eq!(clock.frame_requests(), 0);
        assert_eq!(frames.borrow().len(), 1);
        assert!((frames.borrow()[0].height - 280.0).abs() < f32::EPSILON);
        assert_eq!(driver.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let (driver, clock) = driver();
        driver.animate_to(300.0, Duration::from_millis(250), Easing::Linear);
        for _ in 0..3 {
            clock.advance(FRAME);
            driver.tick();
        }
        let before = driver.value().height();
        assert!(before > 0.0 && before < 300.0);

        driver.animate_to(0.0, Duration::from_millis(200), Easing::Linear);
        // No jump at the moment of retargeting.
        assert!((driver.value().height() - before).abs() < f32::EPSILON);

        let heights = run_until_settled(&driver, &clock);
        let mut previous = before;
        for h in heights {
            assert!(h <= previous, "moved away from new target: {h} > {previous}");
            previous = h;
        }
        assert!(driver.value().height().abs() < f32::EPSILON);
    }

    #[test]
    fn test_same_target_keeps_in_flight_animation() {
        let (driver, clock) = driver();
        driver.animate_to(300.0, Duration::from_millis(250), Easing::Linear);
        clock.advance(FRAME);
        driver.tick();
        let mid = driver.value().height();

        driver.animate_to(300.0, Duration::ZERO, Easing::Linear);
        assert!(driver.is_animating());
        assert!((driver.value().height() - mid).abs() < f32::EPSILON);
        assert_eq!(driver.invocations(), 2);
    }

    #[test]
    fn test_progress_tracks_last_keyboard_height() {
        let (driver, clock) = driver();
        driver.animate_to(200.0, Duration::ZERO, Easing::Linear);
        driver.animate_to(0.0, Duration::from_millis(100), Easing::Linear);
        clock.advance(Duration::from_millis(50));
        driver.tick();

        let frame = driver.value().get();
        assert!((frame.height - 100.0).abs() < 0.5);
        assert!((frame.progress - 0.5).abs() < 0.01);
        assert!((driver.keyboard_height() - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_progress_continuous_when_retargeting_between_open_heights() {
        let (driver, clock) = driver();
        driver.animate_to(300.0, Duration::from_millis(250), Easing::Linear);
        clock.advance(Duration::from_millis(125));
        driver.tick();
        let before = driver.value().progress();
        assert!((before - 0.5).abs() < 0.01);

        driver.animate_to(200.0, Duration::from_millis(100), Easing::Linear);
        let mut previous = before;
        for _ in 0..10 {
            clock.advance(Duration::from_millis(10));
            driver.tick();
            let progress = driver.value().progress();
            assert!(
                (progress - previous).abs() < 0.1,
                "progress jumped {previous} -> {progress}"
            );
            previous = progress;
        }

        assert!(driver.value().get().settled);
        assert!((driver.value().height() - 200.0).abs() < f32::EPSILON);
        assert!((driver.value().progress() - 1.0).abs() < f32::EPSILON);
        assert!((driver.keyboard_height() - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_animate_to_current_value_is_noop() {
        let (driver, clock) = driver();
        driver.animate_to(0.0, Duration::from_millis(250), Easing::Linear);
        assert!(!driver.is_animating());
        assert_eq!(clock.frame_requests(), 0);
    }
}
