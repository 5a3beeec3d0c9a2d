//! Shared keyboard state storage.
//!
//! Provides the [`KeyboardStore`]: one per UI thread, shared by every
//! keyboard-aware view through cheap clones of the same handle.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::event::sanitize_height;
use crate::{
    normalize, AnimatedValue, AnimationDriver, ControllerConfig, FrameClock, KeyboardError,
    KeyboardEvent, KeyboardResult, KeyboardState, RawNotification, Subscription,
    SystemFrameClock, TickOutcome,
};

thread_local! {
    /// The UI thread's store, created on first use.
    static GLOBAL_STORE: KeyboardStore = KeyboardStore::with_config(
        Rc::new(SystemFrameClock::new()),
        ControllerConfig::from_env(),
    );
}

struct StoreInner {
    state: RefCell<KeyboardState>,
    last_event: RefCell<Option<KeyboardEvent>>,
    driver: AnimationDriver,
    clock: Rc<dyn FrameClock>,
    subscribers: crate::subscription::Listeners<KeyboardState>,
    config: ControllerConfig,
    enabled: Cell<bool>,
    dropped: Cell<u64>,
    /// Set while subscribers are being notified.
    notifying: Cell<bool>,
    /// Events raised by subscribers during a notification round.
    pending: RefCell<VecDeque<KeyboardEvent>>,
}

/// Single-writer keyboard state store.
///
/// Events go in through [`KeyboardStore::handle_notification`] (raw) or
/// [`KeyboardStore::on_event`] (already normalized), strictly in arrival
/// order. Each accepted event updates the state, retargets the driver, and
/// then notifies subscribers synchronously.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use std::time::Duration;
/// use keyboard_core::{Easing, KeyboardEvent, KeyboardPhase, KeyboardStore, ManualFrameClock};
///
/// let clock = ManualFrameClock::new();
/// let store = KeyboardStore::new(Rc::new(clock.clone()));
///
/// store.on_event(KeyboardEvent::new(
///     KeyboardPhase::WillShow,
///     300.0,
///     Duration::from_millis(250),
///     Easing::EaseOut,
/// ));
/// assert!(store.state().is_visible);
///
/// clock.advance(Duration::from_millis(250));
/// store.tick();
/// assert_eq!(store.animated_value().height(), 300.0);
/// ```
#[derive(Clone)]
pub struct KeyboardStore {
    inner: Rc<StoreInner>,
}

impl KeyboardStore {
    /// Create an isolated store driven by `clock`, with default config.
    #[must_use]
    pub fn new(clock: Rc<dyn FrameClock>) -> Self {
        Self::with_config(clock, ControllerConfig::default())
    }

    /// Create an isolated store with explicit config.
    #[must_use]
    pub fn with_config(clock: Rc<dyn FrameClock>, config: ControllerConfig) -> Self {
        let driver = AnimationDriver::with_epsilon(Rc::clone(&clock), config.settle_epsilon);
        let state = KeyboardState::hidden(driver.value());
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(state),
                last_event: RefCell::new(None),
                driver,
                clock,
                subscribers: crate::subscription::Listeners::new("keyboard state"),
                config,
                enabled: Cell::new(true),
                dropped: Cell::new(0),
                notifying: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// The UI thread's shared store.
    ///
    /// Created on first call with a [`SystemFrameClock`] and
    /// [`ControllerConfig::from_env`]; lives until the thread exits.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_STORE.with(Clone::clone)
    }

    /// Latest state.
    #[must_use]
    pub fn state(&self) -> KeyboardState {
        self.inner.state.borrow().clone()
    }

    /// Handle to the shared animated value.
    #[must_use]
    pub fn animated_value(&self) -> AnimatedValue {
        self.inner.driver.value()
    }

    /// Register a state-change callback.
    ///
    /// The callback runs after every accepted event, never on animation frames.
    pub fn subscribe(&self, callback: impl Fn(&KeyboardState) + 'static) -> Subscription {
        self.inner.subscribers.add(callback)
    }

    /// Number of active state subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Normalize and apply a native notification.
    ///
    /// Malformed notifications are logged and dropped; the store keeps its
    /// last known state. Returns whether the notification changed the state.
    pub fn handle_notification(&self, raw: &RawNotification) -> bool {
        match self.try_handle_notification(raw) {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(
                    platform = ?raw.platform,
                    name = %raw.name,
                    "Dropping keyboard notification: {e}"
                );
                false
            }
        }
    }

    /// Normalize and apply a native notification, reporting why it was
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError::Normalize`] when the notification cannot be
    /// normalized. The drop is counted and the state is left untouched.
    pub fn try_handle_notification(&self, raw: &RawNotification) -> KeyboardResult<bool> {
        match normalize(raw) {
            Ok(event) => Ok(self.on_event(event)),
            Err(e) => {
                self.inner.dropped.set(self.inner.dropped.get() + 1);
                Err(KeyboardError::Normalize(e))
            }
        }
    }

    /// Apply a canonical event.
    ///
    /// Returns `false` when the store is disabled or the event repeats the
    /// previous event's phase and height. An event sent from inside a
    /// subscriber is queued and applied once every subscriber has seen the
    /// current state; it reports `true`.
    pub fn on_event(&self, event: KeyboardEvent) -> bool {
        if !self.inner.enabled.get() {
            tracing::debug!(phase = ?event.phase, "keyboard store disabled; ignoring event");
            return false;
        }

        if self.inner.notifying.get() {
            tracing::debug!(phase = ?event.phase, "queued keyboard event raised during notification");
            self.inner.pending.borrow_mut().push_back(event);
            return true;
        }

        let accepted = self.apply_event(event);
        self.drain_pending();
        accepted
    }

    fn apply_event(&self, mut event: KeyboardEvent) -> bool {
        event.height = sanitize_height(event.height);

        if self.inner.config.collapse_duplicates {
            let last = self.inner.last_event.borrow();
            if last.as_ref().is_some_and(|last| last.same_transition(&event)) {
                tracing::debug!(
                    phase = ?event.phase,
                    height = event.height,
                    "collapsed duplicate keyboard event"
                );
                return false;
            }
        }

        let max_duration = self.inner.config.max_duration();
        if event.duration > max_duration {
            tracing::debug!(
                duration_ms = event.duration.as_millis(),
                "clamping keyboard transition duration"
            );
            event.duration = max_duration;
        }

        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            state.apply(&event);
            state.clone()
        };
        tracing::debug!(
            phase = ?event.phase,
            height = event.height,
            visible = snapshot.is_visible,
            "keyboard event accepted"
        );

        self.inner
            .driver
            .animate_to(event.height, event.duration, event.easing);
        *self.inner.last_event.borrow_mut() = Some(event);

        self.notify_subscribers(&snapshot);
        true
    }

    /// Apply events queued by subscribers, in the order they were raised.
    fn drain_pending(&self) {
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            if self.inner.enabled.get() {
                self.apply_event(event);
            }
        }
    }

    fn notify_subscribers(&self, snapshot: &KeyboardState) {
        let was_notifying = self.inner.notifying.replace(true);
        self.inner.subscribers.notify(snapshot);
        self.inner.notifying.set(was_notifying);
    }

    /// Advance the animation; call from the host's frame callback.
    pub fn tick(&self) -> TickOutcome {
        self.inner.driver.tick()
    }

    /// Whether the animated value is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.inner.driver.is_animating()
    }

    /// Enable or disable keyboard tracking.
    ///
    /// Disabling snaps the value to zero, marks the keyboard hidden, notifies
    /// subscribers, and ignores events until re-enabled.
    pub fn set_enabled(&self, enabled: bool) {
        if self.inner.enabled.replace(enabled) == enabled {
            return;
        }
        tracing::info!(enabled, "keyboard tracking toggled");
        if enabled {
            return;
        }

        self.inner.driver.snap_to(0.0);
        *self.inner.last_event.borrow_mut() = None;
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            state.height = 0.0;
            state.is_visible = false;
            state.clone()
        };
        self.inner.pending.borrow_mut().clear();
        self.notify_subscribers(&snapshot);
    }

    /// Whether keyboard tracking is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Number of notifications dropped as malformed.
    #[must_use]
    pub fn dropped_notifications(&self) -> u64 {
        self.inner.dropped.get()
    }

    /// Number of times the store retargeted the driver.
    #[must_use]
    pub fn driver_invocations(&self) -> u64 {
        self.inner.driver.invocations()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// The clock driving this store.
    #[must_use]
    pub fn clock(&self) -> Rc<dyn FrameClock> {
        Rc::clone(&self.inner.clock)
    }

    /// Whether both handles refer to the same store.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for KeyboardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardStore")
            .field("state", &*self.inner.state.borrow())
            .field("driver", &self.inner.driver)
            .field("subscribers", &self.inner.subscribers.len())
            .field("enabled", &self.inner.enabled.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Easing, KeyboardPhase, ManualFrameClock, Platform};
    use serde_json::json;
    use std::time::Duration;

    fn store() -> (KeyboardStore, ManualFrameClock) {
        let clock = ManualFrameClock::new();
        (KeyboardStore::new(Rc::new(clock.clone())), clock)
    }

    fn will_show(height: f32) -> KeyboardEvent {
        KeyboardEvent::new(
            KeyboardPhase::WillShow,
            height,
            Duration::from_millis(250),
            Easing::EaseOut,
        )
    }

    #[test]
    fn test_initial_state_hidden() {
        let (store, _) = store();
        let state = store.state();
        assert!(!state.is_visible);
        assert!(state.height.abs() < f32::EPSILON);
        assert!(state.phase.is_none());
        assert!(state.animated.ptr_eq(&store.animated_value()));
    }

    #[test]
    fn test_event_updates_state_and_notifies() {
        let (store, _) = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            store.subscribe(move |state| seen.borrow_mut().push((state.height, state.is_visible)))
        };

        assert!(store.on_event(will_show(300.0)));
        assert_eq!(*seen.borrow(), vec![(300.0, true)]);
        assert!(store.is_animating());
    }

    #[test]
    fn test_subscribers_see_updated_state_through_store() {
        let (store, _) = store();
        let observed = Rc::new(Cell::new(0.0_f32));
        let _sub = {
            let observed = Rc::clone(&observed);
            let reader = store.clone();
            store.subscribe(move |_| observed.set(reader.state().height))
        };
        store.on_event(will_show(280.0));
        assert!((observed.get() - 280.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_duplicate_events_collapsed() {
        let (store, _) = store();
        assert!(store.on_event(will_show(300.0)));
        assert!(!store.on_event(will_show(300.0)));
        assert_eq!(store.driver_invocations(), 1);

        // A different height is a new transition.
        assert!(store.on_event(will_show(310.0)));
        assert_eq!(store.driver_invocations(), 2);
    }

    #[test]
    fn test_duplicates_kept_when_collapsing_disabled() {
        let clock = ManualFrameClock::new();
        let config = ControllerConfig {
            collapse_duplicates: false,
            ..ControllerConfig::default()
        };
        let store = KeyboardStore::with_config(Rc::new(clock), config);
        assert!(store.on_event(will_show(300.0)));
        assert!(store.on_event(will_show(300.0)));
        assert_eq!(store.driver_invocations(), 2);
    }

    #[test]
    fn test_malformed_notification_dropped() {
        let (store, _) = store();
        store.on_event(KeyboardEvent::immediate(KeyboardPhase::DidShow, 250.0));

        let raw = RawNotification::new(Platform::Ios, "keyboardWillHide", json!({"duration": 0.25}));
        assert!(!store.handle_notification(&raw));
        assert_eq!(store.dropped_notifications(), 1);

        let state = store.state();
        assert!(state.is_visible);
        assert!((state.height - 250.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_valid_notification_applied() {
        let (store, _) = store();
        let raw = RawNotification::new(
            Platform::Ios,
            "keyboardWillShow",
            json!({"height": 291.0, "duration": 0.25, "curve": 7}),
        );
        assert!(store.handle_notification(&raw));
        assert_eq!(store.state().easing, Easing::Keyboard);
    }

    #[test]
    fn test_long_duration_clamped() {
        let (store, _) = store();
        let event = KeyboardEvent::new(
            KeyboardPhase::WillShow,
            300.0,
            Duration::from_secs(30),
            Easing::Linear,
        );
        store.on_event(event);
        assert_eq!(store.state().duration, store.config().max_duration());
    }

    #[test]
    fn test_absurd_notification_duration_clamped() {
        let (store, _) = store();
        let raw = RawNotification::new(
            Platform::Android,
            "keyboardWillShow",
            json!({"height": 300, "duration": 1e25}),
        );
        assert!(store.handle_notification(&raw));
        assert_eq!(store.state().duration, store.config().max_duration());
        assert!(store.is_animating());
    }

    #[test]
    fn test_disable_snaps_to_zero_and_ignores_events() {
        let (store, clock) = store();
        store.on_event(will_show(300.0));
        clock.advance(Duration::from_millis(100));
        store.tick();

        store.set_enabled(false);
        assert!(!store.is_animating());
        assert!(store.animated_value().height().abs() < f32::EPSILON);
        assert!(!store.state().is_visible);
        assert!(!store.on_event(will_show(300.0)));

        store.set_enabled(true);
        assert!(store.on_event(will_show(300.0)));
    }

    #[test]
    fn test_global_store_is_shared_per_thread() {
        let a = KeyboardStore::global();
        let b = KeyboardStore::global();
        assert!(a.ptr_eq(&b));

        let isolated = KeyboardStore::new(Rc::new(ManualFrameClock::new()));
        assert!(!a.ptr_eq(&isolated));
    }

    #[test]
    fn test_subscriber_may_feed_events_back() {
        let (store, _) = store();
        let _sub = {
            let store = store.clone();
            store.clone().subscribe(move |state| {
                if state.phase == Some(KeyboardPhase::WillShow) {
                    store.on_event(KeyboardEvent::immediate(KeyboardPhase::DidShow, state.height));
                }
            })
        };
        store.on_event(will_show(200.0));
        assert_eq!(store.state().phase, Some(KeyboardPhase::DidShow));
    }

    #[test]
    fn test_events_raised_by_subscribers_reach_everyone_in_order() {
        let (store, _) = store();
        let _feeder = {
            let store = store.clone();
            store.clone().subscribe(move |state| {
                if state.phase == Some(KeyboardPhase::WillShow) {
                    store.on_event(KeyboardEvent::immediate(KeyboardPhase::DidShow, state.height));
                }
            })
        };
        let phases = Rc::new(RefCell::new(Vec::new()));
        let _logger = {
            let phases = Rc::clone(&phases);
            store.subscribe(move |state| phases.borrow_mut().push(state.phase))
        };
        let hook = crate::use_keyboard_state(&crate::KeyboardProvider::new(store.clone()));

        store.on_event(will_show(200.0));

        assert_eq!(
            *phases.borrow(),
            vec![Some(KeyboardPhase::WillShow), Some(KeyboardPhase::DidShow)]
        );
        assert_eq!(hook.get().phase, store.state().phase);
        assert_eq!(hook.revision(), 2);
    }

    #[test]
    fn test_negative_height_from_deserialized_event_clamped() {
        let (store, _) = store();
        let event: KeyboardEvent = serde_json::from_value(json!({
            "phase": "did_change_frame",
            "height": -40.0,
            "duration": {"secs": 0, "nanos": 0},
            "easing": "ease_in_out",
            "target": null,
            "timestamp_ms": 0
        }))
        .expect("deserialize");
        assert!(event.height < 0.0);

        assert!(store.on_event(event));
        assert!(store.state().height.abs() < f32::EPSILON);
        assert!(store.animated_value().height().abs() < f32::EPSILON);
        assert!(!store.state().is_visible);
    }

    #[test]
    fn test_try_handle_notification_reports_reason() {
        let (store, _) = store();
        let raw = RawNotification::new(Platform::Android, "keyboardWillShow", json!({"height": "tall"}));

        let result = store.try_handle_notification(&raw);
        assert!(matches!(
            result,
            Err(KeyboardError::Normalize(crate::NormalizeError::NotANumber("height")))
        ));
        assert_eq!(store.dropped_notifications(), 1);

        let raw = RawNotification::new(Platform::Ios, "keyboardDidShow", json!({"height": 240}));
        assert!(store.try_handle_notification(&raw).expect("valid notification"));
    }
}
