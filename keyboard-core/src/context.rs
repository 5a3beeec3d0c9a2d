//! Provider and hooks that hand the store to views.
//!
//! A [`KeyboardProvider`] is created once near the root of the view tree and
//! passed down explicitly. Hooks borrow the provider and return handles whose
//! lifetime is the view's: dropping the handle is unmounting.
//!
//! Two channels:
//!
//! - [`use_keyboard_state`] reports state changes (a handful per transition).
//! - [`use_keyboard_animated_value`] hands out the per-frame value for direct
//!   binding, with no state notification per frame.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::{AnimatedFrame, AnimatedValue, KeyboardState, KeyboardStore, Subscription};

/// Scoped access to a [`KeyboardStore`].
#[derive(Debug, Clone)]
pub struct KeyboardProvider {
    store: KeyboardStore,
}

impl KeyboardProvider {
    /// Provide an explicit store (tests, embedded hosts).
    #[must_use]
    pub fn new(store: KeyboardStore) -> Self {
        Self { store }
    }

    /// Provide the UI thread's global store.
    #[must_use]
    pub fn global() -> Self {
        Self::new(KeyboardStore::global())
    }

    /// The provided store.
    #[must_use]
    pub fn store(&self) -> &KeyboardStore {
        &self.store
    }

    /// Enable or disable keyboard tracking for everything under this provider.
    pub fn set_enabled(&self, enabled: bool) {
        self.store.set_enabled(enabled);
    }
}

/// Live keyboard state for one view.
///
/// `revision` counts the state changes this view has seen, which is the
/// number of re-renders the view would have done.
pub struct KeyboardStateHook {
    current: Rc<RefCell<KeyboardState>>,
    revision: Rc<Cell<u64>>,
    subscription: Subscription,
}

impl KeyboardStateHook {
    /// Latest state seen by this view.
    #[must_use]
    pub fn get(&self) -> KeyboardState {
        self.current.borrow().clone()
    }

    /// Latest height and visibility.
    #[must_use]
    pub fn height_and_visibility(&self) -> (f32, bool) {
        let state = self.current.borrow();
        (state.height, state.is_visible)
    }

    /// Number of state changes observed since mounting.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Stop observing before the hook is dropped.
    pub fn unmount(&self) {
        self.subscription.unsubscribe();
    }

    /// Whether the hook is still observing the store.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_active()
    }
}

impl fmt::Debug for KeyboardStateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardStateHook")
            .field("current", &*self.current.borrow())
            .field("revision", &self.revision.get())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Observe keyboard state changes.
#[must_use]
pub fn use_keyboard_state(provider: &KeyboardProvider) -> KeyboardStateHook {
    use_keyboard_state_with(provider, |_| {})
}

/// Observe keyboard state changes and call `on_change` after each one.
///
/// `on_change` is where a view schedules its re-render.
#[must_use]
pub fn use_keyboard_state_with(
    provider: &KeyboardProvider,
    on_change: impl Fn(&KeyboardState) + 'static,
) -> KeyboardStateHook {
    let current = Rc::new(RefCell::new(provider.store().state()));
    let revision = Rc::new(Cell::new(0));

    let subscription = {
        let current = Rc::clone(&current);
        let revision = Rc::clone(&revision);
        provider.store().subscribe(move |state| {
            *current.borrow_mut() = state.clone();
            revision.set(revision.get() + 1);
            on_change(state);
        })
    };

    KeyboardStateHook {
        current,
        revision,
        subscription,
    }
}

/// Shared animated value for direct binding into transforms.
#[must_use]
pub fn use_keyboard_animated_value(provider: &KeyboardProvider) -> AnimatedValue {
    provider.store().animated_value()
}

/// Alias of [`use_keyboard_animated_value`]; the value carries both height
/// and progress.
#[must_use]
pub fn use_keyboard_animation(provider: &KeyboardProvider) -> AnimatedValue {
    use_keyboard_animated_value(provider)
}

/// Lifecycle callbacks for one keyboard transition.
pub trait KeyboardHandler {
    /// A transition was announced (a `Will*` phase).
    fn on_start(&self, _state: &KeyboardState) {}

    /// The animated value moved.
    fn on_move(&self, _frame: &AnimatedFrame) {}

    /// The animated value settled.
    fn on_end(&self, _frame: &AnimatedFrame) {}
}

/// Mounted [`KeyboardHandler`]; dropping it stops all callbacks.
#[derive(Debug)]
pub struct KeyboardHandlerHook {
    state: Subscription,
    frames: Subscription,
}

impl KeyboardHandlerHook {
    /// Stop delivering callbacks before the hook is dropped.
    pub fn unmount(&self) {
        self.state.unsubscribe();
        self.frames.unsubscribe();
    }
}

/// Attach a [`KeyboardHandler`] to the provided store.
#[must_use]
pub fn use_keyboard_handler(
    provider: &KeyboardProvider,
    handler: impl KeyboardHandler + 'static,
) -> KeyboardHandlerHook {
    let handler = Rc::new(handler);

    let state = {
        let handler = Rc::clone(&handler);
        provider.store().subscribe(move |state| {
            if state.is_transitioning() {
                handler.on_start(state);
            }
        })
    };
    let frames = provider.store().animated_value().observe(move |frame| {
        if frame.settled {
            handler.on_end(frame);
        } else {
            handler.on_move(frame);
        }
    });

    KeyboardHandlerHook { state, frames }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Easing, KeyboardEvent, KeyboardPhase, ManualFrameClock};
    use std::time::Duration;

    fn provider() -> (KeyboardProvider, ManualFrameClock) {
        let clock = ManualFrameClock::new();
        let store = KeyboardStore::new(Rc::new(clock.clone()));
        (KeyboardProvider::new(store), clock)
    }

    fn show() -> KeyboardEvent {
        KeyboardEvent::new(
            KeyboardPhase::WillShow,
            300.0,
            Duration::from_millis(250),
            Easing::Linear,
        )
    }

    #[test]
    fn test_state_hook_counts_state_changes_not_frames() {
        let (provider, clock) = provider();
        let hook = use_keyboard_state(&provider);

        provider.store().on_event(show());
        for _ in 0..20 {
            clock.advance(Duration::from_millis(16));
            provider.store().tick();
        }
        provider
            .store()
            .on_event(KeyboardEvent::immediate(KeyboardPhase::DidShow, 300.0));

        assert_eq!(hook.revision(), 2);
        assert_eq!(hook.height_and_visibility(), (300.0, true));
    }

    #[test]
    fn test_state_hook_stops_after_unmount() {
        let (provider, _) = provider();
        let renders = Rc::new(Cell::new(0));
        let hook = {
            let renders = Rc::clone(&renders);
            use_keyboard_state_with(&provider, move |_| renders.set(renders.get() + 1))
        };

        provider.store().on_event(show());
        hook.unmount();
        hook.unmount();
        provider
            .store()
            .on_event(KeyboardEvent::immediate(KeyboardPhase::WillHide, 0.0));

        assert_eq!(renders.get(), 1);
        assert!(!hook.is_mounted());
        assert_eq!(provider.store().subscriber_count(), 0);
    }

    #[test]
    fn test_dropping_hook_unsubscribes() {
        let (provider, _) = provider();
        {
            let _hook = use_keyboard_state(&provider);
            assert_eq!(provider.store().subscriber_count(), 1);
        }
        assert_eq!(provider.store().subscriber_count(), 0);
    }

    #[test]
    fn test_animated_value_hooks_share_value() {
        let (provider, _) = provider();
        let a = use_keyboard_animated_value(&provider);
        let b = use_keyboard_animation(&provider);
        assert!(a.ptr_eq(&b));
    }

    #[derive(Default)]
    struct Recorder {
        starts: Cell<u32>,
        moves: Cell<u32>,
        ends: Cell<u32>,
    }

    impl KeyboardHandler for Rc<Recorder> {
        fn on_start(&self, _state: &KeyboardState) {
            self.starts.set(self.starts.get() + 1);
        }

        fn on_move(&self, _frame: &AnimatedFrame) {
            self.moves.set(self.moves.get() + 1);
        }

        fn on_end(&self, _frame: &AnimatedFrame) {
            self.ends.set(self.ends.get() + 1);
        }
    }

    #[test]
    fn test_handler_lifecycle() {
        let (provider, clock) = provider();
        let recorder = Rc::new(Recorder::default());
        let hook = use_keyboard_handler(&provider, Rc::clone(&recorder));

        provider.store().on_event(show());
        for _ in 0..16 {
            clock.advance(Duration::from_millis(16));
            provider.store().tick();
        }

        assert_eq!(recorder.starts.get(), 1);
        assert_eq!(recorder.moves.get(), 15);
        assert_eq!(recorder.ends.get(), 1);

        hook.unmount();
        provider
            .store()
            .on_event(KeyboardEvent::immediate(KeyboardPhase::WillHide, 0.0));
        assert_eq!(recorder.starts.get(), 1);
        assert_eq!(recorder.ends.get(), 1);
    }
}
