//! Listener registries and the subscription handles they hand out.
//!
//! Both the store (state changes) and the animated value (frames) keep their
//! callbacks in a [`Listeners`] registry. Dropping or unsubscribing the
//! returned [`Subscription`] removes the callback.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

impl<T> Registry<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }
}

/// A set of callbacks notified synchronously, in registration order.
pub(crate) struct Listeners<T> {
    registry: Rc<RefCell<Registry<T>>>,
    /// Label used in diagnostics.
    label: &'static str,
}

impl<T: 'static> Listeners<T> {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
            label,
        }
    }

    /// Register a callback.
    pub(crate) fn add(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };

        let weak = Rc::downgrade(&self.registry);
        Subscription::new(move || remove_entry(&weak, id))
    }

    /// Number of registered callbacks.
    pub(crate) fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Notify every callback with `value`.
    ///
    /// Callbacks may subscribe or unsubscribe while being notified. A callback
    /// removed mid-round is not called. A panicking callback is logged and
    /// skipped; the rest still run. Returns the number of callbacks that panicked.
    pub(crate) fn notify(&self, value: &T) -> usize {
        let snapshot: Vec<(u64, Callback<T>)> = self.registry.borrow().entries.clone();
        let mut failures = 0;

        for (id, callback) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                failures += 1;
                tracing::warn!("{} listener {id} panicked; continuing", self.label);
            }
        }
        failures
    }
}

fn remove_entry<T>(registry: &Weak<RefCell<Registry<T>>>, id: u64) -> bool {
    let Some(registry) = registry.upgrade() else {
        return false;
    };
    let mut entries = registry.borrow_mut();
    entries.remove(id)
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("label", &self.label)
            .field("len", &self.registry.borrow().entries.len())
            .finish()
    }
}

/// Handle for a registered callback.
///
/// Calling [`Subscription::unsubscribe`] removes the callback. Repeated calls,
/// or calls after the owner has gone away, are no-ops. Dropping the handle
/// unsubscribes, which ties the callback's lifetime to whoever holds it.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    remove: Cell<Option<Box<dyn FnOnce() -> bool>>>,
}

impl Subscription {
    fn new(remove: impl FnOnce() -> bool + 'static) -> Self {
        Self {
            remove: Cell::new(Some(Box::new(remove))),
        }
    }

    /// Remove the callback. Returns `true` only for the call that removed it.
    pub fn unsubscribe(&self) -> bool {
        self.remove.take().is_some_and(|remove| remove())
    }

    /// Whether [`Subscription::unsubscribe`] has not been called yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let remove = self.remove.take();
        let active = remove.is_some();
        self.remove.set(remove);
        active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
