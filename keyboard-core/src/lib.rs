//! # Keyboard Core
//!
//! Keyboard state coordination for mobile UI layouts.
//! Turns native keyboard notifications into one shared state and one shared
//! animated value that every keyboard-aware view reads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               keyboard-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Normalizer      │  Keyboard Store          │
//! │  - iOS payloads  │  - Canonical state       │
//! │  - Android       │  - Subscriptions         │
//! │  - Curve mapping │  - Duplicate collapsing  │
//! ├─────────────────────────────────────────────┤
//! │  Animation Driver│  Provider / Hooks        │
//! │  - Retargeting   │  - State hook            │
//! │  - Frame clock   │  - Animated value hook   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Data flows one way: notification → [`normalizer`] → [`KeyboardStore`] →
//! [`AnimationDriver`] → [`AnimatedValue`] → consumers.
//!
//! Everything runs on the UI thread. The store is `!Send`: there is
//! exactly one writer, and the host's frame callback drives
//! [`KeyboardStore::tick`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animated;
pub mod clock;
pub mod config;
pub mod context;
pub mod driver;
pub mod easing;
pub mod error;
pub mod event;
pub mod normalizer;
pub mod state;
pub mod store;
pub mod subscription;

pub use animated::{AnimatedFrame, AnimatedValue};
pub use clock::{FrameClock, ManualFrameClock, SystemFrameClock};
pub use config::ControllerConfig;
pub use context::{
    use_keyboard_animated_value, use_keyboard_animation, use_keyboard_handler,
    use_keyboard_state, use_keyboard_state_with, KeyboardHandler, KeyboardHandlerHook,
    KeyboardProvider, KeyboardStateHook,
};
pub use driver::{AnimationDriver, TickOutcome};
pub use easing::{CubicBezier, Easing};
pub use error::{KeyboardError, KeyboardResult};
pub use event::{KeyboardEvent, KeyboardPhase};
pub use normalizer::{normalize, NormalizeError, Platform, RawNotification};
pub use state::KeyboardState;
pub use store::KeyboardStore;
pub use subscription::Subscription;

/// Keyboard core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
