//! # Keyboard Replay
//!
//! Feeds a recorded script of native keyboard notifications through a
//! [`KeyboardStore`](keyboard_core::KeyboardStore) and records the animated
//! value at every frame.
//!
//! Two clocks are supported:
//! - **virtual**: a [`ManualFrameClock`](keyboard_core::ManualFrameClock)
//!   stepped at a fixed interval, fully deterministic
//! - **realtime**: the global store on its system clock, ticked from a tokio
//!   interval

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod runner;
pub mod script;

pub use cli::ReplayArgs;
pub use runner::{run_realtime, run_virtual, FrameRecord};
pub use script::{ReplayError, ReplayScript, ScriptStep};
