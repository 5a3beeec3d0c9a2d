//! # Keyboard Views
//!
//! Keyboard-aware view models built on `keyboard-core`.
//!
//! Every view here is a [`KeyboardConsumer`]: it turns the current
//! [`KeyboardFrame`] (state + animated height/progress) into a layout
//! description. None of them tracks the keyboard itself; they all read the
//! same store through a [`KeyboardBinding`].
//!
//! | View                        | Effect                                         |
//! |-----------------------------|------------------------------------------------|
//! | [`KeyboardAvoidingView`]    | Pads, shrinks, or moves by its keyboard overlap |
//! | [`KeyboardStickyView`]      | Rides on top of the keyboard                   |
//! | [`KeyboardAwareScrollView`] | Insets content, scrolls focused input into view |
//! | [`KeyboardToolbar`]         | Prev/next/done bar docked above the keyboard   |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod avoiding;
pub mod aware_scroll;
pub mod consumer;
pub mod sticky;
pub mod toolbar;

pub use avoiding::{AvoidingBehavior, AvoidingLayout, KeyboardAvoidingView};
pub use aware_scroll::{AwareScrollConfig, AwareScrollLayout, KeyboardAwareScrollView};
pub use consumer::{KeyboardBinding, KeyboardConsumer, KeyboardFrame, LayoutRect};
pub use sticky::{KeyboardStickyView, StickyLayout, StickyOffset};
pub use toolbar::{
    default_keyboard_toolbar_theme, ColorScheme, KeyboardToolbar, KeyboardToolbarProps,
    KeyboardToolbarTheme, ToolbarAction, ToolbarButton, ToolbarColors, ToolbarLayout,
};
