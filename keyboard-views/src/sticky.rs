//! View pinned to the top edge of the keyboard.

use serde::{Deserialize, Serialize};

use crate::{KeyboardConsumer, KeyboardFrame};

/// Extra vertical offset while the keyboard is closed and opened.
///
/// Interpolated by keyboard progress, so the view eases between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickyOffset {
    /// Offset with the keyboard hidden.
    pub closed: f32,
    /// Offset with the keyboard fully shown.
    pub opened: f32,
}

impl StickyOffset {
    /// Offset at `progress`.
    #[must_use]
    pub fn at(&self, progress: f32) -> f32 {
        self.closed + (self.opened - self.closed) * progress.clamp(0.0, 1.0)
    }
}

/// Translation to apply to a sticky view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyLayout {
    /// Vertical translation; negative moves up.
    pub translate_y: f32,
}

/// A view that follows the keyboard's top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardStickyView {
    /// Closed/opened offsets.
    pub offset: StickyOffset,
    /// When disabled the view stays at its closed offset.
    pub enabled: bool,
}

impl Default for KeyboardStickyView {
    fn default() -> Self {
        Self {
            offset: StickyOffset::default(),
            enabled: true,
        }
    }
}

impl KeyboardStickyView {
    /// Create a sticky view with the given offsets.
    #[must_use]
    pub fn new(offset: StickyOffset) -> Self {
        Self {
            offset,
            enabled: true,
        }
    }
}

impl KeyboardConsumer for KeyboardStickyView {
    type Layout = StickyLayout;

    fn layout(&self, keyboard: &KeyboardFrame) -> StickyLayout {
        let translate_y = if self.enabled {
            self.offset.at(keyboard.progress) - keyboard.height
        } else {
            self.offset.closed
        };
        StickyLayout { translate_y }
    }
}
