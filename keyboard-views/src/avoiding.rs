//! View that moves out of the keyboard's way.
//!
//! The view only reacts to the part of the keyboard that actually covers it:
//!
//! ```text
//!  screen top ─┬──────────────┐
//!              │   view       │
//!              │              │  ← overlap = view bottom − keyboard top
//!  keyboard ───┼──────────────┤     (+ vertical offset)
//!              │   keyboard   │
//!  screen bot ─┴──────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::{KeyboardConsumer, KeyboardFrame, LayoutRect};

/// How the view makes room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvoidingBehavior {
    /// Add bottom padding.
    #[default]
    Padding,
    /// Shrink the view's height.
    Height,
    /// Move the view up via its bottom position.
    Position,
    /// Translate the view up.
    Translate,
}

/// Resulting style for the avoiding view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvoidingLayout {
    /// Bottom padding to apply.
    Padding {
        /// Padding in layout units.
        bottom: f32,
    },
    /// Height to apply.
    Height {
        /// Height in layout units.
        height: f32,
    },
    /// Bottom position to apply.
    Position {
        /// Bottom offset in layout units.
        bottom: f32,
    },
    /// Vertical translation to apply.
    Translate {
        /// Translation; negative moves up.
        y: f32,
    },
}

/// A container that avoids the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardAvoidingView {
    /// How to make room.
    pub behavior: AvoidingBehavior,
    /// Distance between the screen top and the view's coordinate origin,
    /// e.g. a navigation header.
    pub keyboard_vertical_offset: f32,
    /// When disabled the view keeps its measured layout.
    pub enabled: bool,
    frame: LayoutRect,
    screen_height: f32,
}

impl KeyboardAvoidingView {
    /// Create a view measured at `frame` on a screen `screen_height` tall.
    #[must_use]
    pub fn new(frame: LayoutRect, screen_height: f32) -> Self {
        Self {
            behavior: AvoidingBehavior::default(),
            keyboard_vertical_offset: 0.0,
            enabled: true,
            frame,
            screen_height,
        }
    }

    /// Set the behavior.
    #[must_use]
    pub fn with_behavior(mut self, behavior: AvoidingBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the vertical offset.
    #[must_use]
    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.keyboard_vertical_offset = offset;
        self
    }

    /// Update the measured frame (on layout).
    pub fn set_frame(&mut self, frame: LayoutRect) {
        self.frame = frame;
    }

    /// Measured frame.
    #[must_use]
    pub fn frame(&self) -> LayoutRect {
        self.frame
    }

    /// How much of the view a keyboard of `keyboard_height` covers.
    #[must_use]
    pub fn overlap(&self, keyboard_height: f32) -> f32 {
        if keyboard_height <= 0.0 {
            return 0.0;
        }
        let keyboard_top = self.screen_height - keyboard_height - self.keyboard_vertical_offset;
        (self.frame.bottom() - keyboard_top).max(0.0)
    }
}

impl KeyboardConsumer for KeyboardAvoidingView {
    type Layout = AvoidingLayout;

    fn layout(&self, keyboard: &KeyboardFrame) -> AvoidingLayout {
        let overlap = if self.enabled {
            self.overlap(keyboard.height)
        } else {
            0.0
        };
        match self.behavior {
            AvoidingBehavior::Padding => AvoidingLayout::Padding { bottom: overlap },
            AvoidingBehavior::Height => AvoidingLayout::Height {
                height: (self.frame.height - overlap).max(0.0),
            },
            AvoidingBehavior::Position => AvoidingLayout::Position { bottom: overlap },
            AvoidingBehavior::Translate => AvoidingLayout::Translate { y: -overlap },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_only_counts_covered_part() {
        // View ends 100 units above the screen bottom.
        let view = KeyboardAvoidingView::new(LayoutRect::new(0.0, 0.0, 390.0, 744.0), 844.0);
        assert!(view.overlap(0.0).abs() < f32::EPSILON);
        assert!(view.overlap(80.0).abs() < f32::EPSILON);
        assert!((view.overlap(300.0) - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_vertical_offset_increases_overlap() {
        let view = KeyboardAvoidingView::new(LayoutRect::new(0.0, 0.0, 390.0, 744.0), 844.0)
            .with_vertical_offset(44.0);
        assert!((view.overlap(300.0) - 244.0).abs() < f32::EPSILON);
    }
}
