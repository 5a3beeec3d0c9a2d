//! Scroll view that keeps the focused input above the keyboard.

use std::cell::RefCell;
use std::rc::Rc;

use keyboard_core::{KeyboardPhase, KeyboardProvider, KeyboardState, Subscription};
use serde::{Deserialize, Serialize};

use crate::{KeyboardConsumer, KeyboardFrame, LayoutRect};

/// Configuration for [`KeyboardAwareScrollView`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwareScrollConfig {
    /// Gap kept between the focused input and the keyboard.
    pub bottom_offset: f32,
    /// Extra inset added below the content while the keyboard is up.
    pub extra_keyboard_space: f32,
    /// When disabled: no inset, no auto-scroll.
    pub enabled: bool,
}

impl Default for AwareScrollConfig {
    fn default() -> Self {
        Self {
            bottom_offset: 0.0,
            extra_keyboard_space: 0.0,
            enabled: true,
        }
    }
}

/// Inset to apply to the scroll content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwareScrollLayout {
    /// Bottom content inset in layout units.
    pub content_inset_bottom: f32,
}

#[derive(Debug, Default)]
struct ScrollModel {
    /// Scroll view bounds on screen.
    viewport: LayoutRect,
    /// Height of the screen the keyboard rises from.
    screen_height: f32,
    /// Current vertical scroll position.
    scroll_offset: f32,
    /// Focused input, in content coordinates.
    focused: Option<LayoutRect>,
    /// Scroll position the view should animate to.
    pending_scroll: Option<f32>,
}

impl ScrollModel {
    /// Part of the viewport covered by a keyboard of `keyboard_height`.
    fn overlap(&self, keyboard_height: f32) -> f32 {
        if keyboard_height <= 0.0 {
            return 0.0;
        }
        let keyboard_top = self.screen_height - keyboard_height;
        (self.viewport.bottom() - keyboard_top).clamp(0.0, self.viewport.height)
    }

    /// Scroll position that reveals the focused input above a keyboard of
    /// `keyboard_height`, if it is currently hidden.
    fn reveal_position(&self, keyboard_height: f32, bottom_offset: f32) -> Option<f32> {
        let input = self.focused?;
        let visible_height = self.viewport.height - self.overlap(keyboard_height);
        let input_bottom = input.bottom() - self.scroll_offset + bottom_offset;
        let hidden_by = input_bottom - visible_height;
        (hidden_by > 0.0).then(|| self.scroll_offset + hidden_by)
    }
}

/// A scroll container aware of the keyboard.
///
/// Mounting subscribes to state changes: when the keyboard is about to show
/// (or resize while visible) and the focused input would end up underneath
/// it, a scroll request is queued for the host to pick up with
/// [`KeyboardAwareScrollView::take_scroll_request`].
#[derive(Debug)]
pub struct KeyboardAwareScrollView {
    config: AwareScrollConfig,
    model: Rc<RefCell<ScrollModel>>,
    subscription: Subscription,
}

impl KeyboardAwareScrollView {
    /// Mount under `provider` with a viewport on a screen `screen_height` tall.
    #[must_use]
    pub fn mount(
        provider: &KeyboardProvider,
        viewport: LayoutRect,
        screen_height: f32,
        config: AwareScrollConfig,
    ) -> Self {
        let model = Rc::new(RefCell::new(ScrollModel {
            viewport,
            screen_height,
            ..ScrollModel::default()
        }));

        let subscription = {
            let model = Rc::clone(&model);
            provider.store().subscribe(move |state| {
                if config.enabled {
                    Self::on_keyboard_state(&model, state, config.bottom_offset);
                }
            })
        };

        Self {
            config,
            model,
            subscription,
        }
    }

    fn on_keyboard_state(model: &RefCell<ScrollModel>, state: &KeyboardState, bottom_offset: f32) {
        let reveals = match state.phase {
            Some(KeyboardPhase::WillShow) => true,
            Some(KeyboardPhase::WillChangeFrame) => state.is_visible,
            _ => false,
        };
        if !reveals {
            return;
        }

        let mut model = model.borrow_mut();
        if let Some(position) = model.reveal_position(state.height, bottom_offset) {
            tracing::debug!(position, "scrolling focused input above keyboard");
            model.pending_scroll = Some(position);
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> AwareScrollConfig {
        self.config
    }

    /// Update the scroll view's on-screen bounds.
    pub fn set_viewport(&self, viewport: LayoutRect) {
        self.model.borrow_mut().viewport = viewport;
    }

    /// Update the screen height, e.g. after rotation.
    pub fn set_screen_height(&self, screen_height: f32) {
        self.model.borrow_mut().screen_height = screen_height;
    }

    /// Report the current scroll position.
    pub fn set_scroll_offset(&self, offset: f32) {
        self.model.borrow_mut().scroll_offset = offset.max(0.0);
    }

    /// Current scroll position.
    #[must_use]
    pub fn scroll_offset(&self) -> f32 {
        self.model.borrow().scroll_offset
    }

    /// An input gained focus; `layout` is in content coordinates.
    pub fn focus_input(&self, layout: LayoutRect) {
        self.model.borrow_mut().focused = Some(layout);
    }

    /// The focused input lost focus.
    pub fn blur(&self) {
        self.model.borrow_mut().focused = None;
    }

    /// Take the queued scroll position, if any.
    pub fn take_scroll_request(&self) -> Option<f32> {
        self.model.borrow_mut().pending_scroll.take()
    }

    /// Stop reacting to the keyboard before the view is dropped.
    pub fn unmount(&self) {
        self.subscription.unsubscribe();
    }
}

impl KeyboardConsumer for KeyboardAwareScrollView {
    type Layout = AwareScrollLayout;

    fn layout(&self, keyboard: &KeyboardFrame) -> AwareScrollLayout {
        let content_inset_bottom = if self.config.enabled && keyboard.height > 0.0 {
            self.model.borrow().overlap(keyboard.height)
                + self.config.extra_keyboard_space * keyboard.progress
        } else {
            0.0
        };
        AwareScrollLayout {
            content_inset_bottom,
        }
    }
}
