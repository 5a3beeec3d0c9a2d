//! Prev/next/done toolbar docked above the keyboard.

use serde::{Deserialize, Serialize};

use crate::{KeyboardConsumer, KeyboardFrame, KeyboardStickyView, StickyOffset};

/// Colors for one color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarColors {
    /// Enabled button color.
    pub primary: String,
    /// Disabled arrow color.
    pub disabled: String,
    /// Toolbar background.
    pub background: String,
    /// Press feedback color.
    pub ripple: String,
}

/// Light and dark colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardToolbarTheme {
    /// Light scheme.
    pub light: ToolbarColors,
    /// Dark scheme.
    pub dark: ToolbarColors,
}

impl Default for KeyboardToolbarTheme {
    fn default() -> Self {
        default_keyboard_toolbar_theme()
    }
}

impl KeyboardToolbarTheme {
    /// Colors for `scheme`.
    #[must_use]
    pub fn colors(&self, scheme: ColorScheme) -> &ToolbarColors {
        match scheme {
            ColorScheme::Light => &self.light,
            ColorScheme::Dark => &self.dark,
        }
    }
}

/// The stock toolbar theme.
#[must_use]
pub fn default_keyboard_toolbar_theme() -> KeyboardToolbarTheme {
    KeyboardToolbarTheme {
        light: ToolbarColors {
            primary: "#007AFF".to_string(),
            disabled: "#B0BEC5".to_string(),
            background: "#F8F8F8".to_string(),
            ripple: "#BCBCBCBC".to_string(),
        },
        dark: ToolbarColors {
            primary: "#FAFAFA".to_string(),
            disabled: "#707070".to_string(),
            background: "#2C2C2E".to_string(),
            ripple: "#F8F8F888".to_string(),
        },
    }
}

/// System color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

/// Toolbar props, deserializable from the host's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyboardToolbarProps {
    /// Overrides the theme background.
    pub background_color: Option<String>,
    /// Text of the done button.
    pub done_button_label: String,
    /// Whether the prev/next arrows are shown.
    pub show_arrows: bool,
    /// Colors.
    pub theme: KeyboardToolbarTheme,
    /// Sticky offsets.
    pub offset: StickyOffset,
    /// Toolbar opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for KeyboardToolbarProps {
    fn default() -> Self {
        Self {
            background_color: None,
            done_button_label: "Done".to_string(),
            show_arrows: true,
            theme: KeyboardToolbarTheme::default(),
            offset: StickyOffset::default(),
            opacity: 1.0,
        }
    }
}

impl KeyboardToolbarProps {
    /// Parse props from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid props object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut props: Self = serde_json::from_str(json)?;
        props.opacity = props.opacity.clamp(0.0, 1.0);
        Ok(props)
    }
}

/// A toolbar button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarAction {
    /// Focus the previous input.
    Previous,
    /// Focus the next input.
    Next,
    /// Dismiss the keyboard.
    Done,
}

/// One rendered button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    /// Text label; arrows have none.
    pub label: Option<String>,
    /// Whether presses are accepted.
    pub enabled: bool,
    /// Resolved color.
    pub color: String,
}

/// Layout of the whole toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarLayout {
    /// Vertical translation from the sticky behavior.
    pub translate_y: f32,
    /// Whether the toolbar should be drawn.
    pub visible: bool,
    /// Resolved background color.
    pub background_color: String,
    /// Opacity.
    pub opacity: f32,
    /// Previous arrow, when arrows are shown.
    pub previous: Option<ToolbarButton>,
    /// Next arrow, when arrows are shown.
    pub next: Option<ToolbarButton>,
    /// Done button.
    pub done: ToolbarButton,
}

/// Toolbar docked on the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardToolbar {
    props: KeyboardToolbarProps,
    scheme: ColorScheme,
    sticky: KeyboardStickyView,
    can_go_previous: bool,
    can_go_next: bool,
}

impl KeyboardToolbar {
    /// Create a toolbar from props.
    #[must_use]
    pub fn new(props: KeyboardToolbarProps) -> Self {
        let sticky = KeyboardStickyView::new(props.offset);
        Self {
            props,
            scheme: ColorScheme::default(),
            sticky,
            can_go_previous: false,
            can_go_next: false,
        }
    }

    /// Use `scheme` for colors.
    #[must_use]
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Props in use.
    #[must_use]
    pub fn props(&self) -> &KeyboardToolbarProps {
        &self.props
    }

    /// Whether there are inputs before and after the focused one.
    pub fn set_navigation(&mut self, can_go_previous: bool, can_go_next: bool) {
        self.can_go_previous = can_go_previous;
        self.can_go_next = can_go_next;
    }

    /// Resolve a press; `None` for hidden or disabled arrows.
    #[must_use]
    pub fn press(&self, action: ToolbarAction) -> Option<ToolbarAction> {
        let accepted = match action {
            ToolbarAction::Previous => self.props.show_arrows && self.can_go_previous,
            ToolbarAction::Next => self.props.show_arrows && self.can_go_next,
            ToolbarAction::Done => true,
        };
        if accepted {
            tracing::debug!(?action, "toolbar press");
        }
        accepted.then_some(action)
    }
}

fn arrow(colors: &ToolbarColors, enabled: bool) -> ToolbarButton {
    let color = if enabled {
        &colors.primary
    } else {
        &colors.disabled
    };
    ToolbarButton {
        label: None,
        enabled,
        color: color.clone(),
    }
}

impl KeyboardConsumer for KeyboardToolbar {
    type Layout = ToolbarLayout;

    fn layout(&self, keyboard: &KeyboardFrame) -> ToolbarLayout {
        let colors = self.props.theme.colors(self.scheme);
        let (previous, next) = if self.props.show_arrows {
            (
                Some(arrow(colors, self.can_go_previous)),
                Some(arrow(colors, self.can_go_next)),
            )
        } else {
            (None, None)
        };

        ToolbarLayout {
            translate_y: self.sticky.layout(keyboard).translate_y,
            visible: keyboard.height > 0.0,
            background_color: self
                .props
                .background_color
                .clone()
                .unwrap_or_else(|| colors.background.clone()),
            opacity: self.props.opacity,
            previous,
            next,
            done: ToolbarButton {
                label: Some(self.props.done_button_label.clone()),
                enabled: true,
                color: colors.primary.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_defaults_from_empty_json() {
        let props = KeyboardToolbarProps::from_json("{}").expect("parse");
        assert_eq!(props, KeyboardToolbarProps::default());
        assert_eq!(props.done_button_label, "Done");
        assert!(props.show_arrows);
    }

    #[test]
    fn test_props_camel_case_and_opacity_clamp() {
        let props = KeyboardToolbarProps::from_json(
            r##"{"doneButtonLabel":"OK","showArrows":false,"backgroundColor":"#000","opacity":3.0}"##,
        )
        .expect("parse");
        assert_eq!(props.done_button_label, "OK");
        assert!(!props.show_arrows);
        assert_eq!(props.background_color.as_deref(), Some("#000"));
        assert!((props.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_disabled_arrows_reject_presses() {
        let mut toolbar = KeyboardToolbar::new(KeyboardToolbarProps::default());
        assert_eq!(toolbar.press(ToolbarAction::Next), None);
        assert_eq!(toolbar.press(ToolbarAction::Done), Some(ToolbarAction::Done));

        toolbar.set_navigation(false, true);
        assert_eq!(toolbar.press(ToolbarAction::Next), Some(ToolbarAction::Next));
        assert_eq!(toolbar.press(ToolbarAction::Previous), None);
    }

    #[test]
    fn test_theme_colors_by_scheme() {
        let theme = default_keyboard_toolbar_theme();
        assert_eq!(theme.colors(ColorScheme::Light).primary, "#007AFF");
        assert_eq!(theme.colors(ColorScheme::Dark).background, "#2C2C2E");
    }
}
