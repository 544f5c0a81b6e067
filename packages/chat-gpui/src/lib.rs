//! Customizable chat widget for GPUI
//!
//! A host creates a [`ChatView`] from a newest-first message list and a
//! [`ChatConfig`], subscribes to [`ChatEvent`]s, and pushes fresh message
//! snapshots with [`ChatView::set_messages`]. Every visual region can be
//! restyled through [`ChatStyles`] or replaced through [`ChatSlots`].

pub mod components;
pub mod i18n;
pub mod keyboard;
pub mod probe;
pub mod slots;
pub mod theme;
pub mod views;

use std::rc::Rc;

use chat_core::{ChatOptions, ConfigError, ValidatedOptions};
use gpui::App;

pub use components::bubble::{BubbleEvent, MessageBubble};
pub use components::composer::{Composer, ComposerEvent};
pub use components::media::MediaPreview;
pub use slots::ChatSlots;
pub use theme::{ChatStyles, ChatTheme};
pub use views::chat::{ChatEvent, ChatView};

/// Validated options plus everything derived from them. Built once and
/// shared read-only by every component of one chat.
pub struct ChatConfig {
    pub options: ValidatedOptions,
    pub theme: ChatTheme,
    pub styles: ChatStyles,
    pub slots: ChatSlots,
}

impl ChatConfig {
    pub fn new(options: ChatOptions) -> Result<Self, ConfigError> {
        let options = options.validate()?;
        let theme = ChatTheme::from_palette(options.palette());

        Ok(Self {
            options,
            theme,
            styles: ChatStyles::default(),
            slots: ChatSlots::default(),
        })
    }

    pub fn with_styles(mut self, styles: ChatStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_slots(mut self, slots: ChatSlots) -> Self {
        self.slots = slots;
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

/// Install the globals the widget relies on: strings, key bindings and the
/// media probe runtime. Safe to call more than once.
pub fn init(cx: &mut App) {
    i18n::init(cx);
    keyboard::init(cx);
    probe::init(cx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::BubbleRole;

    #[test]
    fn test_config_from_defaults() {
        let config = ChatConfig::new(ChatOptions::default()).unwrap();
        assert_eq!(config.options.input_max_length, 5000);
        assert_ne!(
            config.theme.bubble(BubbleRole::User),
            config.theme.bubble(BubbleRole::Other)
        );
    }

    #[test]
    fn test_config_rejects_invalid_options() {
        let options = ChatOptions {
            user_bubble_color: "not-a-color".into(),
            ..Default::default()
        };
        assert!(matches!(
            ChatConfig::new(options),
            Err(ConfigError::InvalidColor { field: "user_bubble_color", .. })
        ));

        let options = ChatOptions {
            input_max_length: 0,
            ..Default::default()
        };
        assert!(ChatConfig::new(options).is_err());
    }
}
