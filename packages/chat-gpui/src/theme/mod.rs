//! Chat theme
//!
//! Resolves validated color tokens into GPUI colors and carries the per-region
//! style overrides a host can layer on top of the defaults.

mod colors;

pub use colors::*;

use chat_core::options::Palette;
use chat_core::BubbleRole;
use gpui::*;

// ============================================================================
// Resolved Palette
// ============================================================================

/// Colors used by every chat component
#[derive(Debug, Clone)]
pub struct ChatTheme {
    pub user_bubble: Hsla,
    pub other_user_bubble: Hsla,
    pub background: Hsla,
    pub divider: Hsla,
    pub text: Hsla,
    pub text_muted: Hsla,
    pub link: Hsla,
    pub input_placeholder: Hsla,
    pub badge_text: Hsla,
    pub badge_background: Hsla,
}

impl ChatTheme {
    pub fn from_palette(palette: &Palette) -> Self {
        let date_text = to_hsla(palette.date_text);
        Self {
            user_bubble: to_hsla(palette.user_bubble),
            other_user_bubble: to_hsla(palette.other_user_bubble),
            background: to_hsla(palette.background),
            divider: to_hsla(palette.divider),
            text: to_hsla(palette.text),
            text_muted: date_text,
            link: to_hsla(palette.link),
            input_placeholder: palette.input_placeholder.map(to_hsla).unwrap_or(date_text),
            badge_text: constants::white(),
            badge_background: constants::badge_backdrop(),
        }
    }

    pub fn bubble(&self, role: BubbleRole) -> Hsla {
        match role {
            BubbleRole::User => self.user_bubble,
            BubbleRole::Other => self.other_user_bubble,
        }
    }
}

// ============================================================================
// Region Overrides
// ============================================================================

/// Style overrides per visual region, refined over the built-in styles
#[derive(Clone, Default)]
pub struct ChatStyles {
    pub container: StyleRefinement,
    pub bubble_container: StyleRefinement,
    pub bubble_text: StyleRefinement,
    pub other_user_bubble_text: StyleRefinement,
    pub date_text: StyleRefinement,
    pub other_user_date_text: StyleRefinement,
    pub image: StyleRefinement,
    pub file_container: StyleRefinement,
    pub input: StyleRefinement,
    pub bottom_container: StyleRefinement,
    pub send_button_container: StyleRefinement,
}

impl ChatStyles {
    pub fn bubble_text(&self, role: BubbleRole) -> &StyleRefinement {
        match role {
            BubbleRole::User => &self.bubble_text,
            BubbleRole::Other => &self.other_user_bubble_text,
        }
    }

    pub fn date_text(&self, role: BubbleRole) -> &StyleRefinement {
        match role {
            BubbleRole::User => &self.date_text,
            BubbleRole::Other => &self.other_user_date_text,
        }
    }
}

/// Refine an element's style with a region override
pub fn refined<E: Styled>(mut element: E, overrides: &StyleRefinement) -> E {
    element.style().refine(overrides);
    element
}
