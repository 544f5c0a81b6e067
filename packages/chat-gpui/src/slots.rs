//! Render slots
//!
//! Every customizable region of the widget is an injected strategy with a
//! default implementation. Components always call the slot; they never
//! branch on whether a host supplied one.

use std::rc::Rc;

use chat_core::{link_target, Badge, DeliveryMark, FileMetadata, Message, SpanKind};
use gpui::prelude::*;
use gpui::*;

use crate::i18n::I18n;
use crate::theme::{with_alpha, ChatTheme};

/// Static decoration around the composer (top, left and right elements)
pub trait Decoration: 'static {
    fn render(&self, theme: &ChatTheme, window: &mut Window, cx: &mut App) -> AnyElement;
}

impl<F> Decoration for F
where
    F: Fn(&ChatTheme, &mut Window, &mut App) -> AnyElement + 'static,
{
    fn render(&self, theme: &ChatTheme, window: &mut Window, cx: &mut App) -> AnyElement {
        self(theme, window, cx)
    }
}

/// Renders nothing
pub struct EmptyDecoration;

impl Decoration for EmptyDecoration {
    fn render(&self, _theme: &ChatTheme, _window: &mut Window, _cx: &mut App) -> AnyElement {
        Empty.into_any_element()
    }
}

/// Pointer phase on which the send control fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTrigger {
    /// Fires as soon as the pointer goes down anywhere on the control
    PointerDown,
    /// Fires on a completed click
    Click,
}

/// Visuals of the send control. The composer wires the send action around it.
pub trait SendControl: 'static {
    fn render(&self, theme: &ChatTheme, window: &mut Window, cx: &mut App) -> AnyElement;

    fn trigger(&self) -> SendTrigger {
        SendTrigger::PointerDown
    }
}

/// Text button labelled "Send"
pub struct DefaultSendButton;

impl SendControl for DefaultSendButton {
    fn render(&self, theme: &ChatTheme, _window: &mut Window, cx: &mut App) -> AnyElement {
        let hover_bg = with_alpha(theme.link, 0.1);

        div()
            .px(px(10.0))
            .py(px(6.0))
            .rounded(px(6.0))
            .text_color(theme.link)
            .font_weight(FontWeight::MEDIUM)
            .cursor_pointer()
            .hover(move |style| style.bg(hover_bg))
            .child(I18n::text(cx, "composer.send"))
            .into_any_element()
    }

    fn trigger(&self) -> SendTrigger {
        SendTrigger::Click
    }
}

/// Overlay badge on video and gif previews
pub trait MediaBadge: 'static {
    fn render(&self, badge: Badge, theme: &ChatTheme, window: &mut Window, cx: &mut App)
        -> AnyElement;
}

pub struct DefaultMediaBadge;

impl MediaBadge for DefaultMediaBadge {
    fn render(
        &self,
        badge: Badge,
        theme: &ChatTheme,
        _window: &mut Window,
        cx: &mut App,
    ) -> AnyElement {
        let key = match badge {
            Badge::Video => "badge.video",
            Badge::Gif => "badge.gif",
        };

        div()
            .px(px(5.0))
            .rounded(px(5.0))
            .bg(theme.badge_background)
            .text_color(theme.badge_text)
            .text_xs()
            .child(I18n::text(cx, key))
            .into_any_element()
    }
}

/// Preview for attachments classified as files
pub trait FilePreview: 'static {
    fn render(
        &self,
        message: &Message,
        metadata: Option<&FileMetadata>,
        theme: &ChatTheme,
        window: &mut Window,
        cx: &mut App,
    ) -> AnyElement;
}

/// Shows the file name and the probed size
pub struct DefaultFilePreview;

impl FilePreview for DefaultFilePreview {
    fn render(
        &self,
        message: &Message,
        metadata: Option<&FileMetadata>,
        theme: &ChatTheme,
        _window: &mut Window,
        _cx: &mut App,
    ) -> AnyElement {
        let name = message
            .media
            .as_ref()
            .and_then(|media| media.uri.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("file")
            .to_string();

        div()
            .flex()
            .flex_col()
            .child(div().text_color(theme.text).child(name))
            .children(metadata.and_then(FileMetadata::size_label).map(|size| {
                div().text_xs().text_color(theme.text_muted).child(size)
            }))
            .into_any_element()
    }
}

/// Sent/seen mark next to the date of the user's own messages
pub trait DeliveryMarks: 'static {
    fn render(&self, mark: DeliveryMark, theme: &ChatTheme, window: &mut Window, cx: &mut App)
        -> AnyElement;
}

/// Renders no marks
pub struct NoDeliveryMarks;

impl DeliveryMarks for NoDeliveryMarks {
    fn render(
        &self,
        _mark: DeliveryMark,
        _theme: &ChatTheme,
        _window: &mut Window,
        _cx: &mut App,
    ) -> AnyElement {
        Empty.into_any_element()
    }
}

/// Plain text marks, e.g. a single and a double check
pub struct TextMarks {
    pub sent: SharedString,
    pub seen: SharedString,
}

impl DeliveryMarks for TextMarks {
    fn render(
        &self,
        mark: DeliveryMark,
        theme: &ChatTheme,
        _window: &mut Window,
        _cx: &mut App,
    ) -> AnyElement {
        let (text, color) = match mark {
            DeliveryMark::Sent => (self.sent.clone(), theme.text_muted),
            DeliveryMark::Seen => (self.seen.clone(), theme.link),
        };
        div().text_xs().text_color(color).child(text).into_any_element()
    }
}

/// Handles presses on URL, phone and email spans
pub trait LinkHandler: 'static {
    fn open(&self, kind: SpanKind, text: &str, window: &mut Window, cx: &mut App);
}

/// Opens links through the platform: URLs as-is, phones as `tel:`, emails as `mailto:`
pub struct PlatformLinkHandler;

impl LinkHandler for PlatformLinkHandler {
    fn open(&self, kind: SpanKind, text: &str, _window: &mut Window, cx: &mut App) {
        if let Some(target) = link_target(kind, text) {
            tracing::debug!("Opening {:?} link: {}", kind, target);
            cx.open_url(&target);
        }
    }
}

/// All render slots of one chat widget
#[derive(Clone)]
pub struct ChatSlots {
    pub top_element: Rc<dyn Decoration>,
    pub left_input_element: Rc<dyn Decoration>,
    pub right_input_element: Rc<dyn Decoration>,
    pub send_control: Rc<dyn SendControl>,
    pub media_badge: Rc<dyn MediaBadge>,
    pub file_preview: Rc<dyn FilePreview>,
    pub delivery_marks: Rc<dyn DeliveryMarks>,
    pub link_handler: Rc<dyn LinkHandler>,
}

impl Default for ChatSlots {
    fn default() -> Self {
        Self {
            top_element: Rc::new(EmptyDecoration),
            left_input_element: Rc::new(EmptyDecoration),
            right_input_element: Rc::new(EmptyDecoration),
            send_control: Rc::new(DefaultSendButton),
            media_badge: Rc::new(DefaultMediaBadge),
            file_preview: Rc::new(DefaultFilePreview),
            delivery_marks: Rc::new(NoDeliveryMarks),
            link_handler: Rc::new(PlatformLinkHandler),
        }
    }
}

impl ChatSlots {
    pub fn with_top_element(mut self, slot: impl Decoration) -> Self {
        self.top_element = Rc::new(slot);
        self
    }

    pub fn with_left_input_element(mut self, slot: impl Decoration) -> Self {
        self.left_input_element = Rc::new(slot);
        self
    }

    pub fn with_right_input_element(mut self, slot: impl Decoration) -> Self {
        self.right_input_element = Rc::new(slot);
        self
    }

    pub fn with_send_control(mut self, slot: impl SendControl) -> Self {
        self.send_control = Rc::new(slot);
        self
    }

    pub fn with_media_badge(mut self, slot: impl MediaBadge) -> Self {
        self.media_badge = Rc::new(slot);
        self
    }

    pub fn with_file_preview(mut self, slot: impl FilePreview) -> Self {
        self.file_preview = Rc::new(slot);
        self
    }

    pub fn with_delivery_marks(mut self, slot: impl DeliveryMarks) -> Self {
        self.delivery_marks = Rc::new(slot);
        self
    }

    pub fn with_link_handler(mut self, slot: impl LinkHandler) -> Self {
        self.link_handler = Rc::new(slot);
        self
    }
}
