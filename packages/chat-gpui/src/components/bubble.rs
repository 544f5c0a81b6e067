//! Message bubble
//!
//! One row of the chat list: avatar, colored bubble with optional media,
//! body text and a date line.

use std::rc::Rc;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use chat_core::{
    format_message_date, Alignment, AvatarSource, BubbleChange, BubbleLayout, Message,
    PressGesture, PressKind, PressTracker, RenderKey,
};
use gpui::prelude::*;
use gpui::*;

use crate::components::media::MediaPreview;
use crate::components::text::message_text;
use crate::probe::MediaSource;
use crate::theme::refined;
use crate::ChatConfig;

const AVATAR_SIZE: f32 = 34.0;

static EMPTY_AVATAR: LazyLock<Arc<Image>> = LazyLock::new(|| {
    Arc::new(Image::from_bytes(
        ImageFormat::Png,
        include_bytes!("../../assets/empty-avatar.png").to_vec(),
    ))
});

/// Press on a bubble, carrying the message it belongs to
#[derive(Debug, Clone)]
pub enum BubbleEvent {
    Press(Message),
    LongPress(Message),
}

pub struct MessageBubble {
    message: Message,
    render_key: RenderKey,
    layout: BubbleLayout,
    date_label: SharedString,
    config: Rc<ChatConfig>,
    media: Option<Entity<MediaPreview>>,
    press: PressTracker,
    _hold_timer: Option<Task<()>>,
}

impl MessageBubble {
    pub fn new(message: Message, config: Rc<ChatConfig>, cx: &mut Context<Self>) -> Self {
        let media = Self::media_preview(&message, &config, cx);
        let press = PressTracker::new(PressGesture::new(config.options.long_press()));

        Self {
            render_key: message.render_key(),
            layout: BubbleLayout::for_message(&message, &config.options),
            date_label: Self::date_label(&message, &config),
            message,
            config,
            media,
            press,
            _hold_timer: None,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Replace the rendered message. Returns false, and leaves the bubble
    /// untouched, when nothing that affects rendering changed.
    pub fn update_message(&mut self, message: Message, cx: &mut Context<Self>) -> bool {
        let render_key = message.render_key();
        match BubbleChange::between(&self.render_key, &render_key) {
            BubbleChange::Keep => return false,
            BubbleChange::Refresh => {
                if let Some(media) = &self.media {
                    let message = message.clone();
                    media.update(cx, |media, cx| media.set_message(message, cx));
                }
            }
            BubbleChange::ReplaceMedia | BubbleChange::Insert => {
                // Dropping the old preview cancels its probes
                self.media = Self::media_preview(&message, &self.config, cx);
            }
        }

        self.layout = BubbleLayout::for_message(&message, &self.config.options);
        self.date_label = Self::date_label(&message, &self.config);
        self.render_key = render_key;
        self.message = message;
        cx.notify();
        true
    }

    fn media_preview(
        message: &Message,
        config: &Rc<ChatConfig>,
        cx: &mut Context<Self>,
    ) -> Option<Entity<MediaPreview>> {
        message.media.as_ref()?;
        let message = message.clone();
        let config = config.clone();
        Some(cx.new(|cx| MediaPreview::new(message, config, cx)))
    }

    fn date_label(message: &Message, config: &ChatConfig) -> SharedString {
        format_message_date(message.date, config.options.date_pattern()).into()
    }

    fn start_press(&mut self, cx: &mut Context<Self>) {
        self.press.press(Instant::now());

        let threshold = self.press.threshold();
        self._hold_timer = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(threshold).await;
            let _ = this.update(cx, |this, cx| {
                if let Some(kind) = this.press.hold_elapsed(Instant::now()) {
                    this.emit_press(kind, cx);
                }
            });
        }));
    }

    fn finish_press(&mut self, cx: &mut Context<Self>) {
        self._hold_timer = None;
        if let Some(kind) = self.press.release(Instant::now()) {
            self.emit_press(kind, cx);
        }
    }

    fn emit_press(&self, kind: PressKind, cx: &mut Context<Self>) {
        let event = match kind {
            PressKind::Press => BubbleEvent::Press(self.message.clone()),
            PressKind::LongPress => BubbleEvent::LongPress(self.message.clone()),
        };
        cx.emit(event);
    }

    fn render_avatar(&self) -> impl IntoElement {
        let source: ImageSource = match &self.layout.avatar {
            AvatarSource::Uri(uri) => match MediaSource::from_uri(uri) {
                MediaSource::Remote(url) => SharedString::from(url).into(),
                MediaSource::Local(path) => path.into(),
            },
            AvatarSource::Placeholder => EMPTY_AVATAR.clone().into(),
        };

        img(source)
            .flex_none()
            .size(px(AVATAR_SIZE))
            .rounded_full()
            .object_fit(ObjectFit::Cover)
    }

    fn render_date_row(&self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let config = &self.config;
        let mark = self
            .layout
            .delivery_mark
            .map(|mark| config.slots.delivery_marks.render(mark, &config.theme, window, cx));

        div()
            .flex()
            .items_center()
            .justify_end()
            .gap(px(4.0))
            .when(self.layout.shows_date, |row| {
                row.child(refined(
                    div()
                        .text_xs()
                        .text_color(config.theme.text_muted)
                        .child(self.date_label.clone()),
                    config.styles.date_text(self.layout.role),
                ))
            })
            .children(mark)
    }
}

impl EventEmitter<BubbleEvent> for MessageBubble {}

impl Render for MessageBubble {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let config = self.config.clone();
        let theme = &config.theme;
        let layout = &self.layout;
        let id = self.message.id.0;

        let body = (!self.message.content.is_empty()).then(|| {
            refined(div().text_color(theme.text), config.styles.bubble_text(layout.role)).child(
                message_text(
                    ("message-text", id),
                    &self.message.content,
                    theme,
                    config.slots.link_handler.clone(),
                ),
            )
        });

        let date_row = layout
            .shows_date_row
            .then(|| self.render_date_row(window, cx));

        let bubble = refined(
            div()
                .id(("message-bubble", id))
                .flex()
                .flex_col()
                .gap(px(4.0))
                .max_w(rems(28.0))
                .ml(px(layout.leading_margin))
                .px(px(12.0))
                .py(px(8.0))
                .rounded(px(12.0))
                .bg(theme.bubble(layout.role))
                .cursor_pointer(),
            &config.styles.bubble_container,
        )
        .when(layout.press_opacity, |el| el.active(|style| style.opacity(0.85)))
        .on_mouse_down(
            MouseButton::Left,
            cx.listener(|this, _event: &MouseDownEvent, _window, cx| {
                this.start_press(cx);
            }),
        )
        .on_mouse_up(
            MouseButton::Left,
            cx.listener(|this, _event: &MouseUpEvent, _window, cx| {
                this.finish_press(cx);
            }),
        )
        .on_mouse_down(
            MouseButton::Right,
            cx.listener(|this, _event: &MouseDownEvent, _window, cx| {
                this.press.cancel();
                this._hold_timer = None;
                this.emit_press(PressKind::LongPress, cx);
            }),
        )
        .children(self.media.clone())
        .children(body)
        .children(date_row);

        let avatar = layout.shows_avatar.then(|| self.render_avatar());

        let row = div().w_full().flex().items_end().gap(px(6.0));
        match layout.alignment {
            Alignment::Start => row.justify_start().children(avatar).child(bubble),
            Alignment::End => row.justify_end().child(bubble).children(avatar),
        }
    }
}
