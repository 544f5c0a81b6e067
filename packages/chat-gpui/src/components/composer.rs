//! Composer bar
//!
//! Draft input with optional decorations around it and a send control.

use std::rc::Rc;

use chat_core::{ComposerLayout, DraftBuffer, OutboundContent};
use gpui::prelude::*;
use gpui::*;

use crate::i18n::I18n;
use crate::keyboard::{DismissKeyboard, InsertNewline, SendDraft, COMPOSER_CONTEXT};
use crate::slots::SendTrigger;
use crate::theme::refined;
use crate::ChatConfig;

/// Emitted when the user sends the draft
#[derive(Debug, Clone)]
pub enum ComposerEvent {
    Send(OutboundContent),
}

pub struct Composer {
    focus_handle: FocusHandle,
    draft: DraftBuffer,
    placeholder: SharedString,
    config: Rc<ChatConfig>,
}

impl Composer {
    pub fn new(config: Rc<ChatConfig>, cx: &mut Context<Self>) -> Self {
        let options = &config.options;
        let placeholder = match &options.input_placeholder {
            Some(placeholder) => SharedString::from(placeholder.clone()),
            None => I18n::text(cx, "composer.placeholder"),
        };

        Self {
            focus_handle: cx.focus_handle(),
            draft: DraftBuffer::new(&options.default_input_value, options.input_max_length),
            placeholder,
            config,
        }
    }

    pub fn text(&self) -> &str {
        self.draft.text()
    }

    pub fn set_text(&mut self, text: &str, cx: &mut Context<Self>) {
        self.draft.set_text(text);
        cx.notify();
    }

    pub fn focus(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.focus_handle.focus(window);
    }

    pub fn layout(&self) -> ComposerLayout {
        ComposerLayout::compute(&self.config.options, &self.draft)
    }

    fn send(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let outbound = self.draft.take_outbound();
        tracing::debug!("Sending draft of {} bytes", outbound.content.len());
        cx.emit(ComposerEvent::Send(outbound));

        if !self.config.options.keep_keyboard_on_send {
            window.blur();
        }
        cx.notify();
    }

    /// Enter sends only when the send control is shown
    fn send_draft(&mut self, _: &SendDraft, window: &mut Window, cx: &mut Context<Self>) {
        if self.layout().shows_send {
            self.send(window, cx);
        }
    }

    fn insert_newline(&mut self, _: &InsertNewline, _window: &mut Window, cx: &mut Context<Self>) {
        if self.draft.insert_char('\n') {
            cx.notify();
        }
    }

    fn dismiss_keyboard(
        &mut self,
        _: &DismissKeyboard,
        window: &mut Window,
        _cx: &mut Context<Self>,
    ) {
        window.blur();
    }

    fn paste(&mut self, cx: &mut Context<Self>) {
        if let Some(text) = cx.read_from_clipboard().and_then(|item| item.text()) {
            if self.draft.insert(&text) {
                cx.notify();
            }
        }
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        let modifiers = event.keystroke.modifiers;
        let key = event.keystroke.key.as_str();

        let changed = match key {
            // Bound to actions
            "enter" | "escape" => return,
            "backspace" => self.draft.backspace(),
            "delete" => self.draft.delete(),
            "left" => self.draft.move_left(),
            "right" => self.draft.move_right(),
            "home" => {
                self.draft.move_to_start();
                true
            }
            "end" => {
                self.draft.move_to_end();
                true
            }
            "a" if modifiers.control => {
                self.draft.move_to_start();
                true
            }
            "e" if modifiers.control => {
                self.draft.move_to_end();
                true
            }
            "k" if modifiers.control => {
                self.draft.kill_to_end();
                true
            }
            "v" if modifiers.control || modifiers.platform => {
                self.paste(cx);
                return;
            }
            _ if modifiers.control || modifiers.alt || modifiers.platform => false,
            _ => match &event.keystroke.key_char {
                Some(key_char) => self.draft.insert(key_char),
                None if key == "space" => self.draft.insert_char(' '),
                None => false,
            },
        };

        if changed {
            cx.notify();
        }
    }

    fn render_draft(&self, is_focused: bool) -> AnyElement {
        let theme = &self.config.theme;

        let cursor = is_focused.then(|| div().w(px(2.0)).h(px(18.0)).bg(theme.link));

        if self.draft.is_empty() {
            return div()
                .flex()
                .items_center()
                .children(cursor)
                .child(
                    div()
                        .text_color(theme.input_placeholder)
                        .child(self.placeholder.clone()),
                )
                .into_any_element();
        }

        // Lines above and below the cursor line render as plain text
        let (before, after) = self.draft.split_at_cursor();
        let (above, line_start) = match before.rsplit_once('\n') {
            Some((above, line_start)) => (Some(above), line_start),
            None => (None, before),
        };
        let (line_end, below) = match after.split_once('\n') {
            Some((line_end, below)) => (line_end, Some(below)),
            None => (after, None),
        };

        div()
            .flex()
            .flex_col()
            .text_color(theme.text)
            .children(above.map(|text| div().child(text.to_string())))
            .child(
                div()
                    .flex()
                    .items_center()
                    .child(line_start.to_string())
                    .children(cursor)
                    .child(line_end.to_string()),
            )
            .children(below.map(|text| div().child(text.to_string())))
            .into_any_element()
    }

    fn render_send_control(&self, window: &mut Window, cx: &mut Context<Self>) -> AnyElement {
        let config = &self.config;
        let control = config.slots.send_control.render(&config.theme, window, cx);

        let wrapper = refined(
            div().id("send-control").flex_none().cursor_pointer(),
            &config.styles.send_button_container,
        )
        .child(control);

        match config.slots.send_control.trigger() {
            SendTrigger::Click => wrapper
                .on_click(cx.listener(|this, _event: &ClickEvent, window, cx| {
                    this.send(window, cx);
                }))
                .into_any_element(),
            SendTrigger::PointerDown => wrapper
                .on_mouse_down(
                    MouseButton::Left,
                    cx.listener(|this, _event: &MouseDownEvent, window, cx| {
                        this.send(window, cx);
                    }),
                )
                .into_any_element(),
        }
    }
}

impl EventEmitter<ComposerEvent> for Composer {}

impl Focusable for Composer {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for Composer {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let config = self.config.clone();
        let theme = &config.theme;
        let slots = &config.slots;
        let layout = self.layout();
        let is_focused = self.focus_handle.is_focused(window);

        let top = layout
            .shows_top_element
            .then(|| slots.top_element.render(theme, window, cx));
        let left = layout
            .shows_left_element
            .then(|| slots.left_input_element.render(theme, window, cx));
        let right = layout
            .shows_right_element
            .then(|| slots.right_input_element.render(theme, window, cx));
        let send = layout
            .shows_send
            .then(|| self.render_send_control(window, cx));
        let divider = layout
            .shows_divider
            .then(|| div().w_full().h(px(1.0)).bg(theme.divider));

        let input_row = layout.shows_input_row.then(|| {
            div()
                .flex()
                .items_center()
                .gap(px(8.0))
                .px(px(12.0))
                .py(px(8.0))
                .children(left)
                .child(
                    refined(
                        div()
                            .id("composer-input")
                            .key_context(COMPOSER_CONTEXT)
                            .track_focus(&self.focus_handle)
                            .on_action(cx.listener(Self::send_draft))
                            .on_action(cx.listener(Self::insert_newline))
                            .on_action(cx.listener(Self::dismiss_keyboard))
                            .on_key_down(cx.listener(|this, event, _window, cx| {
                                this.handle_key_down(event, cx);
                            }))
                            .flex_1()
                            .min_h(px(36.0))
                            .max_h(px(160.0))
                            .overflow_y_scroll()
                            .px(px(12.0))
                            .py(px(8.0))
                            .cursor_text(),
                        &config.styles.input,
                    )
                    .child(self.render_draft(is_focused)),
                )
                .children(right)
                .children(send)
        });

        refined(
            div().flex().flex_col().w_full().bg(theme.background),
            &config.styles.bottom_container,
        )
        .children(top)
        .children(divider)
        .children(input_row)
    }
}

