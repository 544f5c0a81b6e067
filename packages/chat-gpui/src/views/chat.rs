//! Chat view
//!
//! Inverted message list over the composer bar.

use std::collections::HashMap;
use std::rc::Rc;

use chat_core::{
    duplicate_ids, plan_list, BubbleChange, Message, MessageId, OutboundContent, RenderKey,
};
use gpui::prelude::*;
use gpui::*;

use crate::components::bubble::{BubbleEvent, MessageBubble};
use crate::components::composer::{Composer, ComposerEvent};
use crate::theme::refined;
use crate::ChatConfig;

/// Events a host subscribes to
#[derive(Debug, Clone)]
pub enum ChatEvent {
    Send(OutboundContent),
    MessagePress(Message),
    MessageLongPress(Message),
}

struct BubbleSlot {
    bubble: Entity<MessageBubble>,
    render_key: RenderKey,
    _subscription: Subscription,
}

/// Chat view
pub struct ChatView {
    config: Rc<ChatConfig>,
    messages: Vec<Message>,
    /// Message ids top to bottom
    order: Vec<MessageId>,
    bubbles: HashMap<MessageId, BubbleSlot>,
    list_state: ListState,
    composer: Entity<Composer>,
    keyboard_inset: Pixels,
}

impl ChatView {
    /// `messages` is newest first: the first message renders at the bottom.
    pub fn new(messages: Vec<Message>, config: Rc<ChatConfig>, cx: &mut Context<Self>) -> Self {
        let composer = {
            let config = config.clone();
            cx.new(|cx| Composer::new(config, cx))
        };

        cx.subscribe(&composer, |_this, _composer, event: &ComposerEvent, cx| match event {
            ComposerEvent::Send(content) => cx.emit(ChatEvent::Send(content.clone())),
        })
        .detach();

        let mut view = Self {
            config,
            messages: Vec::new(),
            order: Vec::new(),
            bubbles: HashMap::new(),
            list_state: ListState::new(0, ListAlignment::Bottom, px(200.0)),
            composer,
            keyboard_inset: px(0.0),
        };
        view.set_messages(messages, cx);
        view
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn composer(&self) -> &Entity<Composer> {
        &self.composer
    }

    pub fn config(&self) -> &Rc<ChatConfig> {
        &self.config
    }

    /// Replace the message snapshot.
    ///
    /// Bubbles are reconciled by id: unchanged messages keep their bubble
    /// (and any finished media probe), changed ones are updated in place,
    /// missing ones are dropped. Repeated ids keep their first occurrence.
    pub fn set_messages(&mut self, messages: Vec<Message>, cx: &mut Context<Self>) {
        for id in duplicate_ids(&messages) {
            tracing::warn!("Duplicate message id {}, rendering its first occurrence only", id);
        }

        let existing: HashMap<MessageId, RenderKey> = self
            .bubbles
            .iter()
            .map(|(id, slot)| (*id, slot.render_key.clone()))
            .collect();
        let plan = plan_list(&messages, &existing);

        let mut bubbles = HashMap::with_capacity(plan.rows.len());
        let mut changed = Vec::new();

        for (message, change) in &plan.rows {
            let slot = match (*change, self.bubbles.remove(&message.id)) {
                (BubbleChange::Keep, Some(slot)) => slot,
                (BubbleChange::Refresh | BubbleChange::ReplaceMedia, Some(mut slot)) => {
                    slot.bubble
                        .update(cx, |bubble, cx| bubble.update_message((*message).clone(), cx));
                    slot.render_key = message.render_key();
                    changed.push(message.id);
                    slot
                }
                _ => self.new_bubble((*message).clone(), cx),
            };
            bubbles.insert(message.id, slot);
        }

        let order = plan.order();
        if order == self.order {
            for id in changed {
                if let Some(ix) = order.iter().position(|candidate| *candidate == id) {
                    self.list_state.splice(ix..ix + 1, 1);
                }
            }
        } else {
            self.list_state.reset(order.len());
        }

        tracing::trace!(
            "Chat holds {} messages, dropped {} bubbles",
            order.len(),
            plan.removed.len()
        );
        self.bubbles = bubbles;
        self.order = order;
        self.messages = messages;
        cx.notify();
    }

    /// Height of the on-screen keyboard reported by the host platform
    pub fn set_keyboard_inset(&mut self, inset: Pixels, cx: &mut Context<Self>) {
        if self.keyboard_inset != inset {
            self.keyboard_inset = inset;
            cx.notify();
        }
    }

    fn new_bubble(&self, message: Message, cx: &mut Context<Self>) -> BubbleSlot {
        let config = self.config.clone();
        let message_key = message.render_key();
        let bubble = cx.new(|cx| MessageBubble::new(message, config, cx));

        let subscription = cx.subscribe(&bubble, |_this, _bubble, event: &BubbleEvent, cx| {
            let event = match event {
                BubbleEvent::Press(message) => ChatEvent::MessagePress(message.clone()),
                BubbleEvent::LongPress(message) => ChatEvent::MessageLongPress(message.clone()),
            };
            cx.emit(event);
        });

        BubbleSlot {
            bubble,
            render_key: message_key,
            _subscription: subscription,
        }
    }

    fn render_item(&self, ix: usize) -> AnyElement {
        match self.order.get(ix).and_then(|id| self.bubbles.get(id)) {
            Some(slot) => div()
                .px(px(10.0))
                .py(px(4.0))
                .child(slot.bubble.clone())
                .into_any_element(),
            None => Empty.into_any_element(),
        }
    }
}

impl EventEmitter<ChatEvent> for ChatView {}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let config = self.config.clone();
        let avoid_keyboard = config.options.keyboard_avoidance.is_enabled();

        refined(
            div()
                .size_full()
                .flex()
                .flex_col()
                .bg(config.theme.background),
            &config.styles.container,
        )
        .child(
            list(
                self.list_state.clone(),
                cx.processor(|this, ix, _window, _cx| this.render_item(ix)),
            )
            .flex_1()
            .w_full(),
        )
        .child(self.composer.clone())
        .when(avoid_keyboard, |el| el.pb(self.keyboard_inset))
    }
}
