//! Customizable Chat demo
//!
//! Opens a window with a small conversation styled in dark tones. Options
//! come from the user's `chat.toml` when present.

use std::rc::Rc;

use anyhow::Result;
use chrono::Utc;
use chat_core::{ChatOptions, MediaAttachment, Message, MessageId};
use customizable_chat::slots::{ChatSlots, SendControl, SendTrigger, TextMarks};
use customizable_chat::theme::ChatTheme;
use customizable_chat::{ChatConfig, ChatEvent, ChatStyles, ChatView};
use gpui::prelude::*;
use gpui::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_GIF: &str = "https://static-cse.canva.com/blob/1173517/giphy3.gif";

/// Newest first, as the chat view expects
fn demo_messages() -> Vec<Message> {
    let now = Utc::now();
    let mut messages = vec![
        Message::new(MessageId(0), "Hey ! how are you ?", false).with_date(now),
        Message::from_user(
            MessageId(1),
            "Fine, i'm working on my customizable chat package #rust",
        )
        .with_date(now)
        .with_seen(true),
        Message::new(
            MessageId(2),
            "Nice, I hope it will be useful. Docs at https://github.com or hello@example.com",
            false,
        )
        .with_date(now),
        Message::from_user(MessageId(3), "emhh.. Imagine if it's never used")
            .with_date(now)
            .with_media(MediaAttachment::new(DEMO_GIF, "image/gif")),
    ];
    messages.reverse();
    messages
}

/// Round accent button, fires as soon as it is pressed
struct RoundSendButton {
    color: Hsla,
}

impl SendControl for RoundSendButton {
    fn render(&self, theme: &ChatTheme, _window: &mut Window, _cx: &mut App) -> AnyElement {
        div()
            .size(px(32.0))
            .rounded_full()
            .bg(self.color)
            .flex()
            .items_center()
            .justify_center()
            .text_color(theme.background)
            .child("➤")
            .into_any_element()
    }

    fn trigger(&self) -> SendTrigger {
        SendTrigger::PointerDown
    }
}

/// The user's options file when there is one, the dark demo look otherwise
fn demo_options() -> Result<ChatOptions> {
    let path = ChatOptions::default_path();
    if path.exists() {
        tracing::info!("Loading options from {}", path.display());
        return Ok(ChatOptions::load(&path)?);
    }

    Ok(ChatOptions {
        no_divider: true,
        keep_keyboard_on_send: true,
        hide_bubble_date: true,
        background_color: "#17120E".into(),
        user_bubble_color: "#562800".into(),
        other_user_bubble_color: "#331E0B".into(),
        text_color: "#FFE0C2".into(),
        input_placeholder_color: Some("#FFE0C2".into()),
        ..Default::default()
    })
}

fn demo_styles() -> ChatStyles {
    ChatStyles {
        input: StyleRefinement::default()
            .rounded(px(20.0))
            .border_1()
            .border_color(rgb(0x66350C)),
        bottom_container: StyleRefinement::default().mt(px(10.0)),
        ..Default::default()
    }
}

struct DemoRoot {
    chat: Entity<ChatView>,
    next_id: u64,
    _subscription: Subscription,
}

impl DemoRoot {
    fn new(config: Rc<ChatConfig>, cx: &mut Context<Self>) -> Self {
        let messages = demo_messages();
        let next_id = messages.iter().map(|m| m.id.0 + 1).max().unwrap_or(0);
        let chat = cx.new(|cx| ChatView::new(messages, config, cx));

        let subscription = cx.subscribe(&chat, |this, chat, event: &ChatEvent, cx| match event {
            ChatEvent::Send(outbound) => {
                let message = Message::from_user(MessageId(this.next_id), outbound.content.clone());
                this.next_id += 1;
                chat.update(cx, |chat, cx| {
                    let mut messages = chat.messages().to_vec();
                    messages.insert(0, message);
                    chat.set_messages(messages, cx);
                });
            }
            ChatEvent::MessagePress(message) => {
                tracing::info!("Pressed message {}", message.id);
            }
            ChatEvent::MessageLongPress(message) => {
                tracing::info!("Long-pressed message {}", message.id);
            }
        });

        Self {
            chat,
            next_id,
            _subscription: subscription,
        }
    }
}

impl Render for DemoRoot {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div().size_full().child(self.chat.clone())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Customizable Chat demo");

    let slots = ChatSlots::default()
        .with_send_control(RoundSendButton {
            color: rgb(0xF76B15).into(),
        })
        .with_delivery_marks(TextMarks {
            sent: "✓".into(),
            seen: "✓✓".into(),
        });

    let config = ChatConfig::new(demo_options()?)?
        .with_styles(demo_styles())
        .with_slots(slots)
        .shared();

    Application::new().run(move |cx: &mut App| {
        customizable_chat::init(cx);

        let title = customizable_chat::i18n::I18n::text(cx, "demo.title");
        let opened = cx.open_window(
            WindowOptions {
                titlebar: Some(TitlebarOptions {
                    title: Some(title),
                    ..Default::default()
                }),
                window_bounds: Some(WindowBounds::Windowed(Bounds {
                    origin: point(px(100.0), px(100.0)),
                    size: size(px(420.0), px(720.0)),
                })),
                ..Default::default()
            },
            |_window, cx| cx.new(|cx| DemoRoot::new(config, cx)),
        );

        match opened {
            Ok(_) => tracing::info!("Demo window opened"),
            Err(e) => {
                tracing::error!("Failed to open window: {}", e);
                cx.quit();
            }
        }
    });

    Ok(())
}
