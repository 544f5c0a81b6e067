//! Media preview inside a message bubble

use std::rc::Rc;
use std::time::Duration;

use chat_core::{MediaKind, MediaState, Message};
use gpui::prelude::*;
use gpui::*;

use crate::probe::{MediaSource, ProbeState};
use crate::theme::refined;
use crate::ChatConfig;

/// Width of image, gif and video previews
pub const MEDIA_WIDTH: f32 = 240.0;

const FADE_IN: Duration = Duration::from_millis(500);

/// Preview of a message's attachment.
///
/// Renders nothing until the probes settle. The running probe is owned by
/// the entity and cancelled when the entity is dropped.
pub struct MediaPreview {
    message: Message,
    state: MediaState,
    config: Rc<ChatConfig>,
    _probe: Option<Task<()>>,
}

impl MediaPreview {
    pub fn new(message: Message, config: Rc<ChatConfig>, cx: &mut Context<Self>) -> Self {
        let mut preview = Self {
            message,
            state: MediaState::Pending,
            config,
            _probe: None,
        };
        preview.start_probe(cx);
        preview
    }

    pub fn state(&self) -> &MediaState {
        &self.state
    }

    /// Swap in an edited message with the same attachment. The resolved
    /// state is kept and nothing is fetched again.
    pub fn set_message(&mut self, message: Message, cx: &mut Context<Self>) {
        self.message = message;
        cx.notify();
    }

    fn start_probe(&mut self, cx: &mut Context<Self>) {
        let debug = self.config.options.debug;

        let Some(attachment) = self.message.media.clone() else {
            self.state = MediaState::Unresolved;
            return;
        };

        let Some(probes) = cx.try_global::<ProbeState>() else {
            if debug {
                tracing::warn!("No media probe runtime, skipping {}", attachment.uri);
            }
            self.state = MediaState::Unresolved;
            return;
        };

        let client = probes.client.clone();
        let handle = probes.spawn(async move { client.resolve(&attachment, debug).await });

        self._probe = Some(cx.spawn(async move |this, cx| {
            let state = match handle.await {
                Ok(state) => state,
                Err(e) => {
                    if debug {
                        tracing::warn!("Media probe failed: {}", e);
                    }
                    MediaState::Unresolved
                }
            };

            let _ = this.update(cx, |this, cx| {
                this.state = state;
                cx.notify();
            });
        }));
    }

    fn render_visual(
        &self,
        kind: MediaKind,
        aspect_ratio: f32,
        window: &mut Window,
        cx: &mut App,
    ) -> AnyElement {
        let config = &self.config;
        let ratio = if aspect_ratio > 0.0 { aspect_ratio } else { 1.0 };
        let height = MEDIA_WIDTH / ratio;

        let badge = kind.badge().map(|badge| {
            div()
                .absolute()
                .top(px(6.0))
                .left(px(6.0))
                .child(config.slots.media_badge.render(badge, &config.theme, window, cx))
        });

        let content = match (kind, MediaSource::from_uri(self.media_uri())) {
            (MediaKind::Video, _) => div()
                .size_full()
                .bg(config.theme.badge_background)
                .into_any_element(),
            (_, MediaSource::Remote(url)) => self.image(img(SharedString::from(url))),
            (_, MediaSource::Local(path)) => self.image(img(path)),
        };

        div()
            .relative()
            .w(px(MEDIA_WIDTH))
            .h(px(height))
            .rounded(px(8.0))
            .overflow_hidden()
            .child(content)
            .children(badge)
            .into_any_element()
    }

    fn image(&self, image: Img) -> AnyElement {
        refined(image.size_full().object_fit(ObjectFit::Cover), &self.config.styles.image)
            .with_animation(
                ("media-fade", self.message.id.0),
                Animation::new(FADE_IN),
                |image, delta| image.opacity(delta),
            )
            .into_any_element()
    }

    fn media_uri(&self) -> &str {
        self.message.media.as_ref().map(|m| m.uri.as_str()).unwrap_or_default()
    }
}

impl Render for MediaPreview {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        match &self.state {
            MediaState::Pending | MediaState::Unresolved => Empty.into_any_element(),
            MediaState::Resolved {
                kind: MediaKind::File,
                metadata,
                ..
            } => {
                let config = self.config.clone();
                let preview = config.slots.file_preview.render(
                    &self.message,
                    metadata.as_ref(),
                    &config.theme,
                    window,
                    cx,
                );
                refined(div().p(px(8.0)).rounded(px(8.0)), &config.styles.file_container)
                    .child(preview)
                    .into_any_element()
            }
            MediaState::Resolved {
                kind, aspect_ratio, ..
            } => self.render_visual(*kind, *aspect_ratio, window, cx),
        }
    }
}
