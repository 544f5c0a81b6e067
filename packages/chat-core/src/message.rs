//! Message data model shared between the host application and the widget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

/// Caller-assigned message identifier. Keys the message in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One media item attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttachment {
    /// Remote or local URI of the media
    pub uri: String,
    /// MIME type when the host knows it; otherwise resolved by a header probe
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "mimetype")]
    pub mime: Option<String>,
}

impl MediaAttachment {
    /// Create an attachment with a known MIME type.
    pub fn new(uri: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime: Some(mime.into()),
        }
    }

    /// Create an attachment whose type must be sniffed from the network.
    pub fn untyped(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime: None,
        }
    }

    /// Build an attachment from the older "bare URI plus video flag" shape.
    pub fn legacy(uri: impl Into<String>, is_video: bool) -> Self {
        Self {
            uri: uri.into(),
            mime: is_video.then(|| "video/*".to_string()),
        }
    }
}

/// A chat message as supplied by the host application.
///
/// The widget never mutates a message; it only reads fields to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    /// Body text, possibly empty when media is attached
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// True when the local user authored the message
    pub is_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "file")]
    pub media: Option<MediaAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen: Option<bool>,
    /// Avatar override; the bundled placeholder is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "userAvatar")]
    pub avatar: Option<String>,
}

impl Message {
    /// Create a plain text message.
    pub fn new(id: MessageId, content: impl Into<String>, is_user: bool) -> Self {
        Self {
            id,
            content: content.into(),
            date: None,
            is_user,
            media: None,
            seen: None,
            avatar: None,
        }
    }

    /// Create a message authored by the local user.
    pub fn from_user(id: MessageId, content: impl Into<String>) -> Self {
        Self::new(id, content, true)
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_media(mut self, media: MediaAttachment) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_seen(mut self, seen: bool) -> Self {
        self.seen = Some(seen);
        self
    }

    pub fn authorship(&self) -> Authorship {
        if self.is_user {
            Authorship::User
        } else {
            Authorship::Other
        }
    }

    /// Whether the counterpart has seen this message. Unknown counts as unseen.
    pub fn is_seen(&self) -> bool {
        self.seen.unwrap_or(false)
    }

    /// Snapshot of the fields that decide whether a bubble must re-render.
    pub fn render_key(&self) -> RenderKey {
        RenderKey {
            id: self.id,
            content: self.content.clone(),
            date: self.date,
            is_user: self.is_user,
            seen: self.seen,
            media: self.media.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Parse a list of messages from JSON, e.g. a host fixture file.
    pub fn list_from_json(json: &str) -> Result<Vec<Message>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Who wrote a message, as seen from the local user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorship {
    User,
    Other,
}

/// Value-equality memo key for a rendered bubble.
///
/// Bubbles skip re-rendering (and media probes are not re-run) when the key
/// of the incoming message equals the key of the rendered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderKey {
    id: MessageId,
    content: String,
    date: Option<DateTime<Utc>>,
    is_user: bool,
    seen: Option<bool>,
    media: Option<MediaAttachment>,
    avatar: Option<String>,
}

impl RenderKey {
    /// True when only fields outside the media reference changed.
    pub fn same_media(&self, other: &RenderKey) -> bool {
        self.media == other.media
    }
}

/// Payload produced by the composer on send.
///
/// Identity, authorship and timestamp are the host's to fill in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundContent {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_key_ignores_nothing_in_field_set() {
        let base = Message::new(MessageId(1), "hi", false);
        assert_eq!(base.render_key(), base.clone().render_key());

        let changed = [
            Message { content: "hey".into(), ..base.clone() },
            Message { is_user: true, ..base.clone() },
            base.clone().with_seen(true),
            base.clone().with_avatar("https://example.com/a.png"),
            base.clone().with_media(MediaAttachment::new("https://e.com/x.gif", "image/gif")),
            base.clone().with_date(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            Message { id: MessageId(2), ..base.clone() },
        ];

        for message in changed {
            assert_ne!(base.render_key(), message.render_key());
        }
    }

    #[test]
    fn test_same_media() {
        let a = Message::new(MessageId(1), "a", true)
            .with_media(MediaAttachment::untyped("https://e.com/f"));
        let b = Message { content: "b".into(), ..a.clone() };
        assert!(a.render_key().same_media(&b.render_key()));

        let c = Message { media: None, ..a.clone() };
        assert!(!a.render_key().same_media(&c.render_key()));
    }

    #[test]
    fn test_legacy_attachment() {
        assert_eq!(
            MediaAttachment::legacy("v.mp4", true).mime.as_deref(),
            Some("video/*")
        );
        assert_eq!(MediaAttachment::legacy("a.gif", false).mime, None);
    }

    #[test]
    fn test_list_from_json() {
        let json = r#"[
            {"id": 1, "content": "hi", "isUser": false},
            {"id": 2, "content": "", "isUser": true, "seen": true,
             "file": {"uri": "https://e.com/cat.png", "mimetype": "image/png"},
             "userAvatar": "https://e.com/me.png"}
        ]"#;

        let messages = Message::list_from_json(json).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].authorship(), Authorship::Other);
        assert!(!messages[0].is_seen());
        assert!(messages[1].is_seen());
        assert_eq!(
            messages[1].media.as_ref().and_then(|m| m.mime.as_deref()),
            Some("image/png")
        );
        assert_eq!(messages[1].avatar.as_deref(), Some("https://e.com/me.png"));
    }

    #[test]
    fn test_list_from_json_rejects_garbage() {
        assert!(Message::list_from_json("{not json").is_err());
    }
}
