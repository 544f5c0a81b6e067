//! Chat Core - UI-independent logic for the customizable chat widget.
//!
//! This crate holds everything the widget decides before anything is drawn:
//!
//! - **Messages**: the data model handed in by the host, plus the memo key
//! - **Options**: the flat option bag with defaults, TOML loading and validation
//! - **Span parsing**: URL, phone, email and hashtag detection in message text
//! - **Media**: MIME classification, aspect ratios, file metadata
//! - **Dates**: day.js-style date patterns compiled to chrono formats
//! - **Draft**: the composer's text buffer
//! - **Layout**: bubble, composer and list decisions derived from the above
//!
//! # Example
//!
//! ```rust
//! use chat_core::{BubbleLayout, ChatOptions, Message, MessageId};
//!
//! let options = ChatOptions::default().validate().unwrap();
//! let message = Message::new(MessageId(1), "see https://example.com", false);
//!
//! let layout = BubbleLayout::for_message(&message, &options);
//! assert!(layout.shows_avatar);
//! ```

pub mod color;
pub mod date;
pub mod draft;
pub mod layout;
pub mod media;
pub mod message;
pub mod options;
pub mod parse;

// Re-export commonly used types
pub use color::Rgba8;
pub use date::{format_message_date, DatePattern};
pub use draft::DraftBuffer;
pub use layout::{
    display_order, duplicate_ids, plan_list, Alignment, AvatarSource, BubbleChange, BubbleLayout,
    BubbleRole, ComposerLayout, DeliveryMark, ListPlan, PressGesture, PressKind, PressTracker,
};
pub use media::{aspect_ratio, classify_mime, Badge, FileMetadata, MediaKind, MediaState};
pub use message::{Authorship, MediaAttachment, Message, MessageId, OutboundContent, RenderKey};
pub use options::{ChatOptions, KeyboardAvoidance, ValidatedOptions};
pub use parse::{link_target, parse_spans, segments, Segment, Span, SpanKind};

/// Configuration errors, reported once when options are validated or loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid color for {field}: {value}")]
    InvalidColor { field: &'static str, value: String },

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Input max length must be greater than zero")]
    ZeroMaxLength,

    #[error("Default input value has {len} characters, more than the max length of {max}")]
    DefaultInputTooLong { len: usize, max: usize },

    #[error("Long press threshold must be greater than zero")]
    ZeroLongPress,
}

/// Error types for chat-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for chat-core operations.
pub type Result<T> = std::result::Result<T, Error>;
