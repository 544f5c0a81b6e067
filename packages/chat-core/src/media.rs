//! Media classification for message attachments.
//!
//! The kind of an attachment is derived, never stored: it comes from the
//! attachment's MIME type or from the content type a header probe reports.

/// Kind of attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    File,
    Image,
    Gif,
    Video,
}

impl MediaKind {
    /// Whether the media renders as a picture (needs dimensions).
    pub fn is_visual(self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Gif | MediaKind::Video)
    }

    /// Overlay badge shown on top of the preview, if any.
    pub fn badge(self) -> Option<Badge> {
        match self {
            MediaKind::Video => Some(Badge::Video),
            MediaKind::Gif => Some(Badge::Gif),
            MediaKind::Image | MediaKind::File => None,
        }
    }
}

/// Overlay badge for animated media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Video,
    Gif,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Video => "VIDEO",
            Badge::Gif => "GIF",
        }
    }
}

/// Classify a MIME type or content-type header value.
///
/// Parameters and case are ignored. Unknown families yield `None`.
pub fn classify_mime(mime: &str) -> Option<MediaKind> {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence.starts_with("application") {
        Some(MediaKind::File)
    } else if essence.starts_with("image") {
        if essence == "image/gif" {
            Some(MediaKind::Gif)
        } else {
            Some(MediaKind::Image)
        }
    } else if essence.starts_with("video") {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Width over height, falling back to a square when height is zero.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Metadata a header probe reports for a remote file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl FileMetadata {
    /// Size in megabytes, if the length is known.
    pub fn size_megabytes(&self) -> Option<f64> {
        self.content_length
            .map(|bytes| bytes as f64 / (1024.0 * 1024.0))
    }

    /// Human readable size, e.g. `1.500 MB`.
    pub fn size_label(&self) -> Option<String> {
        self.size_megabytes().map(|mb| format!("{mb:.3} MB"))
    }

    pub fn kind(&self) -> Option<MediaKind> {
        self.content_type.as_deref().and_then(classify_mime)
    }
}

/// Resolution state of a media slot. Probes write into it, last write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MediaState {
    /// Nothing known yet; the slot renders nothing
    #[default]
    Pending,
    Resolved {
        kind: MediaKind,
        aspect_ratio: f32,
        metadata: Option<FileMetadata>,
    },
    /// Classification failed; the slot stays empty
    Unresolved,
}

impl MediaState {
    pub fn kind(&self) -> Option<MediaKind> {
        match self {
            MediaState::Resolved { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MediaState::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classify_families() {
        assert_eq!(classify_mime("application/pdf"), Some(MediaKind::File));
        assert_eq!(classify_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(classify_mime("image/jpeg"), Some(MediaKind::Image));
        assert_eq!(classify_mime("image/gif"), Some(MediaKind::Gif));
        assert_eq!(classify_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(classify_mime("video/*"), Some(MediaKind::Video));
        assert_eq!(classify_mime("text/plain"), None);
        assert_eq!(classify_mime(""), None);
    }

    #[test]
    fn test_classify_header_values() {
        assert_eq!(classify_mime("Image/GIF; charset=binary"), Some(MediaKind::Gif));
        assert_eq!(classify_mime(" video/webm "), Some(MediaKind::Video));
    }

    #[test]
    fn test_gif_badge_not_video() {
        let kind = classify_mime("image/gif").unwrap();
        assert_eq!(kind.badge(), Some(Badge::Gif));
        assert_eq!(kind.badge().unwrap().label(), "GIF");
        assert_eq!(MediaKind::Video.badge().unwrap().label(), "VIDEO");
        assert_eq!(MediaKind::Image.badge(), None);
        assert_eq!(MediaKind::File.badge(), None);
    }

    #[test]
    fn test_visual_kinds() {
        assert!(MediaKind::Image.is_visual());
        assert!(MediaKind::Gif.is_visual());
        assert!(MediaKind::Video.is_visual());
        assert!(!MediaKind::File.is_visual());
    }

    #[test]
    fn test_aspect_ratio() {
        assert_relative_eq!(aspect_ratio(1920, 1080), 16.0 / 9.0);
        assert_relative_eq!(aspect_ratio(300, 0), 1.0);
        assert_relative_eq!(aspect_ratio(0, 300), 0.0);
    }

    #[test]
    fn test_file_metadata() {
        let meta = FileMetadata {
            content_type: Some("application/zip".into()),
            content_length: Some(1024 * 1024 * 3 / 2),
        };
        assert_relative_eq!(meta.size_megabytes().unwrap(), 1.5);
        assert_eq!(meta.size_label().as_deref(), Some("1.500 MB"));
        assert_eq!(meta.kind(), Some(MediaKind::File));

        assert_eq!(FileMetadata::default().size_label(), None);
        assert_eq!(FileMetadata::default().kind(), None);
    }

    #[test]
    fn test_media_state() {
        assert!(MediaState::default().is_pending());
        assert_eq!(MediaState::Unresolved.kind(), None);

        let resolved = MediaState::Resolved {
            kind: MediaKind::Gif,
            aspect_ratio: 1.0,
            metadata: None,
        };
        assert_eq!(resolved.kind(), Some(MediaKind::Gif));
        assert!(!resolved.is_pending());
    }
}
