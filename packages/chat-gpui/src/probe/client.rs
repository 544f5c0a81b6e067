//! Media probe client
//!
//! Best-effort lookups that fill in what a message's attachment does not say:
//! content type and length (HEAD request or file metadata) and pixel
//! dimensions (decoded from the first bytes of the image).

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chat_core::{aspect_ratio, classify_mime, FileMetadata, MediaAttachment, MediaKind, MediaState};
use image::ImageReader;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;

use super::ProbeError;

/// Largest prefix of an image downloaded while looking for its header
const MAX_HEADER_BYTES: usize = 512 * 1024;

/// Where an attachment lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Remote(String),
    Local(PathBuf),
}

impl MediaSource {
    pub fn from_uri(uri: &str) -> Self {
        let lower = uri.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            MediaSource::Remote(uri.to_string())
        } else {
            MediaSource::Local(PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri)))
        }
    }
}

/// HTTP and file client for media probes
#[derive(Debug, Clone)]
pub struct MediaProbeClient {
    client: Client,
    max_header_bytes: usize,
}

impl Default for MediaProbeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaProbeClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            max_header_bytes: MAX_HEADER_BYTES,
        }
    }

    /// Resolve the media state of an attachment.
    ///
    /// Never fails: probe errors are swallowed (and logged when `debug` is
    /// set). An unclassifiable attachment resolves to `Unresolved`; a failed
    /// dimension lookup falls back to a square aspect ratio.
    pub async fn resolve(&self, attachment: &MediaAttachment, debug: bool) -> MediaState {
        let source = MediaSource::from_uri(&attachment.uri);
        let mut kind = attachment.mime.as_deref().and_then(classify_mime);
        let mut metadata = None;

        if matches!(kind, None | Some(MediaKind::File)) {
            match self.metadata(&source).await {
                Ok(meta) => {
                    kind = kind.or_else(|| meta.kind());
                    metadata = Some(meta);
                }
                Err(e) => {
                    if debug {
                        tracing::warn!("Error while probing metadata of {}: {}", attachment.uri, e);
                    }
                }
            }
        }

        let Some(kind) = kind else {
            if debug {
                tracing::warn!("Could not classify media {}", attachment.uri);
            }
            return MediaState::Unresolved;
        };

        let aspect_ratio = match kind {
            MediaKind::Image | MediaKind::Gif => match self.dimensions(&source).await {
                Ok((width, height)) => aspect_ratio(width, height),
                Err(e) => {
                    if debug {
                        tracing::warn!(
                            "Error while getting the image size of {}: {}",
                            attachment.uri,
                            e
                        );
                    }
                    1.0
                }
            },
            MediaKind::Video | MediaKind::File => 1.0,
        };

        MediaState::Resolved {
            kind,
            aspect_ratio,
            metadata,
        }
    }

    /// Content type and length of the media
    pub async fn metadata(&self, source: &MediaSource) -> Result<FileMetadata, ProbeError> {
        match source {
            MediaSource::Remote(url) => {
                let response = self.client.head(url).send().await?;
                if !response.status().is_success() {
                    return Err(ProbeError::Status(response.status()));
                }
                Ok(metadata_from_headers(response.headers()))
            }
            MediaSource::Local(path) => {
                let meta = tokio::fs::metadata(path).await?;
                Ok(FileMetadata {
                    content_type: guess_mime(path).map(str::to_string),
                    content_length: Some(meta.len()),
                })
            }
        }
    }

    /// Pixel dimensions of an image, reading only as much as the header needs
    pub async fn dimensions(&self, source: &MediaSource) -> Result<(u32, u32), ProbeError> {
        match source {
            MediaSource::Remote(url) => {
                let mut response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(ProbeError::Status(response.status()));
                }

                let mut buffer = Vec::new();
                while let Some(chunk) = response.chunk().await? {
                    buffer.extend_from_slice(&chunk);
                    if let Ok(dimensions) = dimensions_from_bytes(&buffer) {
                        return Ok(dimensions);
                    }
                    if buffer.len() >= self.max_header_bytes {
                        break;
                    }
                }
                Ok(dimensions_from_bytes(&buffer)?)
            }
            MediaSource::Local(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(dimensions_from_bytes(&bytes)?)
            }
        }
    }
}

/// Decode image dimensions from a (possibly partial) byte buffer
pub fn dimensions_from_bytes(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
}

/// Read content type and length from response headers
pub fn metadata_from_headers(headers: &HeaderMap) -> FileMetadata {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let content_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    FileMetadata {
        content_type,
        content_length,
    }
}

/// Guess a MIME type from a local file extension
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use reqwest::header::HeaderValue;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_dimensions_from_png() {
        assert_eq!(dimensions_from_bytes(&png_bytes(4, 2)).unwrap(), (4, 2));
    }

    #[test]
    fn test_dimensions_from_truncated_bytes() {
        let bytes = png_bytes(16, 9);
        assert!(dimensions_from_bytes(&bytes[..10]).is_err());
        assert!(dimensions_from_bytes(&[]).is_err());
    }

    #[test]
    fn test_metadata_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/gif"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("2048"));

        let meta = metadata_from_headers(&headers);
        assert_eq!(meta.kind(), Some(MediaKind::Gif));
        assert_eq!(meta.content_length, Some(2048));

        let empty = metadata_from_headers(&HeaderMap::new());
        assert_eq!(empty, FileMetadata::default());
    }

    #[test]
    fn test_media_source() {
        assert_eq!(
            MediaSource::from_uri("HTTPS://e.com/a.png"),
            MediaSource::Remote("HTTPS://e.com/a.png".into())
        );
        assert_eq!(
            MediaSource::from_uri("file:///tmp/a.png"),
            MediaSource::Local(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            MediaSource::from_uri("/tmp/a.png"),
            MediaSource::Local(PathBuf::from("/tmp/a.png"))
        );
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a/b.GIF")), Some("image/gif"));
        assert_eq!(guess_mime(Path::new("doc.pdf")), Some("application/pdf"));
        assert_eq!(guess_mime(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn test_resolve_local_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        std::fs::write(&path, png_bytes(8, 4)).unwrap();

        let client = MediaProbeClient::new();
        let state = client
            .resolve(&MediaAttachment::untyped(path.to_string_lossy()), false)
            .await;

        match state {
            MediaState::Resolved { kind, aspect_ratio, metadata } => {
                assert_eq!(kind, MediaKind::Image);
                assert!((aspect_ratio - 2.0).abs() < f32::EPSILON);
                let expected = std::fs::metadata(&path).unwrap().len();
                assert_eq!(metadata.and_then(|m| m.content_length), Some(expected));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_failures_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let client = MediaProbeClient::new();

        // Typed but unreadable image: square fallback
        let missing = dir.path().join("missing.png");
        let state = client
            .resolve(&MediaAttachment::new(missing.to_string_lossy(), "image/png"), false)
            .await;
        assert_eq!(
            state,
            MediaState::Resolved {
                kind: MediaKind::Image,
                aspect_ratio: 1.0,
                metadata: None,
            }
        );

        // Untyped and unreadable: stays unresolved
        let state = client
            .resolve(&MediaAttachment::untyped(missing.to_string_lossy()), true)
            .await;
        assert_eq!(state, MediaState::Unresolved);
    }

    #[tokio::test]
    async fn test_video_skips_dimension_probe() {
        let client = MediaProbeClient::new();
        let state = client
            .resolve(&MediaAttachment::legacy("/nowhere/clip.mp4", true), false)
            .await;
        assert_eq!(state.kind(), Some(MediaKind::Video));
    }
}
