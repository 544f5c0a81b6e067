//! Span parser for message bodies.
//!
//! Recognizes four span kinds in fixed priority order: URL, phone number,
//! email address and hashtag. Each kind only looks at text not already
//! claimed by a kind of higher priority.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:https?://|www\.)[-a-z0-9@:%._+~#=]{1,256}\.(?:xn--)?[a-z0-9-]{2,16}\b[-a-z0-9@:%_+.~#?&/=]*",
    )
    .unwrap()
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d{3}\)?[-\s.]?\d{3}[-\s.]?\d{4,6}").unwrap());

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// Kind of a recognized span, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Url,
    Phone,
    Email,
    Hashtag,
}

impl SpanKind {
    pub const PRIORITY: [SpanKind; 4] = [
        SpanKind::Url,
        SpanKind::Phone,
        SpanKind::Email,
        SpanKind::Hashtag,
    ];

    /// Whether pressing the span invokes a handler. Hashtags are styled only.
    pub fn is_pressable(self) -> bool {
        !matches!(self, SpanKind::Hashtag)
    }

    fn regex(self) -> &'static Regex {
        match self {
            SpanKind::Url => &URL,
            SpanKind::Phone => &PHONE,
            SpanKind::Email => &EMAIL,
            SpanKind::Hashtag => &HASHTAG,
        }
    }
}

/// A recognized span. `range` is a byte range into the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub kind: SpanKind,
    pub text: String,
}

/// A piece of parsed text: either plain or a recognized span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(Range<usize>),
    Span(Span),
}

impl Segment {
    pub fn range(&self) -> &Range<usize> {
        match self {
            Segment::Plain(range) => range,
            Segment::Span(span) => &span.range,
        }
    }
}

/// Find every span in `text`, sorted by position.
pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();

    for kind in SpanKind::PRIORITY {
        let mut found = Vec::new();
        for gap in gaps(text.len(), &spans) {
            let slice = &text[gap.clone()];
            for m in kind.regex().find_iter(slice) {
                let mut end = m.end();
                if kind == SpanKind::Url {
                    end = m.start() + trim_url(m.as_str()).len();
                }
                let range = gap.start + m.start()..gap.start + end;
                found.push(Span {
                    text: text[range.clone()].to_string(),
                    range,
                    kind,
                });
            }
        }
        spans.extend(found);
        spans.sort_by_key(|span| span.range.start);
    }

    spans
}

/// Split `text` into plain and span segments covering the whole input.
pub fn segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for span in parse_spans(text) {
        if span.range.start > cursor {
            segments.push(Segment::Plain(cursor..span.range.start));
        }
        cursor = span.range.end;
        segments.push(Segment::Span(span));
    }

    if cursor < text.len() {
        segments.push(Segment::Plain(cursor..text.len()));
    }

    segments
}

/// The URL a pressable span opens, e.g. `tel:` and `mailto:` targets.
pub fn link_target(kind: SpanKind, text: &str) -> Option<String> {
    match kind {
        SpanKind::Url => {
            if text.to_ascii_lowercase().starts_with("www.") {
                Some(format!("https://{text}"))
            } else {
                Some(text.to_string())
            }
        }
        SpanKind::Phone => Some(format!("tel:{text}")),
        SpanKind::Email => Some(format!("mailto:{text}")),
        SpanKind::Hashtag => None,
    }
}

/// Unclaimed byte ranges between already accepted spans.
fn gaps(len: usize, claimed: &[Span]) -> Vec<Range<usize>> {
    let mut gaps = Vec::new();
    let mut cursor = 0;
    for span in claimed {
        if span.range.start > cursor {
            gaps.push(cursor..span.range.start);
        }
        cursor = cursor.max(span.range.end);
    }
    if cursor < len {
        gaps.push(cursor..len);
    }
    gaps
}

/// Drop sentence punctuation the URL pattern swallowed at the end.
fn trim_url(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(SpanKind, String)> {
        parse_spans(text)
            .into_iter()
            .map(|span| (span.kind, span.text))
            .collect()
    }

    #[test]
    fn test_each_kind() {
        assert_eq!(
            kinds("visit https://example.com/docs?a=1 now"),
            vec![(SpanKind::Url, "https://example.com/docs?a=1".to_string())]
        );
        assert_eq!(
            kinds("call 555-123-4567"),
            vec![(SpanKind::Phone, "555-123-4567".to_string())]
        );
        assert_eq!(
            kinds("mail jane.doe@example.org"),
            vec![(SpanKind::Email, "jane.doe@example.org".to_string())]
        );
        assert_eq!(
            kinds("so #rustlang wow"),
            vec![(SpanKind::Hashtag, "#rustlang".to_string())]
        );
    }

    #[test]
    fn test_priority_url_claims_fragment_and_digits() {
        let text = "see https://example.com/5551234567#top and #tag";
        let spans = kinds(text);
        assert_eq!(
            spans,
            vec![
                (SpanKind::Url, "https://example.com/5551234567#top".to_string()),
                (SpanKind::Hashtag, "#tag".to_string()),
            ]
        );
    }

    #[test]
    fn test_mixed_text_in_order() {
        let text = "www.rust-lang.org, ring +1 555 123 4567 or a@b.io #done.";
        let spans = parse_spans(text);
        let got: Vec<_> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            got,
            vec![SpanKind::Url, SpanKind::Phone, SpanKind::Email, SpanKind::Hashtag]
        );
        assert_eq!(spans[0].text, "www.rust-lang.org");
        assert_eq!(spans[3].text, "#done");

        for span in &spans {
            assert_eq!(&text[span.range.clone()], span.text);
        }
    }

    #[test]
    fn test_hashtag_requires_word_chars() {
        assert!(parse_spans("# alone and ## nope").is_empty());
        assert_eq!(kinds("#a_1"), vec![(SpanKind::Hashtag, "#a_1".to_string())]);
    }

    #[test]
    fn test_segments_cover_text() {
        let text = "hi #there, https://x.dev!";
        let segs = segments(text);

        let rebuilt: String = segs.iter().map(|s| &text[s.range().clone()]).collect();
        assert_eq!(rebuilt, text);

        assert!(matches!(&segs[0], Segment::Plain(r) if &text[r.clone()] == "hi "));
        assert!(matches!(&segs[1], Segment::Span(s) if s.kind == SpanKind::Hashtag));
        assert!(matches!(segs.last(), Some(Segment::Plain(r)) if &text[r.clone()] == "!"));
    }

    #[test]
    fn test_plain_text_single_segment() {
        assert_eq!(segments("hi"), vec![Segment::Plain(0..2)]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_bare_domain_and_short_number_stay_plain() {
        assert!(parse_spans("visit example.com or call 555-1234").is_empty());

        let spans = parse_spans("call (555) 123-4567 or +1 555.123.4567");
        let phones: Vec<_> = spans
            .iter()
            .filter(|span| span.kind == SpanKind::Phone)
            .collect();
        assert_eq!(phones.len(), 2);
    }

    #[test]
    fn test_link_targets() {
        assert_eq!(
            link_target(SpanKind::Url, "https://a.com").as_deref(),
            Some("https://a.com")
        );
        assert_eq!(
            link_target(SpanKind::Url, "www.a.com").as_deref(),
            Some("https://www.a.com")
        );
        assert_eq!(
            link_target(SpanKind::Phone, "555-123-4567").as_deref(),
            Some("tel:555-123-4567")
        );
        assert_eq!(
            link_target(SpanKind::Email, "a@b.io").as_deref(),
            Some("mailto:a@b.io")
        );
        assert_eq!(link_target(SpanKind::Hashtag, "#x"), None);
    }

    #[test]
    fn test_pressable() {
        assert!(SpanKind::Url.is_pressable());
        assert!(SpanKind::Phone.is_pressable());
        assert!(SpanKind::Email.is_pressable());
        assert!(!SpanKind::Hashtag.is_pressable());
    }

    #[test]
    fn test_unicode_text_ranges() {
        let text = "héllo 🎉 #fête";
        let spans = parse_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].range.clone()], "#fête");
    }
}
