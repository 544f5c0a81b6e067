//! Message body text with highlighted, pressable spans

use std::ops::Range;
use std::rc::Rc;

use chat_core::{parse_spans, Span, SpanKind};
use gpui::*;

use crate::slots::LinkHandler;
use crate::theme::ChatTheme;

/// Highlight style for a recognized span
fn span_style(kind: SpanKind, theme: &ChatTheme) -> HighlightStyle {
    match kind {
        SpanKind::Url | SpanKind::Phone | SpanKind::Email => HighlightStyle {
            color: Some(theme.link),
            underline: Some(UnderlineStyle {
                thickness: px(1.0),
                color: Some(theme.link),
                wavy: false,
            }),
            ..Default::default()
        },
        SpanKind::Hashtag => HighlightStyle {
            font_style: Some(FontStyle::Italic),
            ..Default::default()
        },
    }
}

fn highlights(spans: &[Span], theme: &ChatTheme) -> Vec<(Range<usize>, HighlightStyle)> {
    spans
        .iter()
        .map(|span| (span.range.clone(), span_style(span.kind, theme)))
        .collect()
}

/// Body text of one message.
///
/// URL, phone and email spans dispatch to the link handler when clicked;
/// hashtags are only styled.
pub fn message_text(
    id: impl Into<ElementId>,
    content: &str,
    theme: &ChatTheme,
    link_handler: Rc<dyn LinkHandler>,
) -> InteractiveText {
    let spans = parse_spans(content);
    let styled = StyledText::new(SharedString::from(content.to_string()))
        .with_highlights(highlights(&spans, theme));

    let pressable: Vec<Span> = spans.into_iter().filter(|s| s.kind.is_pressable()).collect();
    let ranges = pressable.iter().map(|s| s.range.clone()).collect();

    InteractiveText::new(id, styled).on_click(ranges, move |ix, window, cx| {
        if let Some(span) = pressable.get(ix) {
            link_handler.open(span.kind, &span.text, window, cx);
            // Keep the press from reaching the bubble underneath
            cx.stop_propagation();
        }
    })
}
