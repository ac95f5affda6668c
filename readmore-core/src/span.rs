//! Typed, positioned text spans.
//!
//! A [`Span`] is the unit exchanged between the scanner, the assembler and the
//! view layer. Spans are plain data: what happens when one is tapped is
//! derived from its [`SpanKind`] via [`Span::action`].

use std::ops::Range;

use serde::Serialize;

/// Classification of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Non-interactive text.
    Plain,
    /// An `http://` or `https://` link.
    Url,
    /// A `#tag`.
    Hashtag,
    /// An `@user`.
    Mention,
    /// The "see more" / "see less" affordance.
    ToggleLabel,
}

impl SpanKind {
    /// Whether spans of this kind are drawn with the link style.
    pub fn is_link_styled(self) -> bool {
        !matches!(self, SpanKind::Plain)
    }
}

/// What a tap on a span should trigger.
///
/// The view layer binds these to concrete callbacks; the core never holds
/// gesture objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TapAction {
    /// Invoke the URL callback with the span text.
    Url,
    /// Invoke the hashtag callback with the span text.
    Hashtag,
    /// Invoke the mention callback with the span text.
    Mention,
    /// Flip the expanded state.
    Toggle,
}

/// A classified substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// The text covered by this span.
    pub text: String,
    /// The span classification.
    pub kind: SpanKind,
    /// Half-open byte range into the string this span partitions.
    pub range: Range<usize>,
}

impl Span {
    /// Create a span covering `range` of `source`.
    ///
    /// `range` must lie on character boundaries of `source`.
    pub fn new(source: &str, kind: SpanKind, range: Range<usize>) -> Self {
        Self {
            text: source[range.clone()].to_string(),
            kind,
            range,
        }
    }

    /// The tap target of this span, if it is interactive.
    pub fn action(&self) -> Option<TapAction> {
        match self.kind {
            SpanKind::Plain => None,
            SpanKind::Url => Some(TapAction::Url),
            SpanKind::Hashtag => Some(TapAction::Hashtag),
            SpanKind::Mention => Some(TapAction::Mention),
            SpanKind::ToggleLabel => Some(TapAction::Toggle),
        }
    }

    /// Whether this span reacts to taps on its own.
    pub fn is_interactive(&self) -> bool {
        self.action().is_some()
    }
}

/// Concatenate the text of `spans` in order.
pub fn join_spans(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Find the span whose byte range contains `byte_offset`.
///
/// An offset equal to the end of the last span resolves to that span, so a
/// hit just past the final glyph still lands on the trailing affordance.
pub fn span_at(spans: &[Span], byte_offset: usize) -> Option<&Span> {
    spans
        .iter()
        .find(|s| s.range.contains(&byte_offset))
        .or_else(|| spans.last().filter(|s| s.range.end == byte_offset))
}
