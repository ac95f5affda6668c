//! Presentation assembly.
//!
//! Combines scanned token spans over the display text with the toggle
//! affordance, and decides the line cap and whole-text tap binding for the
//! current expand/collapse state.

use serde::{Deserialize, Serialize};

use crate::config::WidgetConfig;
use crate::scanner::scan;
use crate::span::{Span, SpanKind, TapAction, join_spans, span_at};
use crate::toggle::ToggleState;
use crate::truncation::TruncationResult;

/// Separator placed before the "see less" label.
pub const SEE_LESS_SPACER: &str = "  ";

/// How many lines a collapsed presentation may occupy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinePolicy {
    /// The collapsed view is capped at `max_lines`.
    #[default]
    Exact,
    /// The collapsed view may use one extra line so the affordance always
    /// has room, even when it was not accounted for by the truncation.
    ReserveAffordanceLine,
}

/// Everything the view layer needs to draw one widget state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    /// Ordered spans partitioning the display text.
    pub spans: Vec<Span>,
    /// Line cap for the layout stage, `None` for unbounded.
    pub line_cap: Option<usize>,
    /// Action bound to taps on non-interactive text, if any.
    pub text_tap: Option<TapAction>,
    /// Whether the full text needs truncation at the current width.
    pub overflowing: bool,
    pub expanded: bool,
    /// Whether the host should allow text selection.
    pub selectable: bool,
}

impl Presentation {
    /// The string the spans partition.
    pub fn display_text(&self) -> String {
        join_spans(&self.spans)
    }

    /// Spans that react to taps on their own, in display order.
    pub fn interactive_spans(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|s| s.is_interactive())
    }

    /// The span covering `byte_offset` of the display text.
    pub fn span_at(&self, byte_offset: usize) -> Option<&Span> {
        span_at(&self.spans, byte_offset)
    }
}

/// Builds a [`Presentation`] from widget configuration.
#[derive(Debug, Clone, Copy)]
pub struct PresentationAssembler<'a> {
    config: &'a WidgetConfig,
}

impl<'a> PresentationAssembler<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }

    /// Assemble the presentation of `full_text`.
    ///
    /// `truncation` is the engine result for the current width, `None` when
    /// the text fits as-is.
    pub fn assemble(
        &self,
        full_text: &str,
        truncation: Option<&TruncationResult>,
        state: ToggleState,
    ) -> Presentation {
        let config = self.config;
        let overflowing = truncation.is_some();
        let text_tap = (overflowing && config.enable_text_tap_toggle).then_some(TapAction::Toggle);

        let (spans, line_cap) = match truncation {
            None => (scan(full_text), Some(config.max_lines)),
            Some(result) if !state.expanded => {
                let label = if result.needs_ellipsis_suffix {
                    format!("{}{}", config.ellipsis, config.see_more_label)
                } else {
                    config.see_more_label.clone()
                };
                let cap = match config.line_policy {
                    LinePolicy::Exact => config.max_lines,
                    LinePolicy::ReserveAffordanceLine => config.max_lines + 1,
                };
                (with_affordance(&result.truncated_text, &label), Some(cap))
            }
            Some(_) => {
                let label = format!("{SEE_LESS_SPACER}{}", config.see_less_label);
                (with_affordance(full_text, &label), None)
            }
        };

        Presentation {
            spans,
            line_cap,
            text_tap,
            overflowing,
            expanded: state.expanded,
            selectable: config.enable_selection,
        }
    }
}

/// Scan `body` and append `label` as a toggle span.
fn with_affordance(body: &str, label: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = scan(body)
        .into_iter()
        .filter(|s| !s.range.is_empty())
        .collect();
    let start = body.len();
    spans.push(Span {
        text: label.to_string(),
        kind: SpanKind::ToggleLabel,
        range: start..start + label.len(),
    });
    spans
}
