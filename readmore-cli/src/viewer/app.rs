//! Viewer application state and transitions.
//!
//! Defines [`ViewerApp`]: the widget, its current presentation wrapped to the
//! terminal width, keyboard focus over interactive spans, and the running
//! expand/collapse transition.

use std::ops::Range;
use std::time::Instant;

use ratatui::layout::{Alignment, Rect};
use readmore_core::layout::{TextAlign, TextDirection};
use readmore_core::{LayoutEnv, ReadMore, Span, SpanKind, StyledPresentation, TapOutcome};
use unicode_width::UnicodeWidthStr;

use crate::oracle::CellLayout;

/// A running change of the visible row count.
#[derive(Debug, Clone, Copy)]
struct Transition {
    started: Instant,
    from_rows: usize,
    to_rows: usize,
}

/// Application state for the viewer.
pub(super) struct ViewerApp {
    /// The widget being displayed.
    pub(super) widget: ReadMore,
    /// Presentation for the current width and state.
    pub(super) styled: Option<StyledPresentation>,
    /// Display text of the presentation.
    pub(super) display: String,
    /// Wrapped lines of `display`, as byte ranges.
    pub(super) lines: Vec<Range<usize>>,
    /// Text width in cells.
    pub(super) width: u16,
    /// Index into the presentation spans of the focused interactive span.
    pub(super) focus: Option<usize>,
    /// Status bar message.
    pub(super) status_message: Option<String>,
    /// Inner area of the text box from the last draw, for mouse hit-testing.
    pub(super) text_area: Rect,
    transition: Option<Transition>,
}

impl ViewerApp {
    /// Create viewer state for `widget`; nothing is laid out until [`resize`](Self::resize).
    pub(super) fn new(widget: ReadMore) -> Self {
        Self {
            widget,
            styled: None,
            display: String::new(),
            lines: Vec::new(),
            width: 0,
            focus: None,
            status_message: None,
            text_area: Rect::default(),
            transition: None,
        }
    }

    /// Lay out again if the width changed or the widget asks for it.
    pub(super) fn resize(&mut self, width: u16) {
        if width != self.width || self.widget.needs_layout() || self.styled.is_none() {
            self.width = width;
            self.relayout();
        }
    }

    fn relayout(&mut self) {
        let focused_toggle = self.focused_span().map(|s| s.kind) == Some(SpanKind::ToggleLabel);

        let env = LayoutEnv::new(f32::from(self.width));
        let styled = self.widget.layout(&CellLayout, &env);
        self.display = styled.presentation.display_text();
        self.lines = CellLayout::line_ranges(&self.display, usize::from(self.width));
        self.styled = Some(styled);

        self.focus = if focused_toggle {
            self.spans()
                .iter()
                .position(|s| s.kind == SpanKind::ToggleLabel)
        } else {
            self.focus.filter(|&i| self.focusable().contains(&i))
        };
    }

    pub(super) fn spans(&self) -> &[Span] {
        self.styled
            .as_ref()
            .map(|s| s.presentation.spans.as_slice())
            .unwrap_or_default()
    }

    /// Rows the settled presentation occupies.
    pub(super) fn target_rows(&self) -> usize {
        let cap = self
            .styled
            .as_ref()
            .and_then(|s| s.presentation.line_cap)
            .unwrap_or(usize::MAX);
        self.lines.len().min(cap)
    }

    /// Rows to show at `now`, following the running transition if any.
    pub(super) fn visible_rows(&self, now: Instant) -> usize {
        let target = self.target_rows();
        let Some(t) = self.transition else {
            return target;
        };
        let progress = self
            .widget
            .config()
            .animation
            .progress(now.saturating_duration_since(t.started));
        let from = t.from_rows as f32;
        let to = t.to_rows as f32;
        (from + (to - from) * progress).round() as usize
    }

    pub(super) fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Advance the transition, ending it once its duration has passed.
    pub(super) fn tick(&mut self, now: Instant) {
        if let Some(t) = self.transition {
            let duration = self.widget.config().animation.duration();
            if now.saturating_duration_since(t.started) >= duration {
                self.transition = None;
            }
        }
    }

    /// Byte offset where the settled visible text ends.
    fn visible_end(&self) -> usize {
        let rows = self.target_rows();
        rows.checked_sub(1)
            .and_then(|last| self.lines.get(last))
            .map_or(0, |r| r.end)
    }

    /// Indices of interactive spans that start on a visible row.
    fn focusable(&self) -> Vec<usize> {
        let end = self.visible_end();
        self.spans()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_interactive() && s.range.start < end)
            .map(|(i, _)| i)
            .collect()
    }

    pub(super) fn focused_span(&self) -> Option<&Span> {
        self.focus.and_then(|i| self.spans().get(i))
    }

    /// Move focus to the next interactive span, wrapping to none after the last.
    pub(super) fn focus_next(&mut self) {
        let focusable = self.focusable();
        self.focus = match self.focus {
            None => focusable.first().copied(),
            Some(current) => focusable.iter().copied().find(|&i| i > current),
        };
    }

    /// Move focus to the previous interactive span, wrapping to none before the first.
    pub(super) fn focus_prev(&mut self) {
        let focusable = self.focusable();
        self.focus = match self.focus {
            None => focusable.last().copied(),
            Some(current) => focusable.iter().copied().rev().find(|&i| i < current),
        };
    }

    /// Tap the focused span, or the text itself when nothing is focused.
    pub(super) fn activate(&mut self, now: Instant) {
        let hit = self.focused_span().cloned();
        self.tap(hit.as_ref(), now);
    }

    /// Tap whatever is drawn at terminal cell (`column`, `row`).
    pub(super) fn click(&mut self, column: u16, row: u16, now: Instant) {
        let area = self.text_area;
        if column < area.x || row < area.y {
            return;
        }
        let row = usize::from(row - area.y);
        if row >= self.visible_rows(now) || row >= self.lines.len() {
            return;
        }
        let hit = self.hit_test(usize::from(column - area.x), row).cloned();
        self.tap(hit.as_ref(), now);
    }

    /// Span under cell `column` of wrapped line `row`, `None` past the line end.
    pub(super) fn hit_test(&self, column: usize, row: usize) -> Option<&Span> {
        let range = self.lines.get(row)?;
        let line = &self.display[range.clone()];
        let line_width = UnicodeWidthStr::width(line);
        let pad = line_padding(line_width, usize::from(self.width), self.alignment());
        let x = column.checked_sub(pad)?;
        if x >= line_width {
            return None;
        }

        let byte = range.start + CellLayout::glyph_at_cell(line, x)?;
        self.styled.as_ref()?.presentation.span_at(byte)
    }

    fn tap(&mut self, hit: Option<&Span>, now: Instant) {
        let before = self.visible_rows(now);
        let outcome = self.widget.tap(hit);
        self.status_message = match &outcome {
            TapOutcome::Url(url) => Some(format!("URL: {url}")),
            TapOutcome::Hashtag(tag) => Some(format!("Hashtag: {tag}")),
            TapOutcome::Mention(user) => Some(format!("Mention: {user}")),
            TapOutcome::Toggled(true) => Some("Expanded".to_string()),
            TapOutcome::Toggled(false) => Some("Collapsed".to_string()),
            TapOutcome::Ignored => None,
        };

        if let TapOutcome::Toggled(_) = outcome {
            self.relayout();
            let after = self.target_rows();
            self.transition = (before != after).then_some(Transition {
                started: now,
                from_rows: before,
                to_rows: after,
            });
        }
    }

    /// Horizontal alignment of lines for the configured align and direction.
    pub(super) fn alignment(&self) -> Alignment {
        let config = self.widget.config();
        alignment(config.text_align, config.direction)
    }
}

pub(super) fn alignment(align: TextAlign, direction: TextDirection) -> Alignment {
    match (align, direction) {
        (TextAlign::Center, _) => Alignment::Center,
        (TextAlign::Left, _)
        | (TextAlign::Start, TextDirection::Ltr)
        | (TextAlign::End, TextDirection::Rtl) => Alignment::Left,
        (TextAlign::Right, _)
        | (TextAlign::Start, TextDirection::Rtl)
        | (TextAlign::End, TextDirection::Ltr) => Alignment::Right,
    }
}

/// Blank cells ratatui draws before a line of `line_width` cells.
fn line_padding(line_width: usize, width: usize, alignment: Alignment) -> usize {
    let free = width.saturating_sub(line_width);
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => free / 2,
        Alignment::Right => free,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use readmore_core::WidgetConfig;
    use readmore_core::toggle::{AnimationSpec, Curve};

    use super::*;

    fn app(text: &str, max_lines: usize, width: u16) -> ViewerApp {
        let widget = ReadMore::new(WidgetConfig {
            max_lines,
            animation: AnimationSpec {
                duration_ms: 100,
                curve: Curve::Linear,
            },
            ..WidgetConfig::with_text(text)
        });
        let mut app = ViewerApp::new(widget);
        app.resize(width);
        app.text_area = Rect::new(1, 1, width, 10);
        app
    }

    const LONG: &str = "Read https://example.com and follow @rustlang for #news about the \
                        release that is coming out later this year with many features";

    #[test]
    fn test_new_lays_out_on_first_resize() {
        let app = app("short text", 2, 20);
        assert_eq!(app.display, "short text");
        assert_eq!(app.lines.len(), 1);
        assert_eq!(app.target_rows(), 1);
        assert!(!app.widget.is_overflowing());
    }

    #[test]
    fn test_collapsed_rows_capped() {
        let app = app(LONG, 2, 20);
        assert!(app.widget.is_overflowing());
        assert_eq!(app.target_rows(), 2);
        assert!(app.display.ends_with("…See more"));
    }

    #[test]
    fn test_focus_cycles_visible_interactive_spans() {
        let mut app = app(LONG, 2, 30);
        app.focus_next();
        assert_eq!(app.focused_span().map(|s| s.kind), Some(SpanKind::Url));
        app.focus_next();
        assert_eq!(app.focused_span().map(|s| s.kind), Some(SpanKind::Mention));

        let mut seen = Vec::new();
        while let Some(span) = app.focused_span() {
            seen.push(span.kind);
            app.focus_next();
        }
        assert_eq!(seen.last(), Some(&SpanKind::ToggleLabel));
        assert!(app.focus.is_none());

        app.focus_prev();
        assert_eq!(app.focused_span().map(|s| s.kind), Some(SpanKind::ToggleLabel));
    }

    #[test]
    fn test_activate_url_sets_status_without_toggling() {
        let mut app = app(LONG, 2, 30);
        app.focus_next();
        app.activate(Instant::now());
        assert_eq!(app.status_message.as_deref(), Some("URL: https://example.com"));
        assert!(!app.widget.is_expanded());
    }

    #[test]
    fn test_activate_without_focus_taps_text() {
        let mut app = app(LONG, 2, 30);
        app.activate(Instant::now());
        assert!(app.widget.is_expanded());
        assert!(app.display.ends_with("  See less"));
        assert_eq!(app.status_message.as_deref(), Some("Expanded"));
    }

    #[test]
    fn test_toggle_keeps_focus_on_affordance() {
        let mut app = app(LONG, 2, 30);
        app.focus_prev();
        assert_eq!(app.focused_span().map(|s| s.kind), Some(SpanKind::ToggleLabel));
        app.activate(Instant::now());
        assert!(app.widget.is_expanded());
        assert_eq!(app.focused_span().map(|s| s.text.as_str()), Some("  See less"));
    }

    #[test]
    fn test_toggle_animates_rows() {
        let mut app = app(LONG, 2, 30);
        let start = Instant::now();
        app.activate(start);
        assert!(app.is_animating());
        let full = app.target_rows();
        assert_eq!(full, 5);

        assert_eq!(app.visible_rows(start), 2);
        assert_eq!(app.visible_rows(start + Duration::from_millis(60)), 4);
        assert_eq!(app.visible_rows(start + Duration::from_millis(100)), full);

        app.tick(start + Duration::from_millis(100));
        assert!(!app.is_animating());
        assert_eq!(app.visible_rows(start), full);
    }

    #[test]
    fn test_click_hits_span_under_cursor() {
        let mut app = app(LONG, 2, 30);
        // Row 0 reads "Read https://example.com and "; the URL starts at column 5.
        assert_eq!(app.hit_test(7, 0).map(|s| s.kind), Some(SpanKind::Url));
        assert_eq!(app.hit_test(1, 0).map(|s| s.kind), Some(SpanKind::Plain));
        assert!(app.hit_test(29, 0).is_none());

        // Text area starts at (1, 1).
        app.click(1 + 7, 1, Instant::now());
        assert_eq!(app.status_message.as_deref(), Some("URL: https://example.com"));
    }

    #[test]
    fn test_wide_glyph_cells_hit_their_token() {
        let text = "#你好 plain words that keep going well past the first row of the box";
        let mut app = app(text, 1, 30);
        assert!(app.widget.is_overflowing());

        // "#" is cell 0, "你" cells 1-2, "好" cells 3-4, the space cell 5.
        let kinds: Vec<Option<SpanKind>> =
            (0..6).map(|c| app.hit_test(c, 0).map(|s| s.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                Some(SpanKind::Hashtag),
                Some(SpanKind::Hashtag),
                Some(SpanKind::Hashtag),
                Some(SpanKind::Hashtag),
                Some(SpanKind::Hashtag),
                Some(SpanKind::Plain),
            ]
        );

        // The right half of the last glyph taps the hashtag instead of toggling.
        app.click(1 + 4, 1, Instant::now());
        assert_eq!(app.status_message.as_deref(), Some("Hashtag: #你好"));
        assert!(!app.widget.is_expanded());
    }

    #[test]
    fn test_click_outside_text_is_ignored() {
        let mut app = app(LONG, 2, 30);
        app.click(0, 0, Instant::now());
        app.click(5, 9, Instant::now());
        assert!(app.status_message.is_none());
        assert!(!app.widget.is_expanded());
    }

    #[test]
    fn test_resize_relayouts() {
        let mut app = app(LONG, 2, 30);
        let narrow = app.display.clone();
        app.resize(60);
        assert_ne!(app.display, narrow);
        assert_eq!(app.width, 60);
    }

    #[test]
    fn test_alignment_mapping() {
        assert_eq!(alignment(TextAlign::Start, TextDirection::Ltr), Alignment::Left);
        assert_eq!(alignment(TextAlign::Start, TextDirection::Rtl), Alignment::Right);
        assert_eq!(alignment(TextAlign::End, TextDirection::Ltr), Alignment::Right);
        assert_eq!(alignment(TextAlign::Center, TextDirection::Rtl), Alignment::Center);
        assert_eq!(alignment(TextAlign::Left, TextDirection::Rtl), Alignment::Left);
    }

    #[test]
    fn test_line_padding() {
        assert_eq!(line_padding(10, 30, Alignment::Left), 0);
        assert_eq!(line_padding(10, 30, Alignment::Center), 10);
        assert_eq!(line_padding(10, 30, Alignment::Right), 20);
        assert_eq!(line_padding(40, 30, Alignment::Right), 0);
    }
}
