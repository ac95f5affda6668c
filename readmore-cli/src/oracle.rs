//! Terminal-cell layout oracle.
//!
//! Measures text in monospace cells using `unicode-width`, wrapping greedily
//! at whitespace and hard-breaking words longer than the line.

use std::ops::Range;

use readmore_core::layout::{
    LayoutConstraints, LayoutOracle, Measurement, Point, Size, TextDirection,
};
use readmore_core::style::TextStyle;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cell width of `ch`; control characters take no space.
fn cell_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Width of a line ignoring the whitespace it hangs at its end.
fn visible_width(line: &str) -> usize {
    UnicodeWidthStr::width(line.trim_end())
}

/// Layout oracle for a monospace terminal grid. One unit is one cell; one
/// line is one row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellLayout;

impl CellLayout {
    /// Byte offset within `line` of the glyph covering cell `column`, `None`
    /// past the last glyph. Unlike `offset_at_point` this never rounds to the
    /// nearest caret: both cells of a wide glyph hit that glyph.
    pub fn glyph_at_cell(line: &str, column: usize) -> Option<usize> {
        let mut advance = 0;
        for (offset, ch) in line.char_indices() {
            let w = cell_width(ch);
            if column < advance + w {
                return Some(offset);
            }
            advance += w;
        }
        None
    }

    /// Split `text` into wrapped lines of at most `max_width` cells.
    ///
    /// Returns byte ranges into `text`. Forced breaks (`\n`) are excluded
    /// from both neighbouring lines; whitespace at a soft break stays at the
    /// end of the earlier line. Empty text yields one empty line.
    pub fn line_ranges(text: &str, max_width: usize) -> Vec<Range<usize>> {
        let max_width = max_width.max(1);
        let mut lines = Vec::new();
        let mut start = 0;
        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                wrap_paragraph(text, start..i, max_width, &mut lines);
                start = i + 1;
            }
        }
        wrap_paragraph(text, start..text.len(), max_width, &mut lines);
        lines
    }

    fn lines(text: &str, constraints: &LayoutConstraints) -> Vec<Range<usize>> {
        Self::line_ranges(text, constraints.max_width.floor() as usize)
    }
}

fn wrap_paragraph(text: &str, para: Range<usize>, max_width: usize, out: &mut Vec<Range<usize>>) {
    let mut line_start = para.start;
    let mut line_width = 0;
    let mut soft_break: Option<usize> = None;

    for (offset, ch) in text[para.clone()].char_indices() {
        let i = para.start + offset;
        let w = cell_width(ch);
        if ch.is_whitespace() {
            line_width += w;
            soft_break = Some(i + ch.len_utf8());
            continue;
        }
        if i > line_start && line_width + w > max_width {
            match soft_break.take() {
                Some(brk) if brk > line_start => {
                    out.push(line_start..brk);
                    line_start = brk;
                    line_width = UnicodeWidthStr::width(&text[brk..i]);
                    if i > line_start && line_width + w > max_width {
                        out.push(line_start..i);
                        line_start = i;
                        line_width = 0;
                    }
                }
                _ => {
                    out.push(line_start..i);
                    line_start = i;
                    line_width = 0;
                }
            }
        }
        line_width += w;
    }
    out.push(line_start..para.end);
}

fn visible_count(total: usize, max_lines: Option<usize>) -> usize {
    max_lines.map_or(total, |cap| total.min(cap.max(1)))
}

impl LayoutOracle for CellLayout {
    fn measure(
        &self,
        text: &str,
        _style: &TextStyle,
        constraints: &LayoutConstraints,
    ) -> Measurement {
        let lines = Self::lines(text, constraints);
        let visible = visible_count(lines.len(), constraints.max_lines);
        let width = lines[..visible]
            .iter()
            .map(|range| visible_width(&text[range.clone()]))
            .max()
            .unwrap_or(0);
        Measurement {
            overflowed: lines.len() > visible,
            size: Size {
                width: width as f32,
                height: visible as f32,
            },
        }
    }

    fn offset_at_point(
        &self,
        text: &str,
        _style: &TextStyle,
        constraints: &LayoutConstraints,
        point: Point,
    ) -> usize {
        let lines = Self::lines(text, constraints);
        let visible = visible_count(lines.len(), constraints.max_lines);
        let row = (point.y.max(0.0).floor() as usize).min(visible.saturating_sub(1));
        let range = lines[row].clone();

        let x = match constraints.direction {
            TextDirection::Ltr => point.x,
            TextDirection::Rtl => constraints.max_width - point.x,
        };

        let mut byte = range.end;
        let mut advance = 0.0_f32;
        for (offset, ch) in text[range.clone()].char_indices() {
            let w = cell_width(ch) as f32;
            if x < advance + w / 2.0 {
                byte = range.start + offset;
                break;
            }
            advance += w;
        }
        text[..byte].chars().count()
    }
}
