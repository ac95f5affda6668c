//! Deterministic layout oracle for testing.
//!
//! Provides [`MockOracle`], a fixed-metrics [`LayoutOracle`] that wraps text
//! at character granularity. Frontends can use it to test truncation logic
//! without a real text shaper.

use std::cell::Cell;
use std::collections::HashMap;

use super::{LayoutConstraints, LayoutOracle, Measurement, Point, Size, TextDirection};
use crate::style::TextStyle;

/// Height of one line in layout units.
const LINE_HEIGHT: f32 = 1.0;

/// One wrapped line, in `char` indices.
#[derive(Debug, Clone, Copy)]
struct MockLine {
    start: usize,
    end: usize,
    width: f32,
}

/// A layout oracle with fixed per-glyph advances.
///
/// Every glyph is one unit wide unless overridden with
/// [`with_glyph_width`](MockOracle::with_glyph_width). Lines break before the
/// glyph that would exceed the width and after every `\n`. Each line is one
/// unit high. The oracle counts how many queries it has answered.
///
/// # Examples
///
/// ```
/// use readmore_core::layout::{LayoutConstraints, LayoutOracle, MockOracle};
/// use readmore_core::style::TextStyle;
///
/// let oracle = MockOracle::new();
/// let fits = oracle.measure("abcde", &TextStyle::default(), &LayoutConstraints::new(5.0, Some(1)));
/// assert!(!fits.overflowed);
///
/// let wraps = oracle.measure("abcdef", &TextStyle::default(), &LayoutConstraints::new(5.0, Some(1)));
/// assert!(wraps.overflowed);
/// assert_eq!(oracle.calls(), 2);
/// ```
#[derive(Debug)]
pub struct MockOracle {
    default_width: f32,
    glyph_widths: HashMap<char, f32>,
    calls: Cell<usize>,
}

impl Default for MockOracle {
    fn default() -> Self {
        Self {
            default_width: 1.0,
            glyph_widths: HashMap::new(),
            calls: Cell::new(0),
        }
    }
}

impl MockOracle {
    /// Create an oracle where every glyph is one unit wide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `ch` a custom advance width.
    #[must_use]
    pub fn with_glyph_width(mut self, ch: char, width: f32) -> Self {
        self.glyph_widths.insert(ch, width);
        self
    }

    /// Number of `measure` and `offset_at_point` calls answered so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Reset the call counter.
    pub fn reset_calls(&self) {
        self.calls.set(0);
    }

    fn glyph_width(&self, ch: char) -> f32 {
        self.glyph_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_width)
    }

    fn wrap(&self, chars: &[char], max_width: f32) -> Vec<MockLine> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut width = 0.0;
        for (i, &ch) in chars.iter().enumerate() {
            if ch == '\n' {
                lines.push(MockLine { start, end: i, width });
                start = i + 1;
                width = 0.0;
                continue;
            }
            let advance = self.glyph_width(ch);
            if i > start && width + advance > max_width {
                lines.push(MockLine { start, end: i, width });
                start = i;
                width = 0.0;
            }
            width += advance;
        }
        lines.push(MockLine {
            start,
            end: chars.len(),
            width,
        });
        lines
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

fn visible_count(total: usize, max_lines: Option<usize>) -> usize {
    max_lines.map_or(total, |cap| total.min(cap.max(1)))
}

impl LayoutOracle for MockOracle {
    fn measure(
        &self,
        text: &str,
        _style: &TextStyle,
        constraints: &LayoutConstraints,
    ) -> Measurement {
        self.tick();
        let chars: Vec<char> = text.chars().collect();
        let lines = self.wrap(&chars, constraints.max_width);
        let visible = visible_count(lines.len(), constraints.max_lines);
        let width = lines[..visible]
            .iter()
            .map(|l| l.width)
            .fold(0.0_f32, f32::max);
        Measurement {
            overflowed: lines.len() > visible,
            size: Size {
                width,
                height: visible as f32 * LINE_HEIGHT,
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
        self.tick();
        let chars: Vec<char> = text.chars().collect();
        let lines = self.wrap(&chars, constraints.max_width);
        let visible = visible_count(lines.len(), constraints.max_lines);

        let row = (point.y.max(0.0) / LINE_HEIGHT).floor() as usize;
        let line = lines[row.min(visible - 1)];

        // RTL lines run from the right edge of the box.
        let x = match constraints.direction {
            TextDirection::Ltr => point.x,
            TextDirection::Rtl => constraints.max_width - point.x,
        };

        let mut advance = 0.0;
        for (idx, &ch) in chars[line.start..line.end].iter().enumerate() {
            let w = self.glyph_width(ch);
            if x < advance + w / 2.0 {
                return line.start + idx;
            }
            advance += w;
        }
        line.end
    }
}
