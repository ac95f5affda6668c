//! Layout oracle abstraction.
//!
//! The core never shapes or measures text itself. It asks a [`LayoutOracle`]
//! two questions: does this text overflow these constraints, and which
//! character sits at this point of the laid-out box.

mod mock;

pub use mock::MockOracle;

use serde::{Deserialize, Serialize};

use crate::style::TextStyle;

/// Inline base direction of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Horizontal alignment of lines within the layout box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Aligned to the start edge for the paragraph direction.
    #[default]
    Start,
    End,
    Center,
    Left,
    Right,
}

/// Width and line budget for one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConstraints {
    /// Available width in layout units (pixels, terminal cells, ...).
    pub max_width: f32,
    /// Maximum number of lines, or `None` for unbounded.
    pub max_lines: Option<usize>,
    pub direction: TextDirection,
    pub align: TextAlign,
}

impl LayoutConstraints {
    /// Constraints with a width and line cap, left-to-right, start-aligned.
    pub fn new(max_width: f32, max_lines: Option<usize>) -> Self {
        Self {
            max_width,
            max_lines,
            direction: TextDirection::default(),
            align: TextAlign::default(),
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// The same constraints with a different line cap.
    #[must_use]
    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Whether the width is positive and finite and the line cap, if any, is
    /// at least one.
    pub fn is_valid(&self) -> bool {
        self.max_width.is_finite() && self.max_width > 0.0 && self.max_lines != Some(0)
    }
}

/// A position in the coordinate space of the laid-out box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Extent of a laid-out box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Result of laying out text under constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Measurement {
    /// True when the text needs more lines than the cap allows.
    pub overflowed: bool,
    /// Size of the visible (capped) box.
    pub size: Size,
}

/// Geometric layout capability supplied by the host.
///
/// Implementations are expected to be deterministic: measuring the same
/// inputs twice gives the same answer. The truncation search additionally
/// relies on overflow being monotonic in prefix length.
pub trait LayoutOracle {
    /// Lay out `text` and report whether it overflows `constraints`.
    fn measure(&self, text: &str, style: &TextStyle, constraints: &LayoutConstraints)
    -> Measurement;

    /// Character offset (in `char`s from the start of `text`) closest to
    /// `point` once `text` is laid out under `constraints`.
    ///
    /// Points below the last visible line resolve on that line; points past
    /// the end of a line resolve to the end of that line.
    fn offset_at_point(
        &self,
        text: &str,
        style: &TextStyle,
        constraints: &LayoutConstraints,
        point: Point,
    ) -> usize;
}

impl<T: LayoutOracle + ?Sized> LayoutOracle for &T {
    fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        constraints: &LayoutConstraints,
    ) -> Measurement {
        (**self).measure(text, style, constraints)
    }

    fn offset_at_point(
        &self,
        text: &str,
        style: &TextStyle,
        constraints: &LayoutConstraints,
        point: Point,
    ) -> usize {
        (**self).offset_at_point(text, style, constraints, point)
    }
}
