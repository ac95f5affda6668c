//! Truncation engine.
//!
//! Finds the longest prefix of a text that, followed by an ellipsis and a
//! "see more" label, still fits a width and line budget. The engine only
//! talks to the host through a [`LayoutOracle`].
//!
//! Two strategies are available behind the [`Truncator`] trait:
//!
//! - [`PrecisionTruncation`] (default) binary-searches the prefix length and
//!   verifies every candidate with a full measurement.
//! - [`FastCornerTruncation`] asks the oracle once for the character under the
//!   bottom corner of the capped box, offset by the width of the suffix.


use serde::{Deserialize, Serialize};

use crate::layout::{LayoutConstraints, LayoutOracle, Measurement, Point, TextDirection};
use crate::style::TextStyle;
use crate::text::char_boundaries;

/// Default ellipsis inserted between the prefix and the label.
pub const DEFAULT_ELLIPSIS: &str = "…";

/// Outcome of a truncation that was actually needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruncationResult {
    /// Leading part of the source text; never empty.
    pub truncated_text: String,
    /// Whether the affordance should be preceded by the ellipsis. False when
    /// the label alone already fills the last line.
    pub needs_ellipsis_suffix: bool,
}

/// Which [`Truncator`] the engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationStrategy {
    /// Binary search with full verification of each candidate.
    #[default]
    Precision,
    /// Single offset-at-point query at the bottom corner.
    FastCorner,
}

impl TruncationStrategy {
    /// The truncator implementing this strategy.
    pub fn truncator(self) -> &'static dyn Truncator {
        match self {
            TruncationStrategy::Precision => &PrecisionTruncation,
            TruncationStrategy::FastCorner => &FastCornerTruncation,
        }
    }
}

/// Inputs shared by every strategy.
#[derive(Debug, Clone, Copy)]
pub struct TruncationRequest<'a> {
    pub text: &'a str,
    pub style: &'a TextStyle,
    pub constraints: LayoutConstraints,
    pub label: &'a str,
    pub ellipsis: &'a str,
}

/// Raw cut point proposed by a strategy, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cut {
    /// Prefix length in characters.
    pub chars: usize,
    pub needs_ellipsis_suffix: bool,
}

/// A way of choosing the cut point once the full text is known to overflow.
pub trait Truncator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Propose a cut for `request`. `full` is the measurement of the whole
    /// text under the request constraints, which overflowed.
    fn cut(
        &self,
        oracle: &dyn LayoutOracle,
        request: &TruncationRequest<'_>,
        full: &Measurement,
    ) -> Cut;
}

/// Binary search over prefix length.
///
/// Assumes that if `prefix + suffix` overflows, every longer prefix does too.
/// Costs `O(log n)` oracle calls for a text of `n` characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecisionTruncation;

impl Truncator for PrecisionTruncation {
    fn name(&self) -> &'static str {
        "precision"
    }

    fn cut(
        &self,
        oracle: &dyn LayoutOracle,
        request: &TruncationRequest<'_>,
        _full: &Measurement,
    ) -> Cut {
        let text = request.text;
        let boundaries = char_boundaries(text);
        let char_count = boundaries.len() - 1;

        let mut candidate =
            String::with_capacity(text.len() + request.ellipsis.len() + request.label.len());
        let mut low = 0;
        let mut high = char_count;
        let mut best = 0;
        let mut probes = 0;

        while low <= high {
            let mid = low + (high - low) / 2;
            candidate.clear();
            candidate.push_str(&text[..boundaries[mid]]);
            candidate.push_str(request.ellipsis);
            candidate.push_str(request.label);
            probes += 1;

            let fits = !oracle
                .measure(&candidate, request.style, &request.constraints)
                .overflowed;
            if fits {
                best = mid;
                low = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                high = mid - 1;
            }
        }

        tracing::debug!(probes, best, char_count, "prefix search finished");
        Cut {
            chars: best,
            needs_ellipsis_suffix: true,
        }
    }
}

/// Corner offset heuristic.
///
/// Measures `ellipsis + label` on one line. When it fits, the cut is the
/// character under the point that far in from the trailing edge of the last
/// visible line. Otherwise the cut is the character at the trailing corner
/// itself and the ellipsis is dropped. The whole suffix is measured, so a
/// label that fits on its own still takes the corner cut when the ellipsis
/// pushes it past the line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastCornerTruncation;

impl Truncator for FastCornerTruncation {
    fn name(&self) -> &'static str {
        "fast_corner"
    }

    fn cut(
        &self,
        oracle: &dyn LayoutOracle,
        request: &TruncationRequest<'_>,
        full: &Measurement,
    ) -> Cut {
        let constraints = &request.constraints;
        let suffix = format!("{}{}", request.ellipsis, request.label);
        let suffix_measure =
            oracle.measure(&suffix, request.style, &constraints.with_max_lines(Some(1)));

        let needs_ellipsis_suffix = !suffix_measure.overflowed;
        let inset = if needs_ellipsis_suffix {
            suffix_measure.size.width.min(constraints.max_width)
        } else {
            0.0
        };
        let x = match constraints.direction {
            TextDirection::Ltr => constraints.max_width - inset,
            TextDirection::Rtl => inset,
        };

        let offset = oracle.offset_at_point(
            request.text,
            request.style,
            constraints,
            Point::new(x, full.size.height),
        );
        tracing::debug!(offset, needs_ellipsis_suffix, "corner offset resolved");
        Cut {
            chars: offset,
            needs_ellipsis_suffix,
        }
    }
}

/// Computes truncated display text with a configured strategy and ellipsis.
///
/// # Examples
///
/// ```
/// use readmore_core::layout::{LayoutConstraints, MockOracle};
/// use readmore_core::style::TextStyle;
/// use readmore_core::truncation::TruncationEngine;
///
/// let oracle = MockOracle::new();
/// let engine = TruncationEngine::default();
/// let constraints = LayoutConstraints::new(8.0, Some(1));
///
/// let result = engine
///     .compute(&oracle, "AAAAAAAAAA", &TextStyle::default(), &constraints, "More")
///     .unwrap();
/// assert_eq!(result.truncated_text, "AAA");
///
/// // Short text needs no truncation.
/// assert!(engine.compute(&oracle, "AAA", &TextStyle::default(), &constraints, "More").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationEngine {
    strategy: TruncationStrategy,
    ellipsis: String,
}

impl Default for TruncationEngine {
    fn default() -> Self {
        Self::new(TruncationStrategy::default())
    }
}

impl TruncationEngine {
    /// Create an engine using `strategy` and the default ellipsis.
    pub fn new(strategy: TruncationStrategy) -> Self {
        Self {
            strategy,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
        }
    }

    /// Use a custom ellipsis string.
    #[must_use]
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    pub fn strategy(&self) -> TruncationStrategy {
        self.strategy
    }

    pub fn ellipsis(&self) -> &str {
        &self.ellipsis
    }

    /// Compute the collapsed text for `text`, or `None` when it already fits.
    ///
    /// Empty text, a non-positive width, and a missing or zero line cap are
    /// treated as "nothing to do" and also return `None` without consulting
    /// the oracle.
    pub fn compute(
        &self,
        oracle: &dyn LayoutOracle,
        text: &str,
        style: &TextStyle,
        constraints: &LayoutConstraints,
        label: &str,
    ) -> Option<TruncationResult> {
        if text.is_empty() || !constraints.is_valid() || constraints.max_lines.is_none() {
            return None;
        }

        let full = oracle.measure(text, style, constraints);
        if !full.overflowed {
            return None;
        }

        let request = TruncationRequest {
            text,
            style,
            constraints: *constraints,
            label,
            ellipsis: &self.ellipsis,
        };
        let truncator = self.strategy.truncator();
        let cut = truncator.cut(oracle, &request, &full);

        let boundaries = char_boundaries(text);
        let char_count = boundaries.len() - 1;
        let chars = cut.chars.clamp(1, char_count);
        tracing::debug!(
            strategy = truncator.name(),
            proposed = cut.chars,
            chars,
            char_count,
            "text truncated"
        );

        Some(TruncationResult {
            truncated_text: text[..boundaries[chars]].to_string(),
            needs_ellipsis_suffix: cut.needs_ellipsis_suffix,
        })
    }
}
