//! Per-widget memo of the last truncation result.

use crate::layout::TextDirection;
use crate::style::TextStyle;
use crate::truncation::{TruncationResult, TruncationStrategy};

/// Everything a truncation result depends on.
///
/// Widths are compared bit-for-bit, so `-0.0` and `0.0` are distinct keys;
/// both are invalid widths anyway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub style: TextStyle,
    width_bits: u32,
    pub max_lines: usize,
    pub direction: TextDirection,
    pub label: String,
    pub ellipsis: String,
    pub strategy: TruncationStrategy,
}

impl CacheKey {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        text: &str,
        style: &TextStyle,
        width: f32,
        max_lines: usize,
        direction: TextDirection,
        label: &str,
        ellipsis: &str,
        strategy: TruncationStrategy,
    ) -> Self {
        Self {
            text: text.to_string(),
            style: style.clone(),
            width_bits: width.to_bits(),
            max_lines,
            direction,
            label: label.to_string(),
            ellipsis: ellipsis.to_string(),
            strategy,
        }
    }

    pub fn width(&self) -> f32 {
        f32::from_bits(self.width_bits)
    }
}

/// Single-entry cache owned by one widget instance.
///
/// Holds the result for the most recent key only; any change in a key
/// component triggers recomputation.
#[derive(Debug, Default)]
pub struct TruncationCache {
    entry: Option<(CacheKey, Option<TruncationResult>)>,
    hits: usize,
    misses: usize,
}

impl TruncationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached result for `key`, computing and storing it on a miss.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> Option<TruncationResult>
    where
        F: FnOnce() -> Option<TruncationResult>,
    {
        if let Some((cached_key, result)) = &self.entry {
            if *cached_key == key {
                self.hits += 1;
                tracing::trace!(width = key.width(), "truncation cache hit");
                return result.clone();
            }
        }

        self.misses += 1;
        let result = compute();
        self.entry = Some((key, result.clone()));
        result
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
