//! Text styles and explicit style resolution.

use serde::{Deserialize, Serialize};

/// A terminal-friendly color description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    DarkGray,
    White,
    /// A 24-bit color.
    Rgb(u8, u8, u8),
}

/// Visual attributes applied to a run of text.
///
/// Styles are plain values; the layout oracle may use them to pick glyph
/// metrics and the view layer to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Foreground color, or the host default when `None`.
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    /// Return a copy of this style with the given foreground color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Compute the effective style from explicit and ambient inputs.
///
/// An explicit style always wins. Otherwise the ambient default is used,
/// tinted with `theme_accent` when one is given.
///
/// # Examples
///
/// ```
/// use readmore_core::style::{Color, TextStyle, resolve_style};
///
/// let ambient = TextStyle::default();
/// let link = resolve_style(None, &ambient, Some(Color::Cyan));
/// assert_eq!(link.color, Some(Color::Cyan));
/// ```
pub fn resolve_style(
    explicit: Option<&TextStyle>,
    ambient_default: &TextStyle,
    theme_accent: Option<Color>,
) -> TextStyle {
    match (explicit, theme_accent) {
        (Some(style), _) => style.clone(),
        (None, Some(accent)) => ambient_default.clone().with_color(accent),
        (None, None) => ambient_default.clone(),
    }
}
