//! Non-interactive output: wrapped plain lines or JSON.

use readmore_core::{LayoutEnv, ReadMore, StyledPresentation};
use serde_json::json;

use crate::oracle::CellLayout;

/// A laid-out widget ready to print.
pub struct Rendered {
    pub styled: StyledPresentation,
    /// Visible wrapped lines, trailing whitespace removed.
    pub lines: Vec<String>,
    pub width: u16,
}

/// Lay out `widget` at `width` cells and cut the display text into lines.
pub fn render(widget: &mut ReadMore, width: u16) -> Rendered {
    let styled = widget.layout(&CellLayout, &LayoutEnv::new(f32::from(width)));
    let display = styled.presentation.display_text();
    let cap = styled.presentation.line_cap.unwrap_or(usize::MAX);
    let lines = CellLayout::line_ranges(&display, usize::from(width))
        .into_iter()
        .take(cap)
        .map(|range| display[range].trim_end().to_string())
        .collect();
    Rendered {
        styled,
        lines,
        width,
    }
}

impl Rendered {
    /// Lines joined for printing.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// The presentation, styles and lines as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let value = json!({
            "width": self.width,
            "lines": self.lines,
            "text_style": self.styled.text_style,
            "link_style": self.styled.link_style,
            "presentation": self.styled.presentation,
        });
        serde_json::to_string_pretty(&value)
    }
}
