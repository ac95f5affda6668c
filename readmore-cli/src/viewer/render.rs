//! TUI rendering functions for the viewer.
//!
//! Provides [`render_ui`] and its helpers that draw the collapsible text box
//! and the status bar using `ratatui`.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use readmore_core::style::{self, TextStyle};
use readmore_core::text::truncate;

use super::app::ViewerApp;

/// Height of the status bar at the bottom (in terminal rows).
const STATUS_HEIGHT: u16 = 1;

/// Rows taken by the text box border (top and bottom).
const BORDER_ROWS: u16 = 2;

const HELP: &str = " Tab: next link | Enter: tap | click: tap | q: quit";

/// Height of the bordered text box for `rows` wrapped rows, saturating at
/// the terminal's coordinate range.
fn box_height(rows: usize) -> u16 {
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_add(BORDER_ROWS)
}

/// Render the UI to the terminal frame.
pub(super) fn render_ui(frame: &mut Frame, app: &mut ViewerApp, now: Instant) {
    let area = frame.area();
    let rows = app.visible_rows(now);

    // Text box sized to the visible rows, free space, status bar
    let layout = Layout::vertical([
        Constraint::Length(box_height(rows)),
        Constraint::Min(0),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .split(area);

    render_text(frame, app, layout[0], usize::from(rows));
    render_status_bar(frame, app, layout[2]);
}

/// Render the bordered text box showing the first `rows` wrapped lines.
fn render_text(frame: &mut Frame, app: &mut ViewerApp, area: Rect, rows: usize) {
    let block = Block::default().borders(Borders::ALL).title(" Readmore ");
    app.text_area = block.inner(area);

    let lines = build_lines(app, rows);
    let text = Paragraph::new(lines)
        .block(block)
        .alignment(app.alignment());
    frame.render_widget(text, area);
}

/// Render the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, app: &ViewerApp, area: Rect) {
    let status_text = app.status_message.as_deref().unwrap_or(HELP);
    let status_text = truncate(status_text, usize::from(area.width));

    let status =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status, area);
}

/// Build styled lines for the first `rows` wrapped lines of the presentation.
///
/// Each wrapped line is cut into pieces at span boundaries so a token broken
/// across two lines keeps its style on both.
pub(super) fn build_lines(app: &ViewerApp, rows: usize) -> Vec<Line<'static>> {
    let Some(styled) = app.styled.as_ref() else {
        return Vec::new();
    };
    let text_style = to_ratatui_style(&styled.text_style);
    let link_style = to_ratatui_style(&styled.link_style);

    app.lines
        .iter()
        .take(rows)
        .map(|line| {
            let pieces: Vec<Span<'static>> = styled
                .presentation
                .spans
                .iter()
                .enumerate()
                .filter_map(|(i, span)| {
                    let start = span.range.start.max(line.start);
                    let end = span.range.end.min(line.end);
                    if start >= end {
                        return None;
                    }
                    let mut style = if span.kind.is_link_styled() {
                        link_style
                    } else {
                        text_style
                    };
                    if app.focus == Some(i) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Some(Span::styled(app.display[start..end].to_string(), style))
                })
                .collect();
            Line::from(pieces)
        })
        .collect()
}

/// Map a core text style onto a ratatui style.
pub(super) fn to_ratatui_style(text_style: &TextStyle) -> Style {
    let mut style = Style::default();
    if let Some(color) = text_style.color {
        style = style.fg(to_ratatui_color(color));
    }
    if text_style.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if text_style.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if text_style.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

fn to_ratatui_color(color: style::Color) -> Color {
    match color {
        style::Color::Black => Color::Black,
        style::Color::Red => Color::Red,
        style::Color::Green => Color::Green,
        style::Color::Yellow => Color::Yellow,
        style::Color::Blue => Color::Blue,
        style::Color::Magenta => Color::Magenta,
        style::Color::Cyan => Color::Cyan,
        style::Color::Gray => Color::Gray,
        style::Color::DarkGray => Color::DarkGray,
        style::Color::White => Color::White,
        style::Color::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}
