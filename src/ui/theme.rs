use crate::snapshot::{CellKind, Paint};
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub highlight: Color, // Yellow
    pub accent: Color,    // Cyan
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub wall: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    highlight: Color::Rgb(249, 226, 175),
    accent: Color::Rgb(148, 226, 213),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for the bars
    wall: Color::Rgb(17, 17, 27),
};

impl Theme {
    /// Terminal color for a snapshot paint
    pub fn paint(&self, paint: Paint) -> Color {
        match paint {
            Paint::White => self.fg,
            Paint::Black => self.bg,
            Paint::Yellow => self.highlight,
            Paint::Red => self.error,
            Paint::Green => self.success,
            Paint::Cyan => self.accent,
            Paint::LightGray => self.comment,
            Paint::Orange => self.secondary,
        }
    }

    pub fn cell(&self, cell: CellKind) -> Color {
        match cell {
            CellKind::Wall => self.wall,
            CellKind::Path => self.fg,
            CellKind::Visited => self.error,
            CellKind::Start => self.success,
            CellKind::End => self.secondary,
        }
    }
}
