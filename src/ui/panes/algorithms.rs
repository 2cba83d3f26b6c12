//! Algorithm catalogue pane

use crate::controller::Algorithm;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the list with the cursor row highlighted and the running
/// algorithm marked
pub fn render_algorithm_pane(
    frame: &mut Frame,
    area: Rect,
    cursor: usize,
    active: Option<Algorithm>,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let items: Vec<ListItem> = Algorithm::ALL
        .iter()
        .enumerate()
        .map(|(i, &algorithm)| {
            let marker = if active == Some(algorithm) { "▶ " } else { "  " };
            let style = if i == cursor {
                Style::default()
                    .bg(DEFAULT_THEME.primary)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.success)),
                Span::styled(algorithm.name(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Algorithms ")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(list, area);
}
