//! Canvas pane: draws the current step
//!
//! Sort steps become a bar chart, tree and graph steps are drawn on a
//! braille canvas in logical coordinates, and maze steps are a block grid.

use crate::snapshot::{GraphStep, GridStep, SortStep, Step};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Bar, BarChart, BarGroup, Block, Borders, Paragraph,
    },
    Frame,
};

/// Node radius in logical canvas units
const NODE_RADIUS: f64 = 18.0;

/// Weight labels get noisy past this many edges
const MAX_LABELED_EDGES: usize = 150;

/// Render the canvas pane. `logical` is the canvas size node positions were
/// computed against.
pub fn render_canvas_pane(
    frame: &mut Frame,
    area: Rect,
    step: Option<&Step>,
    title: &str,
    logical: (f64, f64),
) {
    let mut block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let Some(step) = step else {
        let paragraph = Paragraph::new("Select an algorithm and press Enter")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    block = block.title_bottom(Line::from(Span::styled(
        format!(" {} ", step.message()),
        Style::default().fg(DEFAULT_THEME.fg),
    )));

    match step {
        Step::Sort(sort) => render_bars(frame, area, block, sort),
        Step::Graph(graph) => render_graph(frame, area, block, graph, logical),
        Step::Grid(grid) => render_grid(frame, area, block, grid),
    }
}

/// Bar color; sorted beats swapped beats pivot beats compared
pub fn bar_color(step: &SortStep, index: usize) -> Color {
    if step.sorted.contains(&index) {
        DEFAULT_THEME.success
    } else if step.swapped.contains(&index) {
        DEFAULT_THEME.error
    } else if step.pivot.contains(&index) {
        DEFAULT_THEME.primary
    } else if step.compared.contains(&index) {
        DEFAULT_THEME.highlight
    } else {
        DEFAULT_THEME.comment
    }
}

/// Bar width and gap that fit `count` bars into `width` columns
pub fn bar_layout(width: u16, count: usize) -> (u16, u16) {
    let count = u16::try_from(count.max(1)).unwrap_or(u16::MAX);
    let slot = (width / count).max(1);
    if slot >= 3 {
        (slot - 1, 1)
    } else {
        (slot, 0)
    }
}

fn render_bars(frame: &mut Frame, area: Rect, block: Block, step: &SortStep) {
    let bars: Vec<Bar> = step
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            Bar::default()
                .value(u64::try_from(v).unwrap_or(0))
                .text_value(String::new())
                .style(Style::default().fg(bar_color(step, i)))
        })
        .collect();

    let (bar_width, bar_gap) = bar_layout(area.width.saturating_sub(2), bars.len());
    let max = step.values.iter().copied().max().unwrap_or(1).max(1);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(u64::try_from(max).unwrap_or(1));
    frame.render_widget(chart, area);
}

fn render_graph(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    step: &GraphStep,
    (width, height): (f64, f64),
) {
    // Deep trees can run past the logical canvas
    let bottom = step
        .nodes
        .iter()
        .map(|n| n.position.y + NODE_RADIUS * 2.0)
        .fold(height, f64::max);
    let flip = |y: f64| bottom - y;
    let label_edges = step.edges.len() <= MAX_LABELED_EDGES;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, bottom])
        .paint(|ctx| {
            for edge in &step.edges {
                let (Some(from), Some(to)) = (step.node(edge.from), step.node(edge.to)) else {
                    continue;
                };
                ctx.draw(&CanvasLine {
                    x1: from.position.x,
                    y1: flip(from.position.y),
                    x2: to.position.x,
                    y2: flip(to.position.y),
                    color: DEFAULT_THEME.paint(edge.color),
                });
            }
            for node in &step.nodes {
                ctx.draw(&Circle {
                    x: node.position.x,
                    y: flip(node.position.y),
                    radius: NODE_RADIUS,
                    color: DEFAULT_THEME.paint(node.fill),
                });
            }

            ctx.layer();
            if label_edges {
                for edge in &step.edges {
                    let (Some(label), Some(from), Some(to)) =
                        (&edge.weight_label, step.node(edge.from), step.node(edge.to))
                    else {
                        continue;
                    };
                    ctx.print(
                        (from.position.x + to.position.x) / 2.0,
                        flip((from.position.y + to.position.y) / 2.0),
                        Span::styled(label.clone(), Style::default().fg(DEFAULT_THEME.accent)),
                    );
                }
            }
            for node in &step.nodes {
                ctx.print(
                    node.position.x - NODE_RADIUS / 2.0,
                    flip(node.position.y),
                    Span::styled(
                        node.label.clone(),
                        Style::default()
                            .fg(DEFAULT_THEME.paint(node.fill))
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn render_grid(frame: &mut Frame, area: Rect, block: Block, step: &GridStep) {
    let columns = step.grid.first().map_or(0, |row| row.len());
    let inner_width = usize::from(area.width.saturating_sub(2));
    let cell = if inner_width >= columns * 2 { "██" } else { "█" };

    let lines: Vec<Line> = step
        .grid
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&kind| Span::styled(cell, Style::default().fg(DEFAULT_THEME.cell(kind))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_color_priority() {
        let step = SortStep::new(&[3, 2, 1, 4], "x")
            .compared([0, 1, 3])
            .pivot([1, 3])
            .swapped([2, 3])
            .sorted([3]);

        assert_eq!(bar_color(&step, 0), DEFAULT_THEME.highlight);
        assert_eq!(bar_color(&step, 1), DEFAULT_THEME.primary);
        assert_eq!(bar_color(&step, 2), DEFAULT_THEME.error);
        assert_eq!(bar_color(&step, 3), DEFAULT_THEME.success);
    }

    #[test]
    fn test_bar_layout() {
        assert_eq!(bar_layout(100, 50), (2, 0));
        assert_eq!(bar_layout(200, 50), (3, 1));
        assert_eq!(bar_layout(10, 50), (1, 0));
        assert_eq!(bar_layout(10, 0), (9, 1));
    }
}
