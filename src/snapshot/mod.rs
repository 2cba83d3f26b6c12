//! Step snapshots and the histories that hold them
//!
//! Every engine run produces a [`History`]: an ordered list of immutable
//! [`Step`]s. A step is a complete description of what to draw, so any step
//! can be rendered without looking at the one before it.
//!
//! - [`SortStep`]: array values plus highlight index sets
//! - [`GraphStep`]: positioned nodes and edges (trees and graphs)
//! - [`GridStep`]: a 2D grid of [`CellKind`] (mazes)

use std::collections::BTreeSet;
use std::fmt;

/// Palette used for node, edge and text highlights.
///
/// Colors are semantic names only; the renderer decides the actual shade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Paint {
    #[default]
    White,
    Black,
    Yellow,
    Red,
    Green,
    Cyan,
    LightGray,
    Orange,
}

/// A position on the logical canvas (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Snapshot of an array being sorted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortStep {
    pub values: Vec<i32>,
    pub message: String,
    pub compared: BTreeSet<usize>,
    pub pivot: BTreeSet<usize>,
    pub swapped: BTreeSet<usize>,
    pub sorted: BTreeSet<usize>,
}

impl SortStep {
    pub fn new(values: &[i32], message: impl Into<String>) -> Self {
        SortStep {
            values: values.to_vec(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn compared(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.compared = indices.into_iter().collect();
        self
    }

    pub fn pivot(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.pivot = indices.into_iter().collect();
        self
    }

    pub fn swapped(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.swapped = indices.into_iter().collect();
        self
    }

    pub fn sorted(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.sorted = indices.into_iter().collect();
        self
    }
}

/// A node as drawn on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    /// Unique within one step
    pub id: usize,
    pub label: String,
    pub position: Point,
    pub fill: Paint,
    pub text: Paint,
}

impl NodeView {
    pub fn new(id: usize, label: impl Into<String>, position: Point) -> Self {
        NodeView {
            id,
            label: label.into(),
            position,
            fill: Paint::White,
            text: Paint::Black,
        }
    }
}

/// An edge as drawn on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub from: usize,
    pub to: usize,
    pub color: Paint,
    pub weight_label: Option<String>,
}

impl EdgeView {
    pub fn new(from: usize, to: usize) -> Self {
        EdgeView {
            from,
            to,
            color: Paint::White,
            weight_label: None,
        }
    }
}

/// Snapshot of a node/edge diagram (binary trees and weighted graphs)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphStep {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub message: String,
}

impl GraphStep {
    pub fn new(message: impl Into<String>) -> Self {
        GraphStep {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn node(&self, id: usize) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Recolor a single node. Unknown ids are ignored so a stale id can
    /// never corrupt another node's highlight.
    pub fn highlight(&mut self, id: usize, fill: Paint) {
        self.highlight_with_text(id, fill, Paint::Black);
    }

    pub fn highlight_with_text(&mut self, id: usize, fill: Paint, text: Paint) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.fill = fill;
            node.text = text;
        }
    }

    /// Recolor the edge joining `a` and `b`, in either direction
    pub fn highlight_edge(&mut self, a: usize, b: usize, color: Paint) {
        if let Some(edge) = self
            .edges
            .iter_mut()
            .find(|e| (e.from == a && e.to == b) || (e.from == b && e.to == a))
        {
            edge.color = color;
        }
    }
}

/// Contents of one maze grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Path,
    Visited,
    Start,
    End,
}

impl CellKind {
    /// Anything a walker could stand on
    pub fn is_open(self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

/// Snapshot of a maze grid, indexed `grid[y][x]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridStep {
    pub grid: Vec<Vec<CellKind>>,
    pub message: String,
}

/// One rendering-ready state of an algorithm run
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Sort(SortStep),
    Graph(GraphStep),
    Grid(GridStep),
}

impl Step {
    pub fn message(&self) -> &str {
        match self {
            Step::Sort(step) => &step.message,
            Step::Graph(step) => &step.message,
            Step::Grid(step) => &step.message,
        }
    }

    pub fn as_sort(&self) -> Option<&SortStep> {
        match self {
            Step::Sort(step) => Some(step),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&GraphStep> {
        match self {
            Step::Graph(step) => Some(step),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridStep> {
        match self {
            Step::Grid(step) => Some(step),
            _ => None,
        }
    }
}

impl From<SortStep> for Step {
    fn from(step: SortStep) -> Self {
        Step::Sort(step)
    }
}

impl From<GraphStep> for Step {
    fn from(step: GraphStep) -> Self {
        Step::Graph(step)
    }
}

impl From<GridStep> for Step {
    fn from(step: GridStep) -> Self {
        Step::Grid(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Ordered, append-only list of steps produced by one engine invocation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    steps: Vec<Step>,
}

impl History {
    pub fn new() -> Self {
        History { steps: Vec::new() }
    }

    /// Add a step to the end of the history
    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    /// Append every step of another history, preserving order
    pub fn append(&mut self, other: History) {
        self.steps.extend(other.steps);
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Shorten the history to at most `limit` steps, always keeping the
    /// final step. Returns how many steps were dropped.
    pub fn truncate_keep_last(&mut self, limit: usize) -> usize {
        if self.steps.len() <= limit {
            return 0;
        }
        let dropped = self.steps.len() - limit;
        match limit {
            0 => self.steps.clear(),
            _ => {
                self.steps.drain(limit - 1..self.steps.len() - 1);
            }
        }
        dropped
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl FromIterator<Step> for History {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        History {
            steps: iter.into_iter().collect(),
        }
    }
}
