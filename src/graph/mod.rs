//! Weighted undirected graph engine
//!
//! [`Graph::generate`] lays nodes out on a grid and randomly wires grid
//! neighbours together; the traversals then replay over that fixed layout:
//!
//! - [`Graph::bfs`] / [`Graph::dfs`]: visited-set traversals
//! - [`Graph::dijkstra`]: shortest path with a lazy priority queue
//! - [`Graph::prim_mst`]: lazy Prim minimum spanning tree
//!
//! # Colors
//!
//! Nodes: current red, frontier yellow, visited green, untouched white.
//! Edges: highlighted path/tree orange, both ends visited light grey,
//! otherwise white. Every edge carries its weight label.
//!
//! # Queue order
//!
//! Dijkstra and Prim pop the smallest key first. Among equal keys the larger
//! node id wins, the order a max-heap over `(-key, node)` pairs produces.

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DIAGONAL_EDGE_CHANCE, EDGE_WEIGHT_RANGE, ORTHOGONAL_EDGE_CHANCE,
};
use crate::error::{Result, VizError};
use crate::snapshot::{EdgeView, GraphStep, History, NodeView, Paint, Point};
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

pub type Weight = u32;

/// Key for an undirected edge: `(min, max)`
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Highlight state passed to [`Graph::snapshot`]
#[derive(Debug, Default)]
struct Marks<'a> {
    visited: Option<&'a FxHashSet<usize>>,
    frontier: Option<&'a FxHashSet<usize>>,
    current: Option<usize>,
    highlighted: Option<&'a FxHashSet<(usize, usize)>>,
}

/// Undirected weighted graph with fixed node positions
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    weights: FxHashMap<(usize, usize), Weight>,
    positions: Vec<Point>,
    canvas: (f64, f64),
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            canvas: (CANVAS_WIDTH, CANVAS_HEIGHT),
            ..Default::default()
        }
    }

    /// Use a different logical canvas for the grid layout
    pub fn with_canvas(width: f64, height: f64) -> Self {
        Graph {
            canvas: (width, height),
            ..Default::default()
        }
    }

    /// Build a graph from an explicit edge list, laid out on the usual grid
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, Weight)]) -> Result<Self> {
        let mut graph = Graph::new();
        graph.reset(node_count);
        for &(a, b, weight) in edges {
            graph.check_node(a)?;
            graph.check_node(b)?;
            graph.connect(a, b, weight);
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map_or(&[], |n| n.as_slice())
    }

    pub fn edge_weight(&self, a: usize, b: usize) -> Option<Weight> {
        self.weights.get(&edge_key(a, b)).copied()
    }

    pub fn position(&self, node: usize) -> Option<Point> {
        self.positions.get(node).copied()
    }

    /// Every node reachable from node 0 (trivially true when empty)
    pub fn is_connected(&self) -> bool {
        match self.node_count() {
            0 => true,
            n => self.reachable_from(0).len() == n,
        }
    }

    /// Generate a random grid graph, replacing the current one.
    ///
    /// Orthogonal neighbours connect with 80% probability, diagonal ones
    /// with 30%. Isolated nodes and then any leftover components are joined
    /// to their numeric neighbour, so the result is always connected.
    pub fn generate(&mut self, node_count: usize, rng: &mut impl Rng) -> History {
        self.reset(node_count);
        let columns = self.columns();

        for i in 0..node_count {
            let (r1, c1) = (i / columns, i % columns);
            for j in i + 1..node_count {
                let (r2, c2) = (j / columns, j % columns);
                let chance = match (r1.abs_diff(r2), c1.abs_diff(c2)) {
                    (0, 1) | (1, 0) => ORTHOGONAL_EDGE_CHANCE,
                    (1, 1) => DIAGONAL_EDGE_CHANCE,
                    _ => continue,
                };
                if rng.gen_range(0..100) < chance {
                    let weight = rng.gen_range(EDGE_WEIGHT_RANGE);
                    self.connect(i, j, weight);
                }
            }
        }

        let mut patched = 0;
        for i in 0..node_count {
            if self.adjacency[i].is_empty() {
                let neighbor = if i > 0 { i - 1 } else { i + 1 };
                if neighbor < node_count {
                    let weight = rng.gen_range(EDGE_WEIGHT_RANGE);
                    self.connect(i, neighbor, weight);
                    patched += 1;
                }
            }
        }
        let bridged = self.bridge_components(rng);

        tracing::info!(
            nodes = node_count,
            edges = self.edge_count(),
            patched,
            bridged,
            "generated grid graph"
        );

        let mut history = History::new();
        history.push(self.snapshot(
            format!("Generated Weighted Grid Graph with {} nodes.", node_count),
            Marks::default(),
        ));
        history
    }

    /// Breadth-first traversal from `start`
    pub fn bfs(&self, start: usize) -> Result<History> {
        self.check_node(start)?;
        let mut history = History::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut order = Vec::new();

        history.push(self.snapshot(
            format!("Starting BFS from Node {}", start),
            Marks::default(),
        ));

        visited.insert(start);
        queue.push_back(start);

        while let Some(u) = queue.pop_front() {
            order.push(u);
            let mut frontier: FxHashSet<usize> = queue.iter().copied().collect();
            history.push(self.snapshot(
                format!("Visiting Node {}", u),
                Marks {
                    visited: Some(&visited),
                    frontier: Some(&frontier),
                    current: Some(u),
                    ..Default::default()
                },
            ));

            for &v in &self.adjacency[u] {
                if visited.insert(v) {
                    queue.push_back(v);
                    frontier.insert(v);
                    history.push(self.snapshot(
                        format!("Found unvisited neighbor {}", v),
                        Marks {
                            visited: Some(&visited),
                            frontier: Some(&frontier),
                            current: Some(u),
                            ..Default::default()
                        },
                    ));
                }
            }
        }

        history.push(self.snapshot(
            format!("BFS Complete. Order: {}", join_path(&order)),
            Marks {
                visited: Some(&visited),
                ..Default::default()
            },
        ));
        tracing::debug!(start, steps = history.len(), "bfs recorded");
        Ok(history)
    }

    /// Depth-first traversal from `start`, with a snapshot for every
    /// backtrack. The frontier is the current path from `start`.
    pub fn dfs(&self, start: usize) -> Result<History> {
        self.check_node(start)?;
        let mut walk = DfsWalk {
            graph: self,
            history: History::new(),
            visited: FxHashSet::default(),
            stack: FxHashSet::default(),
            order: Vec::new(),
        };

        walk.history.push(self.snapshot(
            format!("Starting DFS from Node {}", start),
            Marks::default(),
        ));
        walk.visit(start);

        let DfsWalk {
            mut history,
            visited,
            order,
            ..
        } = walk;
        history.push(self.snapshot(
            format!("DFS Complete. Order: {}", join_path(&order)),
            Marks {
                visited: Some(&visited),
                ..Default::default()
            },
        ));
        tracing::debug!(start, steps = history.len(), "dfs recorded");
        Ok(history)
    }

    /// Shortest path from `start` to `end`
    pub fn dijkstra(&self, start: usize, end: usize) -> Result<History> {
        self.check_node(start)?;
        self.check_node(end)?;

        let mut history = History::new();
        let mut visited = FxHashSet::default();
        let mut dist: Vec<Option<Weight>> = vec![None; self.node_count()];
        let mut parent: Vec<Option<usize>> = vec![None; self.node_count()];
        let mut queue = BinaryHeap::new();

        dist[start] = Some(0);
        queue.push((Reverse(0), start));

        history.push(self.snapshot(
            format!("Finding shortest path from {} to {}", start, end),
            Marks {
                visited: Some(&visited),
                current: Some(start),
                ..Default::default()
            },
        ));

        let mut found = false;
        while let Some((Reverse(_), u)) = queue.pop() {
            if !visited.insert(u) {
                continue;
            }

            let marks = Marks {
                visited: Some(&visited),
                current: Some(u),
                ..Default::default()
            };
            if u == end {
                found = true;
                history.push(self.snapshot(format!("Target Node {} Reached!", u), marks));
                break;
            }
            history.push(self.snapshot(format!("Processing Node {}", u), marks));

            let base = dist[u].unwrap_or(0);
            for &v in &self.adjacency[u] {
                if visited.contains(&v) {
                    continue;
                }
                let candidate = base + self.weights[&edge_key(u, v)];
                if dist[v].map_or(true, |d| candidate < d) {
                    dist[v] = Some(candidate);
                    parent[v] = Some(u);
                    queue.push((Reverse(candidate), v));
                    history.push(self.snapshot(
                        format!("Relaxing Edge {}->{}", u, v),
                        Marks {
                            visited: Some(&visited),
                            current: Some(u),
                            ..Default::default()
                        },
                    ));
                }
            }
        }

        if found {
            let mut path = vec![end];
            let mut edges = FxHashSet::default();
            let mut current = end;
            while let Some(prev) = parent[current] {
                edges.insert(edge_key(prev, current));
                path.push(prev);
                current = prev;
            }
            path.reverse();

            history.push(self.snapshot(
                format!("Shortest Path Found: {}", join_path(&path)),
                Marks {
                    visited: Some(&visited),
                    highlighted: Some(&edges),
                    ..Default::default()
                },
            ));
            tracing::debug!(start, end, distance = ?dist[end], "dijkstra reached target");
        } else {
            history.push(self.snapshot(
                format!("Target Node {} is unreachable!", end),
                Marks {
                    visited: Some(&visited),
                    ..Default::default()
                },
            ));
            tracing::debug!(start, end, "dijkstra target unreachable");
        }
        Ok(history)
    }

    /// Lazy Prim's minimum spanning tree grown from `start`
    pub fn prim_mst(&self, start: usize) -> Result<History> {
        self.check_node(start)?;

        let mut history = History::new();
        let mut visited = FxHashSet::default();
        let mut best: Vec<Option<Weight>> = vec![None; self.node_count()];
        let mut parent: Vec<Option<usize>> = vec![None; self.node_count()];
        let mut tree_edges = FxHashSet::default();
        let mut total: Weight = 0;
        let mut queue = BinaryHeap::new();

        best[start] = Some(0);
        queue.push((Reverse(0), start));

        history.push(self.snapshot(
            format!("Starting Prim's MST from Node {}", start),
            Marks {
                visited: Some(&visited),
                current: Some(start),
                ..Default::default()
            },
        ));

        while let Some((Reverse(_), u)) = queue.pop() {
            // Stale entries for already-settled nodes are skipped
            if !visited.insert(u) {
                continue;
            }

            let message = match parent[u] {
                Some(p) => {
                    tree_edges.insert(edge_key(p, u));
                    total += self.weights[&edge_key(p, u)];
                    format!("Added Edge {}-{} to MST.", p, u)
                }
                None => format!("Processing Node {}", u),
            };
            history.push(self.snapshot(
                message,
                Marks {
                    visited: Some(&visited),
                    current: Some(u),
                    highlighted: Some(&tree_edges),
                    ..Default::default()
                },
            ));

            for &v in &self.adjacency[u] {
                if visited.contains(&v) {
                    continue;
                }
                let weight = self.weights[&edge_key(u, v)];
                if best[v].map_or(true, |b| weight < b) {
                    best[v] = Some(weight);
                    parent[v] = Some(u);
                    queue.push((Reverse(weight), v));
                }
            }
        }

        history.push(self.snapshot(
            format!("MST Complete. Total Weight: {}", total),
            Marks {
                visited: Some(&visited),
                highlighted: Some(&tree_edges),
                ..Default::default()
            },
        ));
        tracing::debug!(start, total, edges = tree_edges.len(), "prim recorded");
        Ok(history)
    }

    /// Length of the shortest path, computed without recording anything
    pub fn shortest_distance(&self, start: usize, end: usize) -> Result<Option<Weight>> {
        self.check_node(start)?;
        self.check_node(end)?;

        let mut dist: Vec<Option<Weight>> = vec![None; self.node_count()];
        let mut queue = BinaryHeap::new();
        dist[start] = Some(0);
        queue.push(Reverse((0, start)));

        while let Some(Reverse((d, u))) = queue.pop() {
            if dist[u].is_some_and(|best| d > best) {
                continue;
            }
            for &v in &self.adjacency[u] {
                let candidate = d + self.weights[&edge_key(u, v)];
                if dist[v].map_or(true, |best| candidate < best) {
                    dist[v] = Some(candidate);
                    queue.push(Reverse((candidate, v)));
                }
            }
        }
        Ok(dist[end])
    }

    // ========== Construction helpers ==========

    fn reset(&mut self, node_count: usize) {
        if self.canvas == (0.0, 0.0) {
            self.canvas = (CANVAS_WIDTH, CANVAS_HEIGHT);
        }
        self.adjacency = vec![Vec::new(); node_count];
        self.weights.clear();
        self.positions.clear();

        let columns = self.columns();
        let rows = node_count.div_ceil(columns).max(1);
        let (width, height) = self.canvas;
        let h_spacing = width / (columns + 1) as f64;
        let v_spacing = height / (rows + 1) as f64;

        self.positions = (0..node_count)
            .map(|i| {
                let (r, c) = (i / columns, i % columns);
                Point::new(h_spacing * (c + 1) as f64, v_spacing * (r + 1) as f64)
            })
            .collect();
    }

    /// `ceil(sqrt(n * aspect))`, at least 1
    fn columns(&self) -> usize {
        let (width, height) = self.canvas;
        let aspect = width / height;
        ((self.node_count() as f64 * aspect).sqrt().ceil() as usize).max(1)
    }

    fn connect(&mut self, a: usize, b: usize, weight: Weight) {
        if a == b || self.weights.contains_key(&edge_key(a, b)) {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.weights.insert(edge_key(a, b), weight);
    }

    /// Join every component to the one holding `i - 1`; returns the number
    /// of edges added
    fn bridge_components(&mut self, rng: &mut impl Rng) -> usize {
        let mut component = vec![usize::MAX; self.node_count()];
        let mut label = 0;
        for node in 0..self.node_count() {
            if component[node] == usize::MAX {
                for member in self.reachable_from(node) {
                    component[member] = label;
                }
                label += 1;
            }
        }

        let mut bridged = 0;
        for i in 1..self.node_count() {
            if component[i] != component[i - 1] {
                let weight = rng.gen_range(EDGE_WEIGHT_RANGE);
                self.connect(i - 1, i, weight);
                let (old, new) = (component[i], component[i - 1]);
                for c in component.iter_mut().filter(|c| **c == old) {
                    *c = new;
                }
                bridged += 1;
            }
        }
        bridged
    }

    fn reachable_from(&self, start: usize) -> Vec<usize> {
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        let mut reached = Vec::new();
        seen.insert(start);
        while let Some(u) = queue.pop_front() {
            reached.push(u);
            for &v in &self.adjacency[u] {
                if seen.insert(v) {
                    queue.push_back(v);
                }
            }
        }
        reached
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node < self.node_count() {
            Ok(())
        } else {
            Err(VizError::NodeOutOfRange {
                node,
                node_count: self.node_count(),
            })
        }
    }

    // ========== Snapshots ==========

    fn snapshot(&self, message: impl Into<String>, marks: Marks<'_>) -> GraphStep {
        let contains = |set: Option<&FxHashSet<usize>>, node: usize| {
            set.is_some_and(|s| s.contains(&node))
        };

        let mut step = GraphStep::new(message);
        for (id, &position) in self.positions.iter().enumerate() {
            let mut node = NodeView::new(id, id.to_string(), position);
            node.fill = if marks.current == Some(id) {
                Paint::Red
            } else if contains(marks.frontier, id) {
                Paint::Yellow
            } else if contains(marks.visited, id) {
                Paint::Green
            } else {
                Paint::White
            };
            step.nodes.push(node);
        }

        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &v in neighbors.iter().filter(|&&v| u < v) {
                let mut edge = EdgeView::new(u, v);
                edge.weight_label = self.edge_weight(u, v).map(|w| w.to_string());
                edge.color = if marks.highlighted.is_some_and(|h| h.contains(&(u, v))) {
                    Paint::Orange
                } else if contains(marks.visited, u) && contains(marks.visited, v) {
                    Paint::LightGray
                } else {
                    Paint::White
                };
                step.edges.push(edge);
            }
        }
        step
    }
}

/// One node on the DFS stack
struct DfsFrame {
    node: usize,
    /// Index of the next neighbour to try
    next: usize,
}

/// DFS state. The walk keeps its own frame stack, so step order matches the
/// recursive traversal without deep call stacks.
struct DfsWalk<'g> {
    graph: &'g Graph,
    history: History,
    visited: FxHashSet<usize>,
    /// Nodes on the current path, drawn as the frontier
    stack: FxHashSet<usize>,
    order: Vec<usize>,
}

impl DfsWalk<'_> {
    fn visit(&mut self, start: usize) {
        let graph = self.graph;
        let mut frames = vec![self.enter(start)];

        while let Some(frame) = frames.last_mut() {
            let u = frame.node;
            let unvisited = graph.adjacency[u][frame.next..]
                .iter()
                .position(|v| !self.visited.contains(v));

            match unvisited {
                Some(offset) => {
                    frame.next += offset + 1;
                    let v = graph.adjacency[u][frame.next - 1];
                    self.record(format!("Moving to unvisited neighbor {}", v), u);
                    frames.push(self.enter(v));
                }
                None => {
                    frames.pop();
                    self.stack.remove(&u);
                    if let Some(parent) = frames.last() {
                        let parent = parent.node;
                        self.record(format!("Backtracked to Node {}", parent), parent);
                    }
                }
            }
        }
    }

    fn enter(&mut self, u: usize) -> DfsFrame {
        self.visited.insert(u);
        self.stack.insert(u);
        self.order.push(u);
        self.record(format!("Visiting Node {}", u), u);
        DfsFrame { node: u, next: 0 }
    }

    fn record(&mut self, message: String, current: usize) {
        let step = self.graph.snapshot(
            message,
            Marks {
                visited: Some(&self.visited),
                frontier: Some(&self.stack),
                current: Some(current),
                ..Default::default()
            },
        );
        self.history.push(step);
    }
}

fn join_path(nodes: &[usize]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
