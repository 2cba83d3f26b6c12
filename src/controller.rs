//! Algorithm dispatch and input management
//!
//! [`Visualizer`] is the single entry point the UI talks to. Selecting an
//! algorithm runs the matching engine on the current input, hands the
//! resulting history to [`Playback`], and from then on every transport key
//! is forwarded to playback unchanged.

use crate::config::VisualizerConfig;
use crate::error::{Result, VizError};
use crate::graph::Graph;
use crate::maze::Maze;
use crate::playback::{Playback, PlaybackEvent};
use crate::snapshot::History;
use crate::sorting::SortAlgorithm;
use crate::tree::avl::Avl;
use crate::tree::bst::Bst;
use crate::tree::TreeLayout;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

const RULE: &str = "--------------------------------";

/// Every algorithm the visualizer can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Sort(SortAlgorithm),
    BstInsert,
    BstRemove,
    AvlInsert,
    AvlRemove,
    GraphGenerate,
    GraphBfs,
    GraphDfs,
    GraphDijkstra,
    GraphPrim,
    MazeGenerate,
}

impl Algorithm {
    /// Catalogue order, as listed in the UI
    pub const ALL: [Algorithm; 15] = [
        Algorithm::Sort(SortAlgorithm::Bubble),
        Algorithm::Sort(SortAlgorithm::Insertion),
        Algorithm::Sort(SortAlgorithm::Selection),
        Algorithm::Sort(SortAlgorithm::Quick),
        Algorithm::Sort(SortAlgorithm::Merge),
        Algorithm::BstInsert,
        Algorithm::BstRemove,
        Algorithm::AvlInsert,
        Algorithm::AvlRemove,
        Algorithm::GraphGenerate,
        Algorithm::GraphBfs,
        Algorithm::GraphDfs,
        Algorithm::GraphDijkstra,
        Algorithm::GraphPrim,
        Algorithm::MazeGenerate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Sort(sort) => sort.name(),
            Algorithm::BstInsert => "BST Insert",
            Algorithm::BstRemove => "BST Remove",
            Algorithm::AvlInsert => "AVL Insert",
            Algorithm::AvlRemove => "AVL Remove",
            Algorithm::GraphGenerate => "Graph Generate",
            Algorithm::GraphBfs => "Graph BFS",
            Algorithm::GraphDfs => "Graph DFS",
            Algorithm::GraphDijkstra => "Graph Dijkstra",
            Algorithm::GraphPrim => "Graph Prim's MST",
            Algorithm::MazeGenerate => "Maze Generate",
        }
    }

    /// True for the traversals that run over an existing graph
    pub fn uses_graph(self) -> bool {
        matches!(
            self,
            Algorithm::GraphBfs
                | Algorithm::GraphDfs
                | Algorithm::GraphDijkstra
                | Algorithm::GraphPrim
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| VizError::UnknownAlgorithm(wanted.to_string()))
    }
}

/// Optional overrides for a selection; unset nodes are picked at random
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectParams {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

pub struct Visualizer {
    config: VisualizerConfig,
    playback: Playback,
    rng: StdRng,
    input: Vec<i32>,
    bst: Bst,
    avl: Avl,
    graph: Graph,
    graph_generated: bool,
    selected: Option<Algorithm>,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layout = TreeLayout {
            canvas_width: config.canvas_width,
            level_height: config.level_height,
            ..TreeLayout::default()
        };

        let mut visualizer = Visualizer {
            playback: Playback::new(config.speed)?,
            rng,
            input: Vec::new(),
            bst: Bst::new(layout),
            avl: Avl::new(layout),
            graph: Graph::with_canvas(config.canvas_width, config.canvas_height),
            graph_generated: false,
            selected: None,
            config,
        };
        visualizer.fill_input();
        Ok(visualizer)
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn input(&self) -> &[i32] {
        &self.input
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selected(&self) -> Option<Algorithm> {
        self.selected
    }

    /// Draw a fresh input array and forget the current graph
    pub fn reshuffle_input(&mut self) {
        self.playback.pause();
        self.fill_input();
        self.graph_generated = false;
        tracing::info!(len = self.input.len(), "input reshuffled");
    }

    /// Parse `name` and run it with random parameters
    pub fn select(&mut self, name: &str) -> Result<()> {
        let algorithm = name.parse()?;
        self.select_algorithm(algorithm, SelectParams::default())
    }

    /// Run `algorithm` and load its history into playback.
    ///
    /// A node id outside the graph is reported on the log channel and the
    /// current history stays loaded.
    pub fn select_algorithm(&mut self, algorithm: Algorithm, params: SelectParams) -> Result<()> {
        self.playback.pause();

        let mut history = match self.run(algorithm, params) {
            Ok(history) => history,
            Err(err @ VizError::NodeOutOfRange { .. }) => {
                tracing::warn!(%algorithm, error = %err, "selection rejected");
                self.playback.log(err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let dropped = history.truncate_keep_last(self.config.max_history);
        if dropped > 0 {
            tracing::warn!(
                %algorithm,
                dropped,
                limit = self.config.max_history,
                "history truncated"
            );
        }

        tracing::info!(%algorithm, steps = history.len(), "algorithm selected");
        self.selected = Some(algorithm);
        self.playback.load(history);
        Ok(())
    }

    // ========== Transport ==========

    pub fn start(&mut self, now: Instant) {
        self.playback.start(now);
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn next(&mut self) {
        self.playback.next();
    }

    pub fn previous(&mut self) {
        self.playback.previous();
    }

    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        self.playback.set_speed(speed)
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.playback.poll(now)
    }

    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.playback.drain_events()
    }

    // ========== Dispatch ==========

    fn run(&mut self, algorithm: Algorithm, params: SelectParams) -> Result<History> {
        if algorithm.uses_graph() {
            self.ensure_graph();
            for node in [params.start, params.end].into_iter().flatten() {
                if node >= self.graph.node_count() {
                    return Err(VizError::NodeOutOfRange {
                        node,
                        node_count: self.graph.node_count(),
                    });
                }
            }
        }

        match algorithm {
            Algorithm::Sort(sort) => Ok(sort.run(&self.input)),
            Algorithm::BstInsert => Ok(self.tree_inserts(TreeKind::Bst)),
            Algorithm::BstRemove => Ok(self.tree_removals(TreeKind::Bst)),
            Algorithm::AvlInsert => Ok(self.tree_inserts(TreeKind::Avl)),
            Algorithm::AvlRemove => Ok(self.tree_removals(TreeKind::Avl)),
            Algorithm::GraphGenerate => {
                let history = self.graph.generate(self.config.node_count, &mut self.rng);
                self.graph_generated = true;
                Ok(history)
            }
            Algorithm::GraphBfs => {
                let start = self.pick_start(params);
                self.graph.bfs(start)
            }
            Algorithm::GraphDfs => {
                let start = self.pick_start(params);
                self.graph.dfs(start)
            }
            Algorithm::GraphDijkstra => {
                let start = self.pick_start(params);
                let end = params.end.unwrap_or_else(|| {
                    let offset = self.rng.gen_range(1..self.graph.node_count());
                    (start + offset) % self.graph.node_count()
                });
                self.headline(&[
                    "Goal: Dijkstra's Pathfinding".to_string(),
                    format!("Start Node: {}", start),
                    format!("Target Node: {}", end),
                ]);
                self.graph.dijkstra(start, end)
            }
            Algorithm::GraphPrim => {
                let start = self.pick_start(params);
                self.headline(&[
                    "Goal: Prim's Minimum Spanning Tree".to_string(),
                    format!("Start Node: {}", start),
                ]);
                self.graph.prim_mst(start)
            }
            Algorithm::MazeGenerate => {
                let (width, height) = (self.config.maze_width, self.config.maze_height);
                self.headline(&[
                    "Goal: Recursive Backtracker Maze".to_string(),
                    format!("Size: {} x {}", width, height),
                ]);
                Maze::generate(width, height, &mut self.rng)
            }
        }
    }

    fn tree_values(&self) -> Vec<i32> {
        let size = self.config.tree_size.min(self.input.len());
        self.input[..size].to_vec()
    }

    fn tree_inserts(&mut self, kind: TreeKind) -> History {
        let values = self.tree_values();
        let mut history = History::new();
        match kind {
            TreeKind::Bst => {
                self.bst.clear();
                values.iter().for_each(|&v| history.append(self.bst.insert(v)));
            }
            TreeKind::Avl => {
                self.avl.clear();
                values.iter().for_each(|&v| history.append(self.avl.insert(v)));
            }
        }
        history
    }

    /// Build the tree silently, then remove the same values in random order
    fn tree_removals(&mut self, kind: TreeKind) -> History {
        let values = self.tree_values();
        let mut order = values.clone();
        order.shuffle(&mut self.rng);

        let mut history = History::new();
        match kind {
            TreeKind::Bst => {
                self.bst.clear();
                for &v in &values {
                    self.bst.insert(v);
                }
                order.iter().for_each(|&v| history.append(self.bst.remove(v)));
            }
            TreeKind::Avl => {
                self.avl.clear();
                for &v in &values {
                    self.avl.insert(v);
                }
                order.iter().for_each(|&v| history.append(self.avl.remove(v)));
            }
        }
        history
    }

    fn ensure_graph(&mut self) {
        if !self.graph_generated {
            self.graph.generate(self.config.node_count, &mut self.rng);
            self.graph_generated = true;
        }
    }

    fn pick_start(&mut self, params: SelectParams) -> usize {
        params
            .start
            .unwrap_or_else(|| self.rng.gen_range(0..self.graph.node_count()))
    }

    fn headline(&mut self, lines: &[String]) {
        self.playback.log(RULE);
        for line in lines {
            self.playback.log(line.clone());
        }
        self.playback.log(RULE);
    }

    fn fill_input(&mut self) {
        let range = self.config.value_range.clone();
        self.input = (0..self.config.array_len)
            .map(|_| self.rng.gen_range(range.clone()))
            .collect();
    }
}

#[derive(Debug, Clone, Copy)]
enum TreeKind {
    Bst,
    Avl,
}
