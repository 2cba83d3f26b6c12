//! # Introduction
//!
//! algoviz runs classic algorithms once, recording an immutable snapshot of
//! every interesting state, and then plays that history back forward,
//! backward or on a timer through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui). Playback never re-runs the algorithm.
//!
//! ## Pipeline
//!
//! ```text
//! Input → Engine → History → Playback → Events → TUI
//! ```
//!
//! 1. [`sorting`], [`tree`], [`graph`], [`maze`]: the engines. Each call
//!    returns a [`snapshot::History`].
//! 2. [`snapshot`]: the step types (`Sort`, `Graph`, `Grid`) shared by every
//!    engine and the renderer.
//! 3. [`playback`]: position, timer and transport over one history, with
//!    redraw/log output queued as [`playback::PlaybackEvent`]s.
//! 4. [`controller`]: algorithm catalogue, random input and dispatch.
//! 5. [`config`]: defaults and command-line flags.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Algorithms
//!
//! Sorts: bubble, insertion, selection, quick (Lomuto), merge.
//! Trees: BST and AVL insert/remove with rotations.
//! Graphs: random weighted grid, BFS, DFS, Dijkstra, Prim.
//! Mazes: recursive backtracker.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod graph;
pub mod maze;
pub mod playback;
pub mod snapshot;
pub mod sorting;
pub mod tree;
pub mod ui;

pub use error::{Result, VizError};
