//! Error types for the visualizer.
//!
//! Only caller bugs end up here. Mistakes a user can make through the UI
//! (duplicate insert, removing a missing value, unreachable target) are
//! reported inside the step history instead.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, VizError>;

/// Errors raised by engine entry points and configuration parsing.
#[derive(Debug, Error)]
pub enum VizError {
    /// Maze grid too small to hold a single cell
    #[error("Invalid maze dimensions {width}x{height}: both sides must be at least 3")]
    InvalidMazeDimensions { width: usize, height: usize },

    /// Graph node id outside `[0, node_count)`
    #[error("Node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    /// Algorithm name not in the catalogue
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Playback speed outside 1..=100
    #[error("Invalid speed {0}: expected a value between 1 and 100")]
    InvalidSpeed(u32),

    /// Malformed command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
