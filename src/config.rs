//! Visualizer settings and command-line parsing

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, LEVEL_HEIGHT, MAX_NODE_COUNT, MAX_SPEED, MIN_SPEED,
};
use crate::controller::Algorithm;
use crate::error::{Result, VizError};
use crate::maze::MIN_SIDE;
use std::ops::Range;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: algoviz [OPTIONS]

Options:
  --seed <N>          Seed the random generator for reproducible inputs
  --speed <1-100>     Initial playback speed (default 80)
  --algorithm <NAME>  Algorithm to run on startup, e.g. \"Quick Sort\"
  --nodes <2-200>     Number of nodes in generated graphs (default 50)
  --log <PATH>        Write tracing output to PATH
  --help              Print this message";

#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// Length of the random input array
    pub array_len: usize,
    /// Random input values are drawn from this range
    pub value_range: Range<i32>,
    /// How many input values the tree demos use
    pub tree_size: usize,
    pub node_count: usize,
    pub maze_width: usize,
    pub maze_height: usize,
    /// Initial playback speed, 1..=100
    pub speed: u32,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub level_height: f64,
    /// `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Longest history kept per selection
    pub max_history: usize,
    pub initial_algorithm: Option<Algorithm>,
    pub log_file: Option<PathBuf>,
    pub show_help: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        VisualizerConfig {
            array_len: 50,
            value_range: 1..100,
            tree_size: 15,
            node_count: 50,
            maze_width: 41,
            maze_height: 25,
            speed: 80,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            level_height: LEVEL_HEIGHT,
            seed: None,
            max_history: 20_000,
            initial_algorithm: None,
            log_file: None,
            show_help: false,
        }
    }
}

impl VisualizerConfig {
    /// Parse flags (without the program name) on top of the defaults
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = VisualizerConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let flag = arg.as_ref();
            let mut value = || {
                args.next()
                    .map(|v| v.as_ref().to_string())
                    .ok_or_else(|| VizError::InvalidArgument(format!("{} needs a value", flag)))
            };

            match flag {
                "--seed" => config.seed = Some(parse_number(flag, &value()?)?),
                "--speed" => config.speed = parse_number(flag, &value()?)?,
                "--nodes" => config.node_count = parse_number(flag, &value()?)?,
                "--algorithm" => config.initial_algorithm = Some(value()?.parse()?),
                "--log" => config.log_file = Some(PathBuf::from(value()?)),
                "--help" | "-h" => config.show_help = true,
                other => {
                    return Err(VizError::InvalidArgument(format!(
                        "unknown option '{}'",
                        other
                    )))
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engines cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(VizError::InvalidSpeed(self.speed));
        }
        if !(2..=MAX_NODE_COUNT).contains(&self.node_count) {
            return Err(VizError::InvalidArgument(format!(
                "graphs need 2 to {} nodes, got {}",
                MAX_NODE_COUNT, self.node_count
            )));
        }
        if self.value_range.is_empty() {
            return Err(VizError::InvalidArgument(format!(
                "empty value range {:?}",
                self.value_range
            )));
        }
        if self.maze_width < MIN_SIDE || self.maze_height < MIN_SIDE {
            return Err(VizError::InvalidMazeDimensions {
                width: self.maze_width,
                height: self.maze_height,
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| VizError::InvalidArgument(format!("{} expects a number, got '{}'", flag, raw)))
}
