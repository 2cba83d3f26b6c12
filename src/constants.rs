// Layout and input constants shared by the engines

/// Logical canvas width that tree and graph positions are computed against
pub const CANVAS_WIDTH: f64 = 1200.0;

/// Logical canvas height used by the graph grid layout
pub const CANVAS_HEIGHT: f64 = 700.0;

/// Vertical distance between tree levels
pub const LEVEL_HEIGHT: f64 = 80.0;

/// Y coordinate of the tree root
pub const TREE_TOP: f64 = 50.0;

/// Percent chance that two orthogonal grid neighbours get an edge
pub const ORTHOGONAL_EDGE_CHANCE: u32 = 80;

/// Percent chance that two diagonal grid neighbours get an edge
pub const DIAGONAL_EDGE_CHANCE: u32 = 30;

/// Edge weights are drawn from this half-open range
pub const EDGE_WEIGHT_RANGE: std::ops::Range<u32> = 1..10;

/// Speed slider bounds; interval is `SPEED_BASE_MS - 10 * speed`
pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 100;
pub const SPEED_BASE_MS: u64 = 1005;

/// Largest graph the generator accepts; every graph step holds every node
/// and edge
pub const MAX_NODE_COUNT: usize = 200;
