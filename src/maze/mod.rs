//! Recursive-backtracker maze carving
//!
//! Cells live at odd coordinates and the even rows/columns between them are
//! walls. Carving starts at (1, 1); a wall cell only becomes open when the
//! walk moves through it, so the finished maze is a spanning tree over the
//! odd-coordinate cells.
//!
//! The walk keeps its own stack of frames instead of recursing, which keeps
//! large grids off the call stack while producing the same step order.

use crate::error::{Result, VizError};
use crate::snapshot::{CellKind, GridStep, History};
use rand::seq::SliceRandom;
use rand::Rng;

/// Up, down, left, right; two cells per move
const DIRECTIONS: [(isize, isize); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Smallest grid that still holds one cell surrounded by walls
pub const MIN_SIDE: usize = 3;

/// One cell on the carving stack
struct Frame {
    x: usize,
    y: usize,
    directions: [(isize, isize); 4],
    next: usize,
    /// Wall cell crossed to reach this cell
    entered_through: Option<(usize, usize)>,
}

/// Maze grid under construction
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    grid: Vec<Vec<CellKind>>,
}

impl Maze {
    /// Carve a `width` x `height` maze and return every intermediate grid.
    ///
    /// Both sides must be at least 3.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Result<History> {
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(VizError::InvalidMazeDimensions { width, height });
        }

        let mut maze = Maze {
            width,
            height,
            grid: vec![vec![CellKind::Wall; width]; height],
        };
        let mut history = History::new();
        history.push(maze.snapshot("Initializing Maze Grid..."));

        maze.carve(rng, &mut history);

        let (end_x, end_y) = maze.last_cell();
        maze.grid[1][1] = CellKind::Start;
        maze.grid[end_y][end_x] = CellKind::End;
        history.push(maze.snapshot("Maze Generation Complete!"));

        tracing::debug!(width, height, steps = history.len(), "maze carved");
        Ok(history)
    }

    fn carve(&mut self, rng: &mut impl Rng, history: &mut History) {
        let mut stack = vec![self.enter(1, 1, None, rng, history)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                let Frame {
                    x,
                    y,
                    entered_through,
                    ..
                } = *frame;
                stack.pop();

                self.grid[y][x] = CellKind::Path;
                history.push(self.snapshot(format!("Backtracking from ({},{})", x, y)));
                if let Some((wx, wy)) = entered_through {
                    self.grid[wy][wx] = CellKind::Path;
                }
                continue;
            }

            let (dx, dy) = frame.directions[frame.next];
            frame.next += 1;
            let (x, y) = (frame.x, frame.y);

            let Some((nx, ny)) = self.target(x, y, dx, dy) else {
                continue;
            };
            if self.grid[ny][nx] != CellKind::Wall {
                continue;
            }

            let wall = (
                x.wrapping_add_signed(dx / 2),
                y.wrapping_add_signed(dy / 2),
            );
            self.grid[wall.1][wall.0] = CellKind::Visited;
            let child = self.enter(nx, ny, Some(wall), rng, history);
            stack.push(child);
        }
    }

    /// Mark a cell as the carving head and shuffle its exits
    fn enter(
        &mut self,
        x: usize,
        y: usize,
        entered_through: Option<(usize, usize)>,
        rng: &mut impl Rng,
        history: &mut History,
    ) -> Frame {
        self.grid[y][x] = CellKind::Visited;
        history.push(self.snapshot(format!("Carving at ({},{})", x, y)));

        let mut directions = DIRECTIONS;
        directions.shuffle(rng);
        Frame {
            x,
            y,
            directions,
            next: 0,
            entered_through,
        }
    }

    /// Cell two steps away, if it lies strictly inside the border
    fn target(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx > 0 && nx < self.width - 1 && ny > 0 && ny < self.height - 1).then_some((nx, ny))
    }

    /// Bottom-right-most odd cell
    fn last_cell(&self) -> (usize, usize) {
        let last_odd = |side: usize| {
            let inner = side - 2;
            if inner % 2 == 1 {
                inner
            } else {
                inner - 1
            }
        };
        (last_odd(self.width), last_odd(self.height))
    }

    fn snapshot(&self, message: impl Into<String>) -> GridStep {
        GridStep {
            grid: self.grid.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn open_cells(grid: &[Vec<CellKind>]) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (y, row) in grid.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.is_open() {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    fn open_neighbors(grid: &[Vec<CellKind>], x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        if x > 0 && grid[y][x - 1].is_open() {
            out.push((x - 1, y));
        }
        if x + 1 < grid[0].len() && grid[y][x + 1].is_open() {
            out.push((x + 1, y));
        }
        if y > 0 && grid[y - 1][x].is_open() {
            out.push((x, y - 1));
        }
        if y + 1 < grid.len() && grid[y + 1][x].is_open() {
            out.push((x, y + 1));
        }
        out
    }

    fn final_grid(width: usize, height: usize, seed: u64) -> Vec<Vec<CellKind>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let history = Maze::generate(width, height, &mut rng).unwrap();
        history.last().unwrap().as_grid().unwrap().grid.clone()
    }

    #[test]
    fn test_open_cells_form_a_tree() {
        for seed in 0..10 {
            let grid = final_grid(41, 25, seed);
            let cells = open_cells(&grid);

            let edges: usize = cells
                .iter()
                .map(|&(x, y)| open_neighbors(&grid, x, y).len())
                .sum::<usize>()
                / 2;
            assert_eq!(edges, cells.len() - 1, "seed {} has a cycle", seed);

            let mut seen = vec![(1, 1)];
            let mut queue = VecDeque::from([(1, 1)]);
            while let Some((x, y)) = queue.pop_front() {
                for next in open_neighbors(&grid, x, y) {
                    if !seen.contains(&next) {
                        seen.push(next);
                        queue.push_back(next);
                    }
                }
            }
            assert_eq!(seen.len(), cells.len(), "seed {} disconnected", seed);
        }
    }

    #[test]
    fn test_every_odd_cell_carved() {
        let grid = final_grid(11, 9, 3);
        for y in (1..8).step_by(2) {
            for x in (1..10).step_by(2) {
                assert!(grid[y][x].is_open());
            }
        }
        // Border stays solid
        assert!(grid[0].iter().all(|c| *c == CellKind::Wall));
        assert!(grid.iter().all(|row| row[10] == CellKind::Wall));
    }

    #[test]
    fn test_start_and_end_marked() {
        let grid = final_grid(41, 25, 1);
        assert_eq!(grid[1][1], CellKind::Start);
        assert_eq!(grid[23][39], CellKind::End);

        let even = final_grid(10, 8, 1);
        assert_eq!(even[5][7], CellKind::End);
    }

    #[test]
    fn test_first_step_all_walls() {
        let mut rng = StdRng::seed_from_u64(9);
        let history = Maze::generate(7, 7, &mut rng).unwrap();
        let first = history.first().unwrap().as_grid().unwrap();

        assert_eq!(first.message, "Initializing Maze Grid...");
        assert!(first.grid.iter().flatten().all(|c| *c == CellKind::Wall));
        assert_eq!(history.get(1).unwrap().message(), "Carving at (1,1)");
        assert_eq!(
            history.get(history.len() - 2).unwrap().message(),
            "Backtracking from (1,1)"
        );
    }

    #[test]
    fn test_wall_cell_visited_while_carving() {
        let mut rng = StdRng::seed_from_u64(5);
        let history = Maze::generate(11, 9, &mut rng).unwrap();
        let last = history.last().unwrap().as_grid().unwrap();

        let mut crossed = Vec::new();
        for step in history.iter().filter_map(|s| s.as_grid()) {
            for (y, row) in step.grid.iter().enumerate() {
                for (x, cell) in row.iter().enumerate() {
                    if *cell == CellKind::Visited && (x % 2 == 0 || y % 2 == 0) {
                        crossed.push((x, y));
                    }
                }
            }
        }

        assert!(!crossed.is_empty());
        for (x, y) in crossed {
            assert_eq!(last.grid[y][x], CellKind::Path, "wall ({},{})", x, y);
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        assert_eq!(final_grid(21, 15, 42), final_grid(21, 15, 42));
    }

    #[test]
    fn test_smallest_maze() {
        let grid = final_grid(3, 3, 0);
        assert_eq!(grid[1][1], CellKind::End);
        assert_eq!(open_cells(&grid), vec![(1, 1)]);
    }

    #[test]
    fn test_rejects_tiny_dimensions() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            Maze::generate(2, 10, &mut rng),
            Err(VizError::InvalidMazeDimensions { width: 2, height: 10 })
        ));
        assert!(Maze::generate(10, 0, &mut rng).is_err());
    }
}
