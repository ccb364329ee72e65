use crate::grid::{Grid, Position};
use pathfinding::prelude::astar;

/// Shortest step count from start to goal, computed with the `pathfinding`
/// crate's A*. Independent of [`solve`](crate::algorithms::solve), so it
/// serves as the yardstick for route efficiency and as a test oracle.
///
/// Returns `None` if the goal is unreachable.
pub fn optimal_steps(grid: &Grid) -> Option<usize> {
    reference_path(grid).map(|path| path.len().saturating_sub(1))
}

/// A shortest path from start to goal, start and goal included.
pub fn reference_path(grid: &Grid) -> Option<Vec<Position>> {
    let goal = grid.goal();
    let result = astar(
        &grid.start(),
        // Every move costs 1.
        |p| grid.neighbors(*p).map(|(_, next)| (next, 1u32)).collect::<Vec<_>>(),
        |p| grid.heuristic(*p),
        |p| *p == goal,
    );

    result.map(|(path, _)| path)
}
