//! Informed search on 2-D grids.
//!
//! [`grid::Grid`] holds an immutable obstacle map with one start and one goal.
//! [`algorithms::solve`] runs best-first search over it with either A* or
//! Greedy Best-First and returns the path together with every state the
//! search discovered. The remaining modules drive searches from the command
//! line: generating or loading grids, timing runs, and writing batch results.

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulation;
pub mod statistics;

pub use algorithms::{solve, solve_named, Solution, Step, Strategy};
pub use error::{GridDefect, SearchError};
pub use grid::{Action, Cell, Grid, Markers, Position};
