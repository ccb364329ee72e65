pub mod a_star;
pub mod best_first;
pub mod common;

pub use best_first::{solve, solve_named};
pub use common::{Solution, Step, Strategy};
