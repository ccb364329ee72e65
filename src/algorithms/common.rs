use crate::error::SearchError;
use crate::grid::{Action, Position};
use rustc_hash::FxHashSet;
use std::fmt;
use std::str::FromStr;

/// Selects the priority function used by the best-first engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Orders the frontier by `g + h`. Returns a minimum-step path.
    AStar,
    /// Orders the frontier by `h` alone. Returns some path, usually faster.
    Greedy,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::AStar, Strategy::Greedy];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AStar => "a-star",
            Strategy::Greedy => "greedy",
        }
    }

    pub fn priority(&self, cost_so_far: u32, heuristic: u32) -> u32 {
        match self {
            Strategy::AStar => cost_so_far + heuristic,
            Strategy::Greedy => heuristic,
        }
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a-star" => Ok(Strategy::AStar),
            "greedy" => Ok(Strategy::Greedy),
            other => Err(SearchError::InvalidStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One entry of a solved path. The start entry carries no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub action: Option<Action>,
    pub position: Position,
}

/// A path from start to goal plus what the search touched on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: Vec<Step>,
    /// Every state that was ever pushed onto the frontier, start included.
    pub visited: FxHashSet<Position>,
    /// Nodes popped and expanded; the final goal pop is not counted.
    pub expanded: usize,
}

impl Solution {
    /// Number of moves, one less than the number of states on the path.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.path.iter().map(|step| step.position)
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.path.iter().filter_map(|step| step.action)
    }
}
