use std::fmt;

/// Structural problems found while building a [`Grid`](crate::grid::Grid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridDefect {
    /// The input has no rows.
    Empty,
    /// A row's length differs from the first row's.
    UnequalRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The start marker must appear exactly once.
    StartCount(usize),
    /// The goal marker must appear exactly once.
    GoalCount(usize),
    /// Start and goal markers are equal, or one of them is the wall character.
    InvalidMarkers,
    /// Random generation needs at least a 2x2 grid.
    TooSmall { height: usize, width: usize },
}

impl fmt::Display for GridDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridDefect::Empty => write!(f, "grid has no rows"),
            GridDefect::UnequalRows { row, expected, found } => write!(
                f,
                "row {} has length {}, expected {}",
                row, found, expected
            ),
            GridDefect::StartCount(n) => write!(f, "expected exactly one start, found {}", n),
            GridDefect::GoalCount(n) => write!(f, "expected exactly one goal, found {}", n),
            GridDefect::InvalidMarkers => {
                write!(f, "start and goal markers must differ and must not be '#'")
            }
            GridDefect::TooSmall { height, width } => {
                write!(f, "grid {}x{} is too small, need at least 2x2", height, width)
            }
        }
    }
}

/// Every way building a grid or running a search can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The grid input is structurally invalid.
    MalformedGrid(GridDefect),

    /// The strategy name is not one of `a-star` or `greedy`.
    InvalidStrategy(String),

    /// The frontier emptied without reaching the goal. Carries the search
    /// effort spent, never a partial path.
    NoPath { visited: usize, expanded: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::MalformedGrid(defect) => write!(f, "Malformed grid: {}", defect),
            SearchError::InvalidStrategy(name) => write!(
                f,
                "Invalid strategy '{}': select 'a-star' or 'greedy'",
                name
            ),
            SearchError::NoPath { visited, expanded } => write!(
                f,
                "No path exists from start to goal ({} states visited, {} expanded)",
                visited, expanded
            ),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<GridDefect> for SearchError {
    fn from(defect: GridDefect) -> Self {
        SearchError::MalformedGrid(defect)
    }
}
