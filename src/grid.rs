use crate::algorithms::common::Solution;
use crate::error::{GridDefect, SearchError};
use rand::Rng;
use rustc_hash::FxHashSet;
use std::fmt;
use std::str::FromStr;

pub const WALL: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Manhattan distance between two cells, saturating at `u32::MAX`.
    pub fn manhattan(&self, other: &Position) -> u32 {
        let distance = self
            .row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col));
        u32::try_from(distance).unwrap_or(u32::MAX)
    }

    fn step(&self, action: Action) -> Option<Position> {
        let (d_row, d_col) = action.offset();
        Some(Position {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A unit move on the 4-connected grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Right,
    Down,
    Left,
    Up,
}

impl Action {
    /// Neighbor expansion order.
    pub const ALL: [Action; 4] = [Action::Right, Action::Down, Action::Left, Action::Up];

    pub fn offset(&self) -> (isize, isize) {
        match self {
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
            Action::Up => "up",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

/// Characters that designate the start and goal cells in text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub start: char,
    pub goal: char,
}

impl Default for Markers {
    fn default() -> Self {
        Markers { start: 'A', goal: 'B' }
    }
}

impl Markers {
    fn validate(&self) -> Result<(), GridDefect> {
        if self.start == self.goal || self.start == WALL || self.goal == WALL {
            return Err(GridDefect::InvalidMarkers);
        }
        Ok(())
    }
}

/// Immutable obstacle map with exactly one start and one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Vec<Cell>>,
    start: Position,
    goal: Position,
    markers: Markers,
}

impl Grid {
    /// Parses a grid using the default `A`/`B` markers.
    pub fn parse(text: &str) -> Result<Self, SearchError> {
        Self::parse_with(text, Markers::default())
    }

    pub fn parse_with(text: &str, markers: Markers) -> Result<Self, SearchError> {
        markers.validate()?;

        let rows: Vec<Vec<char>> = text.lines().map(|line| line.chars().collect()).collect();
        let width = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(GridDefect::Empty.into()),
        };

        let mut cells = Vec::with_capacity(rows.len());
        let mut starts = Vec::new();
        let mut goals = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            if line.len() != width {
                return Err(GridDefect::UnequalRows {
                    row,
                    expected: width,
                    found: line.len(),
                }
                .into());
            }

            let mut cell_row = Vec::with_capacity(width);
            for (col, &ch) in line.iter().enumerate() {
                if ch == WALL {
                    cell_row.push(Cell::Wall);
                    continue;
                }
                if ch == markers.start {
                    starts.push(Position::new(row, col));
                } else if ch == markers.goal {
                    goals.push(Position::new(row, col));
                }
                cell_row.push(Cell::Open);
            }
            cells.push(cell_row);
        }

        if starts.len() != 1 {
            return Err(GridDefect::StartCount(starts.len()).into());
        }
        if goals.len() != 1 {
            return Err(GridDefect::GoalCount(goals.len()).into());
        }

        Ok(Grid {
            height: cells.len(),
            width,
            cells,
            start: starts[0],
            goal: goals[0],
            markers,
        })
    }

    /// Generates a grid with the start in the top-left quadrant and the goal in
    /// the bottom-right one. Walls never cover start or goal, but nothing
    /// guarantees the goal is reachable.
    pub fn random<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        num_walls: usize,
        rng: &mut R,
    ) -> Result<Self, SearchError> {
        if height < 2 || width < 2 {
            return Err(GridDefect::TooSmall { height, width }.into());
        }

        let mut cells = vec![vec![Cell::Open; width]; height];

        let start = Position {
            row: rng.gen_range(0..height / 2),
            col: rng.gen_range(0..width / 2),
        };
        let goal = Position {
            row: rng.gen_range(height / 2..height),
            col: rng.gen_range(width / 2..width),
        };

        // Place walls randomly, ensuring we don't block start/goal
        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < num_walls && attempts < num_walls * 3 {
            let pos = Position {
                row: rng.gen_range(0..height),
                col: rng.gen_range(0..width),
            };

            if pos != start && pos != goal && cells[pos.row][pos.col] == Cell::Open {
                cells[pos.row][pos.col] = Cell::Wall;
                walls_placed += 1;
            }
            attempts += 1;
        }

        Ok(Grid {
            height,
            width,
            cells,
            start,
            goal,
            markers: Markers::default(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Open)
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        pos == self.goal
    }

    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Wall)
            .count()
    }

    /// Manhattan distance to the goal; admissible and consistent for unit
    /// steps on a 4-connected grid.
    pub fn heuristic(&self, pos: Position) -> u32 {
        pos.manhattan(&self.goal)
    }

    /// In-bounds open neighbors, always in right, down, left, up order.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Action, Position)> + '_ {
        Action::ALL.into_iter().filter_map(move |action| {
            let next = pos.step(action)?;
            self.is_open(next).then_some((action, next))
        })
    }

    /// Draws the grid with a search result on top of it.
    ///
    /// Path cells are `*`, cells that were visited but are not on the path
    /// are `o`. Start and goal keep their markers.
    pub fn render(&self, solution: Option<&Solution>) -> String {
        let on_path: FxHashSet<Position> =
            solution.map(|s| s.positions().collect()).unwrap_or_default();

        let mut out = String::with_capacity(self.height * (self.width + 1));
        for row in 0..self.height {
            for col in 0..self.width {
                let pos = Position { row, col };
                let ch = if pos == self.start {
                    self.markers.start
                } else if pos == self.goal {
                    self.markers.goal
                } else if self.cells[row][col] == Cell::Wall {
                    WALL
                } else if on_path.contains(&pos) {
                    '*'
                } else if solution.is_some_and(|s| s.visited.contains(&pos)) {
                    'o'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Grid {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::parse(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CENTER_WALL: &str = "A..\n.#.\n..B\n";

    #[test]
    fn test_parse_records_dimensions_and_markers() {
        let grid = Grid::parse(CENTER_WALL).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.start(), Position::new(0, 0));
        assert_eq!(grid.goal(), Position::new(2, 2));
        assert_eq!(grid.cell(Position::new(1, 1)), Some(Cell::Wall));
        assert_eq!(grid.wall_count(), 1);
        assert!(grid.is_open(grid.start()));
        assert!(grid.is_open(grid.goal()));
    }

    #[test]
    fn test_parse_accepts_crlf_and_any_floor_character() {
        let grid = Grid::parse("A  \r\n xB\r\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.wall_count(), 0);
        assert_eq!(grid.goal(), Position::new(1, 2));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(
            Grid::parse("AA.\n..B"),
            Err(SearchError::MalformedGrid(GridDefect::StartCount(2)))
        );
        assert_eq!(
            Grid::parse("A..\n.#\n..B"),
            Err(SearchError::MalformedGrid(GridDefect::UnequalRows {
                row: 1,
                expected: 3,
                found: 2
            }))
        );
        assert_eq!(
            Grid::parse("A..\n..."),
            Err(SearchError::MalformedGrid(GridDefect::GoalCount(0)))
        );
        assert_eq!(Grid::parse(""), Err(SearchError::MalformedGrid(GridDefect::Empty)));
    }

    #[test]
    fn test_custom_markers() {
        let markers = Markers { start: 'S', goal: 'G' };
        let grid = Grid::parse_with("S.#\n..G", markers).unwrap();
        assert_eq!(grid.start(), Position::new(0, 0));
        assert_eq!(grid.goal(), Position::new(1, 2));
        assert_eq!(grid.to_string(), "S.#\n..G\n");

        let clash = Markers { start: 'S', goal: 'S' };
        assert_eq!(
            Grid::parse_with("S.G", clash),
            Err(SearchError::MalformedGrid(GridDefect::InvalidMarkers))
        );
    }

    #[test]
    fn test_neighbors_follow_fixed_order_and_skip_walls() {
        let grid = Grid::parse("...\n.A.\n.#B").unwrap();
        let found: Vec<_> = grid.neighbors(Position::new(1, 1)).collect();
        assert_eq!(
            found,
            vec![
                (Action::Right, Position::new(1, 2)),
                (Action::Left, Position::new(1, 0)),
                (Action::Up, Position::new(0, 1)),
            ]
        );

        // Corner cells never yield out-of-bounds neighbors.
        let corner: Vec<_> = grid.neighbors(Position::new(0, 0)).map(|(a, _)| a).collect();
        assert_eq!(corner, vec![Action::Right, Action::Down]);
    }

    #[test]
    fn test_manhattan_saturates() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.manhattan(&Position::new(3, 4)), 7);
        assert_eq!(Position::new(3, 4).manhattan(&origin), 7);

        let far = Position::new(usize::MAX, usize::MAX);
        assert_eq!(origin.manhattan(&far), u32::MAX);
    }

    #[test]
    fn test_heuristic_is_manhattan_to_goal() {
        let grid = Grid::parse(CENTER_WALL).unwrap();
        assert_eq!(grid.heuristic(grid.start()), 4);
        assert_eq!(grid.heuristic(Position::new(0, 2)), 2);
        assert_eq!(grid.heuristic(grid.goal()), 0);
        assert!(grid.is_goal(Position::new(2, 2)));
    }

    #[test]
    fn test_random_grid_is_reproducible() {
        let a = Grid::random(12, 9, 30, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Grid::random(12, 9, 30, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.start(), a.goal());
        assert!(a.is_open(a.start()) && a.is_open(a.goal()));
        assert!(a.wall_count() <= 30);

        let reparsed = Grid::parse(&a.to_string()).unwrap();
        assert_eq!(reparsed, a);
    }

    #[test]
    fn test_render_overlays_path_and_visited() {
        let grid = Grid::parse(CENTER_WALL).unwrap();
        let solution = crate::algorithms::solve(&grid, crate::algorithms::Strategy::AStar).unwrap();
        assert_eq!(grid.render(Some(&solution)), "A**\no#*\nooB\n");
        assert_eq!(grid.render(None), "A..\n.#.\n..B\n");
    }

    #[test]
    fn test_random_grid_rejects_degenerate_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Grid::random(1, 5, 0, &mut rng),
            Err(SearchError::MalformedGrid(GridDefect::TooSmall { height: 1, width: 5 }))
        );
    }
}
