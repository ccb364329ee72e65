use crate::algorithms::common::{Solution, Step, Strategy};
use crate::error::SearchError;
use crate::grid::{Action, Grid, Position};
use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const STEP_COST: u32 = 1;

/// A discovered state. Nodes live in an arena and are never edited; a cheaper
/// route to a state already on the frontier becomes a new node.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    state: Position,
    parent: Option<usize>,
    action: Option<Action>,
    cost_so_far: u32,
    heuristic: u32,
}

/// Frontier key. `sequence` grows with every push, so equal priorities pop in
/// discovery order and the ordering is total.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct FrontierEntry {
    priority: u32,
    sequence: u64,
    node: usize,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap behavior
        match other.priority.cmp(&self.priority) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            other => other,
        }
    }
}

enum Progress {
    Expanded,
    Goal(usize),
    Exhausted,
}

/// State of a single search call. Nothing here outlives `solve`.
struct BestFirst<'g> {
    grid: &'g Grid,
    strategy: Strategy,
    nodes: Vec<SearchNode>,
    frontier: BinaryHeap<FrontierEntry>,
    best_cost: FxHashMap<Position, u32>,
    visited: FxHashSet<Position>,
    sequence: u64,
    expanded: usize,
}

impl<'g> BestFirst<'g> {
    fn new(grid: &'g Grid, strategy: Strategy) -> Self {
        let mut search = BestFirst {
            grid,
            strategy,
            nodes: Vec::new(),
            frontier: BinaryHeap::new(),
            best_cost: FxHashMap::default(),
            visited: FxHashSet::default(),
            sequence: 0,
            expanded: 0,
        };

        let start = grid.start();
        search.best_cost.insert(start, 0);
        search.push(SearchNode {
            state: start,
            parent: None,
            action: None,
            cost_so_far: 0,
            heuristic: grid.heuristic(start),
        });
        search
    }

    fn push(&mut self, node: SearchNode) {
        let index = self.nodes.len();
        self.visited.insert(node.state);
        self.frontier.push(FrontierEntry {
            priority: self.strategy.priority(node.cost_so_far, node.heuristic),
            sequence: self.sequence,
            node: index,
        });
        self.nodes.push(node);
        self.sequence += 1;
    }

    /// Pops one frontier entry and expands it unless it is the goal.
    fn step(&mut self) -> Progress {
        let grid = self.grid;
        let Some(entry) = self.frontier.pop() else {
            return Progress::Exhausted;
        };
        let node = self.nodes[entry.node];

        if grid.is_goal(node.state) {
            return Progress::Goal(entry.node);
        }

        self.expanded += 1;
        trace!(
            "expand {} g={} h={} priority={}",
            node.state,
            node.cost_so_far,
            node.heuristic,
            entry.priority
        );

        for (action, neighbor) in grid.neighbors(node.state) {
            let new_cost = node.cost_so_far + STEP_COST;
            let improves = self
                .best_cost
                .get(&neighbor)
                .map_or(true, |&best| new_cost < best);
            if !improves {
                continue;
            }

            self.best_cost.insert(neighbor, new_cost);
            self.push(SearchNode {
                state: neighbor,
                parent: Some(entry.node),
                action: Some(action),
                cost_so_far: new_cost,
                heuristic: grid.heuristic(neighbor),
            });
        }
        Progress::Expanded
    }

    fn run(mut self) -> Result<Solution, SearchError> {
        loop {
            match self.step() {
                Progress::Expanded => {}
                Progress::Goal(index) => {
                    let path = self.reconstruct(index);
                    return Ok(Solution {
                        path,
                        visited: self.visited,
                        expanded: self.expanded,
                    });
                }
                Progress::Exhausted => {
                    debug!(
                        "{}: frontier exhausted after {} expansions, {} states visited",
                        self.strategy,
                        self.expanded,
                        self.visited.len()
                    );
                    return Err(SearchError::NoPath {
                        visited: self.visited.len(),
                        expanded: self.expanded,
                    });
                }
            }
        }
    }

    /// Walks parent links from `goal_index` back to the start.
    fn reconstruct(&self, goal_index: usize) -> Vec<Step> {
        let mut path = Vec::new();
        let mut current = Some(goal_index);
        while let Some(index) = current {
            let node = &self.nodes[index];
            path.push(Step {
                action: node.action,
                position: node.state,
            });
            current = node.parent;
        }
        path.reverse();
        path
    }
}

/// Runs best-first search from the grid's start to its goal.
///
/// A* orders the frontier by `g + h` and returns a minimum-step path;
/// Greedy orders by `h` alone and returns whatever path it reaches first.
/// Ties on priority are broken by discovery order, so the result is fully
/// determined by the grid and the strategy.
///
/// # Errors
///
/// [`SearchError::NoPath`] when the goal cannot be reached. The error
/// carries how many states were visited and expanded, but no partial path.
pub fn solve(grid: &Grid, strategy: Strategy) -> Result<Solution, SearchError> {
    debug!(
        "{}: searching {}x{} grid from {} to {}",
        strategy,
        grid.height(),
        grid.width(),
        grid.start(),
        grid.goal()
    );

    let solution = BestFirst::new(grid, strategy).run()?;

    debug!(
        "{}: found {} step path, {} states visited, {} expanded",
        strategy,
        solution.steps(),
        solution.visited.len(),
        solution.expanded
    );
    Ok(solution)
}

/// Parses `name` as a [`Strategy`] and solves. An unknown name fails before
/// any search work is done.
pub fn solve_named(grid: &Grid, name: &str) -> Result<Solution, SearchError> {
    let strategy: Strategy = name.parse()?;
    solve(grid, strategy)
}
