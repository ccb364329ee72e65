use crate::algorithms::{Solution, Strategy};
use std::fmt;

/// Measurements of one search run on one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    pub strategy: Strategy,
    pub success: bool,
    pub path_steps: usize,
    pub optimal_steps: Option<usize>,
    pub nodes_visited: usize,
    pub nodes_expanded: usize,
    pub route_efficiency: f64,
}

impl SearchStatistics {
    pub fn new(strategy: Strategy, optimal_steps: Option<usize>) -> Self {
        SearchStatistics {
            strategy,
            success: false,
            path_steps: 0,
            optimal_steps,
            nodes_visited: 0,
            nodes_expanded: 0,
            route_efficiency: 0.0,
        }
    }

    pub fn record(&mut self, solution: &Solution) {
        self.success = true;
        self.path_steps = solution.steps();
        self.nodes_visited = solution.visited.len();
        self.nodes_expanded = solution.expanded;
        self.calculate_efficiency();
    }

    /// Records the effort of a search that ran out of frontier.
    pub fn record_failure(&mut self, visited: usize, expanded: usize) {
        self.success = false;
        self.path_steps = 0;
        self.nodes_visited = visited;
        self.nodes_expanded = expanded;
        self.calculate_efficiency();
    }

    /// Path steps divided by the optimal step count; 1.0 means optimal.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_steps {
            Some(optimal) if self.success && optimal > 0 => {
                self.path_steps as f64 / optimal as f64
            }
            _ => 0.0,
        };
    }

    pub fn extra_steps(&self) -> usize {
        self.optimal_steps
            .map_or(0, |optimal| self.path_steps.saturating_sub(optimal))
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strategy: {}", self.strategy)?;
        if !self.success {
            writeln!(f, "Result: no path")?;
            writeln!(f, "Nodes Visited: {}", self.nodes_visited)?;
            writeln!(f, "Nodes Expanded: {}", self.nodes_expanded)?;
            return Ok(());
        }

        writeln!(f, "Path Steps: {}", self.path_steps)?;
        match self.optimal_steps {
            Some(optimal) => writeln!(f, "Optimal Steps: {}", optimal)?,
            None => writeln!(f, "Optimal Steps: unknown")?,
        }
        writeln!(f, "Nodes Visited: {}", self.nodes_visited)?;
        writeln!(f, "Nodes Expanded: {}", self.nodes_expanded)?;
        writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;

        if self.extra_steps() > 0 {
            writeln!(f, "Extra steps over optimal: {}", self.extra_steps())?;
        }

        Ok(())
    }
}
