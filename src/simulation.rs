use crate::algorithms::a_star::optimal_steps;
use crate::algorithms::{solve, Solution, Strategy};
use crate::config::Config;
use crate::error::SearchError;
use crate::grid::Grid;
use crate::statistics::SearchStatistics;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Failures of the driver layer: reading or writing files, or a search error
/// that should abort the run.
#[derive(Debug)]
pub enum SimulationError {
    Io { path: PathBuf, source: io::Error },
    Search(SearchError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            SimulationError::Search(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Io { source, .. } => Some(source),
            SimulationError::Search(err) => Some(err),
        }
    }
}

impl From<SearchError> for SimulationError {
    fn from(err: SearchError) -> Self {
        SimulationError::Search(err)
    }
}

/// Outcome of running one strategy on the simulation's grid.
#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub name: String,
    pub statistics: SearchStatistics,
    pub elapsed: Duration,
    pub solution: Option<Solution>,
}

impl AlgorithmResult {
    pub fn success(&self) -> bool {
        self.statistics.success
    }
}

/// A grid plus the configuration used to search it.
pub struct Simulation {
    grid: Grid,
    config: Config,
    optimal_steps: Option<usize>,
}

impl Simulation {
    /// Loads `--grid-file` if given, otherwise generates a random grid.
    pub fn new(config: Config) -> Result<Self, SimulationError> {
        let grid = Self::load_grid(&config)?;
        Ok(Self::from_grid(grid, config))
    }

    pub fn from_grid(grid: Grid, config: Config) -> Self {
        let optimal_steps = optimal_steps(&grid);
        if optimal_steps.is_none() {
            warn!("goal {} is unreachable from start {}", grid.goal(), grid.start());
        }

        Simulation {
            grid,
            config,
            optimal_steps,
        }
    }

    pub fn load_grid(config: &Config) -> Result<Grid, SimulationError> {
        if let Some(path) = &config.grid_file {
            let text = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
                path: path.clone(),
                source,
            })?;
            let grid = Grid::parse_with(&text, config.markers())?;
            info!(
                "loaded {}x{} grid from {}",
                grid.height(),
                grid.width(),
                path.display()
            );
            return Ok(grid);
        }

        // Use seed for reproducible results
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = Grid::random(config.grid_size, config.grid_size, config.num_walls, &mut rng)?;
        info!(
            "generated grid - start: {}, goal: {}, walls: {}",
            grid.start(),
            grid.goal(),
            grid.wall_count()
        );
        Ok(grid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn optimal_steps(&self) -> Option<usize> {
        self.optimal_steps
    }

    /// Searches once with `strategy`. An unreachable goal is reported in the
    /// statistics rather than as an error.
    pub fn run(&self, strategy: Strategy) -> AlgorithmResult {
        let mut statistics = SearchStatistics::new(strategy, self.optimal_steps);

        let started = Instant::now();
        let outcome = solve(&self.grid, strategy);
        let elapsed = started.elapsed();

        let solution = match outcome {
            Ok(solution) => {
                statistics.record(&solution);
                Some(solution)
            }
            Err(err) => {
                if let SearchError::NoPath { visited, expanded } = err {
                    statistics.record_failure(visited, expanded);
                }
                warn!("{}: {}", strategy, err);
                None
            }
        };

        AlgorithmResult {
            name: strategy.name().to_string(),
            statistics,
            elapsed,
            solution,
        }
    }

    /// Runs every strategy on the same grid.
    pub fn run_all(&self) -> Vec<AlgorithmResult> {
        Strategy::ALL.iter().map(|&strategy| self.run(strategy)).collect()
    }

    /// Runs the strategies selected by `--algorithm`.
    pub fn run_configured(&self) -> Result<Vec<AlgorithmResult>, SearchError> {
        let strategies = self.config.strategies()?;
        Ok(strategies.into_iter().map(|strategy| self.run(strategy)).collect())
    }

    pub fn print_result(&self, result: &AlgorithmResult) {
        if !self.config.no_visualization {
            let markers = self.grid.markers();
            println!(
                "Legend: {}=Start, {}=Goal, #=Wall, *=Path, o=Visited, .=Empty",
                markers.start, markers.goal
            );
            println!("{}", self.grid.render(result.solution.as_ref()));
        }

        println!("=== {} ===", result.name);
        println!("{}", result.statistics);
        println!("Search time: {:.2?}", result.elapsed);

        if !self.config.quiet {
            if let Some(solution) = &result.solution {
                let moves: Vec<String> = solution.actions().map(|a| a.to_string()).collect();
                println!("Moves: {}", moves.join(", "));
            }
        }
    }

    /// Print comparison results in a table
    pub fn print_comparison_results(results: &[AlgorithmResult]) {
        println!("\n=== ALGORITHM COMPARISON RESULTS ===");
        println!();

        println!(
            "{:<10} {:<8} {:<8} {:<8} {:<12} {:<10} {:<10} {:<12}",
            "Algorithm", "Success", "Steps", "Optimal", "Efficiency", "Visited", "Expanded", "Time"
        );
        println!("{}", "-".repeat(84));

        for result in results {
            let stats = &result.statistics;
            let success_str = if stats.success { "yes" } else { "no" };
            let optimal_str = stats
                .optimal_steps
                .map_or_else(|| "-".to_string(), |steps| steps.to_string());

            println!(
                "{:<10} {:<8} {:<8} {:<8} {:<12} {:<10} {:<10} {:<12}",
                result.name,
                success_str,
                stats.path_steps,
                optimal_str,
                format!("{:.3}", stats.route_efficiency),
                stats.nodes_visited,
                stats.nodes_expanded,
                format!("{:.2?}", result.elapsed)
            );
        }
        println!();

        let successful: Vec<_> = results.iter().filter(|r| r.success()).collect();
        let best_steps = successful.iter().min_by_key(|r| r.statistics.path_steps);
        let fewest_visited = successful.iter().min_by_key(|r| r.statistics.nodes_visited);
        let fastest = successful.iter().min_by_key(|r| r.elapsed);

        match (best_steps, fewest_visited, fastest) {
            (Some(best_steps), Some(fewest_visited), Some(fastest)) => {
                println!("=== PERFORMANCE ANALYSIS ===");
                println!(
                    "Shortest path: {} ({} steps)",
                    best_steps.name, best_steps.statistics.path_steps
                );
                println!(
                    "Least search effort: {} ({} states visited)",
                    fewest_visited.name, fewest_visited.statistics.nodes_visited
                );
                println!("Fastest: {} ({:.2?})", fastest.name, fastest.elapsed);
            }
            _ => println!("No algorithm reached the goal."),
        }
    }
}
