use crate::algorithms::Strategy;
use crate::error::SearchError;
use crate::grid::Markers;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Read the grid from a text file instead of generating one
    #[arg(long)]
    pub grid_file: Option<PathBuf>,

    #[arg(long, default_value_t = 20)]
    pub grid_size: usize,

    #[arg(long, default_value_t = 50)]
    pub num_walls: usize,

    /// Seed for random grids; omit for a fresh grid every run
    #[arg(long)]
    pub seed: Option<u64>,

    /// 'a-star', 'greedy', or 'all'
    #[arg(long, default_value = "a-star")]
    pub algorithm: String,

    #[arg(long, default_value_t = 'A')]
    pub start_marker: char,

    #[arg(long, default_value_t = 'B')]
    pub goal_marker: char,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    /// Random grids per wall count in batch mode
    #[arg(long, default_value_t = 10)]
    pub num_simulations: usize,

    #[arg(long, default_value_t = 0)]
    pub min_walls: usize,

    #[arg(long, default_value_t = 100)]
    pub max_walls: usize,

    #[arg(long, default_value_t = 10)]
    pub wall_step: usize,

    #[arg(long, default_value_t = 300)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "search_results.csv")]
    pub output_file: String,
}

impl Config {
    pub fn markers(&self) -> Markers {
        Markers {
            start: self.start_marker,
            goal: self.goal_marker,
        }
    }

    /// Strategies selected by `--algorithm`; `all` selects every strategy.
    pub fn strategies(&self) -> Result<Vec<Strategy>, SearchError> {
        if self.algorithm == "all" {
            return Ok(Strategy::ALL.to_vec());
        }
        Ok(vec![self.algorithm.parse()?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["informed_search"]);
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.markers(), Markers::default());
        assert_eq!(config.strategies(), Ok(vec![Strategy::AStar]));
        assert!(config.grid_file.is_none());
    }

    #[test]
    fn test_strategy_selection() {
        let config = Config::parse_from(["informed_search", "--algorithm", "all"]);
        assert_eq!(config.strategies(), Ok(Strategy::ALL.to_vec()));

        let config = Config::parse_from(["informed_search", "--algorithm", "bfs"]);
        assert_eq!(
            config.strategies(),
            Err(SearchError::InvalidStrategy("bfs".to_string()))
        );
    }

    #[test]
    fn test_custom_markers() {
        let config = Config::parse_from([
            "informed_search",
            "--start-marker",
            "S",
            "--goal-marker",
            "G",
        ]);
        assert_eq!(config.markers(), Markers { start: 'S', goal: 'G' });
    }
}
