use crate::config::Config;
use crate::grid::Grid;
use crate::simulation::{AlgorithmResult, Simulation, SimulationError};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const CSV_HEADER: &str = "simulation_id,algorithm,grid_size,num_walls,seed,success,path_steps,optimal_steps,nodes_visited,nodes_expanded,route_efficiency,search_time_ns";

/// One strategy's run on one generated grid.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub algorithm: String,
    pub grid_size: usize,
    pub num_walls: usize,
    pub seed: u64,
    pub success: bool,
    pub path_steps: usize,
    pub optimal_steps: usize,
    pub nodes_visited: usize,
    pub nodes_expanded: usize,
    pub route_efficiency: f64,
    pub search_time_ns: u64,
}

impl BatchResult {
    fn from_algorithm_result(
        result: &AlgorithmResult,
        simulation_id: usize,
        grid_size: usize,
        num_walls: usize,
        seed: u64,
    ) -> Self {
        let stats = &result.statistics;
        BatchResult {
            simulation_id,
            algorithm: result.name.clone(),
            grid_size,
            num_walls,
            seed,
            success: stats.success,
            path_steps: stats.path_steps,
            optimal_steps: stats.optimal_steps.unwrap_or(0),
            nodes_visited: stats.nodes_visited,
            nodes_expanded: stats.nodes_expanded,
            route_efficiency: stats.route_efficiency,
            search_time_ns: result.elapsed.as_nanos() as u64,
        }
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{:.6},{}",
            self.simulation_id,
            self.algorithm,
            self.grid_size,
            self.num_walls,
            self.seed,
            self.success,
            self.path_steps,
            self.optimal_steps,
            self.nodes_visited,
            self.nodes_expanded,
            self.route_efficiency,
            self.search_time_ns
        )
    }
}

/// Sweeps wall counts over many seeded random grids and records every run.
pub struct BatchSimulation {
    config: Config,
    base_seed: u64,
    results: Vec<BatchResult>,
    start_time: Instant,
    batch_size: usize,
    total_results_written: usize,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        let base_seed = config.seed.unwrap_or_else(rand::random);
        BatchSimulation {
            config,
            base_seed,
            results: Vec::new(),
            start_time: Instant::now(),
            batch_size: 100,
            total_results_written: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    fn wall_counts(&self) -> impl Iterator<Item = usize> {
        (self.config.min_walls..=self.config.max_walls).step_by(self.config.wall_step.max(1))
    }

    /// Seed for one generated grid, derived from the base seed so a whole
    /// batch can be replayed.
    fn grid_seed(&self, num_walls: usize, simulation_id: usize) -> u64 {
        self.base_seed
            .wrapping_add((num_walls as u64) << 32)
            .wrapping_add(simulation_id as u64)
    }

    pub fn run(&mut self) -> Result<(), SimulationError> {
        // Fail before touching the output file if the algorithm is unknown.
        let strategies = self.config.strategies()?;
        self.initialize_csv_file()?;

        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!("Grid size: {}", self.config.grid_size);
            println!(
                "Walls range: {} to {} (step {})",
                self.config.min_walls, self.config.max_walls, self.config.wall_step
            );
            println!("Simulations per configuration: {}", self.config.num_simulations);
            println!("Timeout: {} seconds", self.config.timeout_seconds);
            println!("Algorithm: {}", self.config.algorithm);
            println!("Base seed: {}", self.base_seed);
            println!("Output file: {}", self.config.output_file);
            println!();
        }

        let wall_counts: Vec<usize> = self.wall_counts().collect();
        let total_configurations = wall_counts.len();
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        'sweep: for (index, num_walls) in wall_counts.into_iter().enumerate() {
            if !self.config.quiet {
                println!(
                    "Configuration {}/{}: {} walls",
                    index + 1,
                    total_configurations,
                    num_walls
                );
            }

            for simulation_id in 0..self.config.num_simulations {
                if self.start_time.elapsed() > timeout {
                    warn!("batch timeout reached after {} results", self.results.len());
                    break 'sweep;
                }

                let seed = self.grid_seed(num_walls, simulation_id);
                let mut rng = StdRng::seed_from_u64(seed);
                let grid = Grid::random(
                    self.config.grid_size,
                    self.config.grid_size,
                    num_walls,
                    &mut rng,
                )?;
                let simulation = Simulation::from_grid(grid, self.config.clone());

                for &strategy in &strategies {
                    let result = simulation.run(strategy);
                    self.results.push(BatchResult::from_algorithm_result(
                        &result,
                        simulation_id,
                        self.config.grid_size,
                        num_walls,
                        seed,
                    ));
                }

                if self.results.len() - self.total_results_written >= self.batch_size {
                    self.flush_results_to_csv()?;
                }
            }
        }

        self.flush_results_to_csv()?;

        if !self.config.quiet {
            println!("\n=== BATCH SIMULATION COMPLETED ===");
            println!("Total results collected: {}", self.results.len());
            println!("Results saved to: {}", self.config.output_file);
            println!("Total time: {:.2?}", self.start_time.elapsed());
        }
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SimulationError {
        SimulationError::Io {
            path: PathBuf::from(&self.config.output_file),
            source,
        }
    }

    fn initialize_csv_file(&self) -> Result<(), SimulationError> {
        let mut file =
            std::fs::File::create(&self.config.output_file).map_err(|e| self.io_error(e))?;
        writeln!(file, "{}", CSV_HEADER).map_err(|e| self.io_error(e))?;
        info!("initialized CSV file {}", self.config.output_file);
        Ok(())
    }

    /// Appends every row not yet written.
    fn flush_results_to_csv(&mut self) -> Result<(), SimulationError> {
        let pending = &self.results[self.total_results_written..];
        if pending.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.config.output_file)
            .map_err(|e| self.io_error(e))?;
        let flushed = pending.len();
        for result in pending {
            writeln!(file, "{}", result.csv_row()).map_err(|e| self.io_error(e))?;
        }

        self.total_results_written = self.results.len();
        info!(
            "flushed {} results to CSV (total: {})",
            flushed, self.total_results_written
        );
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.results.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");

        let mut algorithm_groups: BTreeMap<&str, Vec<&BatchResult>> = BTreeMap::new();
        for result in &self.results {
            algorithm_groups
                .entry(result.algorithm.as_str())
                .or_default()
                .push(result);
        }

        for (algorithm, results) in algorithm_groups {
            println!("\n{} Algorithm Results:", algorithm);
            let successful: Vec<_> = results.iter().filter(|r| r.success).collect();
            let total = results.len();
            let success_rate = (successful.len() as f64 / total as f64) * 100.0;

            println!(
                "  Success rate: {}/{} ({:.1}%)",
                successful.len(),
                total,
                success_rate
            );

            if !successful.is_empty() {
                let n = successful.len() as f64;
                let avg_steps = successful.iter().map(|r| r.path_steps as f64).sum::<f64>() / n;
                let avg_efficiency = successful.iter().map(|r| r.route_efficiency).sum::<f64>() / n;
                let avg_visited = successful.iter().map(|r| r.nodes_visited as f64).sum::<f64>() / n;
                let avg_time_us =
                    successful.iter().map(|r| r.search_time_ns as f64).sum::<f64>() / n / 1000.0;

                println!("  Average path steps: {:.1}", avg_steps);
                println!("  Average efficiency: {:.3}", avg_efficiency);
                println!("  Average states visited: {:.1}", avg_visited);
                println!("  Average search time: {:.1}us", avg_time_us);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn batch_config(output_file: &str, extra: &[&str]) -> Config {
        let mut argv = vec![
            "informed_search",
            "--batch-mode",
            "--quiet",
            "--seed",
            "9",
            "--grid-size",
            "8",
            "--min-walls",
            "0",
            "--max-walls",
            "20",
            "--wall-step",
            "10",
            "--num-simulations",
            "3",
            "--output-file",
            output_file,
        ];
        argv.extend_from_slice(extra);
        Config::parse_from(argv)
    }

    fn temp_csv(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("informed_search_{}_{}.csv", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_batch_writes_one_row_per_run() {
        let output = temp_csv("rows");
        let mut batch = BatchSimulation::new(batch_config(&output, &["--algorithm", "all"]))
            .with_batch_size(4);
        batch.run().unwrap();

        // 3 wall counts x 3 grids x 2 strategies
        assert_eq!(batch.results().len(), 18);

        let csv = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.count(), 18);

        // A wall-free grid is always solvable, and A* is always optimal.
        for result in batch.results() {
            if result.num_walls == 0 {
                assert!(result.success);
            }
            if result.success && result.algorithm == "a-star" {
                assert_eq!(result.path_steps, result.optimal_steps);
            }
        }
    }

    #[test]
    fn test_batch_is_reproducible_from_seed() {
        let first_out = temp_csv("seed_a");
        let second_out = temp_csv("seed_b");

        let mut first = BatchSimulation::new(batch_config(&first_out, &[]));
        let mut second = BatchSimulation::new(batch_config(&second_out, &[]));
        first.run().unwrap();
        second.run().unwrap();
        std::fs::remove_file(&first_out).unwrap();
        std::fs::remove_file(&second_out).unwrap();

        let key = |r: &BatchResult| (r.seed, r.success, r.path_steps, r.nodes_visited);
        let a: Vec<_> = first.results().iter().map(key).collect();
        let b: Vec<_> = second.results().iter().map(key).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_rejects_unknown_algorithm() {
        let output = temp_csv("invalid");
        let mut batch = BatchSimulation::new(batch_config(&output, &["--algorithm", "bogus"]));
        assert!(matches!(batch.run(), Err(SimulationError::Search(_))));
        assert!(!std::path::Path::new(&output).exists());
    }
}
