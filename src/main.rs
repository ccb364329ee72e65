use clap::Parser;

use informed_search::batch_simulation::BatchSimulation;
use informed_search::config::Config;
use informed_search::simulation::Simulation;

fn main() {
    let config = Config::parse();

    if !config.quiet {
        println!("Starting grid search...");
        match &config.grid_file {
            Some(path) => println!("Grid file: {}", path.display()),
            None => {
                println!("Grid size: {}x{}", config.grid_size, config.grid_size);
                println!("Walls: {}", config.num_walls);
            }
        }
        println!("Algorithm: {}", config.algorithm);
        println!();
    }

    if config.batch_mode {
        let mut batch_sim = BatchSimulation::new(config.clone());
        match batch_sim.run() {
            Ok(()) => {
                if !config.quiet {
                    batch_sim.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let simulation = match Simulation::new(config.clone()) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Failed to set up grid: {}", e);
            std::process::exit(1);
        }
    };

    let results = match simulation.run_configured() {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    for result in &results {
        simulation.print_result(result);
    }

    if results.len() > 1 {
        Simulation::print_comparison_results(&results);
    }

    if results.iter().all(|r| !r.success()) {
        println!("No path exists - try reducing --num-walls or increasing --grid-size");
    }
}
