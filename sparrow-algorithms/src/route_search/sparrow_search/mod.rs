mod config;
mod engine;
mod population;
mod runner;

pub use config::Config;
pub use engine::{SearchResult, SparrowSearch};
pub use population::{random_route, Individual, Population};
pub use runner::{run_independent, seeded_rng, MultiRunResult, Solver};

use anyhow::Result;
use serde_json::{Map, Value};
use sparrow_challenges::route_search::*;

pub fn solve_challenge(
    graph: &Graph,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let result = Solver::solve_challenge_instance(graph, hyperparameters, Some(save_solution))?;
    save_solution(&result.best.solution())
}

pub fn help() {
    println!("Sparrow Search: producer / scrounger / danger-aware population search");
    println!("for a low-cost open path visiting every node once.");
    println!("");
    println!("HYPERPARAMETERS (all optional):");
    println!("  max_iter              iterations per run (default 200)");
    println!("  population_size       sparrows per run (default 50)");
    println!("  seed                  u64 seed, random when null (default null)");
    println!("  num_runs              independent parallel runs, best kept (default 1)");
    println!("  missing_edge_penalty  cost of a zero-weight step between distinct");
    println!("                        nodes, null keeps it free (default null)");
    println!("");
    println!("EACH ITERATION:");
    println!("  • Producers: the first max(population_size / 5, 1) slots swap two nodes");
    println!("  • Scroungers: remaining slots copy the best route, shuffle its second half");
    println!("  • Danger: max(population_size / 10, 1) random slots restart from scratch");
    println!("");
    println!("Example: {{\"max_iter\": 500, \"population_size\": 80, \"seed\": 7}}");
}
