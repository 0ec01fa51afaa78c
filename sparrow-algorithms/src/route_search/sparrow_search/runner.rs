use super::config::Config;
use super::engine::{SearchResult, SparrowSearch};
use anyhow::Result;
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sparrow_challenges::{ConfigError, Graph, Solution};
use std::time::Instant;
use tracing::info;

pub fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MultiRunResult {
    pub best: SearchResult,
    pub best_run: usize,
    pub run_fitnesses: Vec<f64>,
}

/// Runs `config.num_runs` independent searches in parallel and keeps the
/// lowest best fitness; the lowest run index wins ties.
///
/// Run `i` is seeded with `seed + i` when `config.seed` is set.
pub fn run_independent(graph: &Graph, config: &Config) -> Result<MultiRunResult, ConfigError> {
    config.validate()?;
    let results = (0..config.num_runs)
        .into_par_iter()
        .map(|run| {
            let run_config = Config {
                seed: config.seed.map(|s| s.wrapping_add(run as u64)),
                ..*config
            };
            let mut rng = seeded_rng(run_config.seed);
            SparrowSearch::new(graph, run_config, &mut rng)
                .map(|search| search.run(&mut rng, None))
        })
        .collect::<Result<Vec<SearchResult>, ConfigError>>()?;

    let run_fitnesses: Vec<f64> = results.iter().map(|r| r.best_fitness).collect();
    let mut best_run = 0;
    for (run, &fitness) in run_fitnesses.iter().enumerate().skip(1) {
        if fitness < run_fitnesses[best_run] {
            best_run = run;
        }
    }
    let best = results
        .into_iter()
        .nth(best_run)
        .ok_or(ConfigError::ZeroRuns)?;
    Ok(MultiRunResult {
        best,
        best_run,
        run_fitnesses,
    })
}

pub struct Solver;

impl Solver {
    pub fn solve(
        graph: &Graph,
        config: &Config,
        save_solution: Option<&dyn Fn(&Solution) -> Result<()>>,
    ) -> Result<SearchResult, ConfigError> {
        let mut rng = seeded_rng(config.seed);
        let search = SparrowSearch::new(graph, *config, &mut rng)?;
        Ok(search.run(&mut rng, save_solution))
    }

    pub fn solve_challenge_instance(
        graph: &Graph,
        hyperparameters: &Option<Map<String, Value>>,
        save_solution: Option<&dyn Fn(&Solution) -> Result<()>>,
    ) -> Result<MultiRunResult> {
        let t0 = Instant::now();
        let config = Config::initialize(hyperparameters)?;
        info!(
            num_nodes = graph.num_nodes(),
            max_iter = config.max_iter,
            population_size = config.population_size,
            num_runs = config.num_runs,
            "starting sparrow search"
        );

        let result = if config.num_runs == 1 {
            let best = Self::solve(graph, &config, save_solution)?;
            MultiRunResult {
                run_fitnesses: vec![best.best_fitness],
                best_run: 0,
                best,
            }
        } else {
            let result = run_independent(graph, &config)?;
            if let Some(save) = save_solution {
                save(&result.best.solution())?;
            }
            result
        };

        info!(
            best_fitness = result.best.best_fitness,
            best_run = result.best_run,
            elapsed_secs = t0.elapsed().as_secs_f64(),
            "sparrow search finished"
        );
        Ok(result)
    }
}
