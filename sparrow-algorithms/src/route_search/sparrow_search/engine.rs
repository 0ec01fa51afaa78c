use super::config::Config;
use super::population::{random_route, Individual, Population};
use anyhow::Result;
use ndarray::Array2;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sparrow_challenges::{ConfigError, Graph, Solution};
use tracing::{debug, info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_route: Vec<usize>,
    pub best_fitness: f64,
    pub visit_counts: Vec<u64>,
    pub edge_visits: Array2<u64>,
    pub best_fitness_history: Vec<f64>,
    pub iterations: usize,
    pub population_size: usize,
    pub weight_matrix: Vec<Vec<f64>>,
}

impl SearchResult {
    pub fn solution(&self) -> Solution {
        Solution {
            route: self.best_route.clone(),
        }
    }

    /// Node with the highest visit count (lowest index on ties) and its count.
    pub fn most_visited(&self) -> (usize, u64) {
        let mut most = (0, self.visit_counts[0]);
        for (node, &count) in self.visit_counts.iter().enumerate().skip(1) {
            if count > most.1 {
                most = (node, count);
            }
        }
        most
    }

    /// Incoming plus outgoing traversals per node, self-loops excluded.
    pub fn node_visit_totals(&self) -> Vec<u64> {
        let n = self.visit_counts.len();
        let mut totals = vec![0u64; n];
        for ((from, to), &count) in self.edge_visits.indexed_iter() {
            if from != to {
                totals[from] += count;
                totals[to] += count;
            }
        }
        totals
    }
}

pub struct SparrowSearch<'a> {
    graph: &'a Graph,
    config: Config,
    population: Population<'a>,
    best: Individual,
    visit_counts: Vec<u64>,
    edge_visits: Array2<u64>,
    best_fitness_history: Vec<f64>,
    iteration: usize,
}

impl<'a> SparrowSearch<'a> {
    pub fn new<R: Rng + ?Sized>(
        graph: &'a Graph,
        config: Config,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let population =
            Population::seed(graph, config.population_size, config.missing_edge, rng)?;
        let best = population.best().clone();
        let n = graph.num_nodes();
        Ok(Self {
            graph,
            config,
            population,
            best,
            visit_counts: vec![0; n],
            edge_visits: Array2::zeros((n, n)),
            best_fitness_history: Vec::with_capacity(config.max_iter),
            iteration: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn population(&self) -> &Population<'a> {
        &self.population
    }

    pub fn best(&self) -> &Individual {
        &self.best
    }

    pub fn visit_counts(&self) -> &[u64] {
        &self.visit_counts
    }

    pub fn edge_visits(&self) -> &Array2<u64> {
        &self.edge_visits
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_finished(&self) -> bool {
        self.iteration >= self.config.max_iter
    }

    /// Swaps two distinct positions in each of the leading producer slots.
    pub fn producer_phase<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.graph.num_nodes();
        if n < 2 {
            return;
        }
        for i in 0..self.config.num_producers() {
            let picked = index::sample(rng, n, 2);
            self.population.swap_nodes(i, picked.index(0), picked.index(1));
        }
    }

    /// Overwrites every non-producer slot with the best route, its second
    /// half shuffled.
    pub fn scrounger_phase<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.graph.num_nodes();
        for i in self.config.num_producers()..self.population.len() {
            let mut route = self.best.route.clone();
            route[n / 2..].shuffle(rng);
            self.population.replace(i, route);
        }
    }

    /// Slots are drawn with replacement.
    pub fn danger_phase<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.graph.num_nodes();
        for _ in 0..self.config.num_danger_draws() {
            let slot = rng.gen_range(0..self.population.len());
            self.population.replace(slot, random_route(n, rng));
        }
    }

    /// Re-scores every slot, tallies node and edge visits, and promotes a
    /// strictly better individual to best. Returns whether best changed.
    pub fn evaluate_phase(&mut self) -> bool {
        self.population.evaluate_all();
        let mut improved = false;
        for individual in self.population.iter() {
            for &node in &individual.route {
                self.visit_counts[node] += 1;
            }
            for step in individual.route.windows(2) {
                self.edge_visits[[step[0], step[1]]] += 1;
            }
            if individual.fitness < self.best.fitness {
                self.best = individual.clone();
                improved = true;
            }
        }
        improved
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.producer_phase(rng);
        self.scrounger_phase(rng);
        self.danger_phase(rng);
        let improved = self.evaluate_phase();
        self.iteration += 1;
        self.best_fitness_history.push(self.best.fitness);
        debug!(
            iteration = self.iteration,
            best_fitness = self.best.fitness,
            improved,
            "sparrow search iteration"
        );
        improved
    }

    /// Iterates until `max_iter`. `on_improvement` sees the seeded best
    /// route first and then every strict improvement.
    ///
    /// Unlike the final save in [`super::solve_challenge`], which returns
    /// its error, a failing intermediate save is logged with `warn!` and the
    /// search carries on to `max_iter`.
    pub fn run<R: Rng + ?Sized>(
        mut self,
        rng: &mut R,
        on_improvement: Option<&dyn Fn(&Solution) -> Result<()>>,
    ) -> SearchResult {
        self.notify(on_improvement);
        while !self.is_finished() {
            if self.step(rng) {
                info!(
                    iteration = self.iteration,
                    best_fitness = self.best.fitness,
                    "new best route"
                );
                self.notify(on_improvement);
            }
        }
        self.into_result()
    }

    fn notify(&self, on_improvement: Option<&dyn Fn(&Solution) -> Result<()>>) {
        if let Some(save) = on_improvement {
            let solution = Solution {
                route: self.best.route.clone(),
            };
            if let Err(e) = save(&solution) {
                warn!(error = %e, "failed to save improved solution");
            }
        }
    }

    pub fn into_result(self) -> SearchResult {
        SearchResult {
            best_route: self.best.route,
            best_fitness: self.best.fitness,
            visit_counts: self.visit_counts,
            edge_visits: self.edge_visits,
            best_fitness_history: self.best_fitness_history,
            iterations: self.iteration,
            population_size: self.config.population_size,
            weight_matrix: self.graph.weight_matrix().clone(),
        }
    }
}
