use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sparrow_challenges::{ConfigError, Graph, MissingEdge};

pub fn random_route<R: Rng + ?Sized>(num_nodes: usize, rng: &mut R) -> Vec<usize> {
    let mut route: Vec<usize> = (0..num_nodes).collect();
    route.shuffle(rng);
    route
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Individual {
    pub route: Vec<usize>,
    pub fitness: f64,
}

impl Individual {
    pub fn new(graph: &Graph, route: Vec<usize>, missing_edge: MissingEdge) -> Self {
        let fitness = graph.path_weight(&route, missing_edge);
        Self { route, fitness }
    }

    pub fn evaluate(&mut self, graph: &Graph, missing_edge: MissingEdge) {
        self.fitness = graph.path_weight(&self.route, missing_edge);
    }
}

/// Fixed-size, slot-ordered set of candidate routes over one graph.
///
/// Every mutation goes through this type so the cached fitness of a slot
/// always matches its route.
#[derive(Debug, Clone)]
pub struct Population<'a> {
    graph: &'a Graph,
    missing_edge: MissingEdge,
    individuals: Vec<Individual>,
}

impl<'a> Population<'a> {
    pub fn seed<R: Rng + ?Sized>(
        graph: &'a Graph,
        population_size: usize,
        missing_edge: MissingEdge,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if population_size < 1 {
            return Err(ConfigError::ZeroPopulation);
        }
        if graph.num_nodes() < 1 {
            return Err(ConfigError::EmptyGraph);
        }
        missing_edge.validate()?;
        let individuals = (0..population_size)
            .map(|_| Individual::new(graph, random_route(graph.num_nodes(), rng), missing_edge))
            .collect();
        Ok(Self {
            graph,
            missing_edge,
            individuals,
        })
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, i: usize) -> &Individual {
        &self.individuals[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn replace(&mut self, i: usize, route: Vec<usize>) {
        self.individuals[i] = Individual::new(self.graph, route, self.missing_edge);
    }

    pub fn swap_nodes(&mut self, i: usize, a: usize, b: usize) {
        let individual = &mut self.individuals[i];
        individual.route.swap(a, b);
        individual.evaluate(self.graph, self.missing_edge);
    }

    pub fn evaluate_all(&mut self) {
        for individual in self.individuals.iter_mut() {
            individual.evaluate(self.graph, self.missing_edge);
        }
    }

    /// Lowest fitness; the earliest slot wins ties.
    pub fn best(&self) -> &Individual {
        let mut best = &self.individuals[0];
        for individual in &self.individuals[1..] {
            if individual.fitness < best.fitness {
                best = individual;
            }
        }
        best
    }
}
