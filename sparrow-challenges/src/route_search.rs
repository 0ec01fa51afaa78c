use crate::error::{ConfigError, InvalidRoute};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Difficulty {
    pub num_nodes: usize,
    pub density: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            num_nodes: 10,
            density: 0.6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub route: Vec<usize>,
}

impl Solution {
    pub fn new() -> Self {
        Self { route: Vec::new() }
    }
}

impl From<Vec<usize>> for Solution {
    fn from(route: Vec<usize>) -> Self {
        Self { route }
    }
}

/// How a step between two distinct nodes with weight `0` is priced.
///
/// A zero weight is both "no edge" and "free edge" in the adjacency matrix.
/// `ZeroCost` keeps the literal reading, `Penalty` charges a fixed amount.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingEdge {
    #[default]
    ZeroCost,
    Penalty(f64),
}

impl MissingEdge {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            MissingEdge::Penalty(penalty) if !penalty.is_finite() || penalty < 0.0 => {
                Err(ConfigError::InvalidPenalty { penalty })
            }
            _ => Ok(()),
        }
    }
}

#[doc(hidden)]
#[derive(Deserialize)]
pub struct GraphData {
    weight_matrix: Vec<Vec<f64>>,
}

impl TryFrom<GraphData> for Graph {
    type Error = ConfigError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        Graph::new(data.weight_matrix)
    }
}

/// Directed weighted graph, immutable once built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "GraphData")]
pub struct Graph {
    num_nodes: usize,
    weight_matrix: Vec<Vec<f64>>,
}

impl Graph {
    pub fn new(weight_matrix: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let num_nodes = weight_matrix.len();
        if num_nodes == 0 {
            return Err(ConfigError::EmptyGraph);
        }
        for (from, row) in weight_matrix.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(ConfigError::NonSquareMatrix {
                    row: from,
                    expected_len: num_nodes,
                    actual_len: row.len(),
                });
            }
            if let Some((to, &weight)) = row
                .iter()
                .enumerate()
                .find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(ConfigError::InvalidWeight { from, to, weight });
            }
        }
        Ok(Self {
            num_nodes,
            weight_matrix,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn weight_matrix(&self) -> &Vec<Vec<f64>> {
        &self.weight_matrix
    }

    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weight_matrix[from][to]
    }

    pub fn is_edge(&self, from: usize, to: usize) -> bool {
        from != to && self.weight_matrix[from][to] > 0.0
    }

    pub fn num_edges(&self) -> usize {
        (0..self.num_nodes)
            .flat_map(|from| (0..self.num_nodes).map(move |to| (from, to)))
            .filter(|&(from, to)| self.is_edge(from, to))
            .count()
    }

    pub fn step_cost(&self, from: usize, to: usize, missing_edge: MissingEdge) -> f64 {
        let weight = self.weight_matrix[from][to];
        match missing_edge {
            MissingEdge::Penalty(penalty) if from != to && weight == 0.0 => penalty,
            _ => weight,
        }
    }

    /// Total cost of walking `route` in order. No edge closes the path.
    ///
    /// `route` must already be a permutation of this graph's nodes; use
    /// [`calc_route_weight`] for untrusted input.
    pub fn path_weight(&self, route: &[usize], missing_edge: MissingEdge) -> f64 {
        route
            .windows(2)
            .map(|w| self.step_cost(w[0], w[1], missing_edge))
            .sum()
    }

    pub fn calc_route_weight(&self, solution: &Solution) -> Result<f64, InvalidRoute> {
        calc_route_weight(self, &solution.route, MissingEdge::ZeroCost)
    }
}

pub fn validate_route(num_nodes: usize, route: &[usize]) -> Result<(), InvalidRoute> {
    if route.len() != num_nodes {
        return Err(InvalidRoute::LengthMismatch {
            route_len: route.len(),
            num_nodes,
        });
    }
    let mut visited = vec![false; num_nodes];
    for &node in route {
        if node >= num_nodes {
            return Err(InvalidRoute::NodeOutOfRange { node, num_nodes });
        }
        if visited[node] {
            return Err(InvalidRoute::DuplicateNode { node });
        }
        visited[node] = true;
    }
    Ok(())
}

pub fn calc_route_weight(
    graph: &Graph,
    route: &[usize],
    missing_edge: MissingEdge,
) -> Result<f64, InvalidRoute> {
    validate_route(graph.num_nodes(), route)?;
    Ok(graph.path_weight(route, missing_edge))
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Challenge {
    pub seed: [u8; 32],
    pub difficulty: Difficulty,
    pub node_positions: Vec<(f64, f64)>,
    pub graph: Graph,
}

impl Challenge {
    /// Scatters nodes over the unit square and links every ordered pair
    /// closer than `density`, weighted by distance * 100 (2 decimals).
    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Result<Self> {
        if difficulty.num_nodes < 1 {
            return Err(ConfigError::EmptyGraph.into());
        }
        if !difficulty.density.is_finite() || difficulty.density < 0.0 {
            return Err(ConfigError::InvalidDensity {
                density: difficulty.density,
            }
            .into());
        }
        let mut rng = SmallRng::from_seed(*seed);
        let num_nodes = difficulty.num_nodes;

        let node_positions: Vec<(f64, f64)> = (0..num_nodes)
            .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
            .collect();

        let weight_matrix: Vec<Vec<f64>> = node_positions
            .iter()
            .enumerate()
            .map(|(i, &from)| {
                node_positions
                    .iter()
                    .enumerate()
                    .map(|(j, &to)| {
                        let dist = (from.0 - to.0).hypot(from.1 - to.1);
                        if i != j && dist < difficulty.density {
                            (dist * 100.0 * 100.0).round() / 100.0
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            seed: *seed,
            difficulty: *difficulty,
            node_positions,
            graph: Graph::new(weight_matrix)?,
        })
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<f64> {
        Ok(self.graph.calc_route_weight(solution)?)
    }
}
