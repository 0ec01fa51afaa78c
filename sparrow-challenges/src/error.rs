#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyGraph,
    InvalidDensity {
        density: f64,
    },
    InvalidHyperparameter {
        name: String,
        reason: String,
    },
    InvalidPenalty {
        penalty: f64,
    },
    InvalidWeight {
        from: usize,
        to: usize,
        weight: f64,
    },
    NonSquareMatrix {
        row: usize,
        expected_len: usize,
        actual_len: usize,
    },
    ZeroIterations,
    ZeroPopulation,
    ZeroRuns,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyGraph => write!(f, "Graph must contain at least one node"),
            ConfigError::InvalidDensity { density } => write!(
                f,
                "Density '{}' must be a finite non-negative number",
                density
            ),
            ConfigError::InvalidHyperparameter { name, reason } => {
                write!(f, "Invalid hyperparameter '{}': {}", name, reason)
            }
            ConfigError::InvalidPenalty { penalty } => write!(
                f,
                "Missing edge penalty '{}' must be a finite non-negative number",
                penalty
            ),
            ConfigError::InvalidWeight { from, to, weight } => write!(
                f,
                "Weight '{}' of edge {} -> {} must be a finite non-negative number",
                weight, from, to
            ),
            ConfigError::NonSquareMatrix {
                row,
                expected_len,
                actual_len,
            } => write!(
                f,
                "Weight matrix row {} has {} entries. Expected: '{}'",
                row, actual_len, expected_len
            ),
            ConfigError::ZeroIterations => write!(f, "max_iter must be at least 1"),
            ConfigError::ZeroPopulation => write!(f, "population_size must be at least 1"),
            ConfigError::ZeroRuns => write!(f, "num_runs must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidRoute {
    DuplicateNode {
        node: usize,
    },
    LengthMismatch {
        route_len: usize,
        num_nodes: usize,
    },
    NodeOutOfRange {
        node: usize,
        num_nodes: usize,
    },
}

impl std::fmt::Display for InvalidRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidRoute::DuplicateNode { node } => {
                write!(f, "Route contains node '{}' more than once", node)
            }
            InvalidRoute::LengthMismatch {
                route_len,
                num_nodes,
            } => write!(
                f,
                "Route length ({}) does not match number of nodes ({})",
                route_len, num_nodes
            ),
            InvalidRoute::NodeOutOfRange { node, num_nodes } => write!(
                f,
                "Route contains node '{}' but the graph only has {} nodes",
                node, num_nodes
            ),
        }
    }
}

impl std::error::Error for InvalidRoute {}
