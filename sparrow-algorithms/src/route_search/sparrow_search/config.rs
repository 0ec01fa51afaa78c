use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sparrow_challenges::{ConfigError, MissingEdge};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub max_iter: usize,
    pub population_size: usize,
    pub seed: Option<u64>,
    pub missing_edge: MissingEdge,
    pub num_runs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iter: 200,
            population_size: 50,
            seed: None,
            missing_edge: MissingEdge::ZeroCost,
            num_runs: 1,
        }
    }
}

impl Config {
    /// Overlays `hyperparameters` onto the defaults. Unknown keys are ignored.
    ///
    /// `missing_edge_penalty` is accepted as a shorthand for
    /// `missing_edge: {"penalty": p}`; `null` selects `zero_cost`.
    pub fn initialize(
        hyperparameters: &Option<Map<String, Value>>,
    ) -> Result<Self, ConfigError> {
        let mut merged_params = serde_json::to_value(Self::default()).map_err(|e| {
            ConfigError::InvalidHyperparameter {
                name: "defaults".to_string(),
                reason: e.to_string(),
            }
        })?;

        if let (Value::Object(ref mut obj), Some(map)) = (&mut merged_params, hyperparameters) {
            for (k, v) in map {
                if k == "missing_edge_penalty" {
                    let missing_edge = match v {
                        Value::Null => MissingEdge::ZeroCost,
                        Value::Number(n) => match n.as_f64() {
                            Some(penalty) => MissingEdge::Penalty(penalty),
                            None => {
                                return Err(ConfigError::InvalidHyperparameter {
                                    name: k.clone(),
                                    reason: format!("'{}' is not representable as f64", n),
                                })
                            }
                        },
                        _ => {
                            return Err(ConfigError::InvalidHyperparameter {
                                name: k.clone(),
                                reason: format!("expected a number or null, got '{}'", v),
                            })
                        }
                    };
                    let value = serde_json::to_value(missing_edge).map_err(|e| {
                        ConfigError::InvalidHyperparameter {
                            name: k.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    obj.insert("missing_edge".to_string(), value);
                    continue;
                }
                if obj.contains_key(k) {
                    obj.insert(k.clone(), v.clone());
                }
            }
        }

        let config: Self =
            serde_json::from_value(merged_params).map_err(|e| ConfigError::InvalidHyperparameter {
                name: "hyperparameters".to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iter == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.num_runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        self.missing_edge.validate()
    }

    /// Leading population slots treated as producers each iteration.
    pub fn num_producers(&self) -> usize {
        (self.population_size / 5).max(1)
    }

    pub fn num_danger_draws(&self) -> usize {
        (self.population_size / 10).max(1)
    }
}
