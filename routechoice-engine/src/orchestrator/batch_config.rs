use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::orchestrator_error::RouteChoiceError;

/// parameters for one `batched` call. Mirrors the host library's pattern of
/// exposing run-time configuration as a plain, serde-deserializable struct
/// with `Default` matching the documented CLI/library defaults.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BatchConfig {
    pub max_routes: usize,
    pub max_depth: usize,
    pub max_misses: usize,
    pub seed: u64,
    /// 0 means "auto": use `rayon::current_num_threads()`.
    pub cores: usize,
    pub penalty: f64,
    /// selects A* over Dijkstra. A* requires every node reachable during
    /// search to carry a coordinate (`CompactGraph::coordinate`); callers
    /// without reliable node coordinates should set this to `false`, or
    /// every OD will fail with `PathFinderError::MissingCoordinate` and be
    /// skipped.
    pub a_star: bool,
    /// lower bound on cost per meter, used to scale the A* haversine
    /// heuristic (e.g. `1 / free_flow_speed` for a travel-time cost).
    /// Ignored when `a_star` is `false`.
    pub min_cost_per_meter: f64,
    /// `true` selects BFS-LE; `false` selects Link-Penalisation.
    pub bfsle: bool,
    pub store_results: bool,
    pub path_size_logit: bool,
    pub eager_link_loading: bool,
    pub beta: f64,
    pub cutoff_prob: f64,
    /// when set, `batched` writes each OD's result row to a
    /// `CheckpointWriter` rooted here as the batch completes instead of
    /// materializing the table in memory; `BatchOutput::results` then
    /// returns `Err(RouteChoiceError::ResultsNotComputed)` and the table
    /// must be reloaded from the partitioned dataset.
    pub checkpoint_root: Option<PathBuf>,
    /// rows buffered per partition before `CheckpointWriter` flushes.
    /// Ignored when `checkpoint_root` is `None`.
    pub checkpoint_buffer_limit: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_routes: 0,
            max_depth: 0,
            max_misses: 100,
            seed: 0,
            cores: 0,
            penalty: 1.0,
            a_star: true,
            min_cost_per_meter: 1.0,
            bfsle: true,
            store_results: true,
            path_size_logit: false,
            eager_link_loading: false,
            beta: 1.0,
            cutoff_prob: 0.0,
            checkpoint_root: None,
            checkpoint_buffer_limit: 1024,
        }
    }
}

impl BatchConfig {
    /// validates cross-field invariants at the batch boundary, before any
    /// parallel work starts.
    pub fn validate(&self) -> Result<(), RouteChoiceError> {
        if self.max_routes == 0 && self.max_depth == 0 {
            return Err(RouteChoiceError::InvalidParameters(
                "at least one of max_routes or max_depth must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.cutoff_prob) {
            return Err(RouteChoiceError::InvalidParameters(format!(
                "cutoff_prob must lie in [0, 1], got {}",
                self.cutoff_prob
            )));
        }
        if self.path_size_logit && self.beta < 0.0 {
            return Err(RouteChoiceError::InvalidParameters(format!(
                "beta must be >= 0 when path_size_logit is enabled, got {}",
                self.beta
            )));
        }
        if !self.bfsle && self.penalty <= 1.0 {
            return Err(RouteChoiceError::InvalidParameters(format!(
                "penalty must be > 1.0 for link-penalisation, got {}",
                self.penalty
            )));
        }
        if self.bfsle && self.penalty != 1.0 {
            return Err(RouteChoiceError::InvalidParameters(
                "BFS-LE does not accept a penalty overlay != 1.0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.cores == 0 {
            rayon::current_num_threads()
        } else {
            self.cores
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = BatchConfig::default();
        assert_eq!(config.max_misses, 100);
        assert_eq!(config.penalty, 1.0);
        assert!(config.a_star);
        assert_eq!(config.min_cost_per_meter, 1.0);
        assert!(config.bfsle);
        assert!(config.store_results);
        assert!(!config.path_size_logit);
        assert!(config.checkpoint_root.is_none());
        assert_eq!(config.checkpoint_buffer_limit, 1024);
    }

    #[test]
    fn both_limits_zero_is_invalid() {
        let config = BatchConfig {
            max_routes: 0,
            max_depth: 0,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn lp_penalty_of_one_is_invalid() {
        let config = BatchConfig {
            max_routes: 5,
            bfsle: false,
            penalty: 1.0,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bfsle_with_nondefault_penalty_is_invalid() {
        let config = BatchConfig {
            max_routes: 5,
            bfsle: true,
            penalty: 2.0,
            ..BatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: BatchConfig = serde_json::from_str(r#"{"max_routes": 5}"#).unwrap();
        assert_eq!(config.max_routes, 5);
        assert_eq!(config.max_misses, 100);
    }
}
