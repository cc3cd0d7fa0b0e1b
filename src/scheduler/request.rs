//! Scheduling request and configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cp::SolverConfig;
use crate::models::{Roster, DEFAULT_BACKUP_RATIO};

/// Default search budget, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 10;

/// Solve parameters.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Fraction of each session's supervisor headcount staffed as backups, in (0, 1].
    pub backup_ratio: f64,
    /// Wall-clock search budget in seconds (≥ 1).
    pub time_limit_secs: u64,
    /// Optional cap on search nodes.
    pub node_limit: Option<u64>,
    /// Optional seed for the solver's tie-breaking order.
    pub seed: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            backup_ratio: DEFAULT_BACKUP_RATIO,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            node_limit: None,
            seed: None,
        }
    }
}

impl ScheduleConfig {
    /// Sets the backup ratio.
    pub fn with_backup_ratio(mut self, backup_ratio: f64) -> Self {
        self.backup_ratio = backup_ratio;
        self
    }

    /// Sets the time budget in seconds.
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Caps the number of search nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Sets the tie-breaking seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Solver settings for this configuration.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            time_limit: Duration::from_secs(self.time_limit_secs),
            node_limit: self.node_limit,
            seed: self.seed,
        }
    }
}

/// Input container for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Teachers, rooms, sessions, and active pairs.
    pub roster: Roster,
    /// Solve parameters.
    #[serde(default)]
    pub config: ScheduleConfig,
}

impl ScheduleRequest {
    /// Creates a request with default parameters.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            config: ScheduleConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the backup ratio.
    pub fn with_backup_ratio(mut self, backup_ratio: f64) -> Self {
        self.config.backup_ratio = backup_ratio;
        self
    }

    /// Sets the time budget in seconds.
    pub fn with_time_limit_secs(mut self, secs: u64) -> Self {
        self.config.time_limit_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ScheduleConfig::default();
        assert!((config.backup_ratio - 0.2).abs() < 1e-12);
        assert_eq!(config.time_limit_secs, 10);
        assert_eq!(config.solver_config().time_limit, Duration::from_secs(10));
        assert_eq!(config.solver_config().node_limit, None);
    }

    #[test]
    fn test_config_builder() {
        let config = ScheduleConfig::default()
            .with_backup_ratio(0.5)
            .with_time_limit_secs(3)
            .with_node_limit(1000)
            .with_seed(7);
        let solver = config.solver_config();
        assert_eq!(solver.time_limit, Duration::from_secs(3));
        assert_eq!(solver.node_limit, Some(1000));
        assert_eq!(solver.seed, Some(7));
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{
            "roster": {
                "teachers": ["A", "B", "C"],
                "rooms": ["R1"],
                "sessions": ["S1"],
                "active_pairs": [{"room": "R1", "session": "S1"}]
            },
            "config": {"time_limit_secs": 5}
        }"#;
        let request: ScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.config.time_limit_secs, 5);
        assert!((request.config.backup_ratio - 0.2).abs() < 1e-12);
        assert_eq!(request.roster.teachers.len(), 3);
    }

    #[test]
    fn test_request_builder() {
        let request = ScheduleRequest::new(Roster::new())
            .with_backup_ratio(0.4)
            .with_time_limit_secs(2);
        assert_eq!(request.config.time_limit_secs, 2);
        assert!((request.config.backup_ratio - 0.4).abs() < 1e-12);

        let config = ScheduleConfig::default().with_node_limit(50).with_seed(3);
        let request = request.with_config(config.clone());
        assert_eq!(request.config, config);
        assert_eq!(request.config.time_limit_secs, DEFAULT_TIME_LIMIT_SECS);
    }
}
