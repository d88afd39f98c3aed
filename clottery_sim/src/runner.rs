//! Trial runner - checks observed draw frequencies against the weights.

use crate::context::SimContext;
use crate::scenarios::ScenarioId;

use clottery_core::{expected_shares, Drawer, LotteryError, Snapshot};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Per-entrant outcome of a trial run.
#[derive(Debug, Clone, Serialize)]
pub struct EntrantTally {
    pub name: String,

    /// Configured weight in percent
    pub weight: f64,

    /// Number of draws won
    pub wins: u64,

    /// Observed share of wins, in [0, 1]
    pub observed: f64,

    /// Share predicted by the selection rule, in [0, 1]
    pub expected: f64,
}

/// Results from running a batch of draws.
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    /// Scenario name or other label for the table
    pub label: String,

    /// Seed used
    pub seed: u64,

    /// Number of draws
    pub trials: u64,

    pub entrants: Vec<EntrantTally>,

    /// Largest |observed - expected| over all entrants
    pub max_deviation: f64,

    /// Allowed deviation
    pub tolerance: f64,

    /// Whether every entrant stayed within tolerance
    pub passed: bool,
}

/// Runs seeded draw batches.
pub struct TrialRunner {
    /// Configuration seed
    seed: u64,

    /// Draws per run
    trials: u64,

    /// Maximum allowed deviation of any observed share
    tolerance: f64,
}

impl TrialRunner {
    /// Creates a new trial runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            trials: 100_000,
            tolerance: 0.01,
        }
    }

    /// Sets the number of draws per run.
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the allowed deviation.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Runs a scenario and returns the report.
    pub fn run(&self, scenario: ScenarioId) -> Result<TrialReport, LotteryError> {
        info!(
            "Starting scenario: {} ({}) seed={}",
            scenario.name(),
            scenario.description(),
            self.seed
        );
        let table = scenario.build_table()?;
        self.run_snapshot(scenario.name(), &table.snapshot())
    }

    /// Draws `trials` times from a snapshot and tallies the winners.
    pub fn run_snapshot(&self, label: &str, snapshot: &Snapshot) -> Result<TrialReport, LotteryError> {
        let drawer = Drawer::new(SimContext::shared(self.seed));

        let mut wins: HashMap<String, u64> = HashMap::new();
        for _ in 0..self.trials {
            let winner = drawer.draw(snapshot)?;
            *wins.entry(winner).or_default() += 1;
        }

        let entrants: Vec<EntrantTally> = expected_shares(snapshot)
            .into_iter()
            .map(|(name, expected)| {
                let won = wins.get(&name).copied().unwrap_or(0);
                EntrantTally {
                    weight: snapshot.weight(&name).unwrap_or(0.0),
                    wins: won,
                    observed: if self.trials > 0 {
                        won as f64 / self.trials as f64
                    } else {
                        0.0
                    },
                    expected,
                    name,
                }
            })
            .collect();

        let max_deviation = entrants
            .iter()
            .map(|e| (e.observed - e.expected).abs())
            .fold(0.0, f64::max);
        let passed = self.trials > 0 && max_deviation <= self.tolerance;

        debug!(label, max_deviation, passed, "Trial run complete");
        Ok(TrialReport {
            label: label.to_string(),
            seed: self.seed,
            trials: self.trials,
            entrants,
            max_deviation,
            tolerance: self.tolerance,
            passed,
        })
    }
}
