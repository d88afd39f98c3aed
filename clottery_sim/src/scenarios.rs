//! Weight-table scenarios for statistical draw verification.

use clottery_core::{LotteryError, WeightTable};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Two entrants at 90 / 10
    Skewed,

    /// Four entrants added one by one, 25 each
    Uniform,

    /// Four entrants, one raised to 40, the rest split 20 each
    Redistributed,

    /// Three entrants added, one removed: total 66.6, last entrant
    /// absorbs the shortfall
    Unnormalized,

    /// Three entrants, one set to 100, the others left at 0
    ZeroWeight,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Skewed,
            ScenarioId::Uniform,
            ScenarioId::Redistributed,
            ScenarioId::Unnormalized,
            ScenarioId::ZeroWeight,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Skewed => "skewed",
            ScenarioId::Uniform => "uniform",
            ScenarioId::Redistributed => "redistributed",
            ScenarioId::Unnormalized => "unnormalized",
            ScenarioId::ZeroWeight => "zero_weight",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Skewed => "A=90, B=10: heavy favourite",
            ScenarioId::Uniform => "A..D added in turn, equalized to 25 each",
            ScenarioId::Redistributed => "A..D, B set to 40, remainder split equally",
            ScenarioId::Unnormalized => "A..C added, C removed, last entrant takes the gap",
            ScenarioId::ZeroWeight => "A set to 100, B and C never win",
        }
    }

    /// Builds the scenario's table through ordinary table operations.
    pub fn build_table(&self) -> Result<WeightTable, LotteryError> {
        let mut table = WeightTable::new();
        match self {
            ScenarioId::Skewed => {
                table.add("A")?;
                table.add("B")?;
                table.set_weight("A", 90.0)?;
            }
            ScenarioId::Uniform => {
                for name in ["A", "B", "C", "D"] {
                    table.add(name)?;
                }
            }
            ScenarioId::Redistributed => {
                for name in ["A", "B", "C", "D"] {
                    table.add(name)?;
                }
                table.set_weight("B", 40.0)?;
            }
            ScenarioId::Unnormalized => {
                for name in ["A", "B", "C"] {
                    table.add(name)?;
                }
                table.remove("C")?;
            }
            ScenarioId::ZeroWeight => {
                for name in ["A", "B", "C"] {
                    table.add(name)?;
                }
                table.set_weight("A", 100.0)?;
            }
        }
        Ok(table)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skewed" => Ok(ScenarioId::Skewed),
            "uniform" => Ok(ScenarioId::Uniform),
            "redistributed" => Ok(ScenarioId::Redistributed),
            "unnormalized" | "fallback" => Ok(ScenarioId::Unnormalized),
            "zero_weight" | "zeroweight" => Ok(ScenarioId::ZeroWeight),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
