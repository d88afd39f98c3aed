//! The Weight Table - ordered entrants and their draw weights
//!
//! Every entrant carries a weight in percent. Mutations keep the weights
//! summing to 100 with a deliberately simple policy:
//!
//! - `add` re-equalizes the whole table (prior manual weights are discarded)
//! - `set_weight` splits the remainder *equally* among the other entrants,
//!   it never rescales them proportionally
//! - `remove` leaves the remaining weights untouched, so the total can drop
//!   below 100 until the next `add`, `set_weight` or `equalize`
//!
//! Drawing never reads the table directly; it works on a `Snapshot`.

use crate::error::LotteryError;
use clottery_env::ProgramState;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Sum the weights of a non-empty, normalized table add up to.
pub const TOTAL_WEIGHT: f64 = 100.0;

/// Absolute tolerance used when checking the sum invariant.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Ordered entrants with their weights.
///
/// `order` and `weights` always hold exactly the same names.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    /// Entrant names in insertion order
    order: Vec<String>,

    /// Weight per entrant, in percent
    weights: HashMap<String, f64>,
}

impl WeightTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entrant and re-equalizes every weight to `100 / N`.
    ///
    /// Surrounding whitespace is trimmed from `name` before it is checked
    /// and stored.
    pub fn add(&mut self, name: &str) -> Result<(), LotteryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LotteryError::InvalidName);
        }
        if self.weights.contains_key(name) {
            return Err(LotteryError::DuplicateName(name.to_string()));
        }

        self.order.push(name.to_string());
        self.weights.insert(name.to_string(), TOTAL_WEIGHT);
        self.equalize();

        debug!(name, entrants = self.order.len(), "Added entrant, weights equalized");
        Ok(())
    }

    /// Removes an entrant. Remaining weights are *not* renormalized.
    pub fn remove(&mut self, name: &str) -> Result<(), LotteryError> {
        let idx = self
            .order
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| LotteryError::not_found(name))?;

        self.order.remove(idx);
        self.weights.remove(name);

        debug!(name, entrants = self.order.len(), total = self.total(), "Removed entrant");
        Ok(())
    }

    /// Sets one entrant's weight and splits `100 - value` equally among
    /// all the others.
    ///
    /// With a single entrant there is nobody to absorb the remainder, so
    /// the total equals `value` afterwards.
    pub fn set_weight(&mut self, name: &str, value: f64) -> Result<(), LotteryError> {
        if !self.weights.contains_key(name) {
            return Err(LotteryError::not_found(name));
        }
        if !(0.0..=TOTAL_WEIGHT).contains(&value) {
            return Err(LotteryError::WeightOutOfRange(value));
        }

        let others = self.order.len() - 1;
        let share = if others > 0 {
            (TOTAL_WEIGHT - value) / others as f64
        } else {
            0.0
        };

        for (entrant, weight) in self.weights.iter_mut() {
            *weight = if entrant == name { value } else { share };
        }

        debug!(name, value, share, "Set weight, remainder split equally");
        Ok(())
    }

    /// Sets every weight to `100 / N`. No-op on an empty table.
    pub fn equalize(&mut self) {
        if self.order.is_empty() {
            return;
        }
        let share = TOTAL_WEIGHT / self.order.len() as f64;
        for weight in self.weights.values_mut() {
            *weight = share;
        }
    }

    /// Rescales all weights proportionally so they sum to 100.
    ///
    /// Ratios between entrants are preserved. No-op when the table is empty
    /// or every weight is zero.
    pub fn normalize(&mut self) {
        let total = self.total();
        if self.order.is_empty() || total <= 0.0 {
            return;
        }
        for weight in self.weights.values_mut() {
            *weight = *weight / total * TOTAL_WEIGHT;
        }
        debug!(previous_total = total, "Normalized weights");
    }

    /// Returns an owned, read-only copy of the table for drawing.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            order: self.order.clone(),
            weights: self.weights.clone(),
        }
    }

    /// Number of entrants.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.weights.contains_key(name)
    }

    /// Weight of a single entrant.
    pub fn weight(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    /// Entrant names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// True if the table is non-empty and its weights sum to 100.
    pub fn is_normalized(&self) -> bool {
        !self.order.is_empty() && (self.total() - TOTAL_WEIGHT).abs() <= WEIGHT_TOLERANCE
    }

    /// Rehydrates a table from a persisted record.
    ///
    /// Weights are taken as-is, without normalization. The record must
    /// pair every name with exactly one finite, non-negative weight.
    pub fn from_record(state: ProgramState) -> Result<Self, LotteryError> {
        let ProgramState { names, probabilities } = state;
        let mut table = Self::new();

        for name in names {
            if name.trim().is_empty() {
                return Err(LotteryError::InvalidName);
            }
            if table.weights.contains_key(&name) {
                return Err(LotteryError::DuplicateName(name));
            }
            let weight = probabilities.get(&name).copied().ok_or_else(|| {
                LotteryError::invalid_record(format!("no probability for '{}'", name))
            })?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(LotteryError::invalid_record(format!(
                    "weight {} for '{}' is not a non-negative number",
                    weight, name
                )));
            }

            table.weights.insert(name.clone(), weight);
            table.order.push(name);
        }

        if probabilities.len() != table.order.len() {
            let stray: Vec<&str> = probabilities
                .keys()
                .filter(|name| !table.weights.contains_key(*name))
                .map(String::as_str)
                .collect();
            return Err(LotteryError::invalid_record(format!(
                "probabilities for unknown names: {}",
                stray.join(", ")
            )));
        }

        if !table.is_empty() && !table.is_normalized() {
            warn!(total = table.total(), "Rehydrated table is not normalized");
        }
        Ok(table)
    }

    /// Serializes the table into a persistable record.
    pub fn to_record(&self) -> ProgramState {
        self.snapshot().to_record()
    }
}

/// Immutable copy of a table's entrants and weights.
///
/// Owns its data; nothing done with a snapshot reaches back into the
/// table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    order: Vec<String>,
    weights: HashMap<String, f64>,
}

impl Snapshot {
    /// Entrant names in insertion order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn weight(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    /// Iterates `(name, weight)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.weights.get(name).copied().unwrap_or(0.0)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Serializes the snapshot into a persistable record.
    pub fn to_record(&self) -> ProgramState {
        ProgramState::from_pairs(self.iter().map(|(name, weight)| (name.to_string(), weight)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn table_with(names: &[&str]) -> WeightTable {
        let mut table = WeightTable::new();
        for name in names {
            table.add(name).unwrap();
        }
        table
    }

    #[test]
    fn test_add_equalizes_all_weights() {
        let table = table_with(&["Alice", "Bob", "Carol"]);

        assert_eq!(table.names(), &["Alice", "Bob", "Carol"]);
        for name in ["Alice", "Bob", "Carol"] {
            assert_relative_eq!(table.weight(name).unwrap(), 100.0 / 3.0, epsilon = 1e-9);
        }
        assert!(table.is_normalized());
    }

    #[test]
    fn test_add_discards_manual_weights() {
        let mut table = table_with(&["A", "B"]);
        table.set_weight("A", 80.0).unwrap();

        table.add("C").unwrap();

        for name in ["A", "B", "C"] {
            assert_relative_eq!(table.weight(name).unwrap(), 100.0 / 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_add_rejects_invalid_names() {
        let mut table = WeightTable::new();
        assert_eq!(table.add(""), Err(LotteryError::InvalidName));
        assert_eq!(table.add("   \t"), Err(LotteryError::InvalidName));
        assert!(table.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut table = table_with(&["Alice"]);
        assert_eq!(
            table.add("Alice"),
            Err(LotteryError::DuplicateName("Alice".to_string()))
        );
        // Trimmed before the duplicate check
        assert_eq!(
            table.add("  Alice "),
            Err(LotteryError::DuplicateName("Alice".to_string()))
        );
        assert_eq!(table.len(), 1);
        assert_relative_eq!(table.weight("Alice").unwrap(), 100.0);
    }

    #[test]
    fn test_add_trims_name() {
        let table = table_with(&["  Dave  "]);
        assert!(table.contains("Dave"));
        assert!(!table.contains("  Dave  "));
    }

    #[test]
    fn test_set_weight_two_entrants() {
        let mut table = table_with(&["A", "B"]);
        table.set_weight("A", 80.0).unwrap();

        assert_relative_eq!(table.weight("A").unwrap(), 80.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("B").unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_set_weight_splits_remainder_equally() {
        let mut table = table_with(&["A", "B", "C", "D"]);
        table.set_weight("B", 40.0).unwrap();

        assert_relative_eq!(table.weight("A").unwrap(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("B").unwrap(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("C").unwrap(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("D").unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_set_weight_is_equal_split_not_proportional() {
        let mut table = table_with(&["A", "B", "C"]);
        table.set_weight("A", 70.0).unwrap(); // B = C = 15
        table.set_weight("B", 40.0).unwrap();

        // Proportional rescaling would give A = 49.41..., C = 10.58...
        assert_relative_eq!(table.weight("A").unwrap(), 30.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("C").unwrap(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_set_weight_single_entrant() {
        let mut table = table_with(&["Solo"]);
        table.set_weight("Solo", 100.0).unwrap();
        assert!(table.is_normalized());

        table.set_weight("Solo", 40.0).unwrap();
        assert_relative_eq!(table.total(), 40.0);
        assert!(!table.is_normalized());
    }

    #[test]
    fn test_set_weight_errors_leave_table_unchanged() {
        let mut table = table_with(&["A", "B"]);
        table.set_weight("A", 70.0).unwrap();
        let before = table.snapshot();

        assert_eq!(
            table.set_weight("Ghost", 10.0),
            Err(LotteryError::NotFound("Ghost".to_string()))
        );
        assert_eq!(
            table.set_weight("A", 100.5),
            Err(LotteryError::WeightOutOfRange(100.5))
        );
        assert_eq!(
            table.set_weight("A", -1.0),
            Err(LotteryError::WeightOutOfRange(-1.0))
        );
        assert!(table.set_weight("A", f64::NAN).is_err());

        assert_eq!(table.snapshot(), before);
    }

    #[test]
    fn test_remove_does_not_renormalize() {
        let mut table = table_with(&["A", "B", "C", "D"]);
        table.set_weight("A", 40.0).unwrap(); // B = C = D = 20
        table.remove("B").unwrap();

        assert_eq!(table.names(), &["A", "C", "D"]);
        assert_relative_eq!(table.weight("A").unwrap(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("C").unwrap(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(table.total(), 80.0, epsilon = 1e-9);
        assert!(!table.is_normalized());

        // Next weight change restores the invariant
        table.set_weight("C", 50.0).unwrap();
        assert!(table.is_normalized());
    }

    #[test]
    fn test_remove_missing() {
        let mut table = table_with(&["A"]);
        assert_eq!(
            table.remove("B"),
            Err(LotteryError::NotFound("B".to_string()))
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_last_entrant_leaves_empty_table() {
        let mut table = table_with(&["A"]);
        table.remove("A").unwrap();
        assert!(table.is_empty());
        assert!(!table.is_normalized());
        assert_eq!(table.total(), 0.0);
    }

    #[test]
    fn test_equalize() {
        let mut table = table_with(&["A", "B", "C", "D"]);
        table.set_weight("A", 91.0).unwrap();
        table.remove("B").unwrap();

        table.equalize();
        for name in ["A", "C", "D"] {
            assert_relative_eq!(table.weight(name).unwrap(), 100.0 / 3.0, epsilon = 1e-9);
        }

        let mut empty = WeightTable::new();
        empty.equalize();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_normalize_is_proportional() {
        let mut table = table_with(&["A", "B", "C"]);
        table.set_weight("A", 50.0).unwrap(); // B = C = 25
        table.remove("C").unwrap(); // A = 50, B = 25

        table.normalize();
        assert_relative_eq!(table.weight("A").unwrap(), 200.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(table.weight("B").unwrap(), 100.0 / 3.0, epsilon = 1e-9);
        assert!(table.is_normalized());
    }

    #[test]
    fn test_normalize_all_zero_is_noop() {
        let mut table = WeightTable::from_record(ProgramState::from_pairs([
            ("A", 0.0),
            ("B", 0.0),
        ]))
        .unwrap();
        table.normalize();
        assert_eq!(table.total(), 0.0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut table = table_with(&["A", "B"]);
        let snapshot = table.snapshot();

        table.set_weight("A", 90.0).unwrap();
        table.add("C").unwrap();

        assert_eq!(snapshot.order(), &["A", "B"]);
        assert_relative_eq!(snapshot.weight("A").unwrap(), 50.0);
        assert_eq!(snapshot.iter().count(), 2);
    }

    #[test]
    fn test_from_record_keeps_weights_as_is() {
        let record = ProgramState::from_pairs([("B", 10.0), ("A", 30.0)]);
        let table = WeightTable::from_record(record).unwrap();

        assert_eq!(table.names(), &["B", "A"]);
        assert_relative_eq!(table.total(), 40.0);
        assert_relative_eq!(table.weight("A").unwrap(), 30.0);
    }

    #[test]
    fn test_from_record_rejects_inconsistent_records() {
        let mut missing = ProgramState::from_pairs([("A", 50.0), ("B", 50.0)]);
        missing.probabilities.remove("B");
        assert!(matches!(
            WeightTable::from_record(missing),
            Err(LotteryError::InvalidRecord(_))
        ));

        let mut stray = ProgramState::from_pairs([("A", 100.0)]);
        stray.probabilities.insert("Ghost".to_string(), 0.0);
        assert!(matches!(
            WeightTable::from_record(stray),
            Err(LotteryError::InvalidRecord(_))
        ));

        let negative = ProgramState::from_pairs([("A", -5.0)]);
        assert!(matches!(
            WeightTable::from_record(negative),
            Err(LotteryError::InvalidRecord(_))
        ));

        let duplicate = ProgramState::from_pairs([("A", 50.0), ("A", 50.0)]);
        assert_eq!(
            WeightTable::from_record(duplicate).unwrap_err(),
            LotteryError::DuplicateName("A".to_string())
        );

        let blank = ProgramState::from_pairs([(" ", 100.0)]);
        assert_eq!(
            WeightTable::from_record(blank).unwrap_err(),
            LotteryError::InvalidName
        );
    }

    #[test]
    fn test_record_round_trip_preserves_order() {
        let mut table = table_with(&["Zed", "Amy", "Kim"]);
        table.set_weight("Kim", 50.0).unwrap();

        let restored = WeightTable::from_record(table.to_record()).unwrap();
        assert_eq!(restored.snapshot(), table.snapshot());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Remove(usize),
        SetWeight(usize, f64),
        Equalize,
        Normalize,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..6usize).prop_map(Op::Add),
            (0..6usize).prop_map(Op::Remove),
            (0..6usize, 0.0..=100.0f64).prop_map(|(i, v)| Op::SetWeight(i, v)),
            Just(Op::Equalize),
            Just(Op::Normalize),
        ]
    }

    proptest! {
        #[test]
        fn prop_sum_invariant_after_normalizing_ops(ops in proptest::collection::vec(op_strategy(), 1..40)) {
            let names = ["E0", "E1", "E2", "E3", "E4", "E5"];
            let mut table = WeightTable::new();

            for op in ops {
                let before = table.snapshot();
                match op {
                    Op::Add(i) => {
                        if table.add(names[i]).is_ok() {
                            prop_assert!(table.is_normalized());
                        } else {
                            prop_assert_eq!(table.snapshot(), before);
                        }
                    }
                    Op::Remove(i) => {
                        if table.remove(names[i]).is_err() {
                            prop_assert_eq!(table.snapshot(), before);
                        }
                    }
                    Op::SetWeight(i, v) => {
                        if table.set_weight(names[i], v).is_ok() {
                            if table.len() > 1 {
                                prop_assert!(table.is_normalized());
                            }
                            prop_assert!((table.weight(names[i]).unwrap() - v).abs() < 1e-9);
                        } else {
                            prop_assert_eq!(table.snapshot(), before);
                        }
                    }
                    Op::Equalize => {
                        table.equalize();
                        prop_assert!(table.is_empty() || table.is_normalized());
                    }
                    Op::Normalize => {
                        let had_mass = table.total() > 0.0;
                        table.normalize();
                        prop_assert!(!had_mass || table.is_normalized());
                    }
                }
                prop_assert_eq!(table.names().len(), table.snapshot().iter().count());
            }
        }
    }
}
