//! Persisted record types for the CLottery environment abstraction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted state layout.
///
/// Mirrors what the weight table looks like on disk: the ordered entrant
/// names plus a name -> weight mapping. Nothing here is validated; a record
/// read back from a file may be unnormalized or even inconsistent, and the
/// core decides what to accept when rehydrating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramState {
    /// Entrant names in insertion order
    pub names: Vec<String>,

    /// Weight per entrant, in percent
    pub probabilities: BTreeMap<String, f64>,
}

impl ProgramState {
    /// Creates a record from ordered `(name, weight)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for (name, weight) in pairs {
            let name = name.into();
            state.probabilities.insert(name.clone(), weight);
            state.names.push(name);
        }
        state
    }
}
