//! Lazy enumeration of total assignments over discrete variables.
//!
//! `all_events` is the general-purpose combinatorial primitive: given a list
//! of unbound variables and a base evidence map, it yields one complete
//! assignment for every combination of values across the variables' domains
//! (the Cartesian product), each combined with the fixed base evidence.
//!
//! The iterator is finite and restartable: it keeps no hidden mutable state
//! beyond its own odometer, so calling `all_events` again with the same
//! inputs reproduces the identical sequence. The last supplied variable
//! cycles fastest.

use crate::engine::errors::InferError;
use crate::engine::network::{Evidence, Variable};

/// Creates the event iterator.
///
/// # Errors
///
/// `Domain` if a supplied variable is already bound in `base`, or if the
/// same variable name appears twice in `vars`.
pub fn all_events(vars: &[Variable], base: &Evidence) -> Result<JointEventIter, InferError> {
    for (i, var) in vars.iter().enumerate() {
        if base.contains_key(var.name()) {
            return Err(InferError::Domain(format!(
                "variable '{}' is already bound in the base evidence",
                var.name()
            )));
        }
        if vars[..i].iter().any(|v| v.name() == var.name()) {
            return Err(InferError::Domain(format!(
                "variable '{}' is supplied more than once",
                var.name()
            )));
        }
    }
    Ok(JointEventIter {
        vars: vars.to_vec(),
        base: base.clone(),
        indices: vec![0; vars.len()],
        exhausted: false,
    })
}

/// Iterator over every total assignment of a variable list.
///
/// Yields exactly `∏ dᵢ` events for domain sizes `d₁..dₖ`; with no
/// variables it yields the base evidence once (the empty product).
#[derive(Debug, Clone)]
pub struct JointEventIter {
    vars: Vec<Variable>,
    base: Evidence,
    indices: Vec<usize>,
    exhausted: bool,
}

impl Iterator for JointEventIter {
    type Item = Evidence;

    fn next(&mut self) -> Option<Evidence> {
        if self.exhausted {
            return None;
        }

        let mut event = self.base.clone();
        for (var, &i) in self.vars.iter().zip(&self.indices) {
            event.insert(var.name().to_string(), var.domain()[i].clone());
        }

        // Advance the odometer, last variable fastest.
        let mut pos = self.vars.len();
        loop {
            if pos == 0 {
                self.exhausted = true;
                break;
            }
            pos -= 1;
            self.indices[pos] += 1;
            if self.indices[pos] < self.vars[pos].domain().len() {
                break;
            }
            self.indices[pos] = 0;
        }

        Some(event)
    }
}
