//! Exact posterior queries by full-joint enumeration.
//!
//! `enumeration_ask` computes an exact posterior for one query variable by
//! summing the full joint distribution: every unbound variable is branched
//! over both boolean outcomes, every bound variable contributes its CPT
//! probability (or complement), and the per-value weights are normalized at
//! the end.
//!
//! Cost is `O(2^k)` for `k` unbound variables; callers bound `k` by keeping
//! networks small. Weights are accumulated as plain `f64` products with no
//! log-space transform, which is fine at these node counts but is the first
//! thing to revisit if networks ever grow past a few dozen variables.
//!
//! Inference is deliberately restricted to boolean domains: branching is
//! two-valued and the `false` outcome is derived as `1 - p`. The `Variable`
//! type itself admits arbitrary discrete domains; widening enumeration to
//! categorical domains is a separate enhancement, not something this module
//! does silently.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::engine::errors::InferError;
use crate::engine::network::{
    BayesianNetwork, BayesianNetworkNode, Evidence, ParentValues, Value, Variable,
};

/// Computes the exact posterior of `x` given `evidence` over `network`.
///
/// The result maps each domain value of `x` to its posterior probability;
/// the probabilities sum to 1.0 up to floating-point tolerance. The map is
/// ordered, so iteration is deterministic.
///
/// # Errors
///
/// - `Domain` if `x` is not declared in the network, the evidence already
///   binds `x`, an evidence value falls outside its variable's domain, or
///   any network variable is non-boolean
/// - `Normalization` if every unnormalized weight is zero (the evidence is
///   inconsistent with the network); this is surfaced explicitly instead of
///   dividing by zero
/// - `MissingEvidence` only if the network invariants were violated, which
///   `BayesianNetwork::new` prevents
pub fn enumeration_ask(
    x: &Variable,
    evidence: &Evidence,
    network: &BayesianNetwork,
) -> Result<BTreeMap<Value, f64>, InferError> {
    validate_query(x, evidence, network)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "enumeration_ask over '{}' with {} nodes and {} evidence bindings",
        x.name(),
        network.nodes().len(),
        evidence.len()
    );

    let mut extended = evidence.clone();
    let mut weights: Vec<(Value, f64)> = Vec::with_capacity(x.domain().len());
    for xi in x.domain() {
        extended.insert(x.name().to_string(), xi.clone());
        let weight = enumerate_all(network.nodes(), &mut extended)?;
        weights.push((xi.clone(), weight));
    }

    let denominator: f64 = weights.iter().map(|(_, w)| w).sum();
    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(InferError::Normalization(format!(
            "all posterior weights for '{}' are zero; evidence is inconsistent with the network",
            x.name()
        )));
    }

    Ok(weights
        .into_iter()
        .map(|(value, weight)| (value, weight / denominator))
        .collect())
}

fn validate_query(
    x: &Variable,
    evidence: &Evidence,
    network: &BayesianNetwork,
) -> Result<(), InferError> {
    let declared = network.node(x.name()).ok_or_else(|| {
        InferError::Domain(format!(
            "query variable '{}' is not declared in the network",
            x.name()
        ))
    })?;
    if declared.var() != x {
        return Err(InferError::Domain(format!(
            "query variable '{}' does not match the network's declaration",
            x.name()
        )));
    }
    if evidence.contains_key(x.name()) {
        return Err(InferError::Domain(format!(
            "evidence already binds the query variable '{}'",
            x.name()
        )));
    }
    for node in network.nodes() {
        if !node.var().is_boolean() {
            return Err(InferError::Domain(format!(
                "enumeration is restricted to boolean domains, but '{}' is not boolean",
                node.var().name()
            )));
        }
    }
    for (name, value) in evidence {
        let node = network.node(name).ok_or_else(|| {
            InferError::Domain(format!("evidence names unknown variable '{}'", name))
        })?;
        if !node.var().domain().contains(value) {
            return Err(InferError::Domain(format!(
                "evidence value {} is outside the domain of '{}'",
                value, name
            )));
        }
    }
    Ok(())
}

/// Recursive joint-probability accumulator.
///
/// The node slice must be topologically ordered (guaranteed by
/// `BayesianNetwork::new`). Branch bindings use scoped insert/remove on one
/// mutable evidence map instead of cloning per branch; sibling branches
/// still never observe each other's bindings because every insert is undone
/// before the sibling runs.
fn enumerate_all(
    nodes: &[BayesianNetworkNode],
    evidence: &mut Evidence,
) -> Result<f64, InferError> {
    let Some((head, rest)) = nodes.split_first() else {
        return Ok(1.0);
    };
    let name = head.var().name();

    if let Some(bound) = evidence.get(name).and_then(Value::as_bool) {
        let p_true = prob_true(head, evidence)?;
        let p = if bound { p_true } else { 1.0 - p_true };
        return Ok(p * enumerate_all(rest, evidence)?);
    }

    // Unbound: branch over both outcomes with a scoped binding.
    let p_true = prob_true(head, evidence)?;
    let key = name.to_string();

    evidence.insert(key.clone(), Value::Bool(true));
    let weight_true = p_true * enumerate_all(rest, evidence)?;
    evidence.insert(key.clone(), Value::Bool(false));
    let weight_false = (1.0 - p_true) * enumerate_all(rest, evidence)?;
    evidence.remove(&key);

    Ok(weight_true + weight_false)
}

/// CPT lookup of `P(node = true | parents)` under the current evidence.
///
/// Roots read their single self-keyed `(true,)` row; other nodes build the
/// row key from `evidence[parent]` in declared order.
fn prob_true(node: &BayesianNetworkNode, evidence: &Evidence) -> Result<f64, InferError> {
    if node.is_root() {
        return node.cpt().prob(&[Value::Bool(true)]).ok_or_else(|| {
            InferError::InvalidCpt(format!(
                "root node '{}' is missing its self-keyed row",
                node.var().name()
            ))
        });
    }

    let mut key: ParentValues = SmallVec::with_capacity(node.cpt().arity());
    for parent in node.cpt().parent_names() {
        let value = evidence.get(parent).ok_or_else(|| {
            InferError::MissingEvidence(format!(
                "parent '{}' of '{}' is unbound at evaluation time",
                parent,
                node.var().name()
            ))
        })?;
        key.push(value.clone());
    }
    node.cpt().prob(&key).ok_or_else(|| {
        InferError::Domain(format!(
            "no CPT row for parent values {:?} of '{}'",
            key,
            node.var().name()
        ))
    })
}
