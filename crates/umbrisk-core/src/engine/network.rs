//! # Bayesian network data model
//!
//! Discrete variables, conditional probability tables, and validated
//! networks for exact enumeration inference.
//!
//! ## Key components
//!
//! - **Value**: a discrete value (`Bool`, `Int`, or `Sym`) with a canonical
//!   total order so domains, rows, and posteriors iterate deterministically
//! - **Variable**: a named variable with an ordered, deduplicated domain
//! - **ConditionalProbabilityTable**: immutable rows mapping a parent-value
//!   tuple to the probability of the node's `true` outcome
//! - **BayesianNetworkNode**: one variable bound to its CPT; parents are
//!   implied by the CPT's parent names, never stored as object references
//! - **BayesianNetwork**: a validated node collection held in a computed
//!   topological order
//!
//! ## Root convention
//!
//! A node is a *root* when its CPT declares exactly one parent name and that
//! name is the node's own variable name. Its single row is keyed `(true,)`
//! and stores the marginal prior. This degenerate one-entry table is the
//! network's representation of an unconditional probability; construction
//! and lookup both honor it.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::errors::InferError;

/// A discrete value a variable can take.
///
/// The derived `Ord` gives every value set a canonical order (`Bool` before
/// `Int` before `Sym`), which keeps domain iteration, CPT diagnostics, and
/// posterior maps deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// A boolean outcome. The only kind current inference branches over.
    Bool(bool),
    /// An integer label.
    Int(i64),
    /// A categorical label.
    Sym(Arc<str>),
}

impl Value {
    /// Returns the inner boolean, or `None` for non-boolean values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Sym(Arc::from(s))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Sym(s) => write!(f, "{}", s),
        }
    }
}

/// A CPT row key: the values of a node's parents in declared order.
///
/// Inline capacity of four covers every network this engine is built for
/// without heap allocation.
pub type ParentValues = SmallVec<[Value; 4]>;

/// A partial assignment of observed values to named variables.
pub type Evidence = FxHashMap<String, Value>;

/// A named discrete random variable with an ordered, deduplicated domain.
///
/// Equality is by `(name, domain)`, not by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    domain: Vec<Value>,
}

impl Variable {
    /// Creates a variable from any collection of values.
    ///
    /// The domain is sorted into canonical order and deduplicated. An empty
    /// domain is rejected: a variable that can take no value is meaningless.
    pub fn new(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, InferError> {
        let name = name.into();
        let mut domain: Vec<Value> = values.into_iter().collect();
        domain.sort();
        domain.dedup();
        if domain.is_empty() {
            return Err(InferError::Domain(format!(
                "variable '{}' has an empty domain",
                name
            )));
        }
        Ok(Variable { name, domain })
    }

    /// Creates a boolean variable with domain `{false, true}`.
    pub fn boolean(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            domain: vec![Value::Bool(false), Value::Bool(true)],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The domain in canonical order.
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    /// True when the domain is exactly `{false, true}`.
    pub fn is_boolean(&self) -> bool {
        self.domain == [Value::Bool(false), Value::Bool(true)]
    }
}

/// A per-node conditional distribution indexed by parent-value tuples.
///
/// Each row maps a tuple of parent values (in `parent_names` order) to the
/// probability of the node's `true` outcome. The table is immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct ConditionalProbabilityTable {
    rows: FxHashMap<ParentValues, f64>,
    parent_names: Vec<String>,
}

impl ConditionalProbabilityTable {
    /// Builds a table, failing eagerly on structural problems.
    ///
    /// Construction errors (`InferError::InvalidCpt`), never deferred to
    /// query time:
    /// - an empty row set or empty parent-name list
    /// - any row whose arity differs from `parent_names.len()`
    /// - any probability that is non-finite or outside `[0, 1]`
    pub fn new(
        rows: impl IntoIterator<Item = (ParentValues, f64)>,
        parent_names: impl IntoIterator<Item = String>,
    ) -> Result<Self, InferError> {
        let parent_names: Vec<String> = parent_names.into_iter().collect();
        if parent_names.is_empty() {
            return Err(InferError::InvalidCpt(
                "a CPT must declare at least one parent name".into(),
            ));
        }
        let rows: FxHashMap<ParentValues, f64> = rows.into_iter().collect();
        if rows.is_empty() {
            return Err(InferError::InvalidCpt(
                "a CPT must contain at least one row".into(),
            ));
        }
        for (key, p) in &rows {
            if key.len() != parent_names.len() {
                return Err(InferError::InvalidCpt(format!(
                    "row arity {} does not match {} declared parent names {:?}",
                    key.len(),
                    parent_names.len(),
                    parent_names
                )));
            }
            if !p.is_finite() || !(0.0..=1.0).contains(p) {
                return Err(InferError::InvalidCpt(format!(
                    "row probability {} is not in [0, 1]",
                    p
                )));
            }
        }
        Ok(ConditionalProbabilityTable { rows, parent_names })
    }

    /// Number of parents each row is keyed on.
    pub fn arity(&self) -> usize {
        self.parent_names.len()
    }

    /// Declared parent names, in row-key position order.
    pub fn parent_names(&self) -> &[String] {
        &self.parent_names
    }

    /// Looks up the probability of the `true` outcome for an exact
    /// parent-value tuple. `None` when the combination is not tabulated.
    pub fn prob(&self, key: &[Value]) -> Option<f64> {
        self.rows.get(key).copied()
    }

    /// Membership test by parent name.
    pub fn contains_parent(&self, name: &str) -> bool {
        self.parent_names.iter().any(|n| n == name)
    }

    /// Iterates rows in unspecified order. Diagnostics only.
    pub fn rows(&self) -> impl Iterator<Item = (&ParentValues, f64)> {
        self.rows.iter().map(|(k, p)| (k, *p))
    }
}

/// A variable bound to its conditional probability table.
///
/// Parent resolution during enumeration is by name lookup against the
/// evidence map, not graph traversal.
#[derive(Debug, Clone)]
pub struct BayesianNetworkNode {
    var: Variable,
    cpt: ConditionalProbabilityTable,
}

impl BayesianNetworkNode {
    /// Binds a variable to its CPT.
    ///
    /// When the CPT is root-shaped (one parent name equal to the variable's
    /// own name), it must hold exactly the single self-keyed `(true,)` row;
    /// anything else is an `InvalidCpt` error.
    pub fn new(var: Variable, cpt: ConditionalProbabilityTable) -> Result<Self, InferError> {
        let root_shaped = cpt.arity() == 1 && cpt.parent_names()[0] == var.name();
        if root_shaped {
            let self_keyed: ParentValues = smallvec::smallvec![Value::Bool(true)];
            if cpt.rows.len() != 1 || !cpt.rows.contains_key(&self_keyed) {
                return Err(InferError::InvalidCpt(format!(
                    "root node '{}' must carry exactly one row keyed (true,)",
                    var.name()
                )));
            }
        }
        Ok(BayesianNetworkNode { var, cpt })
    }

    /// Builds a boolean root node holding a marginal prior.
    pub fn root(name: impl Into<String>, prior: f64) -> Result<Self, InferError> {
        let var = Variable::boolean(name);
        let key: ParentValues = smallvec::smallvec![Value::Bool(true)];
        let cpt =
            ConditionalProbabilityTable::new([(key, prior)], [var.name().to_string()])?;
        BayesianNetworkNode::new(var, cpt)
    }

    pub fn var(&self) -> &Variable {
        &self.var
    }

    pub fn cpt(&self) -> &ConditionalProbabilityTable {
        &self.cpt
    }

    /// True for a root node: a degenerate one-entry CPT keyed on the node's
    /// own name, holding the marginal prior (see the module docs).
    pub fn is_root(&self) -> bool {
        self.cpt.arity() == 1 && self.cpt.parent_names()[0] == self.var.name()
    }
}

/// A validated collection of nodes held in topological order.
///
/// Construction accepts nodes in any order and computes a deterministic
/// topological ordering itself (Kahn's algorithm, smallest input index
/// first among ready nodes), so enumeration always sees parents before
/// children. A cycle or a reference to an undeclared parent fails fast
/// with `InferError::Network`.
#[derive(Debug, Clone)]
pub struct BayesianNetwork {
    nodes: Vec<BayesianNetworkNode>,
    index: FxHashMap<String, usize>,
}

impl BayesianNetwork {
    pub fn new(nodes: Vec<BayesianNetworkNode>) -> Result<Self, InferError> {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.var().name().to_string(), i).is_some() {
                return Err(InferError::Network(format!(
                    "duplicate node '{}'",
                    node.var().name()
                )));
            }
        }

        for node in &nodes {
            validate_parent_declarations(node, &index)?;
            validate_row_domains(node, &nodes, &index)?;
        }

        let order = topological_order(&nodes, &index)?;
        let mut by_position: Vec<Option<BayesianNetworkNode>> =
            nodes.into_iter().map(Some).collect();
        let nodes: Vec<BayesianNetworkNode> = order
            .into_iter()
            .filter_map(|i| by_position[i].take())
            .collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.var().name().to_string(), i))
            .collect();

        Ok(BayesianNetwork { nodes, index })
    }

    /// The node sequence in evaluation (topological) order.
    pub fn nodes(&self) -> &[BayesianNetworkNode] {
        &self.nodes
    }

    /// Looks up a node by variable name.
    pub fn node(&self, name: &str) -> Option<&BayesianNetworkNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }
}

fn validate_parent_declarations(
    node: &BayesianNetworkNode,
    index: &FxHashMap<String, usize>,
) -> Result<(), InferError> {
    if node.is_root() {
        return Ok(());
    }
    for parent in node.cpt().parent_names() {
        if !index.contains_key(parent) {
            return Err(InferError::Network(format!(
                "node '{}' references undeclared parent '{}'",
                node.var().name(),
                parent
            )));
        }
    }
    Ok(())
}

/// Checks that every CPT row value is a member of the corresponding parent
/// variable's declared domain.
fn validate_row_domains(
    node: &BayesianNetworkNode,
    nodes: &[BayesianNetworkNode],
    index: &FxHashMap<String, usize>,
) -> Result<(), InferError> {
    for (key, _) in node.cpt().rows() {
        for (pos, value) in key.iter().enumerate() {
            let parent_name = &node.cpt().parent_names()[pos];
            // Roots are self-keyed, so the parent variable is the node itself.
            let parent_var = if node.is_root() {
                node.var()
            } else {
                nodes[index[parent_name]].var()
            };
            if !parent_var.domain().contains(value) {
                return Err(InferError::Domain(format!(
                    "CPT row value {} for parent '{}' of '{}' is outside the parent's domain",
                    value,
                    parent_name,
                    node.var().name()
                )));
            }
        }
    }
    Ok(())
}

/// Kahn's algorithm over the implicit parent graph.
///
/// Ready nodes are drained smallest-input-index first, so the computed
/// order is deterministic for a given input sequence.
fn topological_order(
    nodes: &[BayesianNetworkNode],
    index: &FxHashMap<String, usize>,
) -> Result<Vec<usize>, InferError> {
    let mut indegree = vec![0usize; nodes.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        if node.is_root() {
            continue;
        }
        for parent in node.cpt().parent_names() {
            let p = index[parent];
            indegree[i] += 1;
            children[p].push(i);
        }
    }

    let mut ready: std::collections::BTreeSet<usize> = indegree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &child in &children[i] {
            indegree[child] -= 1;
            if indegree[child] == 0 {
                ready.insert(child);
            }
        }
    }

    if order.len() != nodes.len() {
        let stuck = indegree
            .iter()
            .position(|&d| d > 0)
            .map(|i| nodes[i].var().name().to_string())
            .unwrap_or_default();
        return Err(InferError::Network(format!(
            "dependency cycle involving node '{}'",
            stuck
        )));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn bkey(values: &[bool]) -> ParentValues {
        values.iter().map(|&b| Value::Bool(b)).collect()
    }

    #[test]
    fn variable_domain_is_sorted_and_deduplicated() {
        let var = Variable::new(
            "color",
            [Value::from("red"), Value::from("blue"), Value::from("red")],
        )
        .expect("variable");
        assert_eq!(var.domain(), &[Value::from("blue"), Value::from("red")]);
        assert!(!var.is_boolean());
    }

    #[test]
    fn variable_with_empty_domain_is_rejected() {
        let err = Variable::new("void", []).unwrap_err();
        assert!(matches!(err, InferError::Domain(_)));
    }

    #[test]
    fn variable_equality_is_by_name_and_domain() {
        let a = Variable::boolean("x");
        let b = Variable::new("x", [Value::Bool(true), Value::Bool(false)]).expect("variable");
        assert_eq!(a, b);
        assert_ne!(a, Variable::boolean("y"));
    }

    #[test]
    fn cpt_rejects_row_arity_mismatch() {
        let err = ConditionalProbabilityTable::new(
            [(bkey(&[true, false]), 0.5)],
            ["only_one".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, InferError::InvalidCpt(_)));
    }

    #[test]
    fn cpt_rejects_probability_outside_unit_interval() {
        let err =
            ConditionalProbabilityTable::new([(bkey(&[true]), 1.5)], ["a".to_string()])
                .unwrap_err();
        assert!(matches!(err, InferError::InvalidCpt(_)));
    }

    #[test]
    fn root_node_convention_is_enforced() {
        // Self-keyed single row on (true,) is a root.
        let node = BayesianNetworkNode::root("b", 0.001).expect("root node");
        assert!(node.is_root());
        assert_eq!(node.cpt().prob(&[Value::Bool(true)]), Some(0.001));

        // A root-shaped CPT keyed on (false,) is malformed.
        let cpt = ConditionalProbabilityTable::new(
            [(smallvec![Value::Bool(false)], 0.2)],
            ["b".to_string()],
        )
        .expect("cpt");
        let err = BayesianNetworkNode::new(Variable::boolean("b"), cpt).unwrap_err();
        assert!(matches!(err, InferError::InvalidCpt(_)));
    }

    #[test]
    fn network_is_reordered_topologically() {
        // Supplied child-first; construction must still evaluate parents first.
        let alarm = BayesianNetworkNode::new(
            Variable::boolean("a"),
            ConditionalProbabilityTable::new(
                [(bkey(&[true]), 0.9), (bkey(&[false]), 0.1)],
                ["b".to_string()],
            )
            .expect("cpt"),
        )
        .expect("node");
        let burglary = BayesianNetworkNode::root("b", 0.001).expect("root");

        let bn = BayesianNetwork::new(vec![alarm, burglary]).expect("network");
        let names: Vec<&str> = bn.nodes().iter().map(|n| n.var().name()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn network_rejects_undeclared_parent() {
        let child = BayesianNetworkNode::new(
            Variable::boolean("c"),
            ConditionalProbabilityTable::new([(bkey(&[true]), 0.5)], ["ghost".to_string()])
                .expect("cpt"),
        )
        .expect("node");
        let err = BayesianNetwork::new(vec![child]).unwrap_err();
        assert!(matches!(err, InferError::Network(_)));
    }

    #[test]
    fn network_rejects_cycle() {
        let a = BayesianNetworkNode::new(
            Variable::boolean("a"),
            ConditionalProbabilityTable::new([(bkey(&[true]), 0.5)], ["b".to_string()])
                .expect("cpt"),
        )
        .expect("node");
        let b = BayesianNetworkNode::new(
            Variable::boolean("b"),
            ConditionalProbabilityTable::new([(bkey(&[true]), 0.5)], ["a".to_string()])
                .expect("cpt"),
        )
        .expect("node");
        let err = BayesianNetwork::new(vec![a, b]).unwrap_err();
        assert!(matches!(err, InferError::Network(_)));
    }

    #[test]
    fn network_rejects_duplicate_node_names() {
        let first = BayesianNetworkNode::root("x", 0.5).expect("root");
        let second = BayesianNetworkNode::root("x", 0.6).expect("root");
        let err = BayesianNetwork::new(vec![first, second]).unwrap_err();
        assert!(matches!(err, InferError::Network(_)));
    }

    #[test]
    fn network_rejects_row_value_outside_parent_domain() {
        let parent = BayesianNetworkNode::root("p", 0.5).expect("root");
        let child = BayesianNetworkNode::new(
            Variable::boolean("c"),
            ConditionalProbabilityTable::new(
                [(smallvec![Value::Int(3)], 0.5)],
                ["p".to_string()],
            )
            .expect("cpt"),
        )
        .expect("node");
        let err = BayesianNetwork::new(vec![parent, child]).unwrap_err();
        assert!(matches!(err, InferError::Domain(_)));
    }
}
