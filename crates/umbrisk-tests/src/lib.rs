//! Shared fixtures for umbrisk-core integration tests.

use umbrisk_core::{
    BayesianNetwork, BayesianNetworkNode, ConditionalProbabilityTable, ParentValues, Value,
    Variable,
};

/// Builds a boolean row key.
pub fn bkey(values: &[bool]) -> ParentValues {
    values.iter().map(|&b| Value::Bool(b)).collect()
}

/// Builds a non-root boolean node from `(parent values, probability)` rows.
pub fn node(
    name: &str,
    parents: &[&str],
    rows: &[(&[bool], f64)],
) -> BayesianNetworkNode {
    let cpt = ConditionalProbabilityTable::new(
        rows.iter().map(|(values, p)| (bkey(values), *p)),
        parents.iter().map(|p| p.to_string()),
    )
    .expect("cpt");
    BayesianNetworkNode::new(Variable::boolean(name), cpt).expect("node")
}

/// The classic burglary/earthquake alarm network.
pub fn alarm_network() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        BayesianNetworkNode::root("burglary", 0.001).expect("root"),
        BayesianNetworkNode::root("earthquake", 0.002).expect("root"),
        node(
            "alarm",
            &["burglary", "earthquake"],
            &[
                (&[true, true], 0.95),
                (&[true, false], 0.94),
                (&[false, true], 0.29),
                (&[false, false], 0.001),
            ],
        ),
        node("john", &["alarm"], &[(&[true], 0.9), (&[false], 0.05)]),
        node("mary", &["alarm"], &[(&[true], 0.7), (&[false], 0.01)]),
    ])
    .expect("network")
}

/// Cause → rain/sprinkler → wet grass.
pub fn cause_grass_network() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        BayesianNetworkNode::root("cause", 0.8).expect("root"),
        node("rain", &["cause"], &[(&[true], 0.8), (&[false], 0.1)]),
        node("sprinkler", &["cause"], &[(&[true], 0.1), (&[false], 0.5)]),
        node(
            "grass",
            &["sprinkler", "rain"],
            &[
                (&[true, true], 0.99),
                (&[true, false], 0.9),
                (&[false, true], 0.9),
                (&[false, false], 0.0),
            ],
        ),
    ])
    .expect("network")
}

/// The canonical rain/sprinkler/wet-grass network.
pub fn sprinkler_network() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        BayesianNetworkNode::root("rain", 0.2).expect("root"),
        node("sprinkler", &["rain"], &[(&[true], 0.01), (&[false], 0.4)]),
        node(
            "grass",
            &["sprinkler", "rain"],
            &[
                (&[true, true], 0.99),
                (&[true, false], 0.9),
                (&[false, true], 0.8),
                (&[false, false], 0.0),
            ],
        ),
    ])
    .expect("network")
}

/// Asserts two probabilities agree within `tol`, with a readable message.
pub fn assert_close(actual: f64, expected: f64, tol: f64, label: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{} mismatch: expected {:.15}, got {:.15}, diff={:.3e}",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}
