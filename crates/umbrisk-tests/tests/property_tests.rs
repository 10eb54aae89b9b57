//! Property tests for posterior and enumeration invariants.

use std::collections::BTreeSet;

use proptest::prelude::*;
use umbrisk_core::{
    all_events, enumeration_ask, BayesianNetwork, BayesianNetworkNode, Cell, Evidence,
    RiskEstimator, Value, Variable,
};
use umbrisk_tests::node;

/// Two-node chain: root `a` with prior `pa`, child `b` with
/// `P(b | a) = pb_given_a` and `P(b | !a) = pb_given_not_a`.
fn chain(pa: f64, pb_given_a: f64, pb_given_not_a: f64) -> BayesianNetwork {
    BayesianNetwork::new(vec![
        BayesianNetworkNode::root("a", pa).expect("root"),
        node(
            "b",
            &["a"],
            &[(&[true], pb_given_a), (&[false], pb_given_not_a)],
        ),
    ])
    .expect("network")
}

proptest! {
    #[test]
    fn posterior_is_a_distribution(
        pa in 0.01f64..0.99,
        pb_a in 0.01f64..0.99,
        pb_na in 0.01f64..0.99,
    ) {
        let bn = chain(pa, pb_a, pb_na);
        let posterior =
            enumeration_ask(&Variable::boolean("b"), &Evidence::default(), &bn).unwrap();
        let total: f64 = posterior.values().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        for p in posterior.values() {
            prop_assert!((0.0..=1.0).contains(p));
        }
    }

    #[test]
    fn conditioning_inverts_the_chain(
        pa in 0.01f64..0.99,
        pb_a in 0.01f64..0.99,
        pb_na in 0.01f64..0.99,
    ) {
        // Bayes' rule by hand against the enumeration result.
        let bn = chain(pa, pb_a, pb_na);
        let mut evidence = Evidence::default();
        evidence.insert("b".to_string(), Value::Bool(true));
        let posterior =
            enumeration_ask(&Variable::boolean("a"), &evidence, &bn).unwrap();
        let expected = pa * pb_a / (pa * pb_a + (1.0 - pa) * pb_na);
        prop_assert!((posterior[&Value::Bool(true)] - expected).abs() < 1e-9);
    }

    #[test]
    fn event_count_matches_the_domain_product(sizes in prop::collection::vec(1usize..4, 0..5)) {
        let vars: Vec<Variable> = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                Variable::new(
                    format!("v{}", i),
                    (0..size as i64).map(Value::Int),
                )
                .unwrap()
            })
            .collect();
        let count = all_events(&vars, &Evidence::default()).unwrap().count();
        let expected: usize = sizes.iter().product();
        prop_assert_eq!(count, expected);
    }

    #[test]
    fn unconditioned_risk_equals_the_prior(
        prior in 0.0f64..=1.0,
        cell_count in 1usize..6,
    ) {
        let estimator = RiskEstimator::new(prior).unwrap();
        let cells: BTreeSet<Cell> = (0..cell_count as i32).map(|i| Cell::new(i, 1)).collect();
        for &cell in &cells {
            let risk = estimator.estimate_risk(cell, &cells).unwrap();
            prop_assert!((risk - prior).abs() < 1e-12);
        }
    }
}
