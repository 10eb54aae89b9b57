//! # Umbrisk Core
//!
//! Exact discrete-probability inference: enumeration-ask over Bayesian
//! networks, a generic joint-event enumerator, and percept-consistent
//! hazard-risk estimation for partially observed grids.

pub mod engine;

// Re-export commonly used types
pub use engine::enumerate::enumeration_ask;
pub use engine::errors::InferError;
pub use engine::events::{all_events, JointEventIter};
pub use engine::network::{
    BayesianNetwork, BayesianNetworkNode, ConditionalProbabilityTable, Evidence, ParentValues,
    Value, Variable,
};
pub use engine::risk::{Cell, RiskEstimator};
