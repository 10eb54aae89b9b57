//! The inference engine.
//!
//! This module provides:
//! - **errors**: Error types for construction and query failures
//! - **network**: Discrete variables, CPTs, and validated Bayesian networks
//! - **enumerate**: Exact posterior queries by full-joint enumeration
//! - **events**: Lazy enumeration of total assignments over variable sets
//! - **risk**: Percept-consistent hazard risk over grid frontiers

pub mod enumerate;
pub mod errors;
pub mod events;
pub mod network;
pub mod risk;
