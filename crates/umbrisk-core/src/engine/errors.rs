//! Error types for umbrisk inference.

use thiserror::Error;

/// Errors that can occur during network construction or inference.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes. All public APIs return
/// `Result<T, InferError>` to avoid panics in library code. Every failure is
/// a construction-time or call-time error; the computation itself is pure and
/// deterministic, so nothing here is worth retrying.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InferError {
    /// CPT construction error (empty table, row arity mismatch with the
    /// declared parent names, or a probability outside `[0, 1]`).
    #[error("invalid CPT: {0}")]
    InvalidCpt(String),

    /// A CPT lookup needed a parent value that was not bound in the evidence
    /// map. Signals a network that is not topologically ordered, or a caller
    /// evidence map missing a required root value.
    #[error("missing evidence: {0}")]
    MissingEvidence(String),

    /// All unnormalized posterior weights were zero; the evidence is
    /// inconsistent with the network (probability-zero evidence).
    #[error("normalization error: {0}")]
    Normalization(String),

    /// A value is outside the relevant variable's declared domain, or a
    /// domain is unsupported by the requested operation.
    #[error("domain error: {0}")]
    Domain(String),

    /// The network structure is invalid: a dependency cycle, a CPT that
    /// references an undeclared parent, or a duplicate node name.
    #[error("network error: {0}")]
    Network(String),
}
