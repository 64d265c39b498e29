use thiserror::Error;

/// The errors surfaced by the simulation drivers.
///
/// All errors are reported synchronously and none is retried: a stochastic
/// simulation failure is deterministic in its inputs, so rerunning with the
/// same key reproduces it. Callers wanting a fresh attempt must supply a
/// different seed themselves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A driver argument failed validation, before any state-advance call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A state-advance rule failed, e.g. on a non-finite propensity.
    #[error("step rule failed at t = {time}: {reason}")]
    StepFunction { time: f64, reason: String },

    /// A state-advance rule changed the dimensionality of the state.
    #[error("state dimension changed from {expected} to {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
