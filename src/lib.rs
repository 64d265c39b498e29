use ndarray::{Array1, ArrayView1};

mod cle;
pub use cle::StepCle;
mod drivers;
pub use drivers::{
    sample_ensemble, sample_ensemble_batched, sample_ensemble_seq, simulate_trajectory,
};
mod error;
pub use error::SimError;
mod gillespie;
pub use gillespie::StepGillespie;
pub mod models;
mod network;
pub use network::{NetworkParser, ReactionNetwork};
mod reaction;
pub use crate::reaction::Reaction;
mod stream;
pub use stream::{StreamKey, DEFAULT_SEED};
#[cfg(test)]
mod tests;

/// A generic trait for a rule advancing the state of a stochastic kinetic model.
///
/// A step rule evolves a state over a fixed time increment, drawing all of its
/// randomness from the given key. It must be pure: the same key, state, time,
/// and increment always produce the same output, and the inputs are neither
/// retained nor mutated. The drivers in this crate rely on that purity to make
/// trajectory scans reproducible and ensemble batching exact.
pub trait Stepper {
    /// Advances `x` from time `t` over the increment `dt`, consuming `key`.
    fn step(
        &self,
        key: StreamKey,
        x: ArrayView1<'_, f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimError>;
}

/// Plain functions and closures with the right signature are step rules.
impl<F> Stepper for F
where
    F: Fn(StreamKey, ArrayView1<'_, f64>, f64, f64) -> Result<Array1<f64>, SimError>,
{
    fn step(
        &self,
        key: StreamKey,
        x: ArrayView1<'_, f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimError> {
        self(key, x, t, dt)
    }
}

/// The step algorithms available in the package.
#[derive(Default, Debug, Clone, Copy, clap::ValueEnum)]
pub enum Algorithm {
    /// The exact discrete stochastic simulation algorithm.
    #[default]
    Gillespie,
    /// The chemical Langevin approximation.
    Cle,
}

/// The ensemble evaluation strategies available in the package.
#[derive(Default, Debug, Clone, Copy, clap::ValueEnum)]
pub enum Strategy {
    /// All realizations evaluated together.
    #[default]
    Parallel,
    /// One realization fully evaluated before the next.
    Sequential,
}
