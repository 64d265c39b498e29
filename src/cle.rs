use itertools::izip;
use rand::Rng;
use rand_distr::Normal;

use crate::{reaction::Reaction, SimError, Stepper, StreamKey};
use ndarray::{Array1, ArrayView1};

/// The chemical Langevin approximation as a step rule.
///
/// The increment is covered by Euler-Maruyama substeps of width at most `dt`:
/// in a substep of width `h`, each reaction contributes `a*h + sqrt(a*h) * Z`
/// firings at its propensity `a`, applied through its stoichiometry, and the
/// state is clamped at zero. Much faster than exact simulation on dense
/// systems, at the cost of a continuous-state approximation.
pub struct StepCle {
    eqs: Vec<Reaction>,
    /// The internal discretization width. Unrelated to the recording grid of
    /// the drivers; it only controls the accuracy of the approximation.
    dt: f64,
}

impl StepCle {
    pub fn new(eqs: Vec<Reaction>, dt: f64) -> StepCle {
        assert!(dt > 0., "The discretization width must be positive: {dt}");
        StepCle { eqs, dt }
    }
}

impl Stepper for StepCle {
    fn step(
        &self,
        key: StreamKey,
        x: ArrayView1<'_, f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimError> {
        let rng = &mut key.rng();
        let mut state = x.to_vec();

        let substeps = ((dt / self.dt).ceil() as usize).max(1);
        let h = dt / substeps as f64;

        let mut propensities = vec![0.; self.eqs.len()];
        let mut time = t;
        for _ in 0..substeps {
            // All propensities are evaluated at the substep start, before any
            // reaction is applied.
            for (idx, eq, slot) in izip!(0.., &self.eqs, &mut propensities) {
                let propensity = eq.propensity(&state);
                if !propensity.is_finite() {
                    return Err(SimError::StepFunction {
                        time,
                        reason: format!("non-finite propensity {propensity} for reaction {idx}"),
                    });
                }
                *slot = propensity;
            }
            for (eq, &propensity) in izip!(&self.eqs, &propensities) {
                let mean = propensity * h;
                let noise = rng.sample(Normal::new(0., mean.sqrt()).unwrap());
                eq.apply(&mut state, mean + noise);
            }
            for value in &mut state {
                if *value < 0. {
                    *value = 0.;
                }
            }
            time += h;
        }

        Ok(Array1::from_vec(state))
    }
}
