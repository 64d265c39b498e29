use itertools::izip;
use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::{reaction::Reaction, SimError, Stepper, StreamKey};
use ndarray::{Array1, ArrayView1};

/// A binary-indexed-tree-like data structure for storing reaction propensities
/// and sampling the next reaction using them.
#[derive(Debug, Clone)]
struct ChoiceTree {
    data: Vec<f64>,
    alloc_size: usize,
    size: usize,
}

impl ChoiceTree {
    pub fn empty(size: usize) -> ChoiceTree {
        let data = vec![0.; size.next_power_of_two() * 2 - 1];
        ChoiceTree {
            data,
            size,
            alloc_size: size.next_power_of_two(),
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn update(&mut self, idx: usize, value: f64) {
        debug_assert!(
            value >= 0.,
            "A reaction propensity cannot be negative: {value}"
        );
        debug_assert!(
            (0..self.len()).contains(&idx),
            "Attempted to set an empty index: {idx}"
        );
        let old_val = self.data[self.alloc_size + idx - 1];
        let mut mapped_index = idx + self.alloc_size;
        while mapped_index > 0 {
            self.data[mapped_index - 1] += value - old_val;
            mapped_index /= 2;
        }
    }

    /// Returns the total propensity of all the reactions.
    pub fn total(&self) -> f64 {
        self.data[0]
    }
}

impl Distribution<usize> for ChoiceTree {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut idx = 1;
        let mut choice = rng.random::<f64>() * self.data[0];
        while idx * 2 < self.data.len() {
            if choice < self.data[2 * idx] {
                idx = 2 * idx + 1;
            } else {
                choice -= self.data[2 * idx];
                idx = 2 * idx;
            }
        }
        idx - self.alloc_size
    }
}

/// The exact discrete stochastic simulation algorithm as a step rule.
///
/// Each call simulates every reaction firing inside one time increment:
/// exponential waiting times at the total propensity, the firing reaction
/// sampled proportionally to its propensity. The rule is stateless across
/// calls; the propensity tree is rebuilt from the incoming state each time.
pub struct StepGillespie {
    /// The chemical reactions going on.
    eqs: Vec<Reaction>,
    /// A map from a reaction to all the reactions whose propensity its firing changes.
    reaction_updates: Vec<Vec<usize>>,
}

impl StepGillespie {
    pub fn new(eqs: Vec<Reaction>) -> StepGillespie {
        // Computing the graph of which reaction updates which other reactions.
        // We already have the reaction -> species edges, and now need the
        // species -> reaction edges, and then we take the product.
        let species_count = eqs
            .iter()
            .flat_map(|eq| eq.all_species())
            .max()
            .unwrap_or(0);

        let mut species_eqs = vec![Vec::new(); species_count + 1];
        for (idx, eq) in eqs.iter().enumerate() {
            for (species, _) in &eq.inputs {
                species_eqs[*species].push(idx);
            }
        }

        let mut reaction_updates: Vec<Vec<usize>> = vec![Vec::new(); eqs.len()];
        for (eq, updates) in izip!(&eqs, &mut reaction_updates) {
            for (species, _) in &eq.stoichiometry {
                updates.extend_from_slice(&species_eqs[*species]);
            }
        }
        for updates in &mut reaction_updates {
            updates.sort();
            updates.dedup();
        }

        StepGillespie {
            eqs,
            reaction_updates,
        }
    }

    /// Computes the propensity of reaction `idx`, rejecting non-finite values.
    fn propensity(&self, idx: usize, state: &[f64], time: f64) -> Result<f64, SimError> {
        let propensity = self.eqs[idx].propensity(state);
        if !propensity.is_finite() {
            return Err(SimError::StepFunction {
                time,
                reason: format!("non-finite propensity {propensity} for reaction {idx}"),
            });
        }
        Ok(propensity)
    }
}

impl Stepper for StepGillespie {
    fn step(
        &self,
        key: StreamKey,
        x: ArrayView1<'_, f64>,
        t: f64,
        dt: f64,
    ) -> Result<Array1<f64>, SimError> {
        let rng = &mut key.rng();
        let mut state = x.to_vec();

        let mut tree = ChoiceTree::empty(self.eqs.len());
        for idx in 0..self.eqs.len() {
            tree.update(idx, self.propensity(idx, &state, t)?);
        }

        let mut remaining = dt;
        loop {
            let total = tree.total();
            if !total.is_finite() {
                return Err(SimError::StepFunction {
                    time: t,
                    reason: format!("non-finite total propensity {total}"),
                });
            }
            if total <= 0. {
                // No reaction can fire; the state is constant for the rest of
                // the increment.
                break;
            }
            let wait = rng.sample(Exp::new(total).unwrap());
            if wait > remaining {
                break;
            }
            remaining -= wait;

            let reaction_idx = tree.sample(rng);
            self.eqs[reaction_idx].apply(&mut state, 1.);
            for &update_idx in &self.reaction_updates[reaction_idx] {
                let propensity = self.propensity(update_idx, &state, t)?;
                tree.update(update_idx, propensity);
            }
        }

        Ok(Array1::from_vec(state))
    }
}
