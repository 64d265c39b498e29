use itertools::chain;
use tinyvec::ArrayVec;

pub const MAX_INPUTS: usize = 4;
pub const MAX_STOI: usize = 4;

/// A struct describing a single chemical reaction.
#[derive(Clone, Debug)]
pub struct Reaction {
    /// The input species of the reaction, with their multiplicities.
    pub inputs: ArrayVec<[(usize, u64); MAX_INPUTS]>,
    /// The change to the state for every firing of the reaction.
    pub stoichiometry: ArrayVec<[(usize, i64); MAX_STOI]>,
    /// The rate constant of the reaction.
    pub rate: f64,
}

impl Reaction {
    pub fn new(
        inputs: ArrayVec<[(usize, u64); MAX_INPUTS]>,
        stoichiometry: ArrayVec<[(usize, i64); MAX_STOI]>,
        rate: f64,
    ) -> Reaction {
        Reaction {
            inputs,
            stoichiometry,
            rate,
        }
    }
}

/// Computes the number of distinct k-subsets of x items, extended to
/// fractional x by the falling factorial. Clamped at zero, since a fractional
/// state below the multiplicity offers no complete set of inputs.
pub fn falling_binomial(x: f64, k: u64) -> f64 {
    let combinations = match k {
        0 => 1.0,
        1 => x,
        2 => x * (x - 1.0) / 2.0,
        k => {
            let mut res = 1.0;
            for i in 0..k {
                res = res * (x - i as f64) / (i + 1) as f64;
            }
            res
        }
    };
    combinations.max(0.0)
}

impl Reaction {
    /// Computes the `input_product` of the reaction, or the number of
    /// combinations of input molecules available in the given state.
    pub fn input_product(&self, state: &[f64]) -> f64 {
        self.inputs
            .iter()
            .map(|&(species, count)| falling_binomial(state[species].max(0.0), count))
            .product()
    }

    /// Computes the mass-action propensity of the reaction in the given state.
    pub fn propensity(&self, state: &[f64]) -> f64 {
        self.input_product(state) * self.rate
    }

    /// Applies `count` firings of the reaction to the state.
    /// Fractional counts arise under continuous approximations.
    pub fn apply(&self, state: &mut [f64], count: f64) {
        for &(species, change) in &self.stoichiometry {
            state[species] += count * change as f64;
        }
    }

    pub fn all_species<'t>(&'t self) -> impl Iterator<Item = usize> + 't {
        chain!(
            self.inputs.iter().map(|(s, _)| *s),
            self.stoichiometry.iter().map(|(s, _)| *s)
        )
    }
}
