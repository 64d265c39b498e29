//! A few standard reaction networks, handy for tests, benches, and demos.

use crate::network::ReactionNetwork;

/// The Lotka-Volterra predator-prey system.
///
/// Prey reproduce, predation converts prey into predators, and predators die.
pub fn lv() -> ReactionNetwork {
    ReactionNetwork::from_shorthand(
        "Prey = 50
         Pred = 100
         Prey -> 2Prey, 1
         Prey + Pred -> 2Pred, 0.005
         Pred -> , 0.6",
    )
}

/// The immigration-death process, the simplest birth-death system.
pub fn id() -> ReactionNetwork {
    ReactionNetwork::from_shorthand(
        "X = 0
         -> X, 1
         X -> , 0.1",
    )
}

/// The susceptible-infectious-recovered epidemic model.
pub fn sir() -> ReactionNetwork {
    ReactionNetwork::from_shorthand(
        "S = 197
         I = 3
         R = 0
         S + I -> 2I, 0.0015
         I -> R, 0.1",
    )
}
