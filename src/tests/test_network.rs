use ndarray::array;

use crate::{models, reaction::falling_binomial, ReactionNetwork};

#[test]
fn parses_a_small_network() {
    let network = ReactionNetwork::from_shorthand(
        "A = 6
         B = 8
         C = 0
         A + B -> C, 0.05",
    );
    assert_eq!(network.names, ["A", "B", "C"]);
    assert_eq!(network.x0, array![6., 8., 0.]);
    assert_eq!(network.reactions.len(), 1);

    let reaction = &network.reactions[0];
    assert_eq!(reaction.inputs.as_slice(), &[(0, 1), (1, 1)]);
    assert_eq!(reaction.stoichiometry.as_slice(), &[(0, -1), (1, -1), (2, 1)]);
    assert_eq!(reaction.propensity(&[6., 8., 0.]), 6. * 8. * 0.05);
}

/// Species columns follow first-declaration order, so trajectories line up
/// with the declaration no matter how the reactions permute the species.
#[test]
fn species_follow_declaration_order() {
    let network = ReactionNetwork::from_shorthand(
        "Z = 1
         M = 2
         A = 3
         A -> Z, 1",
    );
    assert_eq!(network.names, ["Z", "M", "A"]);
    assert_eq!(network.x0, array![1., 2., 3.]);
}

#[test]
fn skips_comments_and_blank_lines() {
    let network = ReactionNetwork::from_shorthand(
        "# a tiny decay model

         A = 9
         # the only reaction
         A -> , 0.5",
    );
    assert_eq!(network.names, ["A"]);
    assert_eq!(network.reactions.len(), 1);
}

/// A coefficient and a repeated species both raise the input multiplicity,
/// and the propensity counts combinations of input molecules.
#[test]
fn multiplicities_merge() {
    let network = ReactionNetwork::from_shorthand("A = 6\nB = 0\n2A -> B, 1");
    let reaction = &network.reactions[0];
    assert_eq!(reaction.inputs.as_slice(), &[(0, 2)]);
    assert_eq!(reaction.propensity(&[6., 0.]), 15.);

    let repeated = ReactionNetwork::from_shorthand("A = 6\nB = 0\nA + A -> B, 1");
    assert_eq!(repeated.reactions[0].inputs.as_slice(), &[(0, 2)]);
}

/// Catalysts appear on both sides and cancel out of the stoichiometry.
#[test]
fn catalysts_cancel() {
    let network = ReactionNetwork::from_shorthand("A = 5\nB = 5\nC = 0\nA + B -> B + C, 1");
    let reaction = &network.reactions[0];
    assert_eq!(reaction.stoichiometry.as_slice(), &[(0, -1), (2, 1)]);
}

/// Synthesis and decay reactions have an empty side.
#[test]
fn parses_empty_sides() {
    let network = ReactionNetwork::from_shorthand("X = 0\n-> X, 1\nX -> , 0.1");
    assert_eq!(network.reactions.len(), 2);

    let synthesis = &network.reactions[0];
    assert!(synthesis.inputs.is_empty());
    assert_eq!(synthesis.stoichiometry.as_slice(), &[(0, 1)]);
    assert_eq!(synthesis.propensity(&[1000.]), 1.);

    let decay = &network.reactions[1];
    assert_eq!(decay.inputs.as_slice(), &[(0, 1)]);
    assert_eq!(decay.stoichiometry.as_slice(), &[(0, -1)]);
}

/// Redeclaring a species keeps its column and takes the latest amount.
#[test]
fn redeclaration_overrides_the_amount() {
    let network = ReactionNetwork::from_shorthand("A = 5\nB = 1\nA = 7\nA -> B, 1");
    assert_eq!(network.names, ["A", "B"]);
    assert_eq!(network.x0, array![7., 1.]);
}

#[test]
fn falling_binomial_counts_subsets() {
    assert_eq!(falling_binomial(6., 0), 1.);
    assert_eq!(falling_binomial(6., 1), 6.);
    assert_eq!(falling_binomial(6., 2), 15.);
    assert_eq!(falling_binomial(6., 3), 20.);
    // A single molecule offers no pairs, and fractional states below the
    // multiplicity clamp to zero rather than going negative.
    assert_eq!(falling_binomial(1., 2), 0.);
    assert_eq!(falling_binomial(0.5, 2), 0.);
}

#[test]
fn predefined_models_are_consistent() {
    let lv = models::lv();
    assert_eq!(lv.names, ["Prey", "Pred"]);
    assert_eq!(lv.x0, array![50., 100.]);
    assert_eq!(lv.reactions.len(), 3);

    let id = models::id();
    assert_eq!(id.dim(), 1);
    assert_eq!(id.reactions.len(), 2);

    let sir = models::sir();
    assert_eq!(sir.names, ["S", "I", "R"]);
    assert_eq!(sir.x0.sum(), 200.);
}
