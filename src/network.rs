use crate::{
    cle::StepCle,
    gillespie::StepGillespie,
    reaction::{Reaction, MAX_STOI},
};
use derive_new::new;
use itertools::Itertools;
use ndarray::Array1;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{digit0, digit1, multispace0},
    combinator::map_res,
    multi::separated_list0,
    number::complete::double,
    sequence::delimited,
    AsChar, IResult, Parser,
};
use num_traits::Zero;
use rustc_hash::FxHashMap;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tinyvec::ArrayVec;

/// A chemical reaction network: the species names, the initial state, and the
/// reactions, with species indexed in declaration order.
#[derive(Clone, Debug)]
pub struct ReactionNetwork {
    pub names: Vec<String>,
    pub x0: Array1<f64>,
    pub reactions: Vec<Reaction>,
}

impl ReactionNetwork {
    /// Builds a network from shorthand source held in a string.
    pub fn from_shorthand(source: &str) -> ReactionNetwork {
        let mut parser = NetworkParser::default();
        parser.parse_str(source);
        parser.finish()
    }

    /// Builds a network from shorthand data files.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> ReactionNetwork {
        let mut parser = NetworkParser::default();
        for path in paths {
            parser.parse_file(path.as_ref());
        }
        parser.finish()
    }

    /// The number of species in the network.
    pub fn dim(&self) -> usize {
        self.names.len()
    }

    /// An exact discrete stochastic simulation step rule for the network.
    pub fn step_gillespie(&self) -> StepGillespie {
        StepGillespie::new(self.reactions.clone())
    }

    /// A chemical Langevin step rule for the network, with the given internal
    /// discretization width.
    pub fn step_cle(&self, dt: f64) -> StepCle {
        StepCle::new(self.reactions.clone(), dt)
    }
}

/// The result of parsing a line defining a new reaction.
#[derive(Clone, Debug)]
struct NamedReaction {
    inputs: Vec<(String, u64)>,
    outputs: Vec<(String, u64)>,
    rate: f64,
}

/// The result of parsing a line setting the initial amount of a species.
#[derive(Clone, Debug, new)]
struct Species {
    name: String,
    amount: u64,
}

/// An incremental parser for the shorthand model language. Species columns of
/// the finished network follow first-declaration order across all parsed
/// sources.
#[derive(Default)]
pub struct NetworkParser {
    declaration_order: Vec<String>,
    initial_amounts: FxHashMap<String, u64>,
    reactions: Vec<NamedReaction>,
}

/// An enum storing the result of parsing a line.
enum Line {
    Species(Species),
    Reaction(NamedReaction),
}

/// A parser for a nonnegative decimal number.
fn decimal(data: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse::<u64>()).parse(data)
}

/// Parses a line of the form:
/// ```ignore
/// A = 5
/// ```
/// that sets the initial amount of the species `A` to 5.
fn parse_species(data: &str) -> IResult<&str, Line> {
    let (rem, (name, _, _, _, amount)) = (
        take_while1(AsChar::is_alphanum),
        multispace0,
        tag("="),
        multispace0,
        decimal,
    )
        .parse(data)?;

    Ok((rem, Line::Species(Species::new(name.to_owned(), amount))))
}

/// Parses a term of the form `2A`.
fn parse_term(data: &str) -> IResult<&str, (String, u64)> {
    let (rem, num): (&str, u64) = map_res(digit0, |s: &str| {
        if s.is_empty() {
            Ok(1)
        } else {
            s.parse::<u64>()
        }
    })
    .parse(data)?;
    let (rem, name) = take_while1(AsChar::is_alphanum).parse(rem)?;

    Ok((rem, (name.to_owned(), num)))
}

/// Parses one side of a reaction:
/// ```ignore
/// 2A + B
/// ```
/// An empty side stands for no species, as in a synthesis or decay reaction.
fn parse_side(data: &str) -> IResult<&str, Vec<(String, u64)>> {
    separated_list0(delimited(multispace0, tag("+"), multispace0), parse_term).parse(data)
}

/// A parser for a full reaction, of the form:
/// ```ignore
/// 2A + B -> 3C, 3.5e-9
/// ```
fn parse_reaction(reaction: &str) -> IResult<&str, Line> {
    let (rem, (left_side, _, right_side, _, rate)) = (
        parse_side,
        delimited(multispace0, tag("->"), multispace0),
        parse_side,
        delimited(multispace0, tag(","), multispace0),
        double,
    )
        .parse(reaction)?;

    let res = NamedReaction {
        inputs: left_side,
        outputs: right_side,
        rate,
    };

    Ok((rem, Line::Reaction(res)))
}

fn parse_line(line: &str) -> IResult<&str, Line> {
    alt((parse_species, parse_reaction)).parse(line)
}

fn named_to_reaction(
    named_reaction: NamedReaction,
    species_indices: &FxHashMap<String, usize>,
) -> Reaction {
    let mut inputs = ArrayVec::new();
    for (species, count) in &named_reaction.inputs {
        let species = *species_indices.get(species).unwrap_or_else(|| panic!("Failed to resolve the reaction: \"{named_reaction:?}\": The species \"{species:?}\" is undefined!"));
        if inputs
            .last()
            .is_some_and(|&(last_species, _)| last_species == species)
        {
            inputs.last_mut().unwrap().1 += *count;
        } else {
            inputs.push((species, *count));
        }
    }

    let outputs = named_reaction
        .outputs
        .iter()
        .map(|(name, count)| {
            let species = *species_indices.get(name).unwrap_or_else(|| panic!("Failed to resolve the reaction: \"{named_reaction:?}\": The species \"{name:?}\" is undefined!"));
            (species, *count as i64)
        })
        .collect_vec();

    // Computing an iterator over the differences, and merging it to a single
    // stoichiometry vector.
    let in_diff = inputs.iter().map(|(idx, count)| (*idx, -(*count as i64)));
    let all_diff = in_diff.chain(outputs.into_iter()).sorted();
    let mut stoichiometry: ArrayVec<[(usize, i64); MAX_STOI]> = ArrayVec::new();
    for (idx, diff) in all_diff {
        if stoichiometry.is_empty() || stoichiometry.last().unwrap().0 < idx {
            stoichiometry.push((idx, diff));
        } else {
            stoichiometry.last_mut().unwrap().1 += diff;
        }
    }
    let stoichiometry = stoichiometry
        .iter()
        .filter(|(_, diff)| !diff.is_zero())
        .copied()
        .collect();

    Reaction::new(inputs, stoichiometry, named_reaction.rate)
}

impl NetworkParser {
    /// Parses a data file.
    /// The data file contains lines, each of which is either a definition of
    /// the initial amount of a species:
    /// ```ignore
    /// A = 5
    /// B = 7
    /// ```
    /// or a reaction. Blank lines and `#` comments are skipped.
    pub fn parse_file(&mut self, path: &Path) -> &mut Self {
        let reader = BufReader::new(
            File::open(path).unwrap_or_else(|err| panic!("Failed to open {path:?}: {err:?}!")),
        );
        for line in reader.lines().map_while(Result::ok) {
            self.parse_shorthand_line(&line);
        }
        self
    }

    /// Parses shorthand source held in a string, line by line.
    pub fn parse_str(&mut self, source: &str) -> &mut Self {
        for line in source.lines() {
            self.parse_shorthand_line(line);
        }
        self
    }

    fn parse_shorthand_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }
        let parsed = parse_line(line)
            .unwrap_or_else(|err| panic!("Failed to parse the line {line} with error {err:?}"))
            .1;
        match parsed {
            Line::Species(species) => {
                if !self.initial_amounts.contains_key(&species.name) {
                    self.declaration_order.push(species.name.clone());
                }
                self.initial_amounts.insert(species.name, species.amount);
            }
            Line::Reaction(named_reaction) => {
                self.reactions.push(named_reaction);
            }
        }
    }

    /// Resolves the parsed lines into a reaction network.
    pub fn finish(self) -> ReactionNetwork {
        let mut species_indices = FxHashMap::default();
        let mut x0 = Vec::with_capacity(self.declaration_order.len());
        for (idx, name) in self.declaration_order.iter().enumerate() {
            species_indices.insert(name.clone(), idx);
            x0.push(self.initial_amounts[name] as f64);
        }

        let reactions = self
            .reactions
            .into_iter()
            .map(|named_reaction| named_to_reaction(named_reaction, &species_indices))
            .collect_vec();

        ReactionNetwork {
            names: self.declaration_order,
            x0: Array1::from_vec(x0),
            reactions,
        }
    }
}
