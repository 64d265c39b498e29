use std::path::PathBuf;

use clap::{command, Parser};
use kinsim::{
    sample_ensemble, sample_ensemble_batched, sample_ensemble_seq, simulate_trajectory, Algorithm,
    ReactionNetwork, SimError, Stepper, Strategy, StreamKey,
};

use ndarray::Array2;
use rand::{rng, Rng};

// See also `clap_cargo::style::CLAP_STYLING`
pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

#[derive(Debug, Parser)]
#[command(
    name = "kinsim",
    about = "Simulation of stochastic chemical reaction kinetics.",
    long_about = "A program for simulating stochastic chemical reaction networks, either as a
single trajectory recorded on a regular time grid or as an ensemble of
independent terminal states. The program takes in as input several data files,
in the format:

A = 6
B = 8
C = 0
A + B -> C, 0.05

The system above has three chemical species, A, B, and C.
A and B can react to form C, and the reaction rate is 0.05.",
    styles = CLAP_STYLING,
)]
struct Cli {
    /// The amount of time to simulate.
    time: f64,

    /// The path to the files specifying the chemical reaction network.
    #[arg(num_args = 1.., )]
    data: Vec<PathBuf>,

    /// The spacing of the recorded time grid.
    #[arg(short, long, default_value_t = 1.0)]
    dt: f64,

    /// Sample this many independent terminal states instead of one trajectory.
    #[arg(short = 'n', long)]
    ensemble: Option<usize>,

    /// Evaluate the ensemble in consecutive groups of this size.
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// The ensemble evaluation strategy.
    #[arg(long)]
    strategy: Option<Strategy>,

    /// The step algorithm to use to advance the system.
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// The internal discretization width of the Langevin approximation.
    #[arg(long, default_value_t = 0.01)]
    cle_dt: f64,

    /// The seed to use for random number generation.
    #[arg(long)]
    seed: Option<u64>,
}

fn run_with_stepper<S: Stepper + Sync>(
    args: &Cli,
    network: &ReactionNetwork,
    stepper: &S,
) -> Result<(), SimError> {
    let key = StreamKey::new(args.seed.unwrap_or_else(|| rng().random()));

    match args.ensemble {
        Some(n) => {
            let out = match (args.strategy.unwrap_or_default(), args.batch_size) {
                (Strategy::Sequential, _) => {
                    sample_ensemble_seq(key, n, network.x0.view(), 0., args.time, stepper)?
                }
                (Strategy::Parallel, Some(batch_size)) => sample_ensemble_batched(
                    key,
                    n,
                    network.x0.view(),
                    0.,
                    args.time,
                    stepper,
                    batch_size,
                )?,
                (Strategy::Parallel, None) => {
                    sample_ensemble(key, n, network.x0.view(), 0., args.time, stepper)?
                }
            };
            print_matrix(&out, "realization", &network.names, |row| row as f64);
        }
        None => {
            let out = simulate_trajectory(
                key,
                network.x0.view(),
                0.,
                args.time,
                args.dt,
                stepper,
            )?;
            print_matrix(&out, "time", &network.names, |row| row as f64 * args.dt);
        }
    }
    Ok(())
}

/// Prints the sampled states to stdout as TSV, to be redirected as desired.
fn print_matrix(out: &Array2<f64>, label: &str, names: &[String], row_label: impl Fn(usize) -> f64) {
    print!("{label}");
    for name in names {
        print!("\t{name}");
    }
    println!();
    for (idx, row) in out.rows().into_iter().enumerate() {
        print!("{}", row_label(idx));
        for value in row {
            print!("\t{value}");
        }
        println!();
    }
}

fn run_cli(args: Cli) -> Result<(), SimError> {
    let network = ReactionNetwork::from_files(&args.data);
    match args.algorithm.unwrap_or_default() {
        Algorithm::Gillespie => run_with_stepper(&args, &network, &network.step_gillespie()),
        Algorithm::Cle => run_with_stepper(&args, &network, &network.step_cle(args.cle_dt)),
    }
}

pub fn main() {
    if let Err(err) = run_cli(Cli::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
