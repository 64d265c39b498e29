use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

use crate::{SimError, Stepper, StreamKey};

/// Simulates a single realization on a regular grid of times.
///
/// The key is split into one child per grid step, and the state is folded
/// forward through the step rule, one increment of width `dt` at a time,
/// starting from `(x0, t0)`. Row `i` of the result holds the state produced by
/// the step taken from grid time `t0 + i*dt`; the initial state itself is not
/// recorded.
///
/// The number of steps is `floor((tt - t0) / dt) + 1`, so at least one step
/// always runs, and the last grid time falls short of `tt` whenever the
/// interval is not an exact multiple of `dt`. Callers needing exact endpoint
/// alignment should pick a `dt` that divides the interval.
pub fn simulate_trajectory<S: Stepper>(
    key: StreamKey,
    x0: ArrayView1<'_, f64>,
    t0: f64,
    tt: f64,
    dt: f64,
    stepper: &S,
) -> Result<Array2<f64>, SimError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SimError::InvalidArgument(format!(
            "the grid spacing must be positive, got {dt}"
        )));
    }
    if !(tt > t0) {
        return Err(SimError::InvalidArgument(format!(
            "the terminal time {tt} must exceed the initial time {t0}"
        )));
    }

    let steps = ((tt - t0) / dt).floor() as usize + 1;
    let keys = key.split(steps);

    let dim = x0.len();
    let mut out = Array2::<f64>::zeros((steps, dim));
    let mut state = x0.to_owned();
    let mut time = t0;
    for (row, step_key) in keys.into_iter().enumerate() {
        let next = stepper.step(step_key, state.view(), time, dt)?;
        if next.len() != dim {
            return Err(SimError::DimensionMismatch {
                expected: dim,
                found: next.len(),
            });
        }
        out.row_mut(row).assign(&next);
        state = next;
        time += dt;
    }
    Ok(out)
}

/// Samples `n` independent realizations of the state at time `t0 + deltat`.
///
/// The key is split into one child per realization, child `i` driving
/// realization `i`, and all realizations are evaluated concurrently. Row `i`
/// of the result is the terminal state of realization `i`. The realizations
/// share no state, so evaluation order cannot affect the output: this
/// strategy, [`sample_ensemble_seq`], and [`sample_ensemble_batched`] return
/// identical matrices for the same key and arguments.
pub fn sample_ensemble<S: Stepper + Sync>(
    key: StreamKey,
    n: usize,
    x0: ArrayView1<'_, f64>,
    t0: f64,
    deltat: f64,
    stepper: &S,
) -> Result<Array2<f64>, SimError> {
    validate_count(n)?;
    let keys = key.split(n);
    let states = eval_group(&keys, x0, t0, deltat, stepper)?;
    collect_rows(states, x0.len())
}

/// Samples `n` independent realizations one at a time.
///
/// Identical in output to [`sample_ensemble`]; exists for workloads where
/// per-realization evaluation is cheaper than a bulk dispatch, such as very
/// large states or small `n`. The first failing realization aborts the whole
/// call.
pub fn sample_ensemble_seq<S: Stepper>(
    key: StreamKey,
    n: usize,
    x0: ArrayView1<'_, f64>,
    t0: f64,
    deltat: f64,
    stepper: &S,
) -> Result<Array2<f64>, SimError> {
    validate_count(n)?;
    let keys = key.split(n);
    let mut states = Vec::with_capacity(n);
    for step_key in keys {
        states.push(stepper.step(step_key, x0, t0, deltat)?);
    }
    collect_rows(states, x0.len())
}

/// Samples `n` independent realizations in groups of `batch_size`.
///
/// The key is split into all `n` children once, up front, exactly as in
/// [`sample_ensemble`]; grouping is purely a scheduling concern and never
/// changes which child key drives which realization. Each group is evaluated
/// like a small parallel ensemble and the groups are concatenated in order,
/// so the result is element-wise equal to the batchless one for every
/// `batch_size` in `[1, n]`. Batching exists to bound peak memory and compute
/// when `n` is large, never to change results.
pub fn sample_ensemble_batched<S: Stepper + Sync>(
    key: StreamKey,
    n: usize,
    x0: ArrayView1<'_, f64>,
    t0: f64,
    deltat: f64,
    stepper: &S,
    batch_size: usize,
) -> Result<Array2<f64>, SimError> {
    validate_count(n)?;
    if batch_size == 0 {
        return Err(SimError::InvalidArgument(
            "the batch size must be at least one".to_owned(),
        ));
    }
    if batch_size > n {
        return Err(SimError::InvalidArgument(format!(
            "the batch size {batch_size} exceeds the realization count {n}"
        )));
    }

    let keys = key.split(n);
    let mut states = Vec::with_capacity(n);
    for group in keys.chunks(batch_size) {
        states.extend(eval_group(group, x0, t0, deltat, stepper)?);
    }
    collect_rows(states, x0.len())
}

fn validate_count(n: usize) -> Result<(), SimError> {
    if n == 0 {
        return Err(SimError::InvalidArgument(
            "at least one realization must be requested".to_owned(),
        ));
    }
    Ok(())
}

/// Evaluates one realization per key, concurrently, preserving key order.
fn eval_group<S: Stepper + Sync>(
    keys: &[StreamKey],
    x0: ArrayView1<'_, f64>,
    t0: f64,
    deltat: f64,
    stepper: &S,
) -> Result<Vec<Array1<f64>>, SimError> {
    keys.par_iter()
        .map(|&step_key| stepper.step(step_key, x0, t0, deltat))
        .collect()
}

/// Stacks terminal states into a matrix, one realization per row.
fn collect_rows(states: Vec<Array1<f64>>, dim: usize) -> Result<Array2<f64>, SimError> {
    let mut out = Array2::<f64>::zeros((states.len(), dim));
    for (mut row, state) in out.rows_mut().into_iter().zip(&states) {
        if state.len() != dim {
            return Err(SimError::DimensionMismatch {
                expected: dim,
                found: state.len(),
            });
        }
        row.assign(state);
    }
    Ok(out)
}
