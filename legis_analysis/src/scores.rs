//! Leadership and ideology scores from a cosponsorship matrix.
//!
//! Both scores start from the smoothed matrix (square root of the counts). The leadership
//! score is a PageRank over the column-normalized matrix, the ideology score the second
//! right-singular vector of the smoothed matrix itself.

use log::debug;
use nalgebra::{DMatrix, DVector};
use snafu::prelude::*;

use crate::config::*;

/// The party label that orients the ideology axis: its members end up on the right.
pub const REPUBLICAN: &str = "Republican";

/// Takes the square root of every count, so that legislators who cosponsor a great
/// many bills weigh less.
pub fn smooth(counts: &DMatrix<f64>) -> DMatrix<f64> {
    counts.map(f64::sqrt)
}

/// Makes every column sum to one. Columns summing below `floor` are first padded
/// uniformly up to it.
pub fn column_normalize(m: &DMatrix<f64>, floor: f64) -> Result<DMatrix<f64>, ConfigurationError> {
    let n = m.nrows();
    let mut p = m.clone();
    for col in 0..m.ncols() {
        let mut s: f64 = p.column(col).sum();
        ensure!(s != 0.0, EmptyColumnSnafu { column: col });
        let pad = if s < floor {
            let pad = (floor - s) / n as f64;
            s = floor;
            pad
        } else {
            0.0
        };
        for row in 0..n {
            p[(row, col)] = (p[(row, col)] + pad) / s;
        }
    }
    Ok(p)
}

fn l1(v: &DVector<f64>) -> f64 {
    v.iter().map(|x| x.abs()).sum()
}

/// The PageRank of every member, before any rescaling. The values sum to one.
///
/// The lost mass of each damped step is spread uniformly, and the iteration stops when
/// the L1 change drops below the tolerance.
pub fn pagerank(smoothed: &DMatrix<f64>, config: &ScoringConfig) -> Result<Vec<f64>, ConfigurationError> {
    let n = smoothed.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }
    let p = column_normalize(smoothed, config.column_floor)?;
    let teleport = 1.0 / n as f64;
    let mut x: DVector<f64> = DVector::from_element(n, teleport);
    for iteration in 0..config.max_iterations {
        let mut y = (&p * &x) * config.damping;
        let lost = l1(&x) - l1(&y);
        y.iter_mut().for_each(|v| *v += lost * teleport);
        let err = l1(&(&y - &x));
        x = y;
        if err < config.tolerance {
            debug!("pagerank: {} members, converged after {} iterations", n, iteration + 1);
            return Ok(x.iter().copied().collect());
        }
    }
    NoConvergenceSnafu {
        iterations: config.max_iterations,
    }
    .fail()
}

/// Leadership scores in [0, 1]: the PageRank on a log curve that puts the median at 0.5.
pub fn leadership(smoothed: &DMatrix<f64>, config: &ScoringConfig) -> Result<Vec<f64>, ConfigurationError> {
    Ok(rescale(&pagerank(smoothed, config)?, true))
}

/// Ideology scores in [0, 1], Republicans toward 1.
///
/// Arguments:
/// * `smoothed`: the smoothed cosponsorship matrix
/// * `parties`: the party label of each row
pub fn ideology(smoothed: &DMatrix<f64>, parties: &[&str]) -> Result<Vec<f64>, ConfigurationError> {
    let n = smoothed.nrows();
    ensure!(
        parties.len() == n,
        PartyCountMismatchSnafu {
            count: parties.len(),
            members: n
        }
    );
    ensure!(n >= 2, TooFewMembersSnafu { count: n });
    ensure!(parties.contains(&REPUBLICAN), NoRepublicansSnafu {});

    let svd = smoothed.clone().svd(false, true);
    let v_t = svd.v_t.context(MissingSingularVectorsSnafu {})?;
    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|i, j| svd.singular_values[*j].total_cmp(&svd.singular_values[*i]));
    let second = order[1];
    debug!(
        "ideology: {} members, second singular value {}",
        n, svd.singular_values[second]
    );
    let axis: Vec<f64> = v_t.row(second).iter().copied().collect();
    Ok(rescale(&orient_axis(&axis, parties)?, false))
}

/// Multiplies the axis by the mean Republican score, which puts Republicans on the
/// positive side whatever the sign the decomposition picked.
pub fn orient_axis(axis: &[f64], parties: &[&str]) -> Result<Vec<f64>, ConfigurationError> {
    let scores: Vec<f64> = axis
        .iter()
        .zip(parties.iter())
        .filter(|(_, p)| **p == REPUBLICAN)
        .map(|(v, _)| *v)
        .collect();
    ensure!(!scores.is_empty(), NoRepublicansSnafu {});
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Ok(axis.iter().map(|v| v * mean).collect())
}

/// The median, averaging the two middle values of an even-sized input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn linear_rescale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

// With u in [0, 1] and median m below 0.5, s = -m²/(2m - 1) solves
// (log(s) + log(1 + s)) / 2 = log(m + s).
fn log_curve(values: &[f64], m: f64) -> Vec<f64> {
    let s = -m * m / (2.0 * m - 1.0);
    let logs: Vec<f64> = values.iter().map(|u| (u + s).ln()).collect();
    linear_rescale(&logs)
}

/// Rescales the values to [0, 1].
///
/// With `log`, the values are then put on a logarithmic curve that maps the median to
/// 0.5. A median above the midpoint uses the mirrored curve. A median at either end or
/// exactly at the midpoint leaves the linear rescale.
pub fn rescale(values: &[f64], log: bool) -> Vec<f64> {
    let linear = linear_rescale(values);
    if !log || linear.is_empty() {
        return linear;
    }
    let m = median(&linear);
    if m <= 0.0 || m >= 1.0 || m == 0.5 {
        return linear;
    }
    if m < 0.5 {
        log_curve(&linear, m)
    } else {
        let flipped: Vec<f64> = linear.iter().map(|u| 1.0 - u).collect();
        log_curve(&flipped, 1.0 - m)
            .iter()
            .map(|u| 1.0 - u)
            .collect()
    }
}
