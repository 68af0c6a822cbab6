//! Monte Carlo uncertainty bands.
//!
//! Each sample extends the fitted trend with new changepoints past the end of
//! the history (Poisson count at the historical rate, Laplace magnitudes) and
//! adds Gaussian observation noise. Bounds are per-point quantiles of the
//! sampled values. Everything here works on scaled values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};

use crate::FitError;

/// Inputs shared by every sample.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SamplingPlan {
    pub samples: usize,
    pub interval_width: f64,
    pub seed: u64,
    pub sigma: f64,
    pub n_changepoints: usize,
    pub mean_abs_delta: f64,
}

/// `(lower, upper)` per point, clamped around `yhat`.
///
/// `t` is scaled time (history ends at `1.0`), `yhat` the scaled point
/// forecast at the same index.
pub(crate) fn intervals(plan: &SamplingPlan, t: &[f64], yhat: &[f64]) -> Result<Vec<(f64, f64)>, FitError> {
    if plan.samples == 0 {
        return Ok(yhat.iter().map(|&value| (value, value)).collect());
    }

    let mut rng = StdRng::seed_from_u64(plan.seed);
    let noise = Normal::new(0.0, plan.sigma).map_err(|_| FitError::NonFinite)?;
    let lower_q = (1.0 - plan.interval_width) / 2.0;
    let upper_q = (1.0 + plan.interval_width) / 2.0;

    let future: Vec<usize> = (0..t.len()).filter(|&i| t[i] > 1.0).collect();
    let t_max = future.iter().map(|&i| t[i]).fold(1.0, f64::max);
    let shifts = trend_shifts(plan, t, &future, t_max, &mut rng)?;

    let mut bounds = Vec::with_capacity(t.len());
    let mut draws = vec![0.0; plan.samples];
    let mut future_index = 0;

    for (i, &center) in yhat.iter().enumerate() {
        let shift_row = if future.get(future_index) == Some(&i) {
            future_index += 1;
            Some(&shifts[(future_index - 1) * plan.samples..future_index * plan.samples])
        } else {
            None
        };

        for (s, draw) in draws.iter_mut().enumerate() {
            let shift = shift_row.map_or(0.0, |row| row[s]);
            *draw = center + shift + noise.sample(&mut rng);
        }
        draws.sort_by(f64::total_cmp);

        let lower = quantile(&draws, lower_q).min(center);
        let upper = quantile(&draws, upper_q).max(center);
        bounds.push((lower, upper));
    }

    Ok(bounds)
}

/// Sampled trend deviations for future points, laid out point-major.
fn trend_shifts(
    plan: &SamplingPlan,
    t: &[f64],
    future: &[usize],
    t_max: f64,
    rng: &mut StdRng,
) -> Result<Vec<f64>, FitError> {
    let mut shifts = vec![0.0; future.len() * plan.samples];
    let rate = plan.n_changepoints as f64 * (t_max - 1.0);
    if future.is_empty() || rate <= 0.0 {
        return Ok(shifts);
    }

    let poisson = Poisson::new(rate).map_err(|_| FitError::NonFinite)?;
    let scale = plan.mean_abs_delta + 1e-8;
    let mut changes: Vec<(f64, f64)> = Vec::new();

    for s in 0..plan.samples {
        let count: f64 = poisson.sample(rng);
        changes.clear();
        for _ in 0..count as usize {
            let location = 1.0 + rng.gen::<f64>() * (t_max - 1.0);
            changes.push((location, laplace(rng, scale)));
        }

        for (k, &i) in future.iter().enumerate() {
            shifts[k * plan.samples + s] = changes
                .iter()
                .map(|&(location, delta)| delta * (t[i] - location).max(0.0))
                .sum();
        }
    }

    Ok(shifts)
}

fn laplace(rng: &mut StdRng, scale: f64) -> f64 {
    let u = rng.gen::<f64>() - 0.5;
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE).ln()
}

/// Linear-interpolation quantile of an ascending slice.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            let position = q.clamp(0.0, 1.0) * (len - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let weight = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}
