//! Design-matrix construction for the additive model.
//!
//! Column layout of every row:
//!
//! | Columns | Meaning |
//! |---------|---------|
//! | `0` | trend slope `k` (multiplies scaled time `t`) |
//! | `1` | trend offset `m` |
//! | `2 .. 2+S` | changepoint hinges `(t - s_j)+` |
//! | then | `sin`/`cos` pairs per seasonality, orders `1..=N` |

use std::f64::consts::TAU;
use std::ops::Range;

use super::config::Seasonality;

pub(crate) const SLOPE: usize = 0;
pub(crate) const OFFSET: usize = 1;
pub(crate) const FIRST_DELTA: usize = 2;

/// Column ranges of a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Layout {
    pub deltas: Range<usize>,
    pub seasonal: Vec<(Seasonality, Range<usize>)>,
    pub width: usize,
}

impl Layout {
    pub fn new(n_changepoints: usize, seasonalities: &[Seasonality]) -> Self {
        let deltas = FIRST_DELTA..FIRST_DELTA + n_changepoints;
        let mut next = deltas.end;
        let seasonal = seasonalities
            .iter()
            .map(|seasonality| {
                let range = next..next + 2 * seasonality.fourier_order;
                next = range.end;
                (*seasonality, range)
            })
            .collect();

        Self {
            deltas,
            seasonal,
            width: next,
        }
    }
}

/// Changepoint locations in scaled time.
///
/// Placed on evenly spaced observation indexes across the first
/// `changepoint_range` share of the history, skipping the first point. Short
/// histories get fewer changepoints.
pub(crate) fn place_changepoints(t: &[f64], n_changepoints: usize, changepoint_range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * changepoint_range).floor() as usize;
    let n = n_changepoints.min(hist_size.saturating_sub(1));
    if n == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    (1..=n)
        .map(|i| {
            let index = (last * i as f64 / n as f64).round() as usize;
            t[index.min(t.len() - 1)]
        })
        .collect()
}

/// Fourier terms of one seasonality at `day` (days since the Unix epoch).
pub(crate) fn fourier_terms(day: f64, seasonality: &Seasonality, out: &mut [f64]) {
    let phase = day.rem_euclid(seasonality.period) / seasonality.period;
    for order in 1..=seasonality.fourier_order {
        let angle = TAU * order as f64 * phase;
        out[2 * (order - 1)] = angle.sin();
        out[2 * (order - 1) + 1] = angle.cos();
    }
}

/// Fill `row` with the design row for scaled time `t` at `day`.
pub(crate) fn design_row(t: f64, day: f64, layout: &Layout, changepoints: &[f64], row: &mut [f64]) {
    row[SLOPE] = t;
    row[OFFSET] = 1.0;
    for (column, changepoint) in layout.deltas.clone().zip(changepoints) {
        row[column] = (t - changepoint).max(0.0);
    }
    for (seasonality, range) in &layout.seasonal {
        fourier_terms(day, seasonality, &mut row[range.clone()]);
    }
}

/// Piecewise-linear trend `k t + m + sum(delta_j (t - s_j)+)`.
pub(crate) fn piecewise_linear(t: f64, slope: f64, offset: f64, deltas: &[f64], changepoints: &[f64]) -> f64 {
    let bends: f64 = deltas
        .iter()
        .zip(changepoints)
        .map(|(delta, changepoint)| delta * (t - changepoint).max(0.0))
        .sum();
    slope * t + offset + bends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::config::{WEEKLY, YEARLY};

    #[test]
    fn layout_packs_columns_in_order() {
        let layout = Layout::new(3, &[YEARLY, WEEKLY]);
        assert_eq!(layout.deltas, 2..5);
        assert_eq!(layout.seasonal[0].1, 5..25);
        assert_eq!(layout.seasonal[1].1, 25..31);
        assert_eq!(layout.width, 31);
    }

    #[test]
    fn changepoints_cover_leading_share_of_history() {
        let t: Vec<f64> = (0..101).map(|i| i as f64 / 100.0).collect();
        let changepoints = place_changepoints(&t, 4, 0.8);

        assert_eq!(changepoints.len(), 4);
        assert!(changepoints[0] > 0.0);
        assert!(changepoints.iter().all(|&s| s <= 0.8));
        assert!(changepoints.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn short_history_has_fewer_changepoints() {
        assert!(place_changepoints(&[0.0, 1.0], 25, 0.8).is_empty());
        assert_eq!(place_changepoints(&[0.0, 0.25, 0.5, 0.75, 1.0], 25, 0.8).len(), 3);
    }

    #[test]
    fn weekly_terms_repeat_every_seven_days() {
        let mut a = [0.0; 6];
        let mut b = [0.0; 6];
        fourier_terms(18_262.0, &WEEKLY, &mut a);
        fourier_terms(18_269.0, &WEEKLY, &mut b);
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn trend_bends_after_changepoint() {
        let before = piecewise_linear(0.4, 1.0, 0.5, &[2.0], &[0.5]);
        let after = piecewise_linear(0.75, 1.0, 0.5, &[2.0], &[0.5]);
        assert!((before - 0.9).abs() < 1e-12);
        assert!((after - 1.75).abs() < 1e-12);
    }
}
