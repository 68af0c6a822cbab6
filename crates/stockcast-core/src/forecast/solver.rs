//! Penalized least squares by cyclic coordinate descent.
//!
//! Minimizes `0.5 |y - X b|^2 + sum_j (0.5 l2_j b_j^2 + l1_j |b_j|)` working on
//! the Gram matrix `X'X` and `X'y` only, so each sweep costs `O(p^2)`
//! independent of the number of observations.

const MAX_SWEEPS: usize = 2_000;
const TOLERANCE: f64 = 1e-9;

/// Per-coefficient penalty weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Penalty {
    pub l1: f64,
    pub l2: f64,
}

impl Penalty {
    pub const fn ridge(l2: f64) -> Self {
        Self { l1: 0.0, l2 }
    }

    pub const fn lasso(l1: f64) -> Self {
        Self { l1, l2: 0.0 }
    }
}

/// Normal-equation summary of a design matrix.
#[derive(Debug, Clone)]
pub(crate) struct Gram {
    width: usize,
    xtx: Vec<f64>,
    xty: Vec<f64>,
    yty: f64,
    rows: usize,
}

impl Gram {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            xtx: vec![0.0; width * width],
            xty: vec![0.0; width],
            yty: 0.0,
            rows: 0,
        }
    }

    pub fn add_row(&mut self, row: &[f64], y: f64) {
        for i in 0..self.width {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            self.xty[i] += xi * y;
            let offset = i * self.width;
            for j in i..self.width {
                self.xtx[offset + j] += xi * row[j];
            }
        }
        self.yty += y * y;
        self.rows += 1;
    }

    /// Mirror the upper triangle once all rows are in.
    pub fn finish(&mut self) {
        for i in 0..self.width {
            for j in 0..i {
                self.xtx[i * self.width + j] = self.xtx[j * self.width + i];
            }
        }
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.xtx[i * self.width + j]
    }

    /// `|y - X b|^2` expanded as `y'y - 2 b'X'y + b'X'X b`.
    pub fn residual_sum_of_squares(&self, beta: &[f64]) -> f64 {
        let mut quadratic = 0.0;
        for i in 0..self.width {
            let row_dot: f64 = (0..self.width).map(|j| self.at(i, j) * beta[j]).sum();
            quadratic += beta[i] * row_dot;
        }
        let linear: f64 = beta.iter().zip(&self.xty).map(|(b, c)| b * c).sum();
        (self.yty - 2.0 * linear + quadratic).max(0.0)
    }

    /// Run coordinate descent from `beta` in place. Returns the sweep count.
    pub fn descend(&self, penalties: &[Penalty], beta: &mut [f64]) -> usize {
        // gradient_j = X'y_j - sum_l X'X_jl b_l, kept current across updates.
        let mut gradient: Vec<f64> = (0..self.width)
            .map(|j| self.xty[j] - (0..self.width).map(|l| self.at(j, l) * beta[l]).sum::<f64>())
            .collect();

        for sweep in 1..=MAX_SWEEPS {
            let mut max_change: f64 = 0.0;

            for j in 0..self.width {
                let diagonal = self.at(j, j);
                let denominator = diagonal + penalties[j].l2;
                let rho = gradient[j] + diagonal * beta[j];

                let updated = if denominator > 0.0 {
                    soft_threshold(rho, penalties[j].l1) / denominator
                } else {
                    0.0
                };

                let change = updated - beta[j];
                if change != 0.0 {
                    for (l, value) in gradient.iter_mut().enumerate() {
                        *value -= self.at(l, j) * change;
                    }
                    beta[j] = updated;
                    max_change = max_change.max(change.abs());
                }
            }

            if max_change < TOLERANCE {
                return sweep;
            }
        }

        MAX_SWEEPS
    }
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gram_for(rows: &[([f64; 2], f64)]) -> Gram {
        let mut gram = Gram::new(2);
        for (row, y) in rows {
            gram.add_row(row, *y);
        }
        gram.finish();
        gram
    }

    #[test]
    fn unpenalized_descent_recovers_least_squares_line() {
        // y = 2 t + 1
        let rows: Vec<([f64; 2], f64)> = (0..10)
            .map(|i| {
                let t = i as f64 / 9.0;
                ([t, 1.0], 2.0 * t + 1.0)
            })
            .collect();
        let gram = gram_for(&rows);
        let mut beta = vec![0.0; 2];

        gram.descend(&[Penalty::ridge(0.0); 2], &mut beta);

        assert!((beta[0] - 2.0).abs() < 1e-6, "slope {}", beta[0]);
        assert!((beta[1] - 1.0).abs() < 1e-6, "offset {}", beta[1]);
        assert!(gram.residual_sum_of_squares(&beta) < 1e-10);
        assert_eq!(gram.rows(), 10);
    }

    #[test]
    fn large_lasso_penalty_zeroes_the_coefficient() {
        let gram = gram_for(&[([1.0, 1.0], 1.0), ([2.0, 1.0], 2.0)]);
        let mut beta = vec![0.0; 2];

        gram.descend(&[Penalty::lasso(100.0), Penalty::ridge(0.0)], &mut beta);

        assert_eq!(beta[0], 0.0);
        assert!((beta[1] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn all_zero_column_stays_at_zero() {
        let gram = gram_for(&[([0.0, 1.0], 3.0), ([0.0, 1.0], 5.0)]);
        let mut beta = vec![0.0; 2];

        gram.descend(&[Penalty::ridge(0.0); 2], &mut beta);

        assert_eq!(beta[0], 0.0);
        assert!((beta[1] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn soft_threshold_shrinks_toward_zero() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }
}
