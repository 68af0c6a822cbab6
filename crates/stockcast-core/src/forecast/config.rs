use serde::{Deserialize, Serialize};

/// Whether a seasonal component is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalityMode {
    On,
    Off,
    /// Enabled only when the history can identify it.
    Auto,
}

/// Fixed configuration of the additive model.
///
/// Defaults reproduce the run configuration: changepoint prior scale `0.15`,
/// yearly and daily seasonality on, weekly decided from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub changepoint_prior_scale: f64,
    pub n_changepoints: usize,
    /// Share of the history, from the start, eligible for changepoints.
    pub changepoint_range: f64,
    pub yearly: SeasonalityMode,
    pub weekly: SeasonalityMode,
    pub daily: SeasonalityMode,
    pub seasonality_prior_scale: f64,
    pub interval_width: f64,
    pub uncertainty_samples: usize,
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            changepoint_prior_scale: 0.15,
            n_changepoints: 25,
            changepoint_range: 0.8,
            yearly: SeasonalityMode::On,
            weekly: SeasonalityMode::Auto,
            daily: SeasonalityMode::On,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: 0x5EED_CA57,
        }
    }
}

/// A fitted Fourier seasonality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Seasonality {
    pub name: &'static str,
    /// Period in days.
    pub period: f64,
    pub fourier_order: usize,
}

pub const YEARLY: Seasonality = Seasonality {
    name: "yearly",
    period: 365.25,
    fourier_order: 10,
};

pub const WEEKLY: Seasonality = Seasonality {
    name: "weekly",
    period: 7.0,
    fourier_order: 3,
};

pub const DAILY: Seasonality = Seasonality {
    name: "daily",
    period: 1.0,
    fourier_order: 4,
};

impl ForecastConfig {
    /// Seasonalities to fit for a history spanning `span_days` with the given
    /// smallest spacing between observations.
    pub fn active_seasonalities(&self, span_days: f64, min_spacing_days: f64) -> Vec<Seasonality> {
        let mut active = Vec::with_capacity(3);
        if enabled(self.yearly, span_days >= 2.0 * YEARLY.period) {
            active.push(YEARLY);
        }
        if enabled(self.weekly, span_days >= 2.0 * WEEKLY.period && min_spacing_days < WEEKLY.period) {
            active.push(WEEKLY);
        }
        if enabled(self.daily, span_days >= 2.0 * DAILY.period && min_spacing_days < DAILY.period) {
            active.push(DAILY);
        }
        active
    }
}

fn enabled(mode: SeasonalityMode, auto_condition: bool) -> bool {
    match mode {
        SeasonalityMode::On => true,
        SeasonalityMode::Off => false,
        SeasonalityMode::Auto => auto_condition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_run_configuration() {
        let config = ForecastConfig::default();
        assert_eq!(config.changepoint_prior_scale, 0.15);
        assert_eq!(config.yearly, SeasonalityMode::On);
        assert_eq!(config.daily, SeasonalityMode::On);
        assert_eq!(config.interval_width, 0.8);
    }

    #[test]
    fn weekly_auto_needs_two_weeks_of_sub_weekly_data() {
        let config = ForecastConfig::default();

        let short: Vec<_> = config
            .active_seasonalities(10.0, 1.0)
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(short, vec!["yearly", "daily"]);

        let long: Vec<_> = config
            .active_seasonalities(400.0, 1.0)
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(long, vec!["yearly", "weekly", "daily"]);

        let weekly_bars: Vec<_> = config
            .active_seasonalities(400.0, 7.0)
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(weekly_bars, vec!["yearly", "daily"]);
    }
}
