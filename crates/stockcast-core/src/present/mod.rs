//! # Presentation
//!
//! Pure derivations from a loaded series and a forecast. Nothing here
//! touches the filesystem; callers decide where the bytes go.
//!
//! | Item | Output |
//! |------|--------|
//! | [`TrendView`] | Close-price line |
//! | [`RoiSummary`] | First-to-last close return |
//! | [`ForecastView`] | Forecast band with components |
//! | [`VarianceView`] | Actual closes against the band |
//! | [`ForecastTable`] | Trailing forecast rows |
//! | [`price_csv`] / [`forecast_csv`] | CSV exports |
//! | [`ArtifactNames`] | Export file names |

mod artifacts;
mod export;
mod roi;
mod table;
mod views;

pub use artifacts::ArtifactNames;
pub use export::{forecast_csv, price_csv, read_price_csv};
pub use roi::RoiSummary;
pub use table::{ForecastRow, ForecastTable};
pub use views::{ForecastView, TrendView, VarianceView};
