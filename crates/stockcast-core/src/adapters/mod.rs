//! Price-source adapters.
//!
//! | Adapter | Network | Use |
//! |---------|---------|-----|
//! | [`YahooChartSource`] | yes | Default market-data provider |
//! | [`SyntheticSource`] | no | `--offline` runs and tests |
//! | [`StaticSource`] | no | CSV replay and fixed fixtures |

mod static_source;
mod synthetic;
mod yahoo;

pub use static_source::StaticSource;
pub use synthetic::SyntheticSource;
pub use yahoo::YahooChartSource;
