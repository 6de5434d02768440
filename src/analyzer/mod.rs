// Analytics engine: stateless transforms over canonical series.

pub mod compare;
pub mod indicators;
pub mod returns;

pub use compare::{ComparisonTable, compare, correlate};
pub use indicators::{bollinger_bands, ema, macd, moving_average, rsi};
pub use returns::{cagr, change_series, day_over_day_change, year_to_date_return};
