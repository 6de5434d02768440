// Rolling and exponential indicators. Every function returns a series
// index-aligned with its input: positions before the window fills, or where
// an input cell is missing, are `None` rather than omitted.
use crate::model::{CanonicalSeries, IndicatorSeries, PriceField};
use tracing::warn;

/// Simple rolling mean. The first `window - 1` positions are undefined, as is
/// any position whose window contains a missing cell.
pub fn moving_average(
    series: &CanonicalSeries,
    window: usize,
    field: PriceField,
) -> IndicatorSeries {
    let values = series.values(field);
    rolling_mean(&values, window)
}

fn rolling_mean(values: &[Option<f64>], window: usize) -> IndicatorSeries {
    if window == 0 {
        warn!("moving average requested with window 0");
        return vec![None; values.len()];
    }
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mut sum = 0.0;
            for v in slice {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}

/// Rolling sample standard deviation over the same windows as
/// [`rolling_mean`]. Undefined wherever the mean is, and for windows of
/// fewer than two points.
fn rolling_std(values: &[Option<f64>], window: usize) -> IndicatorSeries {
    if window < 2 {
        return vec![None; values.len()];
    }
    let means = rolling_mean(values, window);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let mean = means[i]?;
            let slice = &values[i + 1 - window..=i];
            let mut sum_sq = 0.0;
            for v in slice {
                let x = (*v)?;
                sum_sq += (x - mean).powi(2);
            }
            Some((sum_sq / (window - 1) as f64).sqrt())
        })
        .collect()
}

/// Recursive exponential moving average with the adjust=false convention:
/// `ema[0] = value[0]`, `ema[i] = alpha * value[i] + (1 - alpha) * ema[i-1]`.
/// A missing input cell yields `None` at that index; the recursion carries
/// the last defined average forward.
fn ewm_recursive(values: &[Option<f64>], alpha: f64) -> IndicatorSeries {
    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|v| match v {
            None => None,
            Some(x) => {
                let next = match prev {
                    None => *x,
                    Some(p) => alpha * x + (1.0 - alpha) * p,
                };
                prev = Some(next);
                prev
            }
        })
        .collect()
}

/// Span-parameterized EMA, `alpha = 2 / (span + 1)`.
pub fn ema(series: &CanonicalSeries, span: usize, field: PriceField) -> IndicatorSeries {
    let values = series.values(field);
    ema_values(&values, span)
}

fn ema_values(values: &[Option<f64>], span: usize) -> IndicatorSeries {
    if span == 0 {
        warn!("ema requested with span 0");
        return vec![None; values.len()];
    }
    ewm_recursive(values, 2.0 / (span as f64 + 1.0))
}

/// Wilder-style RSI: exponential smoothing of clipped gains and losses with
/// center-of-mass `period - 1` (`alpha = 1 / period`). Undefined at the
/// first bar and wherever the smoothed loss is zero.
pub fn rsi(series: &CanonicalSeries, period: usize, field: PriceField) -> IndicatorSeries {
    let values = series.values(field);
    if period == 0 {
        warn!("rsi requested with period 0");
        return vec![None; values.len()];
    }

    let mut gains: Vec<Option<f64>> = Vec::with_capacity(values.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let delta = if i == 0 {
            None
        } else {
            match (values[i], values[i - 1]) {
                (Some(curr), Some(prev)) => Some(curr - prev),
                _ => None,
            }
        };
        gains.push(delta.map(|d| d.max(0.0)));
        losses.push(delta.map(|d| (-d).max(0.0)));
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = ewm_recursive(&gains, alpha);
    let avg_loss = ewm_recursive(&losses, alpha);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| {
            let (gain, loss) = ((*g)?, (*l)?);
            if loss == 0.0 {
                return None;
            }
            let rs = gain / loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        })
        .collect()
}

/// MACD line (`EMA(fast) - EMA(slow)`) and its signal line
/// (`EMA(signal_period)` of the MACD line itself).
pub fn macd(
    series: &CanonicalSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
    field: PriceField,
) -> (IndicatorSeries, IndicatorSeries) {
    let values = series.values(field);
    if fast == 0 || slow == 0 || signal_period == 0 {
        warn!(fast, slow, signal_period, "macd requested with a zero span");
        return (vec![None; values.len()], vec![None; values.len()]);
    }

    let ema_fast = ema_values(&values, fast);
    let ema_slow = ema_values(&values, slow);
    let line: IndicatorSeries = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal = ema_values(&line, signal_period);
    (line, signal)
}

/// Bollinger Bands: `(upper, mid, lower)` with `mid = SMA(window)` and the
/// bands offset by two rolling standard deviations.
pub fn bollinger_bands(
    series: &CanonicalSeries,
    window: usize,
    field: PriceField,
) -> (IndicatorSeries, IndicatorSeries, IndicatorSeries) {
    let values = series.values(field);
    let mid = rolling_mean(&values, window);
    let std = rolling_std(&values, window);

    let upper: IndicatorSeries = mid
        .iter()
        .zip(&std)
        .map(|(m, s)| Some((*m)? + 2.0 * (*s)?))
        .collect();
    let lower: IndicatorSeries = mid
        .iter()
        .zip(&std)
        .map(|(m, s)| Some((*m)? - 2.0 * (*s)?))
        .collect();
    (upper, mid, lower)
}
