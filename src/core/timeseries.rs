use crate::models::DataPoint;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Every Monday-to-Friday date from `start` to `end`, both inclusive.
/// Holidays are not removed; the feed forward-fills across them.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Projects a raw series onto `calendar`, carrying the last observation on
/// or before each date forward. Dates before the first observation get `None`.
///
/// `calendar` must be sorted ascending. The series may arrive in any order;
/// duplicate dates keep the last value seen.
pub fn forward_fill_onto(series: &[DataPoint], calendar: &[NaiveDate]) -> Vec<Option<f64>> {
    let by_date: BTreeMap<NaiveDate, f64> = series
        .iter()
        .map(|dp| (dp.timestamp.date_naive(), dp.value))
        .collect();

    let mut last: Option<f64> = None;
    let mut obs = by_date.iter().peekable();

    calendar
        .iter()
        .map(|day| {
            while let Some((date, value)) = obs.peek() {
                if *date <= day {
                    last = Some(**value);
                    obs.next();
                } else {
                    break;
                }
            }
            last
        })
        .collect()
}

/// `values[i] / values[i - lag] - 1` for every index, `None` when either
/// side is missing, the lag runs off the front, or the ratio is not finite.
pub fn lagged_change(values: &[Option<f64>], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let current = values[i]?;
            let previous = values[i.checked_sub(lag)?]?;
            let ratio = current / previous - 1.0;
            ratio.is_finite().then_some(ratio)
        })
        .collect()
}

/// Trailing simple moving average. The first `window - 1` entries are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}
