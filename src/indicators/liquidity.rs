use crate::core::timeseries::{forward_fill_onto, lagged_change, rolling_mean};
use crate::models::{DataPoint, Record};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;

/// Business-day lags for the change ratios.
pub const WOW_LAG: usize = 5;
pub const MOM_LAG: usize = 25;
pub const YOY_LAG: usize = 250;

/// Moving-average windows over the net liquidity series.
pub const MA_WINDOWS: [usize; 3] = [5, 20, 60];

pub struct NetLiquidity;

impl NetLiquidity {
    pub fn slug(&self) -> &str {
        "net_liquidity"
    }

    pub fn name(&self) -> &str {
        "Net Liquidity (Fed Assets - TGA - RRP)"
    }

    /// FRED series IDs, in the order `calculate` expects them.
    pub fn required_inputs(&self) -> [&'static str; 3] {
        ["WALCL", "WDTGAL", "RRPONTSYD"]
    }

    /// Inputs expected: [0] = Fed Balance Sheet (WALCL), [1] = TGA (WDTGAL), [2] = RRP (RRPONTSYD).
    ///
    /// Builds one record per business day in `calendar` that has a net
    /// liquidity value, oldest first.
    pub fn calculate(&self, inputs: &[Vec<DataPoint>], calendar: &[NaiveDate]) -> Result<Vec<Record>> {
        if inputs.len() < 3 {
            return Err(anyhow!("Net Liquidity requires 3 inputs: Fed Assets, TGA, RRP"));
        }

        // WALCL and WDTGAL are published in millions of dollars, RRPONTSYD in billions.
        let scale = |values: Vec<Option<f64>>, factor: f64| -> Vec<Option<f64>> {
            values.into_iter().map(|v| v.map(|x| x * factor)).collect()
        };
        let fed_assets = scale(forward_fill_onto(&inputs[0], calendar), 1_000_000.0);
        let tga = scale(forward_fill_onto(&inputs[1], calendar), 1_000_000.0);
        let rrp = scale(forward_fill_onto(&inputs[2], calendar), 1_000_000_000.0);

        let net: Vec<Option<f64>> = (0..calendar.len())
            .map(|i| Some(fed_assets[i]? - tga[i]? - rrp[i]?))
            .collect();

        // Ratios are taken on the full business-day frame, before rows
        // without a value are dropped.
        let wow = lagged_change(&net, WOW_LAG);
        let mom = lagged_change(&net, MOM_LAG);
        let yoy = lagged_change(&net, YOY_LAG);

        let mut records: Vec<Record> = calendar
            .iter()
            .enumerate()
            .filter_map(|(i, day)| {
                let net_liquidity = net[i]?;
                Some(Record {
                    date: Some(day.format("%Y-%m-%d").to_string()),
                    walcl: fed_assets[i],
                    wdtgal: tga[i],
                    rrpontsyd: rrp[i],
                    net_liquidity: Some(net_liquidity),
                    yoy: yoy[i],
                    mom: mom[i],
                    wow: wow[i],
                    ..Default::default()
                })
            })
            .collect();

        // Moving averages run over the kept rows only.
        let kept: Vec<f64> = records.iter().filter_map(|r| r.net_liquidity).collect();
        let [ma5, ma20, ma60] = MA_WINDOWS.map(|window| rolling_mean(&kept, window));

        for (i, record) in records.iter_mut().enumerate() {
            record.ma5 = ma5[i];
            record.ma20 = ma20[i];
            record.ma60 = ma60[i];
        }

        Ok(records)
    }
}
