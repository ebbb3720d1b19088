//! Cell formatting shared by the HTML and terminal front ends.

use serde::Serialize;

/// Shown for any absent value.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentCategory {
    Negative,
    PositiveOrZero,
}

/// A formatted change ratio. `category` is `None` exactly when the value was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PercentCell {
    pub text: String,
    pub category: Option<PercentCategory>,
}

/// Rounds half up (`2.5 -> 3`, `-2.5 -> -2`) and groups thousands with commas.
pub fn format_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format_with_commas(round_half_up(v)),
        None => PLACEHOLDER.to_string(),
    }
}

/// `0.0251 -> "2.5%"`, `-0.033 -> "-3.3%"`.
pub fn format_percent(ratio: Option<f64>) -> PercentCell {
    match ratio.filter(|v| v.is_finite()) {
        Some(r) => {
            let value = r * 100.0;
            let category = if value < 0.0 {
                PercentCategory::Negative
            } else {
                PercentCategory::PositiveOrZero
            };
            PercentCell { text: format!("{}%", to_fixed(value, 1)), category: Some(category) }
        }
        None => PercentCell { text: PLACEHOLDER.to_string(), category: None },
    }
}

/// Y-axis tick label: raw dollars rescaled to whole billions.
pub fn format_billions(value: f64) -> String {
    format!("{}B", to_fixed(value / 1_000_000_000.0, 0))
}

/// `Math.round`: nearest integer, halves go toward positive infinity.
fn round_half_up(v: f64) -> f64 {
    let r = v.round();
    // f64::round sends negative halves away from zero; pull them back up.
    if v < 0.0 && v - r == 0.5 {
        r + 1.0
    } else {
        r
    }
}

/// Fixed-point text with the tie rule of `Number.prototype.toFixed`: an exact
/// tie takes the larger magnitude. `{:.N}` alone would round ties to even.
fn to_fixed(value: f64, digits: usize) -> String {
    let magnitude = value.abs();
    // `magnitude` sits exactly halfway between two candidates only when
    // `magnitude * 2^(digits + 1)` is an odd integer.
    let halves = magnitude * 2f64.powi(digits as i32 + 1);
    let text = if halves.fract() == 0.0 && halves % 2.0 == 1.0 {
        let scale = 10f64.powi(digits as i32);
        format!("{:.*}", digits, (magnitude * scale).ceil() / scale)
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if value < 0.0 {
        format!("-{}", text)
    } else {
        text
    }
}

fn format_with_commas(rounded: f64) -> String {
    let s = format!("{:.0}", rounded.abs());
    let mut result = String::with_capacity(s.len() + s.len() / 3 + 1);
    if rounded < 0.0 {
        result.push('-');
    }
    let len = s.len();
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
