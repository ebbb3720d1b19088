//! Chart projection and the declarative line-chart config handed to the widget.

use super::format::{format_billions, PLACEHOLDER};
use crate::models::Dataset;
use serde::Serialize;

/// Roughly one trading year of business days.
pub const CHART_WINDOW: usize = 250;

/// Cap on visible x-axis labels, whatever the point count.
pub const X_TICK_LIMIT: usize = 12;

/// The most recent records of a dataset, oldest first, as parallel series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartProjection {
    pub labels: Vec<String>,
    pub daily: Vec<Option<f64>>,
    pub ma5: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma60: Vec<Option<f64>>,
}

impl ChartProjection {
    pub fn from_dataset(dataset: &Dataset, window: usize) -> Self {
        let take = window.min(dataset.len());
        let mut projection = Self::default();

        // The dataset is newest-first; walk the head backwards to get
        // chronological order.
        for record in dataset.records()[..take].iter().rev() {
            let label = record.date.as_deref().map_or_else(|| PLACEHOLDER.to_string(), date_label);
            projection.labels.push(label);
            projection.daily.push(record.net_liquidity);
            projection.ma5.push(record.ma5);
            projection.ma20.push(record.ma20);
            projection.ma60.push(record.ma60);
        }

        projection
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Drops the year: `"2024-03-07"` becomes `"03-07"`.
pub fn date_label(date: &str) -> String {
    date.chars().skip(5).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub label: &'static str,
    /// Absent points serialize as `null`; gap handling is the widget's call.
    pub data: Vec<Option<f64>>,
    pub border_color: &'static str,
    pub border_width: u32,
    pub point_radius: u32,
    pub tension: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub interaction: Interaction,
    pub scales: Scales,
}

/// Hovering any x position reports every series at that index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub mode: &'static str,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ticks_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TickFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFormat {
    /// Raw dollars as whole billions, e.g. `5812B`.
    Billions,
}

impl TickFormat {
    pub fn apply(&self, value: f64) -> String {
        match self {
            TickFormat::Billions => format_billions(value),
        }
    }
}

fn line(label: &'static str, data: Vec<Option<f64>>, color: &'static str, tension: f64) -> LineSeries {
    LineSeries {
        label,
        data,
        border_color: color,
        border_width: 2,
        point_radius: 0,
        tension,
    }
}

impl From<ChartProjection> for ChartConfig {
    fn from(projection: ChartProjection) -> Self {
        let ChartProjection { labels, daily, ma5, ma20, ma60 } = projection;

        ChartConfig {
            kind: "line",
            data: ChartData {
                labels,
                datasets: vec![
                    line("Net Liquidity", daily, "#ffffff", 0.1),
                    line("5D MA", ma5, "#fbbf24", 0.4),
                    line("20D MA", ma20, "#ef4444", 0.4),
                    line("60D MA", ma60, "#3b82f6", 0.4),
                ],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                interaction: Interaction { mode: "index", intersect: false },
                scales: Scales {
                    x: Axis { ticks: Ticks { max_ticks_limit: Some(X_TICK_LIMIT), format: None } },
                    y: Axis { ticks: Ticks { max_ticks_limit: None, format: Some(TickFormat::Billions) } },
                },
            },
        }
    }
}

/// Projects the latest [`CHART_WINDOW`] records into a widget config.
pub fn chart_config(dataset: &Dataset) -> ChartConfig {
    ChartProjection::from_dataset(dataset, CHART_WINDOW).into()
}
